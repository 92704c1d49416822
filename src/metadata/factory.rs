//! Building diagram records from creation specs

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::params::{ValidationOptions, ValidationResult};
use crate::renderer::RenderResult;
use crate::Engine;

use super::types::DiagramMetadata;
use super::validator::validate_metadata;

/// Request to create one diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationSpec {
    pub title: String,
    pub metadata: DiagramMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreationSpec {
    pub fn new(title: impl Into<String>, metadata: DiagramMetadata) -> Self {
        Self {
            title: title.into(),
            metadata,
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// A created diagram, ready to be stored by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRecord {
    pub title: String,
    pub metadata: DiagramMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Rendered image; absent for stored assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderResult>,
    /// Metadata and render warnings, in that order
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Why a spec did not produce a record
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FactoryError {
    #[error("title is required")]
    MissingTitle,

    #[error("invalid metadata: {}", .0.join("; "))]
    InvalidMetadata(Vec<String>),

    #[error("render failed: {}", .0.join("; "))]
    RenderFailed(Vec<String>),
}

/// Turns creation specs into diagram records using an [`Engine`]
#[derive(Debug, Clone, Copy)]
pub struct DiagramFactory<'a> {
    engine: &'a Engine,
    options: ValidationOptions,
}

impl<'a> DiagramFactory<'a> {
    /// Factory validating metadata strictly
    pub fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            options: ValidationOptions::strict(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate, render and package one spec
    pub fn create(&self, spec: &CreationSpec) -> Result<DiagramRecord, FactoryError> {
        let title = spec.title.trim();
        if title.is_empty() {
            return Err(FactoryError::MissingTitle);
        }

        let check = self.check(&spec.metadata);
        if !check.ok {
            return Err(FactoryError::InvalidMetadata(check.errors));
        }

        let render = if spec.metadata.is_renderable() {
            let result = self.engine.render(&spec.metadata);
            if result.is_empty() {
                return Err(FactoryError::RenderFailed(result.warnings));
            }
            Some(result)
        } else {
            None
        };

        let mut warnings = check.warnings;
        if let Some(result) = &render {
            warnings.extend(result.warnings.iter().cloned());
        }

        debug!(title, warnings = warnings.len(), "Created diagram record");
        Ok(DiagramRecord {
            title: title.to_string(),
            metadata: spec.metadata.clone(),
            subject_id: spec.subject_id.clone(),
            tags: spec.tags.clone(),
            render,
            warnings,
        })
    }

    /// Create every spec independently
    ///
    /// Specs are processed in parallel; the outcomes line up with the input.
    pub fn create_batch(&self, specs: &[CreationSpec]) -> Vec<Result<DiagramRecord, FactoryError>> {
        info!(count = specs.len(), "Creating diagram batch");
        let results: Vec<_> = specs.par_iter().map(|spec| self.create(spec)).collect();

        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                warn!(index, title = %specs[index].title, error = %e, "Batch item failed");
            }
        }
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(count = specs.len(), failed, "Finished diagram batch");
        results
    }

    fn check(&self, metadata: &DiagramMetadata) -> ValidationResult {
        if !metadata.mode.is_template_bearing() || metadata.uses_blueprint() {
            return validate_metadata(metadata, None, self.options);
        }
        let Some(id) = metadata.template_id() else {
            return validate_metadata(metadata, None, self.options);
        };
        match self.engine.registry().get(id) {
            Some(template) => validate_metadata(metadata, Some(&template.schema), self.options),
            None => validate_metadata(metadata, None, self.options).merge(ValidationResult::failure(
                format!("Template \"{}\" not found in engine registry", id),
            )),
        }
    }
}
