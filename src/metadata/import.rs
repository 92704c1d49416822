//! Bulk-import rows
//!
//! Rows arrive already parsed from CSV or JSON by the admin tooling. This
//! module only maps their flat shape onto a [`CreationSpec`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::DiagramParams;
use crate::template::DiagramType;

use super::factory::CreationSpec;
use super::types::{DiagramMetadata, DiagramMode};

/// One row of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRow {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    /// `;`-separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<DiagramParams>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    #[error("row is missing a title")]
    MissingTitle,

    #[error("unknown mode \"{0}\"")]
    UnknownMode(String),

    #[error("mode \"{0}\" cannot be imported")]
    UnsupportedMode(DiagramMode),
}

impl TryFrom<ImportRow> for CreationSpec {
    type Error = ImportError;

    fn try_from(row: ImportRow) -> Result<Self, Self::Error> {
        let title = row.title.trim().to_string();
        if title.is_empty() {
            return Err(ImportError::MissingTitle);
        }

        let mode = match non_blank(row.mode) {
            None => DiagramMode::Auto,
            Some(m) => m.parse().map_err(|_| ImportError::UnknownMode(m))?,
        };
        if mode == DiagramMode::Custom {
            return Err(ImportError::UnsupportedMode(mode));
        }

        // Template column accepts a semantic type name as well as a raw id
        let template_id = non_blank(row.template_id).map(|id| match id.parse::<DiagramType>() {
            Ok(ty) => ty.template_id().to_string(),
            Err(_) => id,
        });

        let tags = row
            .tags
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Ok(CreationSpec {
            title,
            metadata: DiagramMetadata {
                mode,
                template_id,
                params: row.params.unwrap_or_default(),
                placement: non_blank(row.placement),
                caption: non_blank(row.caption),
                alt: non_blank(row.alt),
                ..DiagramMetadata::default()
            },
            subject_id: non_blank(row.subject_id),
            tags,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Convert many rows, keeping each row's outcome in input order
pub fn specs_from_rows(rows: Vec<ImportRow>) -> Vec<Result<CreationSpec, ImportError>> {
    rows.into_iter().map(CreationSpec::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(title: &str) -> ImportRow {
        ImportRow {
            title: title.to_string(),
            ..ImportRow::default()
        }
    }

    #[test]
    fn test_row_with_type_name_and_tags() {
        let spec = CreationSpec::try_from(ImportRow {
            template_id: Some("triangle".to_string()),
            tags: Some(" geometry; ;year-8 ".to_string()),
            alt: Some("  ".to_string()),
            ..row("Right triangle")
        })
        .expect("converts");

        assert_eq!(spec.title, "Right triangle");
        assert_eq!(spec.metadata.mode, DiagramMode::Auto);
        assert_eq!(spec.metadata.template_id(), Some("math.geometry.triangle.v1"));
        assert_eq!(spec.tags, vec!["geometry", "year-8"]);
        assert_eq!(spec.metadata.alt, None);
    }

    #[test]
    fn test_raw_template_id_is_kept() {
        let spec = CreationSpec::try_from(ImportRow {
            template_id: Some("math.geometry.circle.v1".to_string()),
            mode: Some("template".to_string()),
            ..row("Circle")
        })
        .expect("converts");
        assert_eq!(spec.metadata.mode, DiagramMode::Template);
        assert_eq!(spec.metadata.template_id(), Some("math.geometry.circle.v1"));
    }

    #[test]
    fn test_rejected_rows() {
        assert_eq!(CreationSpec::try_from(row("  ")), Err(ImportError::MissingTitle));
        assert_eq!(
            CreationSpec::try_from(ImportRow {
                mode: Some("video".to_string()),
                ..row("x")
            }),
            Err(ImportError::UnknownMode("video".to_string()))
        );
        assert_eq!(
            CreationSpec::try_from(ImportRow {
                mode: Some("custom".to_string()),
                ..row("x")
            }),
            Err(ImportError::UnsupportedMode(DiagramMode::Custom))
        );
    }

    #[test]
    fn test_rows_deserialize_from_json() {
        let rows: Vec<ImportRow> = serde_json::from_str(
            r#"[{"title": "A", "templateId": "circle", "subjectId": "maths", "params": {"values": {"radius": 2}}}]"#,
        )
        .expect("parse");
        let specs = specs_from_rows(rows);
        let spec = specs[0].as_ref().expect("converts");
        assert_eq!(spec.subject_id.as_deref(), Some("maths"));
        assert_eq!(spec.metadata.params.number("radius"), Some(2.0));
    }
}
