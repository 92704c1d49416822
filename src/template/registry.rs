//! Template registry for storing and retrieving template definitions

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::params::{DiagramParams, ParamSchema};
use crate::renderer::{RenderContext, RenderResult};

/// Errors a render function can report
///
/// The orchestrator converts these into a `Render error: ...` warning on an
/// empty image; they never reach the caller as failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    /// Parameters describe a figure that cannot exist
    #[error("{reason}")]
    InvalidGeometry { reason: String },

    /// A parameter is present but unusable
    #[error("invalid parameter {param}: {reason}")]
    InvalidParameter { param: String, reason: String },

    /// A parameter the render function depends on is absent
    #[error("missing parameter: {param}")]
    MissingParameter { param: String },
}

impl TemplateError {
    pub fn geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    pub fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(param: impl Into<String>) -> Self {
        Self::MissingParameter {
            param: param.into(),
        }
    }
}

/// Signature shared by every template render function
pub type RenderFn = fn(&DiagramParams, &RenderContext) -> Result<RenderResult, TemplateError>;

/// A registered diagram template
#[derive(Clone)]
pub struct Template {
    /// Stable identifier, e.g. `math.geometry.triangle.v1`
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Grouping used by authoring tools, e.g. `geometry`
    pub category: String,
    /// Accepted parameters
    pub schema: ParamSchema,
    /// Pure render function
    pub render: RenderFn,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        schema: ParamSchema,
        render: RenderFn,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            schema,
            render,
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Registry mapping template ids to definitions
///
/// Filled once at startup and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in template library
    pub fn with_builtin_templates() -> Self {
        let mut registry = Self::new();
        crate::templates::register_builtin(&mut registry);
        debug!(count = registry.len(), "Registered built-in templates");
        registry
    }

    /// Register a template, replacing any previous one with the same id
    pub fn register(&mut self, template: Template) {
        if let Some(previous) = self.templates.insert(template.id.clone(), template) {
            warn!(id = %previous.id, "Template registration replaced an existing template");
        }
    }

    /// Get a template by id
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// All templates, ordered by id
    pub fn all(&self) -> Vec<&Template> {
        self.templates.values().collect()
    }

    /// Templates in one category, ordered by id
    pub fn by_category(&self, category: &str) -> Vec<&Template> {
        self.templates
            .values()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .templates
            .values()
            .map(|t| t.category.as_str())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Get all template ids
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_nothing(
        _params: &DiagramParams,
        _ctx: &RenderContext,
    ) -> Result<RenderResult, TemplateError> {
        Ok(RenderResult::default())
    }

    fn template(id: &str, category: &str, title: &str) -> Template {
        Template::new(id, title, category, ParamSchema::new(), render_nothing)
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("demo.box.v1", "demo", "Box"));
        assert!(registry.contains("demo.box.v1"));
        assert_eq!(registry.get("demo.box.v1").map(|t| t.title.as_str()), Some("Box"));
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let registry = TemplateRegistry::new();
        assert!(registry.get("does.not.exist").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("demo.box.v1", "demo", "First"));
        registry.register(template("demo.box.v1", "demo", "Second"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("demo.box.v1").map(|t| t.title.as_str()), Some("Second"));
    }

    #[test]
    fn test_by_category_and_categories() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("b.v1", "geometry", "B"));
        registry.register(template("a.v1", "geometry", "A"));
        registry.register(template("c.v1", "statistics", "C"));

        let ids: Vec<&str> = registry
            .by_category("geometry")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a.v1", "b.v1"]);
        assert_eq!(registry.categories(), vec!["geometry", "statistics"]);
        assert!(registry.by_category("physics").is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TemplateError::geometry("sides 1, 2, 10 cannot form a triangle").to_string(),
            "sides 1, 2, 10 cannot form a triangle"
        );
        assert_eq!(
            TemplateError::invalid("frequencies", "\"x\" is not a number").to_string(),
            "invalid parameter frequencies: \"x\" is not a number"
        );
    }
}
