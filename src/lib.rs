//! Diagram Engine - parametric diagrams for educational content
//!
//! A template id plus typed parameters (labels, values, visibility flags,
//! positions) deterministically produce a self-contained SVG image with its
//! intrinsic size and advisory warnings. Diagrams can also be authored as data
//! through [`Blueprint`]s.
//!
//! # Example
//!
//! ```rust
//! use diagram_engine::{render, DiagramMetadata, DiagramParams};
//!
//! let metadata = DiagramMetadata::template("math.geometry.circle.v1")
//!     .with_params(DiagramParams::new().with_value("radius", 3.0));
//!
//! let result = render(&metadata);
//! assert!(result.svg.contains(r#"viewBox="0 0 420 420""#));
//! assert!(result.warnings.is_empty());
//! ```

pub mod blueprint;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod palette;
pub mod params;
pub mod renderer;
pub mod template;
mod templates;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use tracing::{debug, info_span, warn};

pub use blueprint::{render_blueprint, Blueprint};
pub use error::ExprError;
pub use metadata::{
    validate_metadata, CreationSpec, DiagramFactory, DiagramMetadata, DiagramMode, DiagramRecord,
    FactoryError, ImportError, ImportRow,
};
pub use palette::{Palette, PaletteError};
pub use params::{
    merge_with_defaults, validate_params, DiagramParams, ParamSchema, ValidationOptions,
    ValidationResult, VisibilityPolicy,
};
pub use renderer::{RenderContext, RenderResult, SvgConfig};
pub use template::{DiagramType, Template, TemplateError, TemplateRegistry};

/// Configuration for an [`Engine`]
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Palette for the inline style block
    pub palette: Palette,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Treatment of non-boolean visibility values
    pub visibility: VisibilityPolicy,
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    pub fn with_visibility_policy(mut self, policy: VisibilityPolicy) -> Self {
        self.visibility = policy;
        self
    }
}

/// Render orchestrator over an immutable template registry
///
/// An engine holds no mutable state, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: TemplateRegistry,
    context: RenderContext,
    visibility: VisibilityPolicy,
}

impl Default for Engine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Engine {
    /// Engine over the built-in template library
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(TemplateRegistry::with_builtin_templates(), config)
    }

    /// Engine over the built-in template library with default configuration
    pub fn builtin() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Engine over a caller-supplied registry
    pub fn with_registry(registry: TemplateRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            context: RenderContext::new(config.palette, config.svg),
            visibility: config.visibility,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn visibility_policy(&self) -> VisibilityPolicy {
        self.visibility
    }

    fn options(&self) -> ValidationOptions {
        ValidationOptions {
            visibility: self.visibility,
        }
    }

    /// Render a diagram
    ///
    /// Never fails: every problem comes back as a warning, on an empty image
    /// when nothing could be drawn.
    pub fn render(&self, metadata: &DiagramMetadata) -> RenderResult {
        let span = info_span!(
            "render",
            mode = %metadata.mode,
            template = metadata.template_id().unwrap_or("")
        );
        let _enter = span.enter();

        if metadata.uses_blueprint() {
            return self.render_custom(metadata);
        }

        let template = match self.resolve(metadata) {
            Ok(template) => template,
            Err(problem) => {
                warn!("{}", problem);
                return RenderResult::empty(vec![problem]);
            }
        };

        let mut merged = merge_with_defaults(&metadata.params, &template.schema);
        let validation = validate_params(&merged, &template.schema, self.options());
        if !validation.ok {
            debug!(errors = validation.errors.len(), "Parameters failed validation");
            let mut warnings = validation.warnings;
            warnings.extend(validation.errors);
            return RenderResult::empty(warnings);
        }

        if self.visibility == VisibilityPolicy::Lenient {
            params::normalize_visibility(&mut merged, &template.schema);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            (template.render)(&merged, &self.context)
        }));
        let message = match outcome {
            Ok(Ok(result)) => {
                debug!(
                    width = result.width,
                    height = result.height,
                    warnings = result.warnings.len(),
                    "Rendered template"
                );
                return result.with_leading_warnings(validation.warnings);
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        warn!(error = %message, "Template render failed");
        let mut warnings = validation.warnings;
        warnings.push(format!("Render error: {}", message));
        RenderResult::empty(warnings)
    }

    /// Check a diagram without rendering it
    pub fn validate(&self, metadata: &DiagramMetadata) -> ValidationResult {
        if metadata.uses_blueprint() {
            return match &metadata.custom {
                None => ValidationResult::failure(NO_BLUEPRINT),
                Some(bp) if bp.layers.is_empty() => ValidationResult::new(
                    vec!["Custom blueprint has no layers".to_string()],
                    vec![],
                ),
                Some(_) => ValidationResult::valid(),
            };
        }

        match self.resolve(metadata) {
            Ok(template) => {
                let merged = merge_with_defaults(&metadata.params, &template.schema);
                validate_params(&merged, &template.schema, self.options())
            }
            Err(problem) => ValidationResult::failure(problem),
        }
    }

    fn resolve(&self, metadata: &DiagramMetadata) -> Result<&Template, String> {
        if !metadata.mode.is_template_bearing() {
            return Err(format!(
                "Mode \"{}\" is not rendered by the engine",
                metadata.mode
            ));
        }
        let id = metadata
            .template_id()
            .ok_or_else(|| format!("No templateId provided for mode \"{}\"", metadata.mode))?;
        self.registry
            .get(id)
            .ok_or_else(|| format!("Template \"{}\" not found in engine registry", id))
    }

    fn render_custom(&self, metadata: &DiagramMetadata) -> RenderResult {
        let Some(bp) = &metadata.custom else {
            warn!("{}", NO_BLUEPRINT);
            return RenderResult::empty(vec![NO_BLUEPRINT.to_string()]);
        };
        let namespace = blueprint::namespace_from_params(&metadata.params);
        match panic::catch_unwind(AssertUnwindSafe(|| {
            render_blueprint(bp, &namespace, &self.context)
        })) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(error = %message, "Blueprint render failed");
                RenderResult::empty(vec![format!("Render error: {}", message)])
            }
        }
    }
}

const NO_BLUEPRINT: &str = "Custom diagram has no blueprint";

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "render function panicked".to_string()
    }
}

static DEFAULT_ENGINE: OnceLock<Engine> = OnceLock::new();

/// Shared engine over the built-in templates, created on first use
pub fn default_engine() -> &'static Engine {
    DEFAULT_ENGINE.get_or_init(Engine::builtin)
}

/// Render with the shared built-in engine
pub fn render(metadata: &DiagramMetadata) -> RenderResult {
    default_engine().render(metadata)
}

/// Validate with the shared built-in engine
pub fn validate(metadata: &DiagramMetadata) -> ValidationResult {
    default_engine().validate(metadata)
}
