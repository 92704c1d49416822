//! Records describing how a diagram is produced

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::blueprint::Blueprint;
use crate::params::DiagramParams;

/// Where a diagram comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramMode {
    /// A stored, pre-rendered image referenced by `diagramId`
    Asset,
    /// A registered template chosen by the author
    Template,
    /// A registered template chosen automatically
    #[default]
    Auto,
    /// A data-only blueprint carried inline
    Custom,
}

impl DiagramMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramMode::Asset => "asset",
            DiagramMode::Template => "template",
            DiagramMode::Auto => "auto",
            DiagramMode::Custom => "custom",
        }
    }

    /// Modes rendered through a registered template
    pub fn is_template_bearing(&self) -> bool {
        matches!(self, DiagramMode::Template | DiagramMode::Auto)
    }
}

impl fmt::Display for DiagramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(DiagramMode::Asset),
            "template" => Ok(DiagramMode::Template),
            "auto" => Ok(DiagramMode::Auto),
            "custom" => Ok(DiagramMode::Custom),
            _ => Err(format!("Unknown diagram mode: {}", s)),
        }
    }
}

/// Everything needed to produce one diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMetadata {
    #[serde(default)]
    pub mode: DiagramMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_id: Option<String>,
    #[serde(default)]
    pub params: DiagramParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Blueprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl DiagramMetadata {
    /// Template-mode metadata for `template_id`
    pub fn template(template_id: impl Into<String>) -> Self {
        Self {
            mode: DiagramMode::Template,
            template_id: Some(template_id.into()),
            ..Self::default()
        }
    }

    /// Auto-mode metadata for `template_id`
    pub fn auto(template_id: impl Into<String>) -> Self {
        Self {
            mode: DiagramMode::Auto,
            template_id: Some(template_id.into()),
            ..Self::default()
        }
    }

    /// Custom-mode metadata carrying a blueprint
    pub fn custom(blueprint: Blueprint) -> Self {
        Self {
            mode: DiagramMode::Custom,
            custom: Some(blueprint),
            ..Self::default()
        }
    }

    /// Asset-mode metadata pointing at a stored image
    pub fn asset(diagram_id: impl Into<String>) -> Self {
        Self {
            mode: DiagramMode::Asset,
            diagram_id: Some(diagram_id.into()),
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: DiagramParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_placement(mut self, placement: impl Into<String>) -> Self {
        self.placement = Some(placement.into());
        self
    }

    /// Template id, ignoring blank values
    pub fn template_id(&self) -> Option<&str> {
        self.template_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Whether the engine draws this diagram (everything except stored assets)
    pub fn is_renderable(&self) -> bool {
        self.mode != DiagramMode::Asset
    }

    /// Whether this metadata goes through the blueprint interpreter
    ///
    /// Custom mode always does; auto mode does when it carries a blueprint
    /// and names no template.
    pub fn uses_blueprint(&self) -> bool {
        match self.mode {
            DiagramMode::Custom => true,
            DiagramMode::Auto => self.custom.is_some() && self.template_id().is_none(),
            _ => false,
        }
    }
}
