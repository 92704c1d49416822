//! The output of every render call

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Rendered markup with its intrinsic size and advisory warnings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    pub svg: String,
    pub width: f64,
    pub height: f64,
    pub warnings: Vec<String>,
}

impl RenderResult {
    /// An empty image; callers treat it as "no preview available"
    pub fn empty(warnings: Vec<String>) -> Self {
        Self {
            svg: String::new(),
            width: 0.0,
            height: 0.0,
            warnings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.svg.is_empty()
    }

    /// Prepend warnings ahead of the ones already carried
    pub fn with_leading_warnings(mut self, mut leading: Vec<String>) -> Self {
        leading.append(&mut self.warnings);
        self.warnings = leading;
        self
    }

    /// Base64 `data:` URI for embedding or downloading the image
    pub fn to_data_uri(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.svg.as_bytes())
        ))
    }
}
