//! Shared style palette for diagram markup
//!
//! Every rendered diagram carries an inline `<style>` block built from a
//! palette: stroke colors and widths, point radius, and font sizes/colors for
//! vertex labels, side lengths and angle measures. Palettes are TOML documents
//! so a host application can restyle all diagrams without touching templates.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing palettes
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse palette TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A palette mapping style tokens to concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Token name -> CSS value
    pub tokens: BTreeMap<String, String>,
}

/// TOML structure for deserializing palettes
#[derive(Deserialize)]
struct TomlPalette {
    metadata: Option<TomlMetadata>,
    palette: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default palette
const DEFAULT_PALETTE: &str = r##"
[metadata]
name = "default"

[palette]
font-family = "Arial, Helvetica, sans-serif"

# Lines and points
line = "#1f2937"
line-width = "2"
point = "#111827"
point-radius = "4"
hidden = "#9ca3af"

# Vertex labels
text = "#111827"
text-size = "18"

# Side lengths
side-text = "#2563eb"
side-text-size = "15"

# Angle measures and arcs
angle-text = "#dc2626"
angle-text-size = "14"
arc = "#dc2626"
arc-width = "1.5"

# Marks
right-angle = "#374151"
equal-mark = "#374151"
mark-width = "1.5"

# Fills
face = "#dbeafe"
face-shade = "#bfdbfe"
bar = "#60a5fa"

# Axes and grids
axis = "#374151"
grid = "#e5e7eb"
"##;

impl Palette {
    /// Load palette from TOML file
    pub fn from_file(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load palette from TOML string
    pub fn from_toml(content: &str) -> Result<Self, PaletteError> {
        let parsed: TomlPalette = toml::from_str(content)?;

        Ok(Palette {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            tokens: parsed.palette,
        })
    }

    /// Look up a token defined in this palette
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(|s| s.as_str())
    }

    /// Look up a token, falling back to the default palette
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(value) = self.resolve(token) {
            return value.to_string();
        }

        let default = Self::default();
        if let Some(value) = default.resolve(token) {
            return value.to_string();
        }

        if token.ends_with("-width") || token.ends_with("-radius") {
            return "1".to_string();
        }
        if token.ends_with("-size") {
            return "14".to_string();
        }
        "#333333".to_string()
    }

    /// Numeric token (stroke widths, radii, font sizes)
    pub fn number(&self, token: &str) -> f64 {
        self.resolve_or_default(token).trim().parse().unwrap_or(1.0)
    }

    /// CSS rules for the shared diagram classes
    pub fn style_block(&self) -> String {
        let t = |token: &str| self.resolve_or_default(token);
        let font = t("font-family");

        let rules = [
            format!(
                ".diagram-line {{ stroke: {}; stroke-width: {}; fill: none; stroke-linecap: round; stroke-linejoin: round; }}",
                t("line"),
                t("line-width")
            ),
            format!(".diagram-hidden {{ stroke: {}; stroke-dasharray: 6 4; }}", t("hidden")),
            format!(".diagram-point {{ fill: {}; stroke: none; }}", t("point")),
            format!(
                ".diagram-text {{ font-family: {}; font-size: {}px; fill: {}; font-weight: 600; }}",
                font,
                t("text-size"),
                t("text")
            ),
            format!(
                ".diagram-text-side {{ font-family: {}; font-size: {}px; fill: {}; }}",
                font,
                t("side-text-size"),
                t("side-text")
            ),
            format!(
                ".diagram-text-angle {{ font-family: {}; font-size: {}px; fill: {}; }}",
                font,
                t("angle-text-size"),
                t("angle-text")
            ),
            format!(
                ".diagram-arc {{ stroke: {}; stroke-width: {}; fill: none; }}",
                t("arc"),
                t("arc-width")
            ),
            format!(
                ".diagram-right-angle {{ stroke: {}; stroke-width: {}; fill: none; }}",
                t("right-angle"),
                t("mark-width")
            ),
            format!(
                ".diagram-equal-mark {{ stroke: {}; stroke-width: {}; fill: none; }}",
                t("equal-mark"),
                t("mark-width")
            ),
            format!(
                ".diagram-face {{ fill: {}; stroke: {}; stroke-width: {}; stroke-linejoin: round; }}",
                t("face"),
                t("line"),
                t("line-width")
            ),
            format!(
                ".diagram-bar {{ fill: {}; stroke: {}; stroke-width: 1; }}",
                t("bar"),
                t("line")
            ),
            format!(".diagram-axis {{ stroke: {}; stroke-width: 1.5; fill: none; }}", t("axis")),
            format!(".diagram-grid {{ stroke: {}; stroke-width: 1; fill: none; }}", t("grid")),
        ];

        rules.join("\n")
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_toml(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}
