//! Blueprint document model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A data-only diagram description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    #[serde(default = "default_version")]
    pub version: u32,
    pub view_box: ViewBox,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

fn default_version() -> u32 {
    1
}

/// Intrinsic canvas size; accepts `"0 0 W H"` or `{ "width": W, "height": H }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewBox")]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawViewBox {
    Text(String),
    Size { width: f64, height: f64 },
}

impl TryFrom<RawViewBox> for ViewBox {
    type Error = String;

    fn try_from(raw: RawViewBox) -> Result<Self, Self::Error> {
        let (width, height) = match raw {
            RawViewBox::Size { width, height } => (width, height),
            RawViewBox::Text(text) => {
                let numbers = text
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|part| !part.is_empty())
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| format!("viewBox \"{}\" is not four numbers", text))?;
                match numbers.as_slice() {
                    [_, _, w, h] => (*w, *h),
                    _ => return Err(format!("viewBox \"{}\" is not four numbers", text)),
                }
            }
        };
        if !(width > 0.0 && height > 0.0) {
            return Err(format!("viewBox size must be positive (got {} x {})", width, height));
        }
        Ok(ViewBox { width, height })
    }
}

/// A z-ordered group of shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub items: Vec<ShapeItem>,
}

/// One primitive; every field other than `id`/`type` may be an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeItem {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl ShapeItem {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
