//! SVG rendering primitives shared by templates and blueprints
//!
//! Templates draw on a [`Canvas`], which wraps an [`SvgBuilder`] configured by
//! [`SvgConfig`] and styled by the active [`Palette`].

pub mod canvas;
pub mod config;
pub mod geometry;
mod result;
pub mod svg;

pub use canvas::{Canvas, IdPrefix};
pub use config::SvgConfig;
pub use result::RenderResult;
pub use svg::{SvgBuilder, TextAnchor};

use crate::palette::Palette;

/// Everything a render function may read besides its parameters
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub palette: Palette,
    pub svg: SvgConfig,
}

impl RenderContext {
    pub fn new(palette: Palette, svg: SvgConfig) -> Self {
        Self { palette, svg }
    }
}
