//! Template definitions and the registry that holds them
//!
//! A template pairs a [`ParamSchema`](crate::params::ParamSchema) with a pure
//! render function. Templates are registered once at startup; the registry is
//! read-only afterwards and safe to share between threads.

mod catalog;
mod registry;

pub use catalog::DiagramType;
pub use registry::{RenderFn, Template, TemplateError, TemplateRegistry};
