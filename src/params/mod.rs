//! Parameter schemas, default merging and validation
//!
//! Templates declare the parameters they accept as a [`ParamSchema`]. Callers
//! supply a partial [`DiagramParams`]; the engine first fills missing keys from
//! schema defaults with [`merge_with_defaults`], then checks the result with
//! [`validate_params`].

mod merge;
mod schema;
mod types;
mod validate;

pub use merge::{merge_with_defaults, normalize_visibility};
pub use schema::{LabelSpec, ParamSchema, PositionSpec, ValueKind, ValueSpec, VisibilitySpec};
pub use types::{DiagramParams, Flag, ParamValue, Point, PositionValue};
pub use validate::{validate_params, ValidationOptions, ValidationResult, VisibilityPolicy};
