//! Diagram metadata: validation, record creation and bulk import

mod factory;
mod import;
mod types;
mod validator;

pub use factory::{CreationSpec, DiagramFactory, DiagramRecord, FactoryError};
pub use import::{specs_from_rows, ImportError, ImportRow};
pub use types::{DiagramMetadata, DiagramMode};
pub use validator::validate_metadata;
