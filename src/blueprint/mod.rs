//! Data-only diagrams
//!
//! A [`Blueprint`] is a JSON shape tree whose fields may hold `{{expr}}`
//! expressions. Expressions are lexed with logos, parsed with chumsky and
//! evaluated against a namespace built from [`DiagramParams`](crate::params::DiagramParams).

mod check;
pub mod expr;
pub mod lexer;
mod render;
mod resolver;
mod types;

pub use check::{check_expressions, ExpressionIssue};
pub use render::{render_blueprint, SHAPE_TYPES, STYLE_ATTRIBUTES};
pub use resolver::{expression_body, namespace_from_params, Resolver, Unresolved};
pub use types::{Blueprint, Layer, ShapeItem, ViewBox};
