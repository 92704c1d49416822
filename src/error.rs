//! Error types for blueprint expressions

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::blueprint::lexer::Token;

/// Byte range in expression source
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Syntax error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("Unknown helper \"{name}\"")]
    UnknownHelper { name: String },

    #[error("{helper} expects {expected} arguments, got {found}")]
    Arity {
        helper: String,
        expected: usize,
        found: usize,
    },

    #[error("{context}: {message}")]
    Type { context: String, message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Path \"{path}\" not found")]
    UnresolvedPath { path: String },
}

impl ExprError {
    pub fn type_error(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExprError::Type {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Only syntax errors carry a span; every other kind formats as its
    /// plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let ExprError::Syntax {
            span,
            message,
            expected,
        } = self
        else {
            return self.to_string();
        };

        let expected_str = if expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", expected.join(", "))
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(message)
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(format!("{}{}", message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ExprError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ExprError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Str(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_format_as_message() {
        let err = ExprError::UnknownHelper {
            name: "sqrt".to_string(),
        };
        assert_eq!(err.format("sqrt(4)", "expr"), "Unknown helper \"sqrt\"");
    }

    #[test]
    fn test_syntax_error_report_names_the_source() {
        let err = ExprError::Syntax {
            span: 4..5,
            message: "Unexpected ')'".to_string(),
            expected: vec!["identifier".to_string()],
        };
        let report = err.format("add(), 1", "expr");
        assert!(report.contains("Unexpected ')'"));
        assert!(report.contains("expr"));
    }

    #[test]
    fn test_arity_message() {
        let err = ExprError::Arity {
            helper: "clamp".to_string(),
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "clamp expects 3 arguments, got 1");
    }
}
