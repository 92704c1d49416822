//! Expression AST and its chumsky parser
//!
//! ```text
//! expr := call | path | number | string
//! call := ident '(' [expr (',' expr)*] ')'
//! path := ident ('.' (ident | index))*
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::lexer::{lex, Token};
use crate::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    /// Dotted lookup into the namespace
    Path(Vec<String>),
    /// Helper invocation; arguments may be calls themselves
    Call { name: String, args: Vec<Expr> },
}

/// Parse the inside of a `{{...}}` expression
pub fn parse(input: &str) -> Result<Expr, Vec<ExprError>> {
    let len = input.len();
    let tokens = lex(input).map_err(|e| vec![e])?;

    let token_stream = Stream::from_iter(tokens.into_iter().map(|(tok, span)| (tok, span.into())))
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expr_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(ExprError::from).collect())
}

fn expr_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let ident = select! {
            Token::Ident(s) => s,
        };

        let number = select! {
            Token::Number(n) => Expr::Number(n),
        };

        let string = select! {
            Token::Str(s) => Expr::Str(s),
        };

        let call = ident
            .clone()
            .then(
                expr.separated_by(just(Token::Comma))
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            )
            .map(|(name, args)| Expr::Call { name, args });

        // After the first segment, a non-negative integer indexes into a list
        let index = select! {
            Token::Number(n) if n >= 0.0 && n.fract() == 0.0 => format!("{}", n as u64),
        };

        let path = ident
            .clone()
            .then(
                just(Token::Dot)
                    .ignore_then(ident.or(index))
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map(|(head, mut rest)| {
                rest.insert(0, head);
                Expr::Path(rest)
            });

        // Call must come first: both start with an identifier
        choice((call, path, number, string))
    })
}
