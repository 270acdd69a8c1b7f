use winnow::prelude::*;

mod expr;

#[cfg(test)]
mod tests;

use crate::ast::{Expr, FuncCall, NamedArg};
use crate::parse_utils::ws_skip;
use crate::registry;

// ---------------------------------------------------------------------------
// Parse results
// ---------------------------------------------------------------------------

/// A single syntax-level problem. Fatal: no partial AST accompanies it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseIssue {
    pub message: String,
    /// Byte offset into the formula text, when known.
    pub position: Option<usize>,
}

/// Outcome of parsing one formula string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub success: bool,
    pub ast: Option<Expr>,
    pub errors: Vec<ParseIssue>,
}

impl ParseOutcome {
    fn ok(ast: Expr) -> Self {
        Self {
            success: true,
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    fn fail(issue: ParseIssue) -> Self {
        Self {
            success: false,
            ast: None,
            errors: vec![issue],
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Parse a formula string into an expression tree.
///
/// Empty input, unbalanced parentheses, unterminated strings, and trailing
/// garbage are all fatal; the outcome then carries a message and byte
/// offset instead of an AST.
pub fn parse(text: &str) -> ParseOutcome {
    if text.trim().is_empty() {
        return ParseOutcome::fail(ParseIssue {
            message: "no formula provided".to_string(),
            position: None,
        });
    }

    match full_formula.parse(text) {
        Ok(ast) => ParseOutcome::ok(coerce_field_args(ast)),
        Err(err) => {
            let position = err.offset();
            let detail = err.into_inner().to_string().replace('\n', " ");
            let message = if detail.trim().is_empty() {
                "invalid formula syntax".to_string()
            } else {
                format!("invalid formula syntax: {}", detail.trim())
            };
            ParseOutcome::fail(ParseIssue {
                message,
                position: Some(position),
            })
        }
    }
}

fn full_formula(input: &mut &str) -> ModalResult<Expr> {
    ws_skip.parse_next(input)?;
    let e = expr::parse_expr.parse_next(input)?;
    ws_skip.parse_next(input)?;
    Ok(e)
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Rewrite string literals into field references at positions the registry
/// declares as field arguments, so `sum("bytes")` and `sum(bytes)` build
/// the same tree. Unknown functions are left untouched for the checker.
fn coerce_field_args(expr: Expr) -> Expr {
    match expr {
        Expr::Neg(inner) => Expr::Neg(Box::new(coerce_field_args(*inner))),
        Expr::BinOp { op, left, right } => Expr::BinOp {
            op,
            left: Box::new(coerce_field_args(*left)),
            right: Box::new(coerce_field_args(*right)),
        },
        Expr::Call(call) => {
            let spec = registry::lookup(&call.name);
            let args = call
                .args
                .into_iter()
                .enumerate()
                .map(|(i, arg)| {
                    let arg = coerce_field_args(arg);
                    match (spec, arg) {
                        (Some(spec), Expr::Str(s)) if spec.field_args.contains(&i) => {
                            Expr::Field(s)
                        }
                        (_, other) => other,
                    }
                })
                .collect();
            let named = call
                .named
                .into_iter()
                .map(|na| NamedArg {
                    key: na.key,
                    value: coerce_field_args(na.value),
                })
                .collect();
            Expr::Call(FuncCall {
                name: call.name,
                args,
                named,
            })
        }
        other => other,
    }
}
