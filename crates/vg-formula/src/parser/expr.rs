use winnow::combinator::{alt, cut_err, fail, opt};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::literal;

use crate::ast::{BinOp, Expr, FuncCall, NamedArg};
use crate::parse_utils::{ident, number_literal, quoted_string, ws_skip};

// ---------------------------------------------------------------------------
// Public entry: full expression
// ---------------------------------------------------------------------------

pub(crate) fn parse_expr(input: &mut &str) -> ModalResult<Expr> {
    or_expr.parse_next(input)
}

// ---------------------------------------------------------------------------
// Precedence levels (lowest to highest)
// ---------------------------------------------------------------------------

/// `or_expr = and_expr { "||" and_expr }`
fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let mut left = and_expr.parse_next(input)?;
    loop {
        ws_skip.parse_next(input)?;
        if opt(literal("||")).parse_next(input)?.is_some() {
            ws_skip.parse_next(input)?;
            let right = cut_err(and_expr).parse_next(input)?;
            left = Expr::BinOp {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        } else {
            break;
        }
    }
    Ok(left)
}

/// `and_expr = cmp_expr { "&&" cmp_expr }`
fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let mut left = cmp_expr.parse_next(input)?;
    loop {
        ws_skip.parse_next(input)?;
        if opt(literal("&&")).parse_next(input)?.is_some() {
            ws_skip.parse_next(input)?;
            let right = cut_err(cmp_expr).parse_next(input)?;
            left = Expr::BinOp {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        } else {
            break;
        }
    }
    Ok(left)
}

/// `cmp_expr = add_expr [cmp_op add_expr]`
fn cmp_expr(input: &mut &str) -> ModalResult<Expr> {
    let left = add_expr.parse_next(input)?;
    ws_skip.parse_next(input)?;

    if let Some(op) = opt(cmp_op).parse_next(input)? {
        ws_skip.parse_next(input)?;
        let right = cut_err(add_expr).parse_next(input)?;
        return Ok(Expr::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    Ok(left)
}

fn cmp_op(input: &mut &str) -> ModalResult<BinOp> {
    alt((
        literal("==").value(BinOp::Eq),
        literal("!=").value(BinOp::Ne),
        literal("<=").value(BinOp::Le),
        literal(">=").value(BinOp::Ge),
        literal("<").value(BinOp::Lt),
        literal(">").value(BinOp::Gt),
    ))
    .parse_next(input)
}

/// `add_expr = mul_expr { ("+" | "-") mul_expr }`
fn add_expr(input: &mut &str) -> ModalResult<Expr> {
    let mut left = mul_expr.parse_next(input)?;
    loop {
        ws_skip.parse_next(input)?;
        let op = opt(alt((
            literal("+").value(BinOp::Add),
            literal("-").value(BinOp::Sub),
        )))
        .parse_next(input)?;
        if let Some(op) = op {
            ws_skip.parse_next(input)?;
            let right = cut_err(mul_expr).parse_next(input)?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        } else {
            break;
        }
    }
    Ok(left)
}

/// `mul_expr = unary_expr { ("*" | "/") unary_expr }`
fn mul_expr(input: &mut &str) -> ModalResult<Expr> {
    let mut left = unary_expr.parse_next(input)?;
    loop {
        ws_skip.parse_next(input)?;
        let op = opt(alt((
            literal("*").value(BinOp::Mul),
            literal("/").value(BinOp::Div),
        )))
        .parse_next(input)?;
        if let Some(op) = op {
            ws_skip.parse_next(input)?;
            let right = cut_err(unary_expr).parse_next(input)?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        } else {
            break;
        }
    }
    Ok(left)
}

/// `unary_expr = ["-"] primary`
fn unary_expr(input: &mut &str) -> ModalResult<Expr> {
    if opt(literal("-")).parse_next(input)?.is_some() {
        ws_skip.parse_next(input)?;
        let inner = primary.parse_next(input)?;
        Ok(Expr::Neg(Box::new(inner)))
    } else {
        primary.parse_next(input)
    }
}

// ---------------------------------------------------------------------------
// Primary
// ---------------------------------------------------------------------------

fn primary(input: &mut &str) -> ModalResult<Expr> {
    alt((
        number_literal.map(Expr::Number),
        quoted_string.map(Expr::Str),
        paren_expr,
        ident_primary,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn paren_expr(input: &mut &str) -> ModalResult<Expr> {
    literal("(").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let inner = cut_err(parse_expr).parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal(")"))
        .context(StrContext::Expected(StrContextValue::Description(
            "closing parenthesis",
        )))
        .parse_next(input)?;
    Ok(inner)
}

/// Parse an ident-based primary: function call or bare field reference.
fn ident_primary(input: &mut &str) -> ModalResult<Expr> {
    let first = ident.parse_next(input)?;
    ws_skip.parse_next(input)?;

    if opt(literal("(")).parse_next(input)?.is_some() {
        return call_args(first.to_string(), input);
    }

    Ok(Expr::Field(first.to_string()))
}

// ---------------------------------------------------------------------------
// Call arguments
// ---------------------------------------------------------------------------

/// Parse the argument list after `name(`. Positional arguments must come
/// before named ones; named arguments may appear in any order.
fn call_args(name: String, input: &mut &str) -> ModalResult<Expr> {
    ws_skip.parse_next(input)?;

    let mut args = Vec::new();
    let mut named: Vec<NamedArg> = Vec::new();

    if opt(literal(")")).parse_next(input)?.is_some() {
        return Ok(Expr::Call(FuncCall { name, args, named }));
    }

    loop {
        ws_skip.parse_next(input)?;
        if let Some(na) = opt(named_arg).parse_next(input)? {
            // Duplicate keys are kept; the checker reports them.
            named.push(na);
        } else {
            if !named.is_empty() {
                return cut_err(fail)
                    .context(StrContext::Label(
                        "positional argument after named argument",
                    ))
                    .parse_next(input);
            }
            let arg = cut_err(parse_expr).parse_next(input)?;
            args.push(arg);
        }

        ws_skip.parse_next(input)?;
        if opt(literal(",")).parse_next(input)?.is_some() {
            continue;
        }
        cut_err(literal(")"))
            .context(StrContext::Expected(StrContextValue::Description(
                "closing parenthesis",
            )))
            .parse_next(input)?;
        break;
    }

    Ok(Expr::Call(FuncCall { name, args, named }))
}

/// `key = value`, where a lone `=` distinguishes a named argument from an
/// `==` comparison.
fn named_arg(input: &mut &str) -> ModalResult<NamedArg> {
    let saved = *input;
    let key = ident.parse_next(input)?;
    ws_skip.parse_next(input)?;
    if opt(literal("=")).parse_next(input)?.is_none() || input.starts_with('=') {
        *input = saved;
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    ws_skip.parse_next(input)?;
    let value = cut_err(parse_expr).parse_next(input)?;
    Ok(NamedArg {
        key: key.to_string(),
        value,
    })
}
