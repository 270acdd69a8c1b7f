mod format;


pub use format::format_expr;

use crate::ast::{BinOp, Expr, FuncCall};
use crate::parse_utils::{format_shift, parse_shift};
use crate::parser::parse;
use crate::registry::{self, FuncKind};

// ---------------------------------------------------------------------------
// Natural-language description
// ---------------------------------------------------------------------------

/// Describe a formula string in plain language.
///
/// Unparseable input yields the literal string "Invalid formula syntax"
/// rather than an error, so the editor can always render something.
pub fn describe_formula(text: &str) -> String {
    match parse(text).ast {
        Some(ast) => describe(&ast),
        None => "Invalid formula syntax".to_string(),
    }
}

fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => format!("{}", n),
        Expr::Str(s) => format!("\"{}\"", s),
        Expr::Field(name) => format!("`{}`", name),
        Expr::Neg(inner) => format!("negative {}", describe(inner)),
        Expr::BinOp { op, left, right } => {
            format!("{} {} {}", describe(left), op_phrase(*op), describe(right))
        }
        Expr::Call(call) => describe_call(call),
    }
}

fn describe_call(call: &FuncCall) -> String {
    let Some(spec) = registry::lookup(&call.name) else {
        return format!("`{}`", format_expr(&Expr::Call(call.clone())));
    };

    let base = match spec.kind {
        FuncKind::Count => match call.named_value("kql") {
            Some(Expr::Str(kql)) => format!("the count of events matching `{}`", kql),
            _ => "the event count".to_string(),
        },
        FuncKind::Sum => format!("the total of {}", field_phrase(call)),
        FuncKind::Average => format!("the average of {}", field_phrase(call)),
        FuncKind::Min => format!("the minimum of {}", field_phrase(call)),
        FuncKind::Max => format!("the maximum of {}", field_phrase(call)),
        FuncKind::UniqueCount => {
            format!("the number of distinct values of {}", field_phrase(call))
        }
        FuncKind::OverallAverage => {
            format!("the overall average of {}", field_phrase(call))
        }
        FuncKind::Abs => {
            let inner = call.args.first().map(describe).unwrap_or_default();
            format!("the absolute value of {}", inner)
        }
        FuncKind::Round => {
            let inner = call.args.first().map(describe).unwrap_or_default();
            format!("{}, rounded", inner)
        }
        FuncKind::IfElse => {
            let mut it = call.args.iter().map(describe);
            let cond = it.next().unwrap_or_default();
            let then = it.next().unwrap_or_default();
            let otherwise = it.next().unwrap_or_default();
            format!("if {}, then {}, otherwise {}", cond, then, otherwise)
        }
    };

    match call.named_value("shift") {
        Some(Expr::Str(s)) => match parse_shift(s) {
            Some(d) => format!("{} over the window shifted back {}", base, format_shift(d)),
            None => base,
        },
        _ => base,
    }
}

fn field_phrase(call: &FuncCall) -> String {
    match call.args.first() {
        Some(Expr::Field(name)) => format!("`{}`", name),
        Some(other) => describe(other),
        None => "its field".to_string(),
    }
}

fn op_phrase(op: BinOp) -> &'static str {
    match op {
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::Eq => "equals",
        BinOp::Ne => "differs from",
        BinOp::Lt => "is below",
        BinOp::Gt => "is above",
        BinOp::Le => "is at most",
        BinOp::Ge => "is at least",
        BinOp::Add => "plus",
        BinOp::Sub => "minus",
        BinOp::Mul => "multiplied by",
        BinOp::Div => "divided by",
    }
}
