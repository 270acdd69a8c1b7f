use crate::ast::{Expr, FuncCall};

// ---------------------------------------------------------------------------
// Expression formatting
// ---------------------------------------------------------------------------

/// Render an expression back to formula syntax.
pub fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => format!("{}", n),
        Expr::Str(s) => format!("\"{}\"", s),
        Expr::Field(name) => format_field(name),
        Expr::Neg(inner) => format!("-{}", format_expr(inner)),
        Expr::BinOp { op, left, right } => {
            format!("{} {} {}", format_expr(left), op.symbol(), format_expr(right))
        }
        Expr::Call(call) => format_call(call),
    }
}

fn format_call(call: &FuncCall) -> String {
    let mut parts: Vec<String> = call.args.iter().map(format_expr).collect();
    for na in &call.named {
        parts.push(format!("{}={}", na.key, format_expr(&na.value)));
    }
    format!("{}({})", call.name, parts.join(", "))
}

/// Bare identifiers render unquoted; anything else gets quotes.
fn format_field(name: &str) -> String {
    let ident_like = !name.is_empty()
        && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if ident_like {
        name.to_string()
    } else {
        format!("\"{}\"", name)
    }
}
