use crate::ast::Expr;

/// Function calls weigh more than plain nodes: they are what the editor
/// gates for novice users.
const CALL_WEIGHT: u32 = 2;

/// Complexity score: every node contributes a base weight plus its
/// function-call nesting depth. Monotonically increasing in both node
/// count and nesting.
pub(super) fn score(expr: &Expr) -> u32 {
    visit(expr, 0)
}

fn visit(expr: &Expr, depth: u32) -> u32 {
    match expr {
        Expr::Number(_) | Expr::Str(_) | Expr::Field(_) => 1 + depth,
        Expr::Neg(inner) => 1 + depth + visit(inner, depth),
        Expr::BinOp { left, right, .. } => 1 + depth + visit(left, depth) + visit(right, depth),
        Expr::Call(call) => {
            CALL_WEIGHT
                + depth
                + call
                    .args
                    .iter()
                    .map(|a| visit(a, depth + 1))
                    .sum::<u32>()
                + call
                    .named
                    .iter()
                    .map(|na| visit(&na.value, depth + 1))
                    .sum::<u32>()
        }
    }
}
