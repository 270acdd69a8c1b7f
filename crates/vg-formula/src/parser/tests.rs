use super::parse;
use crate::ast::{BinOp, Expr};

fn ast(text: &str) -> Expr {
    let outcome = parse(text);
    assert!(outcome.success, "parse failed: {:?}", outcome.errors);
    outcome.ast.unwrap()
}

// -----------------------------------------------------------------------
// Empty input
// -----------------------------------------------------------------------

#[test]
fn empty_input_is_fatal() {
    let outcome = parse("");
    assert!(!outcome.success);
    assert!(outcome.ast.is_none());
    assert!(outcome.errors[0].message.contains("no formula provided"));
}

#[test]
fn blank_input_is_fatal() {
    let outcome = parse("   \t ");
    assert!(!outcome.success);
    assert!(outcome.errors[0].message.contains("no formula provided"));
}

// -----------------------------------------------------------------------
// Calls
// -----------------------------------------------------------------------

#[test]
fn parse_bare_count() {
    let expr = ast("count()");
    let Expr::Call(call) = expr else {
        panic!("expected call, got {:?}", expr)
    };
    assert_eq!(call.name, "count");
    assert!(call.args.is_empty());
    assert!(call.named.is_empty());
}

#[test]
fn quoted_string_coerces_to_field() {
    let expr = ast(r#"sum("x")"#);
    let Expr::Call(call) = expr else {
        panic!("expected call")
    };
    assert_eq!(call.name, "sum");
    assert_eq!(call.args, vec![Expr::Field("x".to_string())]);
}

#[test]
fn bare_ident_is_field() {
    let Expr::Call(call) = ast("sum(bytes)") else {
        panic!("expected call")
    };
    assert_eq!(call.args, vec![Expr::Field("bytes".to_string())]);
}

#[test]
fn dotted_field_name() {
    let Expr::Call(call) = ast("sum(response.time)") else {
        panic!("expected call")
    };
    assert_eq!(call.args, vec![Expr::Field("response.time".to_string())]);
}

#[test]
fn string_stays_literal_outside_field_position() {
    let Expr::Call(call) = ast(r#"ifelse(count() > 1, "A", "B")"#) else {
        panic!("expected call")
    };
    assert_eq!(call.args[1], Expr::Str("A".to_string()));
    assert_eq!(call.args[2], Expr::Str("B".to_string()));
}

// -----------------------------------------------------------------------
// Named arguments
// -----------------------------------------------------------------------

#[test]
fn parse_shift_named_arg() {
    let Expr::Call(call) = ast(r#"count(shift="1d")"#) else {
        panic!("expected call")
    };
    assert_eq!(call.named.len(), 1);
    assert_eq!(call.named[0].key, "shift");
    assert_eq!(call.named[0].value, Expr::Str("1d".to_string()));
}

#[test]
fn parse_single_quoted_kql() {
    let Expr::Call(call) = ast("count(kql='status:error')") else {
        panic!("expected call")
    };
    assert_eq!(call.named[0].key, "kql");
    assert_eq!(call.named[0].value, Expr::Str("status:error".to_string()));
}

#[test]
fn named_args_any_order() {
    let a = ast(r#"count(shift="1d", kql='x')"#);
    let b = ast(r#"count(kql='x', shift="1d")"#);
    let (Expr::Call(ca), Expr::Call(cb)) = (a, b) else {
        panic!("expected calls")
    };
    assert_eq!(ca.named.len(), 2);
    assert_eq!(cb.named.len(), 2);
}

#[test]
fn positional_after_named_is_fatal() {
    let outcome = parse(r#"sum(shift="1d", bytes)"#);
    assert!(!outcome.success);
}

#[test]
fn double_equals_is_comparison_not_named_arg() {
    let Expr::Call(call) = ast(r#"ifelse(count() == 5, "A", "B")"#) else {
        panic!("expected call")
    };
    assert!(matches!(
        call.args[0],
        Expr::BinOp { op: BinOp::Eq, .. }
    ));
    assert!(call.named.is_empty());
}

// -----------------------------------------------------------------------
// Operators and precedence
// -----------------------------------------------------------------------

#[test]
fn multiplication_binds_tighter_than_comparison() {
    let expr = ast(r#"count() < count(shift="1d") * 0.5"#);
    let Expr::BinOp { op, right, .. } = expr else {
        panic!("expected comparison at root")
    };
    assert_eq!(op, BinOp::Lt);
    assert!(matches!(*right, Expr::BinOp { op: BinOp::Mul, .. }));
}

#[test]
fn parenthesized_grouping() {
    let expr = ast("(count() + count()) / 2");
    let Expr::BinOp { op, left, .. } = expr else {
        panic!("expected division at root")
    };
    assert_eq!(op, BinOp::Div);
    assert!(matches!(*left, Expr::BinOp { op: BinOp::Add, .. }));
}

#[test]
fn unary_negation() {
    let expr = ast("-5 + count()");
    let Expr::BinOp { op, left, .. } = expr else {
        panic!("expected addition at root")
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(*left, Expr::Neg(_)));
}

#[test]
fn logical_operators() {
    let expr = ast(r#"count() > 10 && count(shift="1d") > 10"#);
    assert!(matches!(expr, Expr::BinOp { op: BinOp::And, .. }));
}

#[test]
fn whitespace_is_insignificant() {
    let a = ast(r#"count( shift = "1d" )"#);
    let b = ast(r#"count(shift="1d")"#);
    assert_eq!(a, b);
}

// -----------------------------------------------------------------------
// Nesting
// -----------------------------------------------------------------------

#[test]
fn nested_calls() {
    let Expr::Call(call) = ast("abs(count() - count(shift=\"1d\"))") else {
        panic!("expected call")
    };
    assert_eq!(call.name, "abs");
    assert!(matches!(
        call.args[0],
        Expr::BinOp { op: BinOp::Sub, .. }
    ));
}

#[test]
fn flagship_formula() {
    let expr = ast(r#"ifelse(count() < count(shift="1d") * 0.5, "CRITICAL", "NORMAL")"#);
    let Expr::Call(call) = expr else {
        panic!("expected call")
    };
    assert_eq!(call.name, "ifelse");
    assert_eq!(call.args.len(), 3);
    assert!(matches!(call.args[0], Expr::BinOp { op: BinOp::Lt, .. }));
}

// -----------------------------------------------------------------------
// Syntax errors
// -----------------------------------------------------------------------

#[test]
fn unbalanced_parenthesis_is_fatal() {
    let outcome = parse("count(");
    assert!(!outcome.success);
    assert!(outcome.ast.is_none());
    assert!(outcome.errors[0].position.is_some());
}

#[test]
fn unterminated_string_is_fatal() {
    let outcome = parse("count(kql='status");
    assert!(!outcome.success);
}

#[test]
fn trailing_garbage_is_fatal() {
    let outcome = parse("count() extra");
    assert!(!outcome.success);
    let pos = outcome.errors[0].position.unwrap();
    assert!(pos >= "count()".len());
}
