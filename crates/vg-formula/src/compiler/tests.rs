use std::time::Duration;

use super::{CompileError, compile_formula};
use crate::ast::{BinOp, Expr};
use crate::parser::parse;
use crate::plan::{AggOp, Measure, ValueExpr};
use crate::schema::{FieldDef, FieldSchema, FieldType};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

fn schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldDef {
            name: "bytes".to_string(),
            field_type: FieldType::Number,
            aggregatable: true,
        },
        FieldDef {
            name: "duration".to_string(),
            field_type: FieldType::Number,
            aggregatable: true,
        },
    ])
}

fn ast(text: &str) -> Expr {
    let outcome = parse(text);
    assert!(outcome.success, "parse failed: {:?}", outcome.errors);
    outcome.ast.unwrap()
}

fn compile(text: &str) -> crate::plan::QueryPlan {
    compile_formula(&ast(text), &schema()).expect("compile failed")
}

// -----------------------------------------------------------------------
// Aggregation nodes
// -----------------------------------------------------------------------

#[test]
fn compile_bare_count() {
    let plan = compile("count()");
    assert_eq!(plan.aggs.len(), 1);
    assert_eq!(plan.aggs[0].id, "agg_0");
    assert_eq!(plan.aggs[0].op, AggOp::CountDocs);
    assert_eq!(plan.aggs[0].filter, None);
    assert_eq!(plan.aggs[0].shift, None);
    assert_eq!(plan.root, ValueExpr::AggRef("agg_0".to_string()));
}

#[test]
fn compile_count_with_kql_filter() {
    let plan = compile("count(kql='status:error')");
    assert_eq!(plan.aggs[0].filter, Some("status:error".to_string()));
}

#[test]
fn compile_count_with_shift() {
    let plan = compile(r#"count(shift="1d")"#);
    assert_eq!(plan.aggs[0].shift, Some(Duration::from_secs(86400)));
}

#[test]
fn compile_sum_metric() {
    let plan = compile("sum(bytes)");
    assert_eq!(
        plan.aggs[0].op,
        AggOp::Metric {
            measure: Measure::Sum,
            field: "bytes".to_string()
        }
    );
}

#[test]
fn literals_produce_no_agg_nodes() {
    let plan = compile("count() * 2");
    assert_eq!(plan.aggs.len(), 1);
    let ValueExpr::BinOp { op, right, .. } = &plan.root else {
        panic!("expected script at root")
    };
    assert_eq!(*op, BinOp::Mul);
    assert_eq!(**right, ValueExpr::Literal(2.0));
}

#[test]
fn one_agg_node_per_function_call() {
    let plan = compile(r#"abs(count() - count(shift="1d"))"#);
    assert_eq!(plan.aggs.len(), 2);
    assert_eq!(plan.aggs[0].id, "agg_0");
    assert_eq!(plan.aggs[1].id, "agg_1");
    assert_eq!(plan.aggs[1].shift, Some(Duration::from_secs(86400)));
    assert!(matches!(plan.root, ValueExpr::Abs(_)));
}

// -----------------------------------------------------------------------
// Conditionals
// -----------------------------------------------------------------------

#[test]
fn compile_ifelse_to_conditional() {
    let plan = compile(r#"ifelse(count() < count(shift="1d") * 0.5, "CRITICAL", "NORMAL")"#);
    assert_eq!(plan.aggs.len(), 2);

    let ValueExpr::Cond {
        cond,
        then,
        otherwise,
    } = &plan.root
    else {
        panic!("expected conditional at root")
    };
    assert_eq!(**then, ValueExpr::StrLiteral("CRITICAL".to_string()));
    assert_eq!(**otherwise, ValueExpr::StrLiteral("NORMAL".to_string()));

    let ValueExpr::BinOp { op, left, right } = cond.as_ref() else {
        panic!("expected comparison condition")
    };
    assert_eq!(*op, BinOp::Lt);
    assert_eq!(**left, ValueExpr::AggRef("agg_0".to_string()));
    assert!(matches!(
        right.as_ref(),
        ValueExpr::BinOp { op: BinOp::Mul, .. }
    ));
}

// -----------------------------------------------------------------------
// Determinism and errors
// -----------------------------------------------------------------------

#[test]
fn compilation_is_deterministic() {
    let expr = ast(r#"ifelse(count() < count(shift="1d") * 0.5, "CRITICAL", "NORMAL")"#);
    let a = compile_formula(&expr, &schema()).unwrap();
    let b = compile_formula(&expr, &schema()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_formula_is_rejected() {
    let err = compile_formula(&ast("bogus()"), &schema()).unwrap_err();
    let CompileError::Invalid(msg) = err else {
        panic!("expected validation rejection, got {:?}", err)
    };
    assert!(msg.contains("bogus"));
}

#[test]
fn bare_field_reference_is_a_compile_error() {
    // Passes validation (warning only) but has no aggregation context.
    let err = compile_formula(&ast("bytes"), &schema()).unwrap_err();
    assert!(matches!(err, CompileError::Unsupported(_)));
}
