use super::{Severity, check_formula};
use crate::ast::Expr;
use crate::parser::parse;
use crate::registry;
use crate::schema::{FieldDef, FieldSchema, FieldType};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

fn field(name: &str, field_type: FieldType, aggregatable: bool) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        field_type,
        aggregatable,
    }
}

/// Standard traffic-index schema for tests.
fn schema() -> FieldSchema {
    FieldSchema::new(vec![
        field("bytes", FieldType::Number, true),
        field("duration", FieldType::Number, true),
        field("score_raw", FieldType::Number, false),
        field("status", FieldType::Keyword, true),
        field("client_ip", FieldType::Keyword, true),
        field("message", FieldType::Text, false),
        field("@timestamp", FieldType::Date, true),
    ])
}

fn ast(text: &str) -> Expr {
    let outcome = parse(text);
    assert!(outcome.success, "parse failed: {:?}", outcome.errors);
    outcome.ast.unwrap()
}

fn errors(v: &super::Validation) -> Vec<&str> {
    v.results
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message.as_str())
        .collect()
}

fn warnings(v: &super::Validation) -> Vec<&str> {
    v.results
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.message.as_str())
        .collect()
}

// -----------------------------------------------------------------------
// Functions and arity
// -----------------------------------------------------------------------

#[test]
fn unknown_function_is_fatal() {
    let v = check_formula(&ast("bogus()"), &schema(), None);
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("bogus")));
}

#[test]
fn count_takes_no_positional_args() {
    let v = check_formula(&ast("count(bytes)"), &schema(), None);
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("expects 0 arguments")));
}

#[test]
fn sum_requires_one_arg() {
    let v = check_formula(&ast("sum()"), &schema(), None);
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("expects 1 argument")));
}

#[test]
fn ifelse_requires_three_args() {
    let v = check_formula(&ast(r#"ifelse(count() > 1, "A")"#), &schema(), None);
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("expects 3 arguments")));
}

#[test]
fn valid_formula_passes() {
    let v = check_formula(
        &ast(r#"ifelse(count() < count(shift="1d") * 0.5, "CRITICAL", "NORMAL")"#),
        &schema(),
        None,
    );
    assert!(v.valid, "diagnostics: {:?}", v.results);
    assert!(errors(&v).is_empty());
}

// -----------------------------------------------------------------------
// Fields
// -----------------------------------------------------------------------

#[test]
fn unknown_field_is_warning_not_fatal() {
    let v = check_formula(&ast("sum(nope)"), &schema(), None);
    assert!(v.valid);
    assert!(warnings(&v).iter().any(|m| m.contains("nope")));
}

#[test]
fn text_field_rejected_for_metric() {
    let v = check_formula(&ast("sum(message)"), &schema(), None);
    assert!(!v.valid);
    assert!(
        errors(&v)
            .iter()
            .any(|m| m.contains("requires a number field"))
    );
}

#[test]
fn keyword_field_rejected_for_average() {
    let v = check_formula(&ast("average(status)"), &schema(), None);
    assert!(!v.valid);
}

#[test]
fn non_aggregatable_number_rejected() {
    let v = check_formula(&ast("sum(score_raw)"), &schema(), None);
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("not aggregatable")));
}

#[test]
fn unique_count_accepts_keyword_field() {
    let v = check_formula(&ast("unique_count(client_ip)"), &schema(), None);
    assert!(v.valid, "diagnostics: {:?}", v.results);
}

// -----------------------------------------------------------------------
// Named arguments
// -----------------------------------------------------------------------

#[test]
fn invalid_shift_duration() {
    let v = check_formula(&ast(r#"count(shift="xx")"#), &schema(), None);
    assert!(!v.valid);
    assert!(
        errors(&v)
            .iter()
            .any(|m| m.contains("invalid shift duration"))
    );
}

#[test]
fn shift_must_be_string() {
    let v = check_formula(&ast("count(shift=5)"), &schema(), None);
    assert!(!v.valid);
}

#[test]
fn shift_rejected_where_not_accepted() {
    let v = check_formula(&ast(r#"overall_average(bytes, shift="1d")"#), &schema(), None);
    assert!(!v.valid);
    assert!(
        errors(&v)
            .iter()
            .any(|m| m.contains("does not accept a shift"))
    );
}

#[test]
fn unknown_named_key() {
    let v = check_formula(&ast(r#"count(foo="bar")"#), &schema(), None);
    assert!(!v.valid);
    assert!(
        errors(&v)
            .iter()
            .any(|m| m.contains("unknown named argument `foo`"))
    );
}

#[test]
fn duplicate_named_key() {
    let v = check_formula(&ast(r#"count(shift="1d", shift="2d")"#), &schema(), None);
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("duplicate")));
}

#[test]
fn empty_kql_is_warning() {
    let v = check_formula(&ast("count(kql='')"), &schema(), None);
    assert!(v.valid);
    assert!(warnings(&v).iter().any(|m| m.contains("kql")));
}

// -----------------------------------------------------------------------
// Shape warnings
// -----------------------------------------------------------------------

#[test]
fn constant_formula_warns() {
    let v = check_formula(&ast("5 + 3"), &schema(), None);
    assert!(v.valid);
    assert!(
        warnings(&v)
            .iter()
            .any(|m| m.contains("does not reference any aggregation"))
    );
}

#[test]
fn ifelse_literal_condition_warns() {
    let v = check_formula(&ast(r#"ifelse(5, "A", "B")"#), &schema(), None);
    assert!(v.valid);
    assert!(
        warnings(&v)
            .iter()
            .any(|m| m.contains("not a comparison"))
    );
}

#[test]
fn string_in_arithmetic_is_fatal() {
    let v = check_formula(&ast(r#"count() + "x""#), &schema(), None);
    assert!(!v.valid);
}

// -----------------------------------------------------------------------
// Complexity
// -----------------------------------------------------------------------

#[test]
fn complexity_grows_with_nesting() {
    let flat = check_formula(&ast("count()"), &schema(), None);
    let nested = check_formula(
        &ast(r#"abs(count() - count(shift="1d"))"#),
        &schema(),
        None,
    );
    assert!(nested.complexity > flat.complexity);
}

#[test]
fn complexity_budget_exceeded_is_fatal() {
    let v = check_formula(
        &ast(r#"ifelse(count() < count(shift="1d") * 0.5, "CRITICAL", "NORMAL")"#),
        &schema(),
        Some(3),
    );
    assert!(!v.valid);
    assert!(errors(&v).iter().any(|m| m.contains("too complex")));
    assert!(v.complexity > 3);
}

#[test]
fn complexity_reported_even_when_invalid() {
    let v = check_formula(&ast("bogus()"), &schema(), None);
    assert!(!v.valid);
    assert!(v.complexity > 0);
}

// -----------------------------------------------------------------------
// Registry round-trip
// -----------------------------------------------------------------------

#[test]
fn every_registry_example_parses_and_validates() {
    let schema = schema();
    for spec in registry::FUNCTIONS {
        for example in spec.examples {
            let outcome = parse(example);
            assert!(
                outcome.success,
                "example `{}` of `{}` failed to parse: {:?}",
                example, spec.name, outcome.errors
            );
            let v = check_formula(&outcome.ast.unwrap(), &schema, None);
            assert!(
                !errors(&v).iter().any(|m| m.contains("unknown function")),
                "example `{}` of `{}` hit an unknown function: {:?}",
                example,
                spec.name,
                v.results
            );
        }
    }
}
