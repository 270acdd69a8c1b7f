use std::collections::HashSet;

use crate::ast::{BinOp, Expr, FuncCall};
use crate::parse_utils::parse_shift;
use crate::registry::{self, FuncKind, FuncSpec};
use crate::schema::{FieldSchema, FieldType};

use super::Diagnostic;

// ---------------------------------------------------------------------------
// Expression walk
// ---------------------------------------------------------------------------

pub(super) fn check_expr(expr: &Expr, schema: &FieldSchema, out: &mut Vec<Diagnostic>) {
    match expr {
        Expr::Number(_) | Expr::Str(_) => {}
        Expr::Field(name) => check_field_known(name, schema, out),
        Expr::Neg(inner) => {
            if matches!(**inner, Expr::Str(_)) {
                out.push(Diagnostic::error("string literal cannot be negated"));
            }
            check_expr(inner, schema, out);
        }
        Expr::BinOp { op, left, right } => {
            if !matches!(op, BinOp::Eq | BinOp::Ne) {
                for side in [left.as_ref(), right.as_ref()] {
                    if matches!(side, Expr::Str(_)) {
                        out.push(Diagnostic::error(format!(
                            "string literal cannot be used with operator `{}`",
                            op.symbol()
                        )));
                    }
                }
            }
            check_expr(left, schema, out);
            check_expr(right, schema, out);
        }
        Expr::Call(call) => check_call(call, schema, out),
    }
}

// ---------------------------------------------------------------------------
// Function calls
// ---------------------------------------------------------------------------

fn check_call(call: &FuncCall, schema: &FieldSchema, out: &mut Vec<Diagnostic>) {
    let Some(spec) = registry::lookup(&call.name) else {
        out.push(Diagnostic::error(format!(
            "unknown function `{}`",
            call.name
        )));
        // Still descend so nested problems surface in the same pass.
        for arg in &call.args {
            check_expr(arg, schema, out);
        }
        for na in &call.named {
            check_expr(&na.value, schema, out);
        }
        return;
    };

    check_arity(call, spec, out);
    check_named_args(call, spec, out);
    check_field_args(call, spec, schema, out);

    if spec.kind == FuncKind::IfElse
        && let Some(cond) = call.args.first()
    {
        let is_condition = matches!(cond, Expr::BinOp { op, .. } if op.is_boolean());
        if !is_condition {
            out.push(Diagnostic::warning(
                "`ifelse` condition is not a comparison",
            ));
        }
    }

    for (i, arg) in call.args.iter().enumerate() {
        if !spec.field_args.contains(&i) {
            check_expr(arg, schema, out);
        }
    }
}

fn check_arity(call: &FuncCall, spec: &FuncSpec, out: &mut Vec<Diagnostic>) {
    let n = call.args.len();
    if n >= spec.min_args && n <= spec.max_args {
        return;
    }
    let msg = if spec.min_args == spec.max_args {
        format!(
            "function `{}` expects {} argument{}, got {}",
            spec.name,
            spec.min_args,
            if spec.min_args == 1 { "" } else { "s" },
            n
        )
    } else {
        format!(
            "function `{}` expects between {} and {} arguments, got {}",
            spec.name, spec.min_args, spec.max_args, n
        )
    };
    out.push(Diagnostic::error(msg));
}

fn check_named_args(call: &FuncCall, spec: &FuncSpec, out: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for na in &call.named {
        if !seen.insert(na.key.as_str()) {
            out.push(Diagnostic::error(format!(
                "duplicate named argument `{}` on `{}`",
                na.key, spec.name
            )));
            continue;
        }
        match na.key.as_str() {
            "shift" => {
                if !spec.accepts_shift {
                    out.push(Diagnostic::error(format!(
                        "`{}` does not accept a shift argument",
                        spec.name
                    )));
                }
                match &na.value {
                    Expr::Str(s) => {
                        if parse_shift(s).is_none() {
                            out.push(Diagnostic::error(format!(
                                "invalid shift duration `{}` (expected forms like \"30m\", \"1d\", \"1w\")",
                                s
                            )));
                        }
                    }
                    _ => out.push(Diagnostic::error(
                        "shift must be a quoted duration string",
                    )),
                }
            }
            "kql" => {
                if !spec.accepts_kql {
                    out.push(Diagnostic::error(format!(
                        "`{}` does not accept a kql filter",
                        spec.name
                    )));
                }
                match &na.value {
                    Expr::Str(s) if s.trim().is_empty() => {
                        out.push(Diagnostic::warning("empty kql filter has no effect"));
                    }
                    Expr::Str(_) => {}
                    _ => out.push(Diagnostic::error("kql must be a quoted filter string")),
                }
            }
            other => out.push(Diagnostic::error(format!(
                "unknown named argument `{}` on `{}`",
                other, spec.name
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Field references
// ---------------------------------------------------------------------------

fn check_field_args(
    call: &FuncCall,
    spec: &FuncSpec,
    schema: &FieldSchema,
    out: &mut Vec<Diagnostic>,
) {
    for &i in spec.field_args {
        match call.args.get(i) {
            Some(Expr::Field(name)) => check_field_use(name, spec, schema, out),
            Some(_) => out.push(Diagnostic::error(format!(
                "`{}` expects a field reference as argument {}",
                spec.name,
                i + 1
            ))),
            // Missing argument: arity check already reported it.
            None => {}
        }
    }
}

fn check_field_use(
    name: &str,
    spec: &FuncSpec,
    schema: &FieldSchema,
    out: &mut Vec<Diagnostic>,
) {
    let Some(def) = schema.find(name) else {
        check_field_known(name, schema, out);
        return;
    };
    if spec.requires_number_field() && def.field_type != FieldType::Number {
        out.push(Diagnostic::error(format!(
            "field `{}` has type {}, `{}` requires a number field",
            name,
            def.field_type.as_str(),
            spec.name
        )));
        return;
    }
    if !def.aggregatable {
        out.push(Diagnostic::error(format!(
            "field `{}` is not aggregatable",
            name
        )));
    }
}

/// Unknown field is a warning, not an error: the schema may be stale or
/// partially fetched.
fn check_field_known(name: &str, schema: &FieldSchema, out: &mut Vec<Diagnostic>) {
    if schema.find(name).is_none() {
        out.push(Diagnostic::warning(format!(
            "field `{}` is not present in the index schema",
            name
        )));
    }
}
