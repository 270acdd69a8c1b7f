mod complexity;
mod rules;

#[cfg(test)]
mod tests;

use crate::ast::Expr;
use crate::schema::FieldSchema;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Severity level for formula check diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single formula check diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", prefix, self.message)
    }
}

/// Result of checking one formula: diagnostics in source order plus a
/// complexity score. The score is reported even when validation fails so
/// editors can still show "too complex" feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub valid: bool,
    pub results: Vec<Diagnostic>,
    pub complexity: u32,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Check a parsed formula against the current field schema.
///
/// Unknown functions and arity mismatches are errors; a field reference
/// missing from the schema is only a warning, since mappings may be
/// incomplete. When `budget` is given, exceeding it adds an error.
pub fn check_formula(expr: &Expr, schema: &FieldSchema, budget: Option<u32>) -> Validation {
    let mut results = Vec::new();

    rules::check_expr(expr, schema, &mut results);

    if !expr.has_call() {
        results.push(Diagnostic::warning(
            "formula does not reference any aggregation",
        ));
    }

    let complexity = complexity::score(expr);
    if let Some(budget) = budget
        && complexity > budget
    {
        results.push(Diagnostic::error(format!(
            "formula too complex (complexity {} exceeds budget {})",
            complexity, budget
        )));
    }

    let valid = results.iter().all(|d| d.severity != Severity::Error);
    Validation {
        valid,
        results,
        complexity,
    }
}
