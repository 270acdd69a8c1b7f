use tokio::sync::Mutex;

use vg_formula::{Diagnostic, FieldSchema, Severity, Validation, check_formula, parse};

use crate::provider::SchemaProvider;

// ---------------------------------------------------------------------------
// Session state machine
// ---------------------------------------------------------------------------

/// Validation state of one editor session.
#[derive(Debug)]
enum SessionState {
    Idle,
    Validating,
    /// A keystroke arrived while a validation was in flight; its text
    /// supersedes the one being validated.
    PendingRevalidate { text: String },
}

/// Per-editor validation driver.
///
/// Rapid keystrokes each produce a debounced validation request, but only
/// one validation may run against an editor at a time: a request arriving
/// mid-flight records its text and no-ops, and the in-flight call loops to
/// validate the superseded text. Exactly one validation completes per
/// debounce cycle, and it always reflects the latest text.
pub struct EditorSession<P> {
    provider: P,
    complexity_budget: Option<u32>,
    state: Mutex<SessionState>,
}

impl<P: SchemaProvider> EditorSession<P> {
    pub fn new(provider: P, complexity_budget: Option<u32>) -> Self {
        Self {
            provider,
            complexity_budget,
            state: Mutex::new(SessionState::Idle),
        }
    }

    /// Validate the given editor text. Returns `None` when the call was
    /// coalesced into an already-running validation.
    pub async fn request_validation(&self, text: &str) -> Option<Validation> {
        {
            let mut st = self.state.lock().await;
            if matches!(*st, SessionState::Idle) {
                *st = SessionState::Validating;
            } else {
                // Validation already in flight: record the text and no-op.
                *st = SessionState::PendingRevalidate {
                    text: text.to_string(),
                };
                return None;
            }
        }

        let mut current = text.to_string();
        loop {
            let result = self.validate_once(&current).await;

            let mut st = self.state.lock().await;
            match std::mem::replace(&mut *st, SessionState::Idle) {
                SessionState::PendingRevalidate { text: next } => {
                    *st = SessionState::Validating;
                    drop(st);
                    current = next;
                }
                _ => return Some(result),
            }
        }
    }

    /// One parse → schema fetch → check pass. A failing schema provider
    /// becomes an error diagnostic instead of taking the editor down.
    async fn validate_once(&self, text: &str) -> Validation {
        let outcome = parse(text);
        let Some(ast) = outcome.ast else {
            let results = outcome
                .errors
                .into_iter()
                .map(|e| Diagnostic {
                    severity: Severity::Error,
                    message: e.message,
                })
                .collect();
            return Validation {
                valid: false,
                results,
                complexity: 0,
            };
        };

        let (schema, fetch_error) = match self.provider.fetch_fields().await {
            Ok(fields) => (FieldSchema::new(fields), None),
            Err(e) => (FieldSchema::empty(), Some(e)),
        };

        let mut validation = check_formula(&ast, &schema, self.complexity_budget);
        if let Some(e) = fetch_error {
            tracing::warn!(
                domain = "editor",
                error = %e,
                "schema fetch failed during validation"
            );
            validation.results.insert(
                0,
                Diagnostic {
                    severity: Severity::Error,
                    message: format!("schema lookup failed: {e}"),
                },
            );
            validation.valid = false;
        }
        validation
    }
}
