pub mod ast;
mod checker;
mod compiler;
pub mod explain;
pub mod parse_utils;
mod parser;
pub mod plan;
pub mod registry;
mod schema;

pub use checker::{Diagnostic, Severity, Validation, check_formula};
pub use compiler::{CompileError, compile_formula};
pub use explain::{describe_formula, format_expr};
pub use parser::{ParseIssue, ParseOutcome, parse};
pub use schema::{FieldDef, FieldSchema, FieldType};
