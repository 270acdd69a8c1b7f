use crate::ast::{Expr, FuncCall};
use crate::checker::{Severity, check_formula};
use crate::parse_utils::parse_shift;
use crate::plan::{AggOp, AggSpec, Measure, QueryPlan, ValueExpr};
use crate::registry::{self, FuncKind};
use crate::schema::FieldSchema;

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Compilation failure. Distinct from validation diagnostics: these only
/// occur on inputs that bypassed validation or hit an unsupported
/// construct, and are never silently dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("formula failed validation: {0}")]
    Invalid(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("unsupported construct: {0}")]
    Unsupported(String),
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compile a checked formula into a [`QueryPlan`].
///
/// Runs `check_formula` first; a successful return therefore implies the
/// AST was both syntactically and semantically valid — callers never need
/// to remember to validate separately.
pub fn compile_formula(expr: &Expr, schema: &FieldSchema) -> Result<QueryPlan, CompileError> {
    let validation = check_formula(expr, schema, None);
    if !validation.valid {
        let msgs: Vec<String> = validation
            .results
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.clone())
            .collect();
        return Err(CompileError::Invalid(msgs.join("; ")));
    }

    let mut cx = Compiler::default();
    let root = cx.value(expr)?;
    Ok(QueryPlan { aggs: cx.aggs, root })
}

// ---------------------------------------------------------------------------
// Compiler state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Compiler {
    aggs: Vec<AggSpec>,
}

impl Compiler {
    fn value(&mut self, expr: &Expr) -> Result<ValueExpr, CompileError> {
        match expr {
            Expr::Number(n) => Ok(ValueExpr::Literal(*n)),
            Expr::Str(s) => Ok(ValueExpr::StrLiteral(s.clone())),
            Expr::Field(f) => Err(CompileError::Unsupported(format!(
                "bare field reference `{}` outside an aggregation",
                f
            ))),
            Expr::Neg(inner) => Ok(ValueExpr::Neg(Box::new(self.value(inner)?))),
            Expr::BinOp { op, left, right } => Ok(ValueExpr::BinOp {
                op: *op,
                left: Box::new(self.value(left)?),
                right: Box::new(self.value(right)?),
            }),
            Expr::Call(call) => self.call(call),
        }
    }

    fn call(&mut self, call: &FuncCall) -> Result<ValueExpr, CompileError> {
        let spec = registry::lookup(&call.name)
            .ok_or_else(|| CompileError::UnknownFunction(call.name.clone()))?;

        match spec.kind {
            FuncKind::Count => self.agg(call, AggOp::CountDocs),
            FuncKind::Sum => self.metric(call, Measure::Sum),
            FuncKind::Average => self.metric(call, Measure::Avg),
            FuncKind::Min => self.metric(call, Measure::Min),
            FuncKind::Max => self.metric(call, Measure::Max),
            FuncKind::UniqueCount => self.metric(call, Measure::UniqueCount),
            FuncKind::OverallAverage => {
                let field = self.field_arg(call, 0)?;
                self.agg(call, AggOp::OverallAverage { field })
            }
            FuncKind::Abs => {
                let inner = self.single_arg(call)?;
                Ok(ValueExpr::Abs(Box::new(inner)))
            }
            FuncKind::Round => {
                let inner = self.single_arg(call)?;
                Ok(ValueExpr::Round(Box::new(inner)))
            }
            FuncKind::IfElse => {
                let [cond, then, otherwise] = call.args.as_slice() else {
                    return Err(CompileError::Unsupported(
                        "ifelse requires exactly three arguments".to_string(),
                    ));
                };
                Ok(ValueExpr::Cond {
                    cond: Box::new(self.value(cond)?),
                    then: Box::new(self.value(then)?),
                    otherwise: Box::new(self.value(otherwise)?),
                })
            }
        }
    }

    fn metric(&mut self, call: &FuncCall, measure: Measure) -> Result<ValueExpr, CompileError> {
        let field = self.field_arg(call, 0)?;
        self.agg(call, AggOp::Metric { measure, field })
    }

    fn single_arg(&mut self, call: &FuncCall) -> Result<ValueExpr, CompileError> {
        match call.args.as_slice() {
            [arg] => self.value(arg),
            _ => Err(CompileError::Unsupported(format!(
                "`{}` requires exactly one argument",
                call.name
            ))),
        }
    }

    fn field_arg(&self, call: &FuncCall, i: usize) -> Result<String, CompileError> {
        match call.args.get(i) {
            Some(Expr::Field(f)) => Ok(f.clone()),
            _ => Err(CompileError::Unsupported(format!(
                "`{}` requires a field reference as argument {}",
                call.name,
                i + 1
            ))),
        }
    }

    /// Emit one aggregation node and return a reference to it.
    fn agg(&mut self, call: &FuncCall, op: AggOp) -> Result<ValueExpr, CompileError> {
        let filter = match call.named_value("kql") {
            Some(Expr::Str(s)) => Some(s.clone()),
            Some(_) => {
                return Err(CompileError::Unsupported(
                    "kql must be a quoted filter string".to_string(),
                ));
            }
            None => None,
        };
        let shift = match call.named_value("shift") {
            Some(Expr::Str(s)) => Some(parse_shift(s).ok_or_else(|| {
                CompileError::Unsupported(format!("invalid shift duration `{}`", s))
            })?),
            Some(_) => {
                return Err(CompileError::Unsupported(
                    "shift must be a quoted duration string".to_string(),
                ));
            }
            None => None,
        };

        let id = format!("agg_{}", self.aggs.len());
        self.aggs.push(AggSpec {
            id: id.clone(),
            op,
            filter,
            shift,
        });
        Ok(ValueExpr::AggRef(id))
    }
}
