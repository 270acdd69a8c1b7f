use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum EngineReason {
    #[error("formula parse error")]
    FormulaParse,
    #[error("formula compile error")]
    FormulaCompile,
    #[error("query execution error")]
    QueryExec,
    #[error("schema fetch error")]
    SchemaFetch,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for EngineReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::FormulaParse => 2001,
            Self::FormulaCompile => 2002,
            Self::QueryExec => 2003,
            Self::SchemaFetch => 2004,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type EngineError = StructError<EngineReason>;
pub type EngineResult<T> = Result<T, EngineError>;
