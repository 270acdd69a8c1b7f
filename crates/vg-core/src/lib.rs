pub mod error;
pub mod pipeline;
pub mod provider;
pub mod session;

pub use error::{EngineError, EngineReason, EngineResult};
pub use pipeline::{ScoringPipeline, score_bucket};
pub use provider::{BucketCounts, QueryBackend, SchemaProvider};
pub use session::EditorSession;
