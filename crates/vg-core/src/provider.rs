use async_trait::async_trait;
use vg_baseline::TimeWindow;
use vg_formula::FieldDef;
use vg_formula::plan::QueryPlan;

// ---------------------------------------------------------------------------
// External collaborators (interfaces only)
// ---------------------------------------------------------------------------

/// Source of the index field schema. Typically backed by a mapping fetch
/// against the search cluster; refreshed on demand by the UI layer.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn fetch_fields(&self) -> anyhow::Result<Vec<FieldDef>>;
}

/// Raw counts for one event bucket, as returned by the execution backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketCounts {
    pub event_id: String,
    /// Count observed in the comparison window.
    pub current_count: f64,
    /// Un-normalized count observed over the whole baseline window.
    pub baseline_raw_count: f64,
}

/// Executes a compiled query against the search backend. The transport,
/// authentication, and rate limiting behind this live outside the engine.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn execute(
        &self,
        plan: &QueryPlan,
        baseline: &TimeWindow,
        comparison: &TimeWindow,
    ) -> anyhow::Result<Vec<BucketCounts>>;
}
