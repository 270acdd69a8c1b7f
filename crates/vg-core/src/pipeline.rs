use orion_error::StructError;

use vg_baseline::{EventResult, HourBucket, Normalizer, Strategy, TimeWindow, build_event_result};
use vg_config::DashboardConfig;
use vg_formula::{FieldSchema, compile_formula, parse};

use crate::error::{EngineReason, EngineResult};
use crate::provider::{BucketCounts, QueryBackend};

// ---------------------------------------------------------------------------
// Bucket scoring
// ---------------------------------------------------------------------------

/// Turn one raw bucket into a scored dashboard row.
pub fn score_bucket(
    counts: BucketCounts,
    baseline: &TimeWindow,
    comparison: &TimeWindow,
    strategy: Strategy,
    normalizer: &Normalizer,
) -> EventResult {
    build_event_result(
        counts.event_id,
        counts.baseline_raw_count,
        counts.current_count,
        baseline,
        comparison,
        strategy,
        normalizer,
    )
}

// ---------------------------------------------------------------------------
// ScoringPipeline
// ---------------------------------------------------------------------------

/// End-to-end scoring run: formula text → compiled plan → backend counts →
/// normalized, classified rows.
pub struct ScoringPipeline {
    config: DashboardConfig,
    normalizer: Normalizer,
}

impl ScoringPipeline {
    pub fn new(config: DashboardConfig, history: Vec<HourBucket>) -> Self {
        let normalizer = Normalizer::new(history, config.normalize.min_history_hours);
        Self { config, normalizer }
    }

    pub async fn run(
        &self,
        backend: &dyn QueryBackend,
        formula_text: &str,
        schema: &FieldSchema,
        baseline: &TimeWindow,
        comparison: &TimeWindow,
    ) -> EngineResult<Vec<EventResult>> {
        let outcome = parse(formula_text);
        let Some(ast) = outcome.ast else {
            let detail = outcome
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "unparseable formula".to_string());
            return StructError::from(EngineReason::FormulaParse)
                .with_detail(detail)
                .err();
        };

        let plan = compile_formula(&ast, schema).map_err(|e| {
            StructError::from(EngineReason::FormulaCompile).with_detail(e.to_string())
        })?;

        tracing::debug!(
            domain = "pipeline",
            aggs = plan.aggs.len(),
            "executing compiled formula"
        );
        let buckets = backend
            .execute(&plan, baseline, comparison)
            .await
            .map_err(|e| {
                StructError::from(EngineReason::QueryExec).with_detail(e.to_string())
            })?;

        Ok(buckets
            .into_iter()
            .map(|b| {
                score_bucket(
                    b,
                    baseline,
                    comparison,
                    self.config.normalize.strategy,
                    &self.normalizer,
                )
            })
            .collect())
    }
}
