use serde::Serialize;

use crate::window::{HourBucket, TimeWindow};

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How a baseline count is rescaled to the comparison window's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    LinearScale,
    HourlyAverage,
    DailyPattern,
}

impl Strategy {
    /// Resolve a strategy name. Unknown names must never take the
    /// pipeline down; they degrade to `LinearScale`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear_scale" => Strategy::LinearScale,
            "hourly_average" => Strategy::HourlyAverage,
            "daily_pattern" => Strategy::DailyPattern,
            other => {
                tracing::warn!(
                    domain = "normalize",
                    strategy = other,
                    "unknown normalization strategy, using linear_scale"
                );
                Strategy::LinearScale
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::LinearScale => "linear_scale",
            Strategy::HourlyAverage => "hourly_average",
            Strategy::DailyPattern => "daily_pattern",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NormalizationResult
// ---------------------------------------------------------------------------

/// Outcome of comparing two window sizes. `normalization_factor` is the
/// divisor that rescales a baseline-window count down to the comparison
/// window's size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationResult {
    pub baseline_duration_ms: f64,
    pub comparison_duration_ms: f64,
    pub normalization_factor: f64,
    pub comparison_method: Strategy,
}

/// Rescale a raw baseline count by a normalization factor. A degenerate
/// factor (zero, NaN) falls back to the identity rather than producing
/// NaN/Infinity downstream.
pub fn baseline_period_count(raw_count: f64, factor: f64) -> f64 {
    if factor == 0.0 || !factor.is_finite() {
        return raw_count;
    }
    raw_count / factor
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Window normalizer. Owns the hour-bucket history the daily-pattern
/// strategy matches against; the history floor is configurable because
/// deployments differ in how much history they retain.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    history: Vec<HourBucket>,
    min_history_hours: usize,
}

impl Normalizer {
    pub fn new(history: Vec<HourBucket>, min_history_hours: usize) -> Self {
        Self {
            history,
            min_history_hours,
        }
    }

    /// Compute the factor that makes a baseline-window count comparable
    /// to a comparison-window count. Never fails: degenerate inputs
    /// produce a factor of 1.0.
    pub fn normalize(
        &self,
        baseline: &TimeWindow,
        comparison: &TimeWindow,
        strategy: Strategy,
    ) -> NormalizationResult {
        let baseline_ms = baseline.duration_ms();
        let comparison_ms = comparison.duration_ms();

        let factor = if comparison_ms == 0.0 {
            tracing::debug!(
                domain = "normalize",
                "zero-duration comparison window, factor defaults to 1.0"
            );
            1.0
        } else {
            match strategy {
                Strategy::LinearScale => baseline_ms / comparison_ms,
                Strategy::HourlyAverage => self.hourly_factor(baseline_ms, comparison_ms),
                Strategy::DailyPattern => {
                    self.daily_pattern_factor(baseline_ms, comparison_ms, comparison)
                }
            }
        };

        NormalizationResult {
            baseline_duration_ms: baseline_ms,
            comparison_duration_ms: comparison_ms,
            normalization_factor: factor,
            comparison_method: strategy,
        }
    }

    /// Per-hour rate scaled by the comparison window's hour count.
    /// Equivalent to linear scaling expressed in hour units; fractional
    /// hours are kept.
    fn hourly_factor(&self, baseline_ms: f64, comparison_ms: f64) -> f64 {
        let baseline_hours = baseline_ms / 3_600_000.0;
        let comparison_hours = comparison_ms / 3_600_000.0;
        baseline_hours / comparison_hours
    }

    /// Same-shape comparison: weight the hourly factor by how busy the
    /// comparison window's weekday/hour slices historically are relative
    /// to the overall average. Falls back to hourly-average semantics
    /// when fewer matching history buckets exist than the configured
    /// floor.
    fn daily_pattern_factor(
        &self,
        baseline_ms: f64,
        comparison_ms: f64,
        comparison: &TimeWindow,
    ) -> f64 {
        let hourly = self.hourly_factor(baseline_ms, comparison_ms);

        let slices = comparison.hour_slices();
        let matching: Vec<&HourBucket> = self
            .history
            .iter()
            .filter(|b| slices.contains(&(b.weekday, b.hour)))
            .collect();

        if self.history.is_empty() || matching.len() < self.min_history_hours {
            tracing::debug!(
                domain = "normalize",
                matching = matching.len(),
                floor = self.min_history_hours,
                "insufficient history for daily_pattern, using hourly_average"
            );
            return hourly;
        }

        let overall_avg =
            self.history.iter().map(|b| b.count).sum::<f64>() / self.history.len() as f64;
        let slice_avg = matching.iter().map(|b| b.count).sum::<f64>() / matching.len() as f64;
        if overall_avg == 0.0 || slice_avg == 0.0 {
            return hourly;
        }

        // Busier-than-average slices expect more traffic, so the baseline
        // shrinks less when rescaled onto them.
        let shape_weight = slice_avg / overall_avg;
        hourly / shape_weight
    }
}
