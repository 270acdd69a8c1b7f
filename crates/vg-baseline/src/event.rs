use serde::Serialize;

use crate::normalize::{Normalizer, Strategy, baseline_period_count};
use crate::score::{Status, calculate_score, get_status};
use crate::window::TimeWindow;

// ---------------------------------------------------------------------------
// EventResult
// ---------------------------------------------------------------------------

/// One scored dashboard row. Built per processed bucket and handed to the
/// renderer; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResult {
    pub event_id: String,
    pub current_count: f64,
    /// Baseline count rescaled to the comparison window's size.
    pub baseline_period_count: f64,
    pub daily_average: f64,
    pub score: i64,
    pub status: Status,
}

/// Normalize, score, and classify one event bucket.
pub fn build_event_result(
    event_id: impl Into<String>,
    raw_baseline_count: f64,
    current_count: f64,
    baseline: &TimeWindow,
    comparison: &TimeWindow,
    strategy: Strategy,
    normalizer: &Normalizer,
) -> EventResult {
    let norm = normalizer.normalize(baseline, comparison, strategy);
    let baseline_period = baseline_period_count(raw_baseline_count, norm.normalization_factor);

    let baseline_days = norm.baseline_duration_ms / 86_400_000.0;
    let daily_average = if baseline_days > 0.0 {
        raw_baseline_count / baseline_days
    } else {
        raw_baseline_count
    };

    let score = calculate_score(current_count, baseline_period);
    let status = get_status(score, daily_average);

    EventResult {
        event_id: event_id.into(),
        current_count,
        baseline_period_count: baseline_period,
        daily_average,
        score,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window(day: u32, hour: u32, len_hours: i64) -> TimeWindow {
        let start = Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap();
        TimeWindow::new(start, start + chrono::Duration::hours(len_hours))
    }

    #[test]
    fn steady_traffic_is_normal() {
        // 7 days of baseline at ~1000/hour, one comparable hour now.
        let baseline = window(1, 0, 7 * 24);
        let comparison = window(8, 9, 1);
        let r = build_event_result(
            "portal-home",
            168_000.0,
            1_000.0,
            &baseline,
            &comparison,
            Strategy::LinearScale,
            &Normalizer::default(),
        );
        assert_eq!(r.score, 0);
        assert_eq!(r.status, Status::Normal);
        assert!((r.baseline_period_count - 1_000.0).abs() < 1e-9);
        assert!((r.daily_average - 24_000.0).abs() < 1e-9);
    }

    #[test]
    fn collapsed_traffic_is_critical() {
        let baseline = window(1, 0, 7 * 24);
        let comparison = window(8, 9, 1);
        let r = build_event_result(
            "portal-home",
            168_000.0,
            100.0,
            &baseline,
            &comparison,
            Strategy::LinearScale,
            &Normalizer::default(),
        );
        assert_eq!(r.score, -90);
        assert_eq!(r.status, Status::Critical);
    }

    #[test]
    fn new_event_with_no_baseline_is_normal() {
        let baseline = window(1, 0, 24);
        let comparison = window(2, 9, 1);
        let r = build_event_result(
            "brand-new",
            0.0,
            500.0,
            &baseline,
            &comparison,
            Strategy::LinearScale,
            &Normalizer::default(),
        );
        assert_eq!(r.score, 0);
        assert_eq!(r.status, Status::Normal);
    }
}
