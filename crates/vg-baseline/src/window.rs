use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

// ---------------------------------------------------------------------------
// TimeWindow
// ---------------------------------------------------------------------------

/// A time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window span in milliseconds. A reversed window is tolerated and
    /// treated as its absolute span.
    pub fn duration_ms(&self) -> f64 {
        (self.end - self.start).num_milliseconds().unsigned_abs() as f64
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_ms() / 3_600_000.0
    }

    /// The `(weekday, hour)` slices this window covers, hour by hour,
    /// capped at one full week (after that every slice repeats).
    pub fn hour_slices(&self) -> Vec<(Weekday, u32)> {
        let (from, to) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };

        let mut slices = Vec::new();
        let mut cursor = from;
        while cursor < to && slices.len() < 7 * 24 {
            let slice = (cursor.weekday(), cursor.hour());
            if !slices.contains(&slice) {
                slices.push(slice);
            }
            cursor = cursor + chrono::Duration::hours(1);
        }
        slices
    }
}

// ---------------------------------------------------------------------------
// HourBucket
// ---------------------------------------------------------------------------

/// One observed hour of history, keyed by weekday and hour of day.
/// Collected from past traffic and fed to the daily-pattern strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBucket {
    pub weekday: Weekday,
    pub hour: u32,
    pub count: f64,
}
