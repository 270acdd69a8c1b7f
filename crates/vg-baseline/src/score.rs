use serde::Serialize;

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Percentage change of `current` against `baseline`, rounded to an
/// integer. A zero baseline scores 0 — a brand-new event must not be
/// amplified into a false drop/spike.
pub fn calculate_score(current: f64, baseline: f64) -> i64 {
    if baseline == 0.0 {
        return 0;
    }
    ((current / baseline - 1.0) * 100.0).round() as i64
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Four-level traffic status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Critical,
    Warning,
    Normal,
    Increased,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Critical => "CRITICAL",
            Status::Warning => "WARNING",
            Status::Normal => "NORMAL",
            Status::Increased => "INCREASED",
        };
        f.write_str(s)
    }
}

/// Classify a score, tiered by daily traffic volume. Low-volume events
/// are noisier, so their warning threshold tightens from −50 to −30.
pub fn get_status(score: i64, daily_volume: f64) -> Status {
    if score > 0 {
        return Status::Increased;
    }
    let warning_floor = if daily_volume >= 1000.0 { -50 } else { -30 };
    if score <= -80 {
        Status::Critical
    } else if score <= warning_floor {
        Status::Warning
    } else {
        Status::Normal
    }
}

// ---------------------------------------------------------------------------
// Impact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactKind {
    Loss,
    Gain,
    Normal,
}

/// Human-readable magnitude of a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Impact {
    #[serde(rename = "type")]
    pub kind: ImpactKind,
    pub message: String,
}

/// Describe the difference between current and baseline counts. Swings
/// smaller than 50 impressions read as normal variance.
pub fn calculate_impact(current: f64, baseline: f64) -> Impact {
    let diff = baseline - current;
    if diff.abs() < 50.0 {
        return Impact {
            kind: ImpactKind::Normal,
            message: "Normal variance".to_string(),
        };
    }
    let magnitude = group_thousands(diff.abs().round() as u64);
    if diff > 0.0 {
        Impact {
            kind: ImpactKind::Loss,
            message: format!("Lost ~{} impressions", magnitude),
        }
    } else {
        Impact {
            kind: ImpactKind::Gain,
            message: format!("Gained ~{} impressions", magnitude),
        }
    }
}

/// Comma-group an integer: 1234567 → "1,234,567".
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}
