use regex::Regex;

// ---------------------------------------------------------------------------
// Predefined patterns
// ---------------------------------------------------------------------------

/// A canned query-text → formula mapping. Predefined patterns are
/// immutable; user-taught patterns live in the matcher's learned store.
#[derive(Debug)]
pub struct FormulaPattern {
    pub name: &'static str,
    pub category: &'static str,
    /// Keyword trigger: every keyword must appear in the query
    /// (case-insensitive).
    pub keywords: &'static [&'static str],
    /// Optional regex trigger, matched against the lowercased query.
    pub pattern: Option<&'static str>,
    pub formula: &'static str,
    pub confidence: f64,
}

impl FormulaPattern {
    /// A pattern fires on its regex, or on all of its keywords.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        if let Some(pat) = self.pattern
            && let Ok(re) = Regex::new(pat)
            && re.is_match(&q)
        {
            return true;
        }
        !self.keywords.is_empty() && self.keywords.iter().all(|k| q.contains(k))
    }
}

pub const PATTERNS: &[FormulaPattern] = &[
    FormulaPattern {
        name: "drop-vs-yesterday",
        category: "comparison",
        keywords: &["drop", "yesterday"],
        pattern: Some(r"(half|50\s*%).*(yesterday|day before)"),
        formula: r#"ifelse(count() < count(shift="1d") * 0.5, "CRITICAL", "NORMAL")"#,
        confidence: 0.85,
    },
    FormulaPattern {
        name: "drop-vs-last-week",
        category: "comparison",
        keywords: &["drop", "week"],
        pattern: None,
        formula: r#"ifelse(count() < count(shift="1w") * 0.5, "CRITICAL", "NORMAL")"#,
        confidence: 0.78,
    },
    FormulaPattern {
        name: "spike-vs-yesterday",
        category: "comparison",
        keywords: &["spike"],
        pattern: None,
        formula: r#"ifelse(count() > count(shift="1d") * 2, "INCREASED", "NORMAL")"#,
        confidence: 0.75,
    },
    FormulaPattern {
        name: "day-over-day-ratio",
        category: "comparison",
        keywords: &["compare", "yesterday"],
        pattern: None,
        formula: r#"count() / count(shift="1d")"#,
        confidence: 0.8,
    },
    FormulaPattern {
        name: "week-over-week-ratio",
        category: "comparison",
        keywords: &["compare", "week"],
        pattern: None,
        formula: r#"count() / count(shift="1w")"#,
        confidence: 0.8,
    },
    FormulaPattern {
        name: "error-count",
        category: "elasticsearch",
        keywords: &["error", "count"],
        pattern: Some(r"how many errors"),
        formula: "count(kql='status:error')",
        confidence: 0.85,
    },
    FormulaPattern {
        name: "error-rate",
        category: "elasticsearch",
        keywords: &["error", "rate"],
        pattern: None,
        formula: "count(kql='status:error') / count() * 100",
        confidence: 0.8,
    },
    FormulaPattern {
        name: "total-traffic",
        category: "elasticsearch",
        keywords: &["total", "traffic"],
        pattern: None,
        formula: "count()",
        confidence: 0.75,
    },
    FormulaPattern {
        name: "total-bytes",
        category: "elasticsearch",
        keywords: &["total", "bytes"],
        pattern: None,
        formula: "sum(bytes)",
        confidence: 0.8,
    },
    FormulaPattern {
        name: "average-duration",
        category: "elasticsearch",
        keywords: &["average", "duration"],
        pattern: None,
        formula: "average(duration)",
        confidence: 0.8,
    },
    FormulaPattern {
        name: "unique-visitors",
        category: "elasticsearch",
        keywords: &["unique", "visitors"],
        pattern: Some(r"(distinct|unique)\s+(users|visitors|ips|clients)"),
        formula: "unique_count(client_ip)",
        confidence: 0.8,
    },
];
