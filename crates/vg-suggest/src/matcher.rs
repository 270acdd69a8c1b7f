use std::collections::VecDeque;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::patterns::{FormulaPattern, PATTERNS};

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Confidence assigned to user-taught patterns. Above every predefined
/// pattern, below certainty.
pub const LEARNED_CONFIDENCE: f64 = 0.9;

/// Learned store capacity. Oldest entries are evicted first once full,
/// bounding memory for long-lived dashboard sessions.
const LEARNED_CAPACITY: usize = 100;

/// Confidence of the `count()` fallback when nothing matches.
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// A ranked formula suggestion for one natural-language query.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub formula: String,
    pub confidence: f64,
    pub alternatives: Vec<Alternative>,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub formula: String,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
struct LearnedPattern {
    query: String,
    formula: String,
}

// ---------------------------------------------------------------------------
// PatternMatcher
// ---------------------------------------------------------------------------

/// Maps free-text queries to formulas. Owns the learned-pattern store and
/// the TTL result cache; both are instance state so separate editors (and
/// tests) never interfere.
#[derive(Debug)]
pub struct PatternMatcher {
    cache: TtlCache<Suggestion>,
    learned: VecDeque<LearnedPattern>,
}

impl PatternMatcher {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(cache_ttl),
            learned: VecDeque::new(),
        }
    }

    /// Suggest a formula for a natural-language query.
    ///
    /// Lookup order: result cache (exact text, TTL-bounded), learned
    /// patterns, predefined patterns. All predefined matches are
    /// collected; the highest confidence wins and the rest become
    /// alternatives. A query matching nothing still gets a low-confidence
    /// `count()` so the editor always has something to offer.
    pub fn generate_formula(&mut self, query: &str) -> Suggestion {
        if let Some(mut hit) = self.cache.get(query) {
            hit.cached = true;
            return hit;
        }

        let suggestion = self.match_fresh(query);
        self.cache.insert(query, suggestion.clone());
        suggestion
    }

    fn match_fresh(&self, query: &str) -> Suggestion {
        let mut matches: Vec<&FormulaPattern> =
            PATTERNS.iter().filter(|p| p.matches(query)).collect();
        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Learned patterns take priority over predefined matches; the
        // predefined hits survive as alternatives.
        if let Some(lp) = self.learned.iter().find(|p| p.query == query) {
            return Suggestion {
                formula: lp.formula.clone(),
                confidence: LEARNED_CONFIDENCE,
                alternatives: matches
                    .iter()
                    .map(|p| Alternative {
                        formula: p.formula.to_string(),
                        confidence: p.confidence,
                    })
                    .collect(),
                cached: false,
            };
        }

        match matches.split_first() {
            Some((best, rest)) => Suggestion {
                formula: best.formula.to_string(),
                confidence: best.confidence,
                alternatives: rest
                    .iter()
                    .map(|p| Alternative {
                        formula: p.formula.to_string(),
                        confidence: p.confidence,
                    })
                    .collect(),
                cached: false,
            },
            None => Suggestion {
                formula: "count()".to_string(),
                confidence: FALLBACK_CONFIDENCE,
                alternatives: Vec::new(),
                cached: false,
            },
        }
    }

    /// Teach the matcher a query → formula association. Re-teaching an
    /// existing query overwrites it in place; new entries evict the
    /// oldest once the store is full.
    pub fn learn_pattern(&mut self, query: &str, formula: &str) {
        // The cached result for this query is stale now.
        self.cache.remove(query);

        if let Some(existing) = self.learned.iter_mut().find(|p| p.query == query) {
            existing.formula = formula.to_string();
            return;
        }

        self.learned.push_back(LearnedPattern {
            query: query.to_string(),
            formula: formula.to_string(),
        });
        while self.learned.len() > LEARNED_CAPACITY {
            let dropped = self.learned.pop_front();
            if let Some(p) = dropped {
                tracing::debug!(
                    domain = "suggest",
                    query = %p.query,
                    "evicted oldest learned pattern"
                );
            }
        }
    }

    /// The formula previously learned for a query, if still stored.
    pub fn learned_formula(&self, query: &str) -> Option<&str> {
        self.learned
            .iter()
            .find(|p| p.query == query)
            .map(|p| p.formula.as_str())
    }

    pub fn learned_len(&self) -> usize {
        self.learned.len()
    }

    /// Plain-language description of a formula string.
    pub fn explain(&self, formula: &str) -> String {
        vg_formula::describe_formula(formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PatternMatcher {
        PatternMatcher::new(Duration::from_secs(60))
    }

    // -- predefined matching --

    #[test]
    fn best_predefined_match_wins() {
        let mut m = matcher();
        let s = m.generate_formula("did traffic drop since yesterday");
        assert!(s.formula.contains("ifelse"));
        assert!((s.confidence - 0.85).abs() < 1e-9);
        assert!(!s.cached);
    }

    #[test]
    fn weaker_matches_become_alternatives() {
        let mut m = matcher();
        // Triggers both error-count (0.85) and error-rate (0.8).
        let s = m.generate_formula("error count and error rate");
        assert_eq!(s.formula, "count(kql='status:error')");
        assert!(
            s.alternatives
                .iter()
                .any(|a| a.formula.contains("* 100"))
        );
    }

    #[test]
    fn unmatched_query_falls_back_to_count() {
        let mut m = matcher();
        let s = m.generate_formula("xyzzy");
        assert_eq!(s.formula, "count()");
        assert!(s.confidence < 0.7);
        assert!(s.alternatives.is_empty());
    }

    // -- cache --

    #[test]
    fn second_lookup_is_cached() {
        let mut m = matcher();
        let first = m.generate_formula("total traffic");
        assert!(!first.cached);
        let second = m.generate_formula("total traffic");
        assert!(second.cached);
        assert_eq!(second.formula, first.formula);
    }

    #[test]
    fn expired_cache_entry_is_recomputed() {
        let mut m = PatternMatcher::new(Duration::from_millis(5));
        let _ = m.generate_formula("total traffic");
        std::thread::sleep(Duration::from_millis(20));
        let again = m.generate_formula("total traffic");
        assert!(!again.cached);
    }

    // -- learned patterns --

    #[test]
    fn learned_pattern_overrides_predefined() {
        let mut m = matcher();
        let query = "did traffic drop since yesterday";
        // Prime the cache with the predefined answer first.
        let _ = m.generate_formula(query);

        m.learn_pattern(query, r#"count() / count(shift="1d")"#);
        let s = m.generate_formula(query);
        assert_eq!(s.formula, r#"count() / count(shift="1d")"#);
        assert!((s.confidence - LEARNED_CONFIDENCE).abs() < 1e-9);
        // The predefined hit is still visible as an alternative.
        assert!(s.alternatives.iter().any(|a| a.formula.contains("ifelse")));
    }

    #[test]
    fn re_teaching_overwrites_in_place() {
        let mut m = matcher();
        m.learn_pattern("my query", "count()");
        m.learn_pattern("my query", "sum(bytes)");
        assert_eq!(m.learned_len(), 1);
        assert_eq!(m.learned_formula("my query"), Some("sum(bytes)"));
    }

    #[test]
    fn store_caps_at_capacity_evicting_oldest() {
        let mut m = matcher();
        for i in 0..150 {
            m.learn_pattern(&format!("query {i}"), "count()");
        }
        assert_eq!(m.learned_len(), 100);
        assert_eq!(m.learned_formula("query 0"), None);
        assert_eq!(m.learned_formula("query 49"), None);
        assert!(m.learned_formula("query 50").is_some());
        assert!(m.learned_formula("query 149").is_some());
    }

    // -- explain --

    #[test]
    fn explain_delegates_to_formula_description() {
        let m = matcher();
        assert_eq!(m.explain("count(("), "Invalid formula syntax");
        assert!(m.explain("sum(bytes) / count()").contains("divided by"));
    }
}
