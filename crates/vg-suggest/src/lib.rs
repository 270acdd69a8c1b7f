mod cache;
mod matcher;
mod patterns;

pub use cache::TtlCache;
pub use matcher::{Alternative, LEARNED_CONFIDENCE, PatternMatcher, Suggestion};
pub use patterns::{FormulaPattern, PATTERNS};
