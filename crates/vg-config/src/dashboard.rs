use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use vg_baseline::Strategy;

use crate::logging::LoggingConfig;
use crate::types::HumanDuration;

// ---------------------------------------------------------------------------
// Raw TOML structure (intermediate representation)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DashboardConfigRaw {
    normalize: NormalizeRaw,
    suggest: SuggestRaw,
    editor: EditorRaw,
    logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NormalizeRaw {
    strategy: String,
    min_history_hours: usize,
}

impl Default for NormalizeRaw {
    fn default() -> Self {
        Self {
            strategy: "linear_scale".to_string(),
            min_history_hours: 24,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SuggestRaw {
    cache_ttl: HumanDuration,
}

impl Default for SuggestRaw {
    fn default() -> Self {
        Self {
            cache_ttl: "5m".parse().expect("static default"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EditorRaw {
    complexity_budget: Option<u32>,
    debounce: HumanDuration,
}

impl Default for EditorRaw {
    fn default() -> Self {
        Self {
            complexity_budget: None,
            debounce: "400ms".parse().expect("static default"),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig (resolved)
// ---------------------------------------------------------------------------

/// Resolved `vigil.toml`. Every section may be omitted; an unknown
/// normalization strategy degrades to `linear_scale` instead of failing
/// the load.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub normalize: NormalizeConfig,
    pub suggest: SuggestConfig,
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub strategy: Strategy,
    /// History floor below which `daily_pattern` falls back to
    /// `hourly_average`.
    pub min_history_hours: usize,
}

#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub cache_ttl: HumanDuration,
}

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub complexity_budget: Option<u32>,
    pub debounce: HumanDuration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfigRaw::default().resolve()
    }
}

impl DashboardConfig {
    /// Read and parse a `vigil.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for DashboardConfig {
    type Err = anyhow::Error;

    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let raw: DashboardConfigRaw = toml::from_str(toml_str)?;
        Ok(raw.resolve())
    }
}

impl DashboardConfigRaw {
    fn resolve(self) -> DashboardConfig {
        DashboardConfig {
            normalize: NormalizeConfig {
                strategy: Strategy::from_name(&self.normalize.strategy),
                min_history_hours: self.normalize.min_history_hours,
            },
            suggest: SuggestConfig {
                cache_ttl: self.suggest.cache_ttl,
            },
            editor: EditorConfig {
                complexity_budget: self.editor.complexity_budget,
                debounce: self.editor.debounce,
            },
            logging: self.logging,
        }
    }
}
