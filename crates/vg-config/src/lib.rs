pub mod dashboard;
pub mod logging;
pub mod types;

pub use dashboard::{DashboardConfig, EditorConfig, NormalizeConfig, SuggestConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use types::HumanDuration;
