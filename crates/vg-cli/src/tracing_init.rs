use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use vg_config::{LogFormat, LoggingConfig};

/// Build the env filter: global level plus per-module overrides, with
/// `RUST_LOG` taking precedence when set.
fn build_filter(cfg: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut spec = cfg.level.clone();
    for (module, level) in &cfg.modules {
        spec.push_str(&format!(",{module}={level}"));
    }
    EnvFilter::try_new(spec).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing from the `[logging]` config section.
///
/// Returns a worker guard when logging to a file; it must stay alive for
/// buffered output to flush on exit.
pub fn init_tracing(cfg: &LoggingConfig, base_dir: &Path) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(cfg);

    match &cfg.file {
        Some(file) => {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                base_dir.join(file)
            };
            let dir = path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("log file {} has no parent dir", path.display()))?;
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("log file {} has no file name", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

            match cfg.format {
                LogFormat::Json => tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(writer)
                    .with_ansi(false)
                    .init(),
                LogFormat::Plain => tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(writer)
                    .with_ansi(false)
                    .init(),
            }
            Ok(Some(guard))
        }
        None => {
            match cfg.format {
                LogFormat::Json => tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(filter)
                    .init(),
                LogFormat::Plain => tracing_subscriber::fmt().with_env_filter(filter).init(),
            }
            Ok(None)
        }
    }
}
