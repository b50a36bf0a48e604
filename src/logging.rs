use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::error::{DashError, DashResult};

/// Logging configuration for bomdash
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    /// In TUI mode all output goes to a file: console writes corrupt the
    /// alternate screen.
    pub file_only: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            file_only: false,
        }
    }
}

/// Initialize the logging system. The returned guard must stay alive for the
/// duration of the program or buffered file logs are lost.
pub fn init_logging(config: &LoggingConfig) -> DashResult<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bomdash={},{}", config.level, config.level)));

    let registry = Registry::default().with(env_filter);

    if config.file_only {
        fs::create_dir_all(&config.log_dir)
            .map_err(|e| DashError::file_io(config.log_dir.to_string_lossy().to_string(), e))?;

        let file_appender = rolling::daily(&config.log_dir, "bomdash.log");
        let (file_writer, guard) = non_blocking(file_appender);

        let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false).boxed();

        registry.with(file_layer).init();
        info!("File logging enabled: {}", config.log_dir.display());
        Ok(Some(guard))
    } else {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .boxed();

        registry.with(console_layer).init();
        Ok(None)
    }
}
