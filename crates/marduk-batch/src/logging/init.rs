use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "marduk_batch=trace,wgpu=warn"). When unset, `RUST_LOG` is consulted, then
/// `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Level used when neither `env_filter` nor `RUST_LOG` is set. wgpu
    /// internals stay at `warn` in that case.
    pub fn with_default_level(mut self, level: log::LevelFilter) -> Self {
        self.default_level = level;
        self
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(config.default_level);
            builder.filter_module("wgpu_core", log::LevelFilter::Warn);
            builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
            builder.filter_module("naga", log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed (e.g. by a test harness).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
