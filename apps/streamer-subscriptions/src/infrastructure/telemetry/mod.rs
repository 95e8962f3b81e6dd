//! Tracing Subscriber Setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! pretty or JSON formatting layer. Embedding processes that already own a
//! global subscriber can skip this entirely; the library only emits events.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `streamer_subscriptions=info`)
//! - `STREAMER_SUBS_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Directive applied when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "streamer_subscriptions=info";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_VAR: &str = "STREAMER_SUBS_LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse format from string. Unknown values give `Pretty`.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_directive: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let format = std::env::var(LOG_FORMAT_VAR)
            .map(|s| LogFormat::from_str_case_insensitive(&s))
            .unwrap_or_default();

        Self {
            format,
            ..Self::default()
        }
    }
}

/// Telemetry initialization error.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Default filter directive did not parse.
    #[error("invalid filter directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed.
    #[error("global subscriber already set: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize logging with configuration from environment.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init() -> Result<(), TelemetryError> {
    init_with_config(&TelemetryConfig::from_env())
}

/// Initialize logging with custom configuration.
///
/// # Errors
///
/// Returns an error if the default directive is invalid or a global
/// subscriber is already installed.
pub fn init_with_config(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_directive)?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init()?,
    }

    Ok(())
}
