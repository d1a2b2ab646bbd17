//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup. A second call reports an error because the
//! global subscriber can only be installed once per process.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Appended to a bare level so HTTP client internals stay quiet.
const QUIET_DEPS: &str = "reqwest=warn,hyper_util=warn,h2=warn,rustls=warn";

/// Expand a bare level such as `"debug"` into a relay directive. Full
/// directives (containing `=` or `,`) are used as given.
pub fn directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{level},{QUIET_DEPS}")
    }
}

/// Initialise the global tracing subscriber.
///
/// `level` accepts standard level strings (`"error"` … `"trace"`), expanded
/// by [`directive`], or a full `EnvFilter` directive such as
/// `"persona_relay=debug,reqwest=info"`.
///
/// If `prefer_level` is `true`, `level` takes precedence and `RUST_LOG` is only
/// used as a fallback when `level` is invalid. If `prefer_level` is `false`,
/// `RUST_LOG` takes precedence and `level` is the fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let level = directive(level);
    let filter = if prefer_level {
        match EnvFilter::try_new(&level) {
            Ok(filter) => filter,
            Err(level_err) => EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!(
                    "invalid log level '{level}': {level_err}; RUST_LOG parse failed: {env_err}"
                ))
            })?,
        }
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&level))
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}
