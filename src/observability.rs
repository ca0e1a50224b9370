//! This module provides observability and diagnostics for the page engine.
//!
//! Codecs log through the `log` facade; nothing is printed unless the embedding
//! application installs a logger, for example through [`init_logging`]. The
//! `log_metric!` macro emits structured key-value records for engine-level events
//! and is compiled out of release builds entirely.

use std::fs::{File, OpenOptions};
use std::sync::Once;

use log::LevelFilter;

use crate::error::Result;

/// Logs a structured key-value metric at debug level, only in debug builds.
///
/// # Example
/// ```text
/// log_metric!("event"="decode_page", "encoding"=&encoding, "values"=&count);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            ::log::debug!("PAGECODEC_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` with a `[LEVEL] message` format.
///
/// With `log_file` set, records are appended to that file instead of stderr. Only
/// the first call has any effect; a logger installed elsewhere is left alone.
pub fn init_logging(level: LevelFilter, log_file: Option<&str>) -> Result<()> {
    // Open the file up front so a bad path is reported rather than swallowed.
    let file: Option<File> = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(LevelFilter::Debug, None).unwrap();
        init_logging(LevelFilter::Trace, None).unwrap();
        log_metric!("event" = "test", "count" = 3);
    }

    #[test]
    fn test_unopenable_log_file_is_io_error() {
        let err = init_logging(LevelFilter::Info, Some("/nonexistent-dir/pagecodec.log")).unwrap_err();
        assert!(matches!(err, crate::error::EncodingError::Io(_)));
    }
}
