//! Observability hooks for the codec: structured metric lines and a one-shot
//! logger installer.
//!
//! The library itself only speaks the `log` facade. Binaries and tests that
//! want to see the output call `init_logging` (or `init_from_config`) once.

use std::fs::File;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::config::CodecConfig;
use crate::error::CodecError;

/// Logs a structured key-value metric line at `debug` level under the
/// `deltablock::metrics` target.
///
/// # Example
/// ```
/// use deltablock::log_metric;
/// let blocks = 4;
/// log_metric!("event"="encode", "blocks"=&blocks);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if $crate::__log::log_enabled!(target: "deltablock::metrics", $crate::__log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::__log::debug!(target: "deltablock::metrics", "{{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at the given level, optionally writing to a file.
/// Only the first call has an effect.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), CodecError> {
    let target = match log_file {
        Some(path) => Some(File::create(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level, target and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        // Another logger may already be installed by the host application.
        let _ = builder.try_init();
    });
    Ok(())
}

/// Installs the logger using the config's `log_level`, if one is set.
pub fn init_from_config(config: &CodecConfig) -> Result<(), CodecError> {
    match &config.log_level {
        Some(level) => {
            let filter = level.parse::<LevelFilter>().map_err(|_| {
                CodecError::InvalidArgument(format!("Unknown log level '{}'", level))
            })?;
            init_logging(filter, None)
        }
        None => Ok(()),
    }
}
