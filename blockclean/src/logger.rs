// blockclean/src/logger.rs
//! Logger initialization for the `blockclean` binary.
//!
//! Logs go to stderr through `env_logger`. `RUST_LOG` is honored unless an
//! explicit level is forced by the command-line flags.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Crates whose level `--debug` raises.
const OWN_CRATES: [&str; 2] = ["blockclean", "blockclean_core"];

/// Initializes the global logger.
///
/// * `None` - use `RUST_LOG`, defaulting to `warn`.
/// * `Some(LevelFilter::Off)` - disable logging entirely.
/// * `Some(level)` - log this crate and `blockclean_core` at `level`.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    match level {
        Some(LevelFilter::Off) => {
            builder.filter_level(LevelFilter::Off);
        }
        Some(level) => {
            for name in OWN_CRATES {
                builder.filter_module(name, level);
            }
        }
        None => {}
    }
    builder.format_timestamp(None).try_init().ok();
}
