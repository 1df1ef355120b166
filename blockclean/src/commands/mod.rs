// blockclean/src/commands/mod.rs
//! Command implementations and the helpers they share.

pub mod sanitize;
pub mod tools;
pub mod validate;

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use blockclean_core::{BlockEngine, BlockSchema, EngineOptions};

use crate::cli::SchemaArgs;

/// Directory under the platform config dir that holds default settings.
pub const CONFIG_DIR_NAME: &str = "blockclean";

/// File name of the default engine options.
pub const OPTIONS_FILE_NAME: &str = "options.yaml";

/// Location of the default engine options file, if the platform has a config dir.
pub fn default_options_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(OPTIONS_FILE_NAME))
}

/// Resolves engine options: an explicit file must load, the default file is
/// used when present, and built-in defaults apply otherwise.
pub fn load_options(explicit: Option<&Path>) -> Result<EngineOptions> {
    if let Some(path) = explicit {
        return EngineOptions::load_from_file(path);
    }
    match default_options_path() {
        Some(path) if path.is_file() => EngineOptions::load_from_file(&path),
        _ => {
            debug!("No options file found; using default engine options.");
            Ok(EngineOptions::default())
        }
    }
}

/// Builds an engine from the schema and options named on the command line.
pub fn load_engine(args: &SchemaArgs) -> Result<BlockEngine> {
    let schema = BlockSchema::load_from_file(&args.schema)?;
    let options = load_options(args.options.as_deref())?;
    Ok(BlockEngine::with_options(schema, options))
}

/// Reads the document from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading document from: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path.display()))
        }
        None => {
            info!("Reading document from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read document from stdin")?;
            Ok(buffer)
        }
    }
}
