// blockclean/src/commands/validate.rs
//! `blockclean validate`: checks a document and reports the first problem.

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use blockclean_core::Editor;

use crate::cli::ValidateCommand;
use crate::commands::{load_engine, read_input};
use crate::ui::output_format::success_msg;

pub fn run_validate(cmd: &ValidateCommand, quiet: bool) -> Result<()> {
    let engine = Arc::new(load_engine(&cmd.schema)?);
    let input = read_input(cmd.input.as_deref())?;

    let editor = Editor::with_engine(engine, &input).context("Document is invalid")?;
    info!("Document validated: {} blocks.", editor.blocks().len());
    success_msg(format!("document is valid ({} blocks)", editor.blocks().len()), quiet);
    Ok(())
}
