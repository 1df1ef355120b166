// blockclean/src/commands/sanitize.rs
//! `blockclean sanitize`: validates a document and writes its sanitized blocks.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;

use blockclean_core::{Editor, SanitizedBlock};

use crate::cli::SanitizeCommand;
use crate::commands::{load_engine, read_input};
use crate::ui::output_format::info_msg;

/// The document written by `sanitize`.
#[derive(Debug, Serialize)]
pub struct SanitizedDocument {
    pub blocks: Vec<SanitizedBlock>,
}

pub fn run_sanitize(cmd: &SanitizeCommand, quiet: bool) -> Result<()> {
    let engine = Arc::new(load_engine(&cmd.schema)?);
    let input = read_input(cmd.input.as_deref())?;

    let editor = Editor::with_engine(engine, &input).context("Document is invalid")?;
    let document = SanitizedDocument {
        blocks: editor.sanitized_blocks().context("Sanitization failed")?,
    };
    debug!("Sanitized {} blocks.", document.blocks.len());

    let rendered = render(&document, cmd.pretty)?;
    match &cmd.output {
        Some(path) => {
            info_msg(format!("Writing sanitized document to file: {}", path.display()), quiet);
            fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writeln!(writer, "{}", rendered).context("Failed to write to stdout")?;
        }
    }

    info!("Sanitize operation completed.");
    Ok(())
}

fn render(document: &SanitizedDocument, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    rendered.context("Failed to serialize sanitized document")
}
