// blockclean/src/commands/tools.rs
//! `blockclean tools`: lists the tools a schema declares.

use anyhow::{Context, Result};
use std::io::{self, Write};

use blockclean_core::BlockSchema;

use crate::cli::ToolsCommand;

pub fn run_tools(cmd: &ToolsCommand) -> Result<()> {
    let schema = BlockSchema::load_from_file(&cmd.schema.schema)?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_tools(&schema, &mut writer).context("Failed to write to stdout")
}

/// Writes one line per tool: its name and the number of top-level rules.
pub fn write_tools<W: Write>(schema: &BlockSchema, writer: &mut W) -> io::Result<()> {
    for name in schema.tool_names() {
        let rules = schema.rules_for(name).map(|rules| rules.len()).unwrap_or(0);
        writeln!(writer, "{}\t{} rules", name, rules)?;
    }
    Ok(())
}
