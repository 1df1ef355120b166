// blockclean/src/cli.rs
//! This file defines the command-line interface (CLI) for the blockclean
//! application, including all available commands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "blockclean",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate and sanitize block documents against a schema",
    long_about = "BlockClean checks every block of an Editor.js-style document against a JSON schema of tools and rewrites string content so that only the markup each field allows survives.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, conflicts_with = "debug", help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging for the blockclean crates.
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `blockclean` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Checks a document against the schema without writing anything.
    #[command(about = "Validates every block of a document against the schema.")]
    Validate(ValidateCommand),

    /// Validates a document and writes its sanitized blocks as JSON.
    #[command(about = "Validates a document and writes its sanitized blocks as JSON.")]
    Sanitize(SanitizeCommand),

    /// Lists the tools a schema declares.
    #[command(about = "Lists the tools declared by a schema.")]
    Tools(ToolsCommand),
}

/// Schema and engine settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Path to the JSON schema of tools.
    #[arg(long, short = 's', value_name = "FILE", env = "BLOCKCLEAN_SCHEMA", help = "Path to the JSON schema of tools.")]
    pub schema: PathBuf,

    /// Path to a YAML file of engine options.
    #[arg(long = "options", value_name = "FILE", help = "Path to a YAML file of engine options (defaults to <config dir>/blockclean/options.yaml when present).")]
    pub options: Option<PathBuf>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read the document from a file instead of stdin.")]
    pub input: Option<PathBuf>,
}

/// Arguments for the `sanitize` command.
#[derive(Args, Debug)]
pub struct SanitizeCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read the document from a file instead of stdin.")]
    pub input: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long, short = 'p', help = "Pretty-print the JSON output.")]
    pub pretty: bool,
}

/// Arguments for the `tools` command.
#[derive(Args, Debug)]
pub struct ToolsCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,
}
