// blockclean/src/ui/output_format.rs
//! Formatting of status messages written to stderr.
//!
//! Messages are prefixed with their kind and colored only when the target
//! supports it.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes an informational message.
pub fn print_info_message<W: Write>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    if enable_colors {
        writeln!(writer, "{} {}", "info:".cyan().bold(), message)
    } else {
        writeln!(writer, "info: {}", message)
    }
}

/// Writes a success message.
pub fn print_success_message<W: Write>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    if enable_colors {
        writeln!(writer, "{} {}", "ok:".green().bold(), message)
    } else {
        writeln!(writer, "ok: {}", message)
    }
}

/// Writes an error message.
pub fn print_error_message<W: Write>(writer: &mut W, message: &str, enable_colors: bool) -> io::Result<()> {
    if enable_colors {
        writeln!(writer, "{} {}", "error:".red().bold(), message.red())
    } else {
        writeln!(writer, "error: {}", message)
    }
}

/// Prints an informational message to stderr unless `quiet` is set.
pub fn info_msg(message: impl AsRef<str>, quiet: bool) {
    if quiet {
        return;
    }
    let stderr = io::stderr();
    let colors = stderr.is_terminal();
    let _ = print_info_message(&mut stderr.lock(), message.as_ref(), colors);
}

/// Prints a success message to stderr unless `quiet` is set.
pub fn success_msg(message: impl AsRef<str>, quiet: bool) {
    if quiet {
        return;
    }
    let stderr = io::stderr();
    let colors = stderr.is_terminal();
    let _ = print_success_message(&mut stderr.lock(), message.as_ref(), colors);
}

/// Prints an error message to stderr. Errors are never silenced.
pub fn error_msg(message: impl AsRef<str>) {
    let stderr = io::stderr();
    let colors = stderr.is_terminal();
    let _ = print_error_message(&mut stderr.lock(), message.as_ref(), colors);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_messages() {
        let mut out = Vec::new();
        print_info_message(&mut out, "loaded", false).unwrap();
        print_success_message(&mut out, "valid", false).unwrap();
        print_error_message(&mut out, "broken", false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "info: loaded\nok: valid\nerror: broken\n");
    }

    #[test]
    fn test_colored_messages_keep_text() {
        let mut out = Vec::new();
        print_error_message(&mut out, "broken", true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("broken"));
    }
}
