use std::io::{self, Stdout, Write}; // Importing necessary modules from the standard library

use crate::collector::CollectWarning;
use crate::diagnostics::FileDiagnostic;
use crate::encoding::{EncodingMode, LineEndingMode};
use crate::errors::MergerError;
use crate::merge::MergeOutcome;

// Prints merge reports and diagnostics, one line at a time, fitted to the terminal
pub struct StatusDisplay {
    stdout: Stdout,        // Standard output handle
    terminal_width: usize, // Width of the terminal
}

impl StatusDisplay {
    pub fn new() -> Self {
        let terminal_width = terminal_size::terminal_size() // Get the terminal size
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80); // Default to 80 if terminal size is not available

        Self {
            stdout: io::stdout(),
            terminal_width,
        }
    }

    pub fn print_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.stdout, "{}", truncate_message(line, self.terminal_width))?;
        }
        self.stdout.flush()
    }
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorten `message` to at most `width` characters, ending in `...` when cut
pub fn truncate_message(message: &str, width: usize) -> String {
    if message.chars().count() <= width {
        return message.to_string();
    }
    if width <= 3 {
        return message.chars().take(width).collect();
    }
    let mut truncated: String = message.chars().take(width - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Report lines for a finished merge
pub fn format_outcome(outcome: &MergeOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "Merge complete: {} succeeded / {} failed",
        outcome.success_count, outcome.failure_count
    )];
    if !outcome.errors.is_empty() {
        lines.push("Failed files:".to_string());
        lines.extend(outcome.errors.iter().map(|error| format!("  {}", error)));
    }
    lines.extend(outcome.stats.summary_lines());
    lines
}

/// Lines shown for a fatal error; a batch where every read failed lists each file
pub fn format_error(error: &MergerError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];
    if let MergerError::AllInputsFailed { errors } = error {
        lines.extend(errors.iter().map(|failure| format!("  {}", failure)));
    }
    lines
}

pub fn format_diagnostic(diagnostic: &FileDiagnostic) -> String {
    format!(
        "{} | {} | {}",
        diagnostic.path.display(),
        diagnostic.summary,
        diagnostic.status
    )
}

pub fn format_warnings(warnings: &[CollectWarning]) -> Vec<String> {
    warnings
        .iter()
        .map(|warning| format!("warning: {}", warning))
        .collect()
}

/// The encoding catalog as printable lines
pub fn format_catalog() -> Vec<String> {
    let join = |labels: Vec<&str>| labels.join(", ");
    vec![
        format!(
            "Input encodings:  {}",
            join(EncodingMode::INPUT_OPTIONS.iter().map(|m| m.label()).collect())
        ),
        format!(
            "Output encodings: {}",
            join(EncodingMode::OUTPUT_OPTIONS.iter().map(|m| m.label()).collect())
        ),
        format!(
            "Line endings:     {}",
            join(LineEndingMode::CHOICES.iter().map(|l| l.label()).collect())
        ),
    ]
}
