//! Diagnostic output.
//!
//! [`TerminalEmitter`] writes the human-readable form (`--format=terminal`,
//! the default); [`JsonEmitter`] writes one JSON array for build tooling
//! (`--format=json`). Both print labels as `unit_path::Name` locations since
//! facts carry no source spans.

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use std::fmt::Write;

use crate::Diagnostic;

/// Sink for a build's diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        diagnostics.iter().for_each(|diag| self.emit(diag));
    }

    fn flush(&mut self);

    /// Closing line with the error and warning totals.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// `","` between list elements, nothing after the last one.
pub(crate) fn trailing_comma(index: usize, total: usize) -> &'static str {
    if index + 1 < total {
        ","
    } else {
        ""
    }
}

/// Quote-safe form of `s` for a JSON string literal.
pub(crate) fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests;
