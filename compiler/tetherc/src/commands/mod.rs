//! Command handlers for the `tether` CLI.
//!
//! Each submodule implements one subcommand. Diagnostic reporting shared by
//! `build` and `graph` lives here.

use std::io::IsTerminal;

use tether_diagnostic::emitter::{DiagnosticEmitter, JsonEmitter, TerminalEmitter};
use tether_diagnostic::Diagnostic;

use crate::options::{BuildOptions, OutputFormat};
use crate::session::Session;

mod build;
mod explain;
mod graph;

pub use build::build_file;
pub use explain::explain_error;
pub use graph::print_graph;

/// Print and drain everything `session` reported.
pub fn report_session(session: &mut Session) {
    let truncated = session.queue().limit_reached();
    let diagnostics = session.take_diagnostics();
    report_diagnostics(&diagnostics, session.options());
    if truncated {
        eprintln!(
            "note: stopped collecting errors after {} (--error-limit)",
            session.options().error_limit
        );
    }
}

/// Print `diagnostics` to stderr in the format the options ask for.
pub fn report_diagnostics(diagnostics: &[Diagnostic], options: &BuildOptions) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;

    match options.format {
        OutputFormat::Terminal => {
            let stderr = std::io::stderr();
            let is_tty = stderr.is_terminal();
            let mut emitter = TerminalEmitter::with_color_mode(stderr, options.color, is_tty);
            emitter.emit_all(diagnostics);
            if !diagnostics.is_empty() {
                emitter.emit_summary(errors, warnings);
            }
            emitter.flush();
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(std::io::stderr());
            emitter.begin();
            emitter.emit_all(diagnostics);
            emitter.end();
            emitter.flush();
        }
    }
}
