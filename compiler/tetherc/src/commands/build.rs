//! The `build` command: generate the resolver for a fact feed.

use crate::options::BuildOptions;
use crate::session::Session;

use super::report_session;

/// Build `options.input`, printing diagnostics and a one-line result.
///
/// Exits with status 1 if the build aborted.
pub fn build_file(options: BuildOptions) {
    let mut session = Session::new(options);
    let result = session.run();
    report_session(&mut session);

    match result {
        Ok(outcome) => {
            let status = if outcome.written { "wrote" } else { "unchanged" };
            eprintln!(
                "{status} {} ({} resolution{}, {} changed unit{})",
                outcome.artifact.display(),
                outcome.resolutions,
                if outcome.resolutions == 1 { "" } else { "s" },
                outcome.dirty_units.len(),
                if outcome.dirty_units.len() == 1 { "" } else { "s" },
            );
        }
        Err(_) => std::process::exit(1),
    }
}
