//! The `graph` command: print what every abstract id resolves to.

use crate::options::BuildOptions;
use crate::session::Session;

use super::report_session;

pub fn print_graph(options: BuildOptions) {
    let mut session = Session::new(options);
    let result = session.resolve();
    report_session(&mut session);

    match result {
        Ok(map) => print!("{map}"),
        Err(_) => std::process::exit(1),
    }
}
