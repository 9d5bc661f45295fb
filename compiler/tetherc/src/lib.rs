//! The tether compiler driver.
//!
//! Reads the facts an extractor produced for every source unit, runs them
//! through validation, the resolution graph, and constructor verification,
//! and writes a Rust resolver module. Facts from earlier runs are kept in an
//! incremental log so unchanged units are recognised.

pub mod commands;
pub mod facts;
pub mod options;
pub mod session;
mod tracing_setup;

pub use options::{parse_build_options, BuildOptions, OutputFormat};
pub use session::{BuildOutcome, Session};
pub use tracing_setup::init_tracing;
