//! Diagnostic system for tether build reports.
//!
//! Every build-time problem becomes a [`Diagnostic`]:
//! - an error code for searchability (`tether explain E2001`)
//! - a clear message (what went wrong)
//! - labels naming the unit path and declaration involved (where)
//! - notes and suggestions (why, and how to fix)
//!
//! Diagnostics are collected in a [`queue::DiagnosticQueue`] rather than
//! returned one at a time, so a single run reports every problem it finds
//! before the build aborts.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! emitted. Phases that abort return it instead of a bare `()` so an abort
//! can never happen silently.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn verify(..) -> Result<VerifiedGraph, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
pub use guarantee::ErrorGuaranteed;
