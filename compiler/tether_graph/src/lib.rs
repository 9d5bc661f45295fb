//! Resolution graph and constructor verification.
//!
//! The pipeline inside this crate:
//!
//! ```text
//! UnitFacts ──validate──▶ ResolutionGraph ──finalize──▶ ResolutionMap
//!                               │                            │
//!                               └──────▶ ConstructorVerifier ◀┘
//! ```
//!
//! - [`validate`] rejects malformed unit facts before anything is built.
//! - [`ResolutionGraph`] propagates registrations along class and interface
//!   heritage. Facts may arrive in any order; registrations whose heritage is
//!   not known yet wait in a worklist and are replayed when it arrives, so
//!   the final graph is independent of arrival order.
//! - [`ResolutionGraph::finalize`] reduces every abstract identifier to one
//!   concrete, or reports the ambiguity. [`ResolutionGraph::finalize_partial`]
//!   keeps the partial map so verification can still run after an error.
//! - [`ConstructorVerifier`] computes constructor dependencies against the
//!   finalized map and rejects cycles and unresolved dependencies.

mod graph;
mod lookup;
mod resolution;
pub mod validate;
mod verify;

pub use graph::{Finalized, ResolutionGraph, TargetKind};
pub use lookup::HeritageTable;
pub use resolution::{Resolution, ResolutionMap};
pub use validate::{validate_unit, ValidationOptions};
pub use verify::{ConstructorCycle, ConstructorVerifier, Dependency};
