//! Resolver code generation.
//!
//! [`ResolverPlan::build`] turns a finalized resolution map and the
//! constructor verifier into a constructor table plus dispatch branches.
//! The plan is then either rendered as a Rust module ([`emit_rust`]) or
//! executed in-process ([`PlanContainer`]). Both follow the same rules:
//!
//! - every id sharing a concrete and lifetime dispatches through one branch;
//! - a singleton is cached under its concrete's id, so all aliases share it;
//! - an id without a branch fails at resolve time with
//!   [`ResolveError::Unknown`](tether_runtime::ResolveError::Unknown).

mod emit;
mod interpret;
mod plan;

pub use emit::{emit_rust, module_path, EmitOptions};
pub use interpret::{ConstructorFn, PlanContainer};
pub use plan::{Branch, ResolverPlan, TableEntry};
