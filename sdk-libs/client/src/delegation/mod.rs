//! Builds the instructions of the delegation lifecycle.
//!
//! ```text
//! base counter ── delegate ──> compressed record + ephemeral counter
//! ephemeral counter ── schedule_undelegate ──> commit
//! compressed record ── undelegate ──> base counter
//! ```

mod builder;
mod error;
pub mod tree;

pub use builder::{BuiltDelegation, DelegationInstructionBuilder};
pub use error::DelegationError;
