//! # Overview
//!
//! Types and utilities for building the counter program instructions that
//! move the counter between the base ledger, compressed state and the
//! ephemeral layer:
//! ```text
//!  ├─ Resolve the address tree and derive the compressed address.
//!  ├─ Get a ValidityProof from the indexer.
//!  ├─ Pack trees and queues with PackedAccounts into PackedAddressTreeInfo
//!  │  or CompressedAccountMeta.
//!  ├─ Build the Instruction from the fixed accounts and the packed tail.
//!  └─ Send transaction
//! ```
//! ## Main Types
//!
//! - [`PackedAccounts`] - Packs accounts and creates indices for instruction building.
//! - [`SystemAccountMetaConfig`] - Configures which Light system program accounts to add to [`PackedAccounts`].
//! - [`PackedAddressTreeInfo`] - Indices of address tree and queue accounts.
//! - [`PackedStateTreeInfo`] - Indices of state tree and queue accounts.
//! - [`CompressedAccountMeta`] - Metadata of an existing compressed account.
//!
//! ## Packed Structs Pattern
//!
//! Structs prefixed with `Packed` contain account **indices** instead of
//! **pubkeys** to reduce instruction size. The indices are only meaningful
//! together with the [`PackedAccounts`] that produced them.

mod account_meta;
pub mod counter_program;
mod pack_accounts;
mod system_accounts;
mod tree_info;

pub use account_meta::*;
pub use pack_accounts::*;
pub use system_accounts::*;
pub use tree_info::*;

pub use crate::proof::{CompressedProof, ValidityProof};
