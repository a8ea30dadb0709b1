//! Client for moving the counter between the base ledger, a compressed
//! delegation record and the ephemeral layer.
//!
//! ```text
//!  ├─ indexer     Photon JSON-RPC client, validity proofs and tree infos
//!  ├─ rpc         Solana RPC, submission and confirmation
//!  ├─ proof       new address or existing record proof strategy
//!  ├─ delegation  instruction builder for the delegation lifecycle
//!  └─ ownership   observed owners, action gates and subscriptions
//! ```

pub mod config;
pub mod delegation;
pub mod indexer;
pub mod ownership;
pub mod proof;
pub mod rpc;

pub use config::{AddressTreePolicy, DelegationConfig, OutputTreePolicy};
pub use counter_delegation_sdk;
