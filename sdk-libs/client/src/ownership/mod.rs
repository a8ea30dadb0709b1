//! Observed ownership of the counter on the base and the ephemeral ledger,
//! and the actions it permits.

mod error;
mod state;
pub mod subscriber;
mod tracker;

pub use error::OwnershipError;
pub use state::{ActionGates, OwnerPrograms, OwnerTag, OwnershipState};
pub use subscriber::{spawn_counter_subscriptions, ReconnectConfig, SubscriptionHandle};
pub use tracker::{Layer, OwnershipTracker};
