pub mod photon_indexer;

mod base58;
mod config;
mod error;
mod indexer_trait;
pub(crate) mod photon_models;
mod response;
mod types;

pub use base58::{decode_base58_to_fixed_array, Base58Conversions};
pub use config::{IndexerRpcConfig, RetryConfig};
pub use error::IndexerError;
pub use indexer_trait::Indexer;
pub use photon_indexer::PhotonIndexer;
pub use response::{Context, Response};
pub use types::{
    AccountProofInputs, Address, AddressProofInputs, AddressWithTree, CompressedAccount,
    CompressedAccountData, Hash, RootIndex, ValidityProofWithContext,
};
