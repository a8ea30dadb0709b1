use counter_delegation_sdk::error::DelegationSdkError;
use solana_client::pubsub_client::PubsubClientError;
use thiserror::Error;

use crate::rpc::RpcError;

#[derive(Error, Debug)]
pub enum OwnershipError {
    #[error("Failed to decode counter {account}: {source}")]
    CounterDecode {
        account: String,
        source: DelegationSdkError,
    },

    #[error("Invalid owner {0}")]
    InvalidOwner(String),

    #[error("Unexpected account data encoding for {0}")]
    UnexpectedEncoding(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Pubsub error: {0}")]
    Pubsub(Box<PubsubClientError>),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl From<PubsubClientError> for OwnershipError {
    fn from(e: PubsubClientError) -> Self {
        OwnershipError::Pubsub(Box::new(e))
    }
}
