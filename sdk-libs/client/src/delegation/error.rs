use counter_delegation_sdk::error::DelegationSdkError;
use thiserror::Error;

use crate::{indexer::IndexerError, proof::ProofError, rpc::RpcError};

#[derive(Error, Debug)]
pub enum DelegationError {
    #[error("Payer not set")]
    MissingPayer,

    #[error("Counter not set")]
    MissingCounter,

    #[error("Validator not set")]
    MissingValidator,

    #[error("No v2 state tree available for output state")]
    NoStateTree,

    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Sdk(#[from] DelegationSdkError),
}

impl DelegationError {
    /// True for errors raised before any request was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DelegationError::MissingPayer
                | DelegationError::MissingCounter
                | DelegationError::MissingValidator
        )
    }
}
