use std::{fmt::Debug, io};

use solana_client::client_error::ClientError;
use solana_sdk::{signature::Signature, transaction::TransactionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("TransactionError: {0}")]
    TransactionError(#[from] Box<TransactionError>),

    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("IoError: {0}")]
    IoError(#[from] Box<io::Error>),

    /// The transaction landed but failed on chain.
    #[error("Transaction {signature} failed: {error}")]
    TransactionFailed {
        signature: Signature,
        error: Box<TransactionError>,
    },

    #[error("Transaction {0} was not confirmed")]
    TransactionNotConfirmed(Signature),

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl RpcError {
    /// Signature of the submitted transaction, if the error carries one.
    pub fn signature(&self) -> Option<Signature> {
        match self {
            RpcError::TransactionFailed { signature, .. } => Some(*signature),
            RpcError::TransactionNotConfirmed(signature) => Some(*signature),
            _ => super::signature::extract_transaction_signature(&self.to_string()),
        }
    }
}

impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        RpcError::TransactionError(Box::new(err))
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        RpcError::ClientError(Box::new(err))
    }
}

impl From<io::Error> for RpcError {
    fn from(err: io::Error) -> Self {
        RpcError::IoError(Box::new(err))
    }
}
