use counter_delegation_sdk::error::DelegationSdkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Photon API error in {context}: {message}")]
    PhotonError { context: String, message: String },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Missing result from {context}: {message}")]
    MissingResult { context: String, message: String },

    #[error("Account not found")]
    AccountNotFound,

    #[error("Address already exists: {0}")]
    AddressAlreadyExists(String),

    #[error("Base58 decode error: {field} - {message}")]
    Base58DecodeError { field: String, message: String },

    #[error("Base64 decode error: {0}")]
    Base64DecodeError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid response data")]
    InvalidResponseData,

    #[error("Invalid proof: {0}")]
    InvalidProof(#[from] DelegationSdkError),

    #[error("Indexer not synced to slot")]
    IndexerNotSyncedToSlot,
}

impl IndexerError {
    pub fn missing_result(context: &str, message: &str) -> Self {
        Self::MissingResult {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    pub fn base58_decode_error(field: &str, error: impl std::fmt::Display) -> Self {
        Self::Base58DecodeError {
            field: field.to_string(),
            message: error.to_string(),
        }
    }

    /// Maps a JSON-RPC error to the typed signals callers branch on.
    ///
    /// Errors carrying a reserved JSON-RPC protocol code (parse error,
    /// invalid request, method not found, invalid params, internal error)
    /// describe the call itself, never the queried account, and always map
    /// to [`IndexerError::ApiError`].
    pub fn from_api_message(context: &str, code: Option<i64>, message: String) -> Self {
        let lowercase = message.to_lowercase();
        if code.is_some_and(is_reserved_json_rpc_code) {
            Self::ApiError(format!(
                "API error in {} (code: {:?}): {}",
                context, code, message
            ))
        } else if lowercase.contains("already exists") {
            Self::AddressAlreadyExists(message)
        } else if lowercase.contains("not found") {
            Self::AccountNotFound
        } else {
            Self::ApiError(format!(
                "API error in {} (code: {:?}): {}",
                context, code, message
            ))
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            IndexerError::ApiError(_)
                | IndexerError::PhotonError { .. }
                | IndexerError::TransportError(_)
                | IndexerError::IndexerNotSyncedToSlot
        )
    }
}

/// Error codes defined by the JSON-RPC 2.0 specification itself.
fn is_reserved_json_rpc_code(code: i64) -> bool {
    matches!(code, -32700 | -32603..=-32600)
}

impl From<reqwest::Error> for IndexerError {
    fn from(error: reqwest::Error) -> Self {
        IndexerError::TransportError(error.to_string())
    }
}

impl From<base64::DecodeError> for IndexerError {
    fn from(error: base64::DecodeError) -> Self {
        IndexerError::Base64DecodeError(error.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_api_message() {
        assert!(matches!(
            IndexerError::from_api_message(
                "get_validity_proof_v2",
                Some(-32000),
                "Address already exists in tree".to_string()
            ),
            IndexerError::AddressAlreadyExists(_)
        ));
        assert!(matches!(
            IndexerError::from_api_message("get_compressed_account_v2", None, "Account Not Found".into()),
            IndexerError::AccountNotFound
        ));
        let other = IndexerError::from_api_message("get_queue_info", Some(-32603), "boom".into());
        assert!(matches!(other, IndexerError::ApiError(_)));
        assert!(other.is_retryable());
        assert!(!IndexerError::AccountNotFound.is_retryable());
        assert!(!IndexerError::AddressAlreadyExists(String::new()).is_retryable());
    }

    #[test]
    fn test_protocol_errors_never_map_to_account_signals() {
        for code in [-32700, -32600, -32601, -32602, -32603] {
            for message in ["Method not found", "Address already exists"] {
                let error =
                    IndexerError::from_api_message("get_validity_proof_v2", Some(code), message.into());
                assert!(
                    matches!(error, IndexerError::ApiError(_)),
                    "code {} message {:?} mapped to {:?}",
                    code,
                    message,
                    error
                );
            }
        }
        assert!(matches!(
            IndexerError::from_api_message("get_compressed_account_v2", Some(-32000), "Account not found".into()),
            IndexerError::AccountNotFound
        ));
    }
}
