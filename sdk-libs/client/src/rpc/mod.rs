pub mod errors;
pub mod rpc_connection;
pub mod signature;
pub mod solana_rpc;

pub use errors::RpcError;
pub use rpc_connection::{RpcConnection, RpcConnectionConfig};
pub use signature::{build_explorer_url, extract_transaction_signature};
pub use solana_rpc::{ConfirmationConfig, SolanaRpcConnection, SolanaRpcUrl};
