use std::{
    fmt::{Debug, Display, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::rpc_connection::RpcConnectionConfig;
use crate::rpc::{errors::RpcError, rpc_connection::RpcConnection};

pub enum SolanaRpcUrl {
    Testnet,
    Devnet,
    Localnet,
    Ephemeral,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com".to_string(),
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com".to_string(),
            SolanaRpcUrl::Localnet => "http://localhost:8899".to_string(),
            SolanaRpcUrl::Ephemeral => "http://localhost:7799".to_string(),
            SolanaRpcUrl::Custom(url) => url.clone(),
        };
        write!(f, "{}", str)
    }
}

/// How long to wait for a sent transaction to reach the configured
/// commitment. The transaction itself is never resubmitted.
#[derive(Clone, Debug, Copy)]
pub struct ConfirmationConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        ConfirmationConfig {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub confirmation_config: ConfirmationConfig,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new(config: RpcConnectionConfig) -> Self {
        Self::new_with_confirmation(config, None)
    }

    pub fn new_with_confirmation(
        config: RpcConnectionConfig,
        confirmation_config: Option<ConfirmationConfig>,
    ) -> Self {
        let commitment_config = config
            .commitment_config
            .unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(config.url, commitment_config);
        Self {
            client,
            confirmation_config: confirmation_config.unwrap_or_default(),
        }
    }

    async fn wait_for_confirmation(&self, signature: Signature) -> Result<(), RpcError> {
        let start_time = Instant::now();
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(&signature, self.client.commitment())
                .await?;
            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(error)) => {
                    warn!("Transaction {} failed: {:?}", signature, error);
                    return Err(RpcError::TransactionFailed {
                        signature,
                        error: Box::new(error),
                    });
                }
                None => {
                    if start_time.elapsed() >= self.confirmation_config.timeout {
                        return Err(RpcError::TransactionNotConfirmed(signature));
                    }
                    debug!("Waiting for confirmation of {}", signature);
                    sleep(self.confirmation_config.poll_interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        let response = self
            .client
            .get_account_with_commitment(&address, self.client.commitment())
            .await?;
        Ok(response.value)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn process_transaction(&self, transaction: Transaction) -> Result<Signature, RpcError> {
        let signature = self
            .client
            .send_transaction_with_config(
                &transaction,
                RpcSendTransactionConfig {
                    skip_preflight: true,
                    preflight_commitment: Some(self.client.commitment().commitment),
                    ..Default::default()
                },
            )
            .await?;
        info!("Sent transaction {}", signature);
        self.wait_for_confirmation(signature).await?;
        Ok(signature)
    }
}
