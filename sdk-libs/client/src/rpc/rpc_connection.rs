use std::fmt::Debug;

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

use crate::rpc::errors::RpcError;

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: String,
    pub commitment_config: Option<CommitmentConfig>,
}

impl RpcConnectionConfig {
    pub fn new(url: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            commitment_config: Some(CommitmentConfig::confirmed()),
        }
    }
}

#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_url(&self) -> String;

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Sends a signed transaction and waits until it is confirmed. A
    /// transaction that lands but fails is returned as
    /// [`RpcError::TransactionFailed`].
    async fn process_transaction(&self, transaction: Transaction) -> Result<Signature, RpcError>;

    async fn create_and_send_transaction<'a>(
        &'a self,
        instructions: &'a [Instruction],
        payer: &'a Pubkey,
        signers: &'a [&'a Keypair],
    ) -> Result<Signature, RpcError> {
        let blockhash = self.get_latest_blockhash().await?;
        let transaction =
            Transaction::new_signed_with_payer(instructions, Some(payer), signers, blockhash);
        self.process_transaction(transaction).await
    }
}
