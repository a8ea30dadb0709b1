use async_trait::async_trait;
use counter_delegation_sdk::instruction::TreeInfo;

use super::{
    types::{CompressedAccount, ValidityProofWithContext},
    Address, AddressWithTree, Hash, IndexerError, IndexerRpcConfig, Response,
};

/// Read access to compressed state and the prover.
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn get_compressed_account(
        &self,
        address: Address,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError>;

    async fn get_compressed_account_by_hash(
        &self,
        hash: Hash,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError>;

    /// Returns a proof for the inclusion of `hashes` and the non-inclusion
    /// of `new_addresses_with_trees`.
    async fn get_validity_proof(
        &self,
        hashes: Vec<Hash>,
        new_addresses_with_trees: Vec<AddressWithTree>,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<ValidityProofWithContext>, IndexerError>;

    /// The address tree new addresses should be created in, if the indexer
    /// knows of one.
    async fn get_address_tree_info(
        &self,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Option<TreeInfo>, IndexerError>;

    async fn get_state_tree_infos(
        &self,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Vec<TreeInfo>, IndexerError>;
}
