use counter_delegation_sdk::{
    counter::find_counter_address,
    instruction::{get_cpi_authority_pda, TreeInfo, TreeType},
    Pubkey, ADDRESS_TREE, DEFAULT_VALIDATOR, DELEGATION_PROGRAM_ID, OUTPUT_QUEUE,
};
use thiserror::Error;

use crate::indexer::RetryConfig;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing program id: {0}")]
    MissingProgramId(&'static str),
    #[error("Invalid url for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },
}

/// Tree pair used by the deployed counter program, an address tree with the
/// output queue new state is written to.
pub fn default_address_tree() -> TreeInfo {
    TreeInfo {
        tree: ADDRESS_TREE,
        queue: OUTPUT_QUEUE,
        tree_type: TreeType::AddressV2,
        cpi_context: None,
        next_tree_info: None,
    }
}

/// Where the address tree of the delegation record comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressTreePolicy {
    Fixed(TreeInfo),
    /// Ask the indexer, use `fallback` if it reports none.
    Indexer { fallback: TreeInfo },
}

impl Default for AddressTreePolicy {
    fn default() -> Self {
        AddressTreePolicy::Fixed(default_address_tree())
    }
}

/// Where new compressed state is written to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputTreePolicy {
    /// The queue of the address tree for new records, the record's own
    /// queue for existing ones.
    #[default]
    AddressTreeQueue,
    /// The last v2 state tree the indexer reports. `batched_override` is
    /// appended to the list if the indexer does not know it yet.
    StateTrees { batched_override: Option<TreeInfo> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelegationConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub ephemeral_rpc_url: String,
    pub ephemeral_ws_url: String,
    pub indexer_url: String,
    pub indexer_api_key: Option<String>,
    pub counter_program_id: Pubkey,
    pub compressed_delegation_program_id: Pubkey,
    pub delegation_program_id: Pubkey,
    pub validator: Pubkey,
    pub address_tree: AddressTreePolicy,
    pub output_tree: OutputTreePolicy,
    pub retry_config: RetryConfig,
    pub cluster: String,
}

impl DelegationConfig {
    pub fn new(counter_program_id: Pubkey, compressed_delegation_program_id: Pubkey) -> Self {
        Self {
            rpc_url: "http://localhost:8899".to_string(),
            ws_url: "ws://localhost:8900".to_string(),
            ephemeral_rpc_url: "http://localhost:7799".to_string(),
            ephemeral_ws_url: "ws://localhost:7800".to_string(),
            indexer_url: "http://localhost:8784".to_string(),
            indexer_api_key: None,
            counter_program_id,
            compressed_delegation_program_id,
            delegation_program_id: DELEGATION_PROGRAM_ID,
            validator: DEFAULT_VALIDATOR,
            address_tree: AddressTreePolicy::default(),
            output_tree: OutputTreePolicy::default(),
            retry_config: RetryConfig::default(),
            cluster: "custom".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counter_program_id == Pubkey::default() {
            return Err(ConfigError::MissingProgramId("counter program"));
        }
        if self.compressed_delegation_program_id == Pubkey::default() {
            return Err(ConfigError::MissingProgramId("compressed delegation program"));
        }
        for (field, url, schemes) in [
            ("rpc_url", &self.rpc_url, ["http://", "https://"]),
            ("ephemeral_rpc_url", &self.ephemeral_rpc_url, ["http://", "https://"]),
            ("indexer_url", &self.indexer_url, ["http://", "https://"]),
            ("ws_url", &self.ws_url, ["ws://", "wss://"]),
            ("ephemeral_ws_url", &self.ephemeral_ws_url, ["ws://", "wss://"]),
        ] {
            if !schemes.iter().any(|scheme| url.starts_with(scheme)) {
                return Err(ConfigError::InvalidUrl {
                    field,
                    url: url.clone(),
                });
            }
        }
        Ok(())
    }

    /// The counter PDA, identical on every layer.
    pub fn counter_address(&self) -> Pubkey {
        find_counter_address(&self.counter_program_id).0
    }

    pub fn compressed_delegation_cpi_signer(&self) -> Pubkey {
        get_cpi_authority_pda(&self.compressed_delegation_program_id)
    }
}
