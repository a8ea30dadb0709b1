use std::{path::PathBuf, str::FromStr};

use counter_delegation_client::{
    config::{default_address_tree, ConfigError as ClientConfigError},
    indexer::RetryConfig,
    AddressTreePolicy, DelegationConfig, OutputTreePolicy,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};
use thiserror::Error;

use crate::cli::GlobalArgs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid pubkey: {field} - {error}")]
    InvalidPubkey { field: &'static str, error: String },

    #[error("Invalid keypair {path}: {error}")]
    InvalidKeypair { path: String, error: String },

    #[error(transparent)]
    Client(#[from] ClientConfigError),
}

fn parse_pubkey(field: &'static str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value).map_err(|e| ConfigError::InvalidPubkey {
        field,
        error: e.to_string(),
    })
}

fn required_pubkey(field: &'static str, value: &Option<String>) -> Result<Pubkey, ConfigError> {
    let value = value.as_deref().ok_or(ConfigError::MissingField { field })?;
    parse_pubkey(field, value)
}

impl GlobalArgs {
    pub fn delegation_config(&self) -> Result<DelegationConfig, ConfigError> {
        let mut config = DelegationConfig::new(
            required_pubkey("counter_program_id", &self.counter_program_id)?,
            required_pubkey(
                "compressed_delegation_program_id",
                &self.compressed_delegation_program_id,
            )?,
        );
        config.rpc_url = self.rpc_url.clone();
        config.ws_url = self.ws_url.clone();
        config.ephemeral_rpc_url = self.ephemeral_rpc_url.clone();
        config.ephemeral_ws_url = self.ephemeral_ws_url.clone();
        config.indexer_url = self.indexer_url.clone();
        config.indexer_api_key = self.indexer_api_key.clone();
        if let Some(validator) = &self.validator {
            config.validator = parse_pubkey("validator", validator)?;
        }
        if self.address_tree_from_indexer {
            config.address_tree = AddressTreePolicy::Indexer {
                fallback: default_address_tree(),
            };
        }
        if self.output_to_state_tree {
            config.output_tree = OutputTreePolicy::StateTrees {
                batched_override: None,
            };
        }
        config.retry_config = RetryConfig {
            num_retries: self.indexer_max_retries,
            ..Default::default()
        };
        config.cluster = self.cluster.clone();
        config.validate()?;
        Ok(config)
    }

    pub fn keypair_path(&self) -> PathBuf {
        match &self.keypair {
            Some(path) => PathBuf::from(path),
            None => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".config/solana/id.json")
            }
        }
    }

    pub fn payer(&self) -> Result<Keypair, ConfigError> {
        let path = self.keypair_path();
        read_keypair_file(&path).map_err(|e| ConfigError::InvalidKeypair {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}
