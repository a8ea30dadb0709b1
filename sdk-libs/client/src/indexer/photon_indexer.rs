use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use counter_delegation_sdk::instruction::{TreeInfo, TreeType};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, trace, warn};

use super::{
    photon_models::{
        self, ContextResult, GetCompressedAccountParams, GetQueueInfoParams, GetQueueInfoResult,
        GetValidityProofParams, JsonRpcRequest, JsonRpcResponse,
    },
    types::{tree_type_from_queue_type, CompressedAccount, ValidityProofWithContext},
};
use crate::indexer::{
    base58::{decode_base58_to_pubkey, Base58Conversions},
    config::RetryConfig,
    response::{Context, Response},
    Address, AddressWithTree, Hash, Indexer, IndexerError, IndexerRpcConfig,
};

pub struct PhotonIndexer {
    client: reqwest::Client,
    base_path: String,
    api_key: Option<String>,
    retry_config: RetryConfig,
}

impl PhotonIndexer {
    pub fn default_path() -> String {
        "http://127.0.0.1:8784".to_string()
    }

    pub fn new(path: String, api_key: Option<String>) -> Self {
        Self::new_with_client(reqwest::Client::new(), path, api_key)
    }

    pub fn new_with_client(client: reqwest::Client, path: String, api_key: Option<String>) -> Self {
        PhotonIndexer {
            client,
            base_path: path.trim_end_matches('/').to_string(),
            api_key,
            retry_config: RetryConfig::default(),
        }
    }

    /// Retry behaviour of calls made without an explicit [`IndexerRpcConfig`].
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn rpc_config(&self, config: Option<IndexerRpcConfig>) -> IndexerRpcConfig {
        config.unwrap_or_else(|| IndexerRpcConfig {
            slot: 0,
            retry_config: self.retry_config.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        match &self.api_key {
            Some(key) => format!("{}/{}?api-key={}", self.base_path, method, key),
            None => format!("{}/{}", self.base_path, method),
        }
    }

    async fn retry<F, Fut, T>(
        &self,
        config: RetryConfig,
        mut operation: F,
    ) -> Result<T, IndexerError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, IndexerError>>,
    {
        let max_retries = config.num_retries;
        let mut attempts = 0;
        let mut delay_ms = config.delay_ms;
        let max_delay_ms = config.max_delay_ms;

        loop {
            attempts += 1;

            trace!("Attempt {}/{}: Executing operation", attempts, max_retries);
            let result = operation().await;

            match result {
                Ok(value) => {
                    trace!("Attempt {}/{}: Operation succeeded.", attempts, max_retries);
                    return Ok(value);
                }
                Err(e) => {
                    let is_retryable = e.is_retryable();
                    if is_retryable {
                        warn!("Operation failed, checking if retryable: {}", e);
                    }

                    if is_retryable && attempts < max_retries {
                        warn!(
                            "Attempt {}/{}: Operation failed. Retrying",
                            attempts, max_retries
                        );

                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = std::cmp::min(delay_ms * 2, max_delay_ms);
                    } else {
                        if is_retryable {
                            error!("Operation failed after max retries.");
                        } else {
                            debug!("Operation failed with non-retryable error: {}", e);
                        }
                        return Err(e);
                    }
                }
            }
        }
    }

    /// Posts a single JSON-RPC request and unwraps its result.
    async fn send_request<P, R>(&self, method: &str, params: P) -> Result<R, IndexerError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest::new(method, params);
        let response = self
            .client
            .post(self.method_url(method))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexerError::PhotonError {
                context: method.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let response: JsonRpcResponse<R> = response.json().await?;
        Self::extract_result_with_error_check(method, response)
    }

    fn extract_result_with_error_check<R>(
        context: &str,
        response: JsonRpcResponse<R>,
    ) -> Result<R, IndexerError> {
        if let Some(error) = response.error {
            let message = error
                .message
                .unwrap_or_else(|| "Unknown API error".to_string());
            return Err(IndexerError::from_api_message(context, error.code, message));
        }

        response
            .result
            .ok_or_else(|| IndexerError::missing_result(context, "value not present"))
    }

    fn build_account_params(
        &self,
        address: Option<Address>,
        hash: Option<Hash>,
    ) -> Result<GetCompressedAccountParams, IndexerError> {
        match (address, hash) {
            (None, None) => Err(IndexerError::InvalidParameters(
                "Either address or hash must be provided".to_string(),
            )),
            (Some(_), Some(_)) => Err(IndexerError::InvalidParameters(
                "Only one of address or hash must be provided".to_string(),
            )),
            (address, hash) => Ok(GetCompressedAccountParams {
                address: address.map(|x| x.to_base58()),
                hash: hash.map(|x| x.to_base58()),
            }),
        }
    }

    async fn get_compressed_account_with_params(
        &self,
        context: &'static str,
        address: Option<Address>,
        hash: Option<Hash>,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError> {
        let config = self.rpc_config(config);
        self.retry(config.retry_config, || async {
            let params = self.build_account_params(address, hash)?;
            let api_response: ContextResult<Option<photon_models::AccountV2>> =
                self.send_request("getCompressedAccountV2", params).await?;
            if api_response.context.slot < config.slot {
                return Err(IndexerError::IndexerNotSyncedToSlot);
            }
            let account = api_response
                .value
                .as_ref()
                .map(CompressedAccount::try_from)
                .transpose()?;
            trace!("{}: found account: {}", context, account.is_some());

            Ok(Response {
                context: Context {
                    slot: api_response.context.slot,
                },
                value: account,
            })
        })
        .await
    }

    async fn get_queue_info(
        &self,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Vec<TreeInfo>, IndexerError> {
        let config = self.rpc_config(config);
        self.retry(config.retry_config, || async {
            let result: GetQueueInfoResult = self
                .send_request("getQueueInfo", GetQueueInfoParams::default())
                .await?;
            if result.slot < config.slot {
                return Err(IndexerError::IndexerNotSyncedToSlot);
            }
            let trees: Result<Vec<TreeInfo>, IndexerError> = result
                .queues
                .iter()
                .filter_map(|queue| {
                    tree_type_from_queue_type(queue.queue_type).map(|tree_type| (queue, tree_type))
                })
                .map(|(queue, tree_type)| {
                    Ok(TreeInfo {
                        tree: decode_base58_to_pubkey(&queue.tree)?,
                        queue: decode_base58_to_pubkey(&queue.queue)?,
                        tree_type,
                        cpi_context: None,
                        next_tree_info: None,
                    })
                })
                .collect();
            trees
        })
        .await
    }
}

impl Debug for PhotonIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotonIndexer")
            .field("base_path", &self.base_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

#[async_trait]
impl Indexer for PhotonIndexer {
    async fn get_compressed_account(
        &self,
        address: Address,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError> {
        self.get_compressed_account_with_params(
            "get_compressed_account",
            Some(address),
            None,
            config,
        )
        .await
    }

    async fn get_compressed_account_by_hash(
        &self,
        hash: Hash,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError> {
        self.get_compressed_account_with_params(
            "get_compressed_account_by_hash",
            None,
            Some(hash),
            config,
        )
        .await
    }

    async fn get_validity_proof(
        &self,
        hashes: Vec<Hash>,
        new_addresses_with_trees: Vec<AddressWithTree>,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Response<ValidityProofWithContext>, IndexerError> {
        let config = self.rpc_config(config);
        self.retry(config.retry_config, || async {
            let params = GetValidityProofParams {
                hashes: hashes.iter().map(|x| x.to_base58()).collect(),
                new_addresses_with_trees: new_addresses_with_trees
                    .iter()
                    .map(|x| photon_models::AddressWithTree {
                        address: x.address.to_base58(),
                        tree: x.tree.to_string(),
                    })
                    .collect(),
            };

            let api_response: ContextResult<photon_models::CompressedProofWithContextV2> =
                self.send_request("getValidityProofV2", params).await?;
            if api_response.context.slot < config.slot {
                return Err(IndexerError::IndexerNotSyncedToSlot);
            }
            let validity_proof = ValidityProofWithContext::from_api_model_v2(&api_response.value)?;

            Ok(Response {
                context: Context {
                    slot: api_response.context.slot,
                },
                value: validity_proof,
            })
        })
        .await
    }

    async fn get_address_tree_info(
        &self,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Option<TreeInfo>, IndexerError> {
        let trees = self.get_queue_info(config).await?;
        Ok(trees
            .into_iter()
            .rev()
            .find(|tree| tree.tree_type == TreeType::AddressV2))
    }

    async fn get_state_tree_infos(
        &self,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Vec<TreeInfo>, IndexerError> {
        let trees = self.get_queue_info(config).await?;
        Ok(trees
            .into_iter()
            .filter(|tree| tree.tree_type.is_state())
            .collect())
    }
}
