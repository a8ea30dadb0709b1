//! JSON-RPC request and response models of the Photon indexer API.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JsonRpcRequest<P> {
    pub id: String,
    pub jsonrpc: String,
    pub method: String,
    pub params: P,
}

impl<P> JsonRpcRequest<P> {
    pub fn new(method: &str, params: P) -> Self {
        Self {
            id: "test-account".to_string(),
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
pub struct Context {
    pub slot: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ContextResult<T> {
    pub context: Context,
    pub value: T,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct GetCompressedAccountParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AddressWithTree {
    pub address: String,
    pub tree: String,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct GetValidityProofParams {
    pub hashes: Vec<String>,
    #[serde(rename = "newAddressesWithTrees")]
    pub new_addresses_with_trees: Vec<AddressWithTree>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct GetQueueInfoParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trees: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TreeContextInfo {
    #[serde(rename = "cpiContext", default)]
    pub cpi_context: Option<String>,
    pub queue: String,
    pub tree: String,
    #[serde(rename = "treeType")]
    pub tree_type: u16,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MerkleContextV2 {
    #[serde(rename = "cpiContext", default)]
    pub cpi_context: Option<String>,
    #[serde(rename = "nextTreeContext", default)]
    pub next_tree_context: Option<TreeContextInfo>,
    pub queue: String,
    pub tree: String,
    #[serde(rename = "treeType")]
    pub tree_type: u16,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AccountData {
    pub data: String,
    #[serde(rename = "dataHash")]
    pub data_hash: String,
    pub discriminator: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AccountV2 {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub data: Option<AccountData>,
    pub hash: String,
    pub lamports: u64,
    #[serde(rename = "leafIndex")]
    pub leaf_index: u64,
    #[serde(rename = "merkleContext")]
    pub merkle_context: MerkleContextV2,
    pub owner: String,
    #[serde(rename = "proveByIndex")]
    pub prove_by_index: bool,
    #[serde(default)]
    pub seq: Option<u64>,
    #[serde(rename = "slotCreated")]
    pub slot_created: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CompressedProof {
    pub a: Vec<u8>,
    pub b: Vec<u8>,
    pub c: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RootIndex {
    #[serde(rename = "rootIndex")]
    pub root_index: u64,
    #[serde(rename = "proveByIndex")]
    pub prove_by_index: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AccountProofInputs {
    pub hash: String,
    pub root: String,
    #[serde(rename = "rootIndex")]
    pub root_index: RootIndex,
    #[serde(rename = "merkleContext")]
    pub merkle_context: MerkleContextV2,
    #[serde(rename = "leafIndex")]
    pub leaf_index: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AddressProofInputs {
    pub address: String,
    pub root: String,
    #[serde(rename = "rootIndex")]
    pub root_index: u64,
    #[serde(rename = "merkleContext")]
    pub merkle_context: MerkleContextV2,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CompressedProofWithContextV2 {
    #[serde(rename = "compressedProof", default)]
    pub compressed_proof: Option<CompressedProof>,
    #[serde(default)]
    pub accounts: Vec<AccountProofInputs>,
    #[serde(default)]
    pub addresses: Vec<AddressProofInputs>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueueInfo {
    pub tree: String,
    pub queue: String,
    #[serde(rename = "queueType")]
    pub queue_type: u8,
    #[serde(rename = "queueSize", default)]
    pub queue_size: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GetQueueInfoResult {
    pub queues: Vec<QueueInfo>,
    pub slot: u64,
}
