#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use counter_delegation_client::{
    indexer::{
        AccountProofInputs, Address, AddressProofInputs, AddressWithTree, CompressedAccount,
        CompressedAccountData, Context, Hash, Indexer, IndexerError, IndexerRpcConfig, Response,
        RootIndex, ValidityProofWithContext,
    },
    rpc::{RpcConnection, RpcError},
};
use counter_delegation_sdk::{
    counter::Counter,
    instruction::{CompressedProof, TreeInfo, TreeType, ValidityProof},
    Pubkey,
};
use solana_sdk::{
    account::Account, hash::Hash as BlockHash, signature::Signature, transaction::Transaction,
};

/// How the stub answers a non-inclusion proof request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewAddressBehavior {
    Proof { root_index: u64 },
    AlreadyExists,
    ApiError,
}

#[derive(Debug)]
pub struct StubIndexer {
    pub new_address: NewAddressBehavior,
    pub record: Option<CompressedAccount>,
    pub inclusion_root_index: u64,
    pub inclusion_prove_by_index: bool,
    pub address_tree_info: Option<TreeInfo>,
    pub state_trees: Vec<TreeInfo>,
    pub calls: AtomicUsize,
    pub requested_addresses: Mutex<Vec<AddressWithTree>>,
}

impl StubIndexer {
    pub fn new(new_address: NewAddressBehavior) -> Self {
        Self {
            new_address,
            record: None,
            inclusion_root_index: 0,
            inclusion_prove_by_index: false,
            address_tree_info: None,
            state_trees: vec![],
            calls: AtomicUsize::new(0),
            requested_addresses: Mutex::new(vec![]),
        }
    }

    pub fn with_record(mut self, record: CompressedAccount, inclusion_root_index: u64) -> Self {
        self.record = Some(record);
        self.inclusion_root_index = inclusion_root_index;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn track(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn proof() -> ValidityProof {
    ValidityProof::new(Some(CompressedProof {
        a: [1; 32],
        b: [2; 64],
        c: [3; 32],
    }))
}

fn response<T>(value: T) -> Response<T> {
    Response {
        context: Context { slot: 1 },
        value,
    }
}

#[async_trait]
impl Indexer for StubIndexer {
    async fn get_compressed_account(
        &self,
        address: Address,
        _config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError> {
        self.track();
        let record = self
            .record
            .clone()
            .filter(|record| record.address == Some(address));
        Ok(response(record))
    }

    async fn get_compressed_account_by_hash(
        &self,
        hash: Hash,
        _config: Option<IndexerRpcConfig>,
    ) -> Result<Response<Option<CompressedAccount>>, IndexerError> {
        self.track();
        let record = self.record.clone().filter(|record| record.hash == hash);
        Ok(response(record))
    }

    async fn get_validity_proof(
        &self,
        hashes: Vec<Hash>,
        new_addresses_with_trees: Vec<AddressWithTree>,
        _config: Option<IndexerRpcConfig>,
    ) -> Result<Response<ValidityProofWithContext>, IndexerError> {
        self.track();
        if !hashes.is_empty() {
            let record = self.record.clone().ok_or(IndexerError::AccountNotFound)?;
            return Ok(response(ValidityProofWithContext {
                proof: proof(),
                accounts: vec![AccountProofInputs {
                    hash: hashes[0],
                    root: [0; 32],
                    root_index: RootIndex {
                        root_index: self.inclusion_root_index,
                        prove_by_index: self.inclusion_prove_by_index,
                    },
                    leaf_index: record.leaf_index as u64,
                    tree_info: record.tree_info,
                }],
                addresses: vec![],
            }));
        }

        self.requested_addresses
            .lock()
            .unwrap()
            .extend(new_addresses_with_trees.iter().copied());
        match self.new_address {
            NewAddressBehavior::Proof { root_index } => Ok(response(ValidityProofWithContext {
                proof: proof(),
                accounts: vec![],
                addresses: new_addresses_with_trees
                    .iter()
                    .map(|address| AddressProofInputs {
                        address: address.address,
                        root: [0; 32],
                        root_index,
                        tree_info: TreeInfo {
                            tree: address.tree,
                            tree_type: TreeType::AddressV2,
                            ..Default::default()
                        },
                    })
                    .collect(),
            })),
            NewAddressBehavior::AlreadyExists => Err(IndexerError::AddressAlreadyExists(
                "Address already exists".to_string(),
            )),
            NewAddressBehavior::ApiError => Err(IndexerError::ApiError(
                "API error in get_validity_proof (code: Some(-32000)): boom".to_string(),
            )),
        }
    }

    async fn get_address_tree_info(
        &self,
        _config: Option<IndexerRpcConfig>,
    ) -> Result<Option<TreeInfo>, IndexerError> {
        self.track();
        Ok(self.address_tree_info)
    }

    async fn get_state_tree_infos(
        &self,
        _config: Option<IndexerRpcConfig>,
    ) -> Result<Vec<TreeInfo>, IndexerError> {
        self.track();
        Ok(self.state_trees.clone())
    }
}

#[derive(Debug, Default)]
pub struct StubRpc {
    pub accounts: Mutex<HashMap<Pubkey, Account>>,
    pub calls: AtomicUsize,
}

impl StubRpc {
    pub fn with_account(self, address: Pubkey, account: Account) -> Self {
        self.accounts.lock().unwrap().insert(address, account);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcConnection for StubRpc {
    fn get_url(&self) -> String {
        "http://stub".to_string()
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().get(&address).cloned())
    }

    async fn get_latest_blockhash(&self) -> Result<BlockHash, RpcError> {
        Ok(BlockHash::default())
    }

    async fn process_transaction(&self, transaction: Transaction) -> Result<Signature, RpcError> {
        Ok(transaction.signatures[0])
    }
}

pub fn counter_account(owner: Pubkey, count: u64) -> Account {
    Account {
        lamports: 1_000_000,
        data: Counter { count }.to_account_data(),
        owner,
        executable: false,
        rent_epoch: 0,
    }
}

pub fn delegation_record(address: Address, leaf_index: u32, tree_info: TreeInfo) -> CompressedAccount {
    CompressedAccount {
        address: Some(address),
        data: Some(CompressedAccountData {
            discriminator: [7; 8],
            data: vec![9, 8, 7, 6],
            data_hash: [5; 32],
        }),
        hash: [4; 32],
        lamports: 0,
        leaf_index,
        owner: Pubkey::new_unique(),
        prove_by_index: false,
        seq: Some(1),
        slot_created: 1,
        tree_info,
    }
}
