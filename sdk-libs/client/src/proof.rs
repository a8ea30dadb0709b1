use counter_delegation_sdk::{instruction::ValidityProof, Pubkey};
use thiserror::Error;
use tracing::debug;

use crate::indexer::{Address, AddressWithTree, CompressedAccount, Indexer, IndexerError};

#[derive(Error, Debug)]
pub enum ProofError {
    #[error("Compressed delegated record not found")]
    CompressedRecordNotFound,

    #[error("Indexer returned no proof inputs for {0}")]
    MissingProofInputs(&'static str),

    #[error("Root index {0} does not fit into u16")]
    RootIndexOverflow(u64),

    #[error(transparent)]
    Indexer(#[from] IndexerError),
}

/// How the delegation record enters the delegate instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum ProofStrategy {
    /// The address is unused, the record is created.
    NewAddress { proof: ValidityProof, root_index: u16 },
    /// The record exists already and is updated in place.
    ExistingAccount {
        proof: ValidityProof,
        root_index: u16,
        prove_by_index: bool,
        leaf_index: u32,
        account: Box<CompressedAccount>,
    },
}

impl ProofStrategy {
    pub fn proof(&self) -> ValidityProof {
        match self {
            ProofStrategy::NewAddress { proof, .. } => *proof,
            ProofStrategy::ExistingAccount { proof, .. } => *proof,
        }
    }
}

fn root_index_to_u16(root_index: u64) -> Result<u16, ProofError> {
    u16::try_from(root_index).map_err(|_| ProofError::RootIndexOverflow(root_index))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclusionProof {
    pub proof: ValidityProof,
    pub root_index: u16,
    pub prove_by_index: bool,
    pub leaf_index: u32,
}

/// Fetches the inclusion proof of an existing compressed account.
pub async fn get_inclusion_proof<I: Indexer + ?Sized>(
    indexer: &I,
    account: &CompressedAccount,
) -> Result<InclusionProof, ProofError> {
    let response = indexer
        .get_validity_proof(vec![account.hash], vec![], None)
        .await?;
    let inputs = response
        .value
        .accounts
        .first()
        .ok_or(ProofError::MissingProofInputs("account"))?;
    let prove_by_index = inputs.root_index.prove_by_index || account.prove_by_index;
    let root_index = if inputs.root_index.prove_by_index {
        0
    } else {
        root_index_to_u16(inputs.root_index.root_index)?
    };
    Ok(InclusionProof {
        proof: response.value.proof,
        root_index,
        prove_by_index,
        leaf_index: account.leaf_index,
    })
}

/// Fetches the compressed delegation record at `address`.
pub async fn get_compressed_record<I: Indexer + ?Sized>(
    indexer: &I,
    address: Address,
) -> Result<CompressedAccount, ProofError> {
    match indexer.get_compressed_account(address, None).await {
        Ok(response) => response.value.ok_or(ProofError::CompressedRecordNotFound),
        Err(IndexerError::AccountNotFound) => Err(ProofError::CompressedRecordNotFound),
        Err(e) => Err(e.into()),
    }
}

/// Requests a non-inclusion proof for `address`. If the indexer reports
/// that the address is taken, the existing record is fetched and an
/// inclusion proof is returned instead.
///
/// Any other indexer error is returned unchanged.
pub async fn resolve_proof_strategy<I: Indexer + ?Sized>(
    indexer: &I,
    address: Address,
    address_tree: Pubkey,
) -> Result<ProofStrategy, ProofError> {
    let result = indexer
        .get_validity_proof(
            vec![],
            vec![AddressWithTree {
                address,
                tree: address_tree,
            }],
            None,
        )
        .await;

    match result {
        Ok(response) => {
            let inputs = response
                .value
                .addresses
                .first()
                .ok_or(ProofError::MissingProofInputs("address"))?;
            let root_index = root_index_to_u16(inputs.root_index)?;
            debug!("New address proof with root index {}", root_index);
            Ok(ProofStrategy::NewAddress {
                proof: response.value.proof,
                root_index,
            })
        }
        Err(IndexerError::AddressAlreadyExists(_)) | Err(IndexerError::AccountNotFound) => {
            debug!("Address exists, fetching the compressed delegation record");
            let account = get_compressed_record(indexer, address).await?;
            let inclusion = get_inclusion_proof(indexer, &account).await?;
            debug!(
                "Existing record proof with root index {} leaf index {}",
                inclusion.root_index, inclusion.leaf_index
            );
            Ok(ProofStrategy::ExistingAccount {
                proof: inclusion.proof,
                root_index: inclusion.root_index,
                prove_by_index: inclusion.prove_by_index,
                leaf_index: inclusion.leaf_index,
                account: Box::new(account),
            })
        }
        Err(e) => Err(e.into()),
    }
}
