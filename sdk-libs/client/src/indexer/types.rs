use counter_delegation_sdk::{
    instruction::{CompressedProof, NextTreeInfo, TreeInfo, TreeType, ValidityProof},
    Pubkey,
};

use super::{
    base58::{decode_base58_option_to_pubkey, decode_base58_to_fixed_array, decode_base58_to_pubkey},
    photon_models, IndexerError,
};

pub type Hash = [u8; 32];
pub type Address = [u8; 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWithTree {
    pub address: Address,
    pub tree: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressedAccountData {
    pub discriminator: [u8; 8],
    pub data: Vec<u8>,
    pub data_hash: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompressedAccount {
    pub address: Option<Address>,
    pub data: Option<CompressedAccountData>,
    pub hash: Hash,
    pub lamports: u64,
    pub leaf_index: u32,
    pub owner: Pubkey,
    pub prove_by_index: bool,
    pub seq: Option<u64>,
    pub slot_created: u64,
    pub tree_info: TreeInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootIndex {
    pub root_index: u64,
    pub prove_by_index: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountProofInputs {
    pub hash: Hash,
    pub root: [u8; 32],
    pub root_index: RootIndex,
    pub leaf_index: u64,
    pub tree_info: TreeInfo,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressProofInputs {
    pub address: Address,
    pub root: [u8; 32],
    pub root_index: u64,
    pub tree_info: TreeInfo,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidityProofWithContext {
    pub proof: ValidityProof,
    pub accounts: Vec<AccountProofInputs>,
    pub addresses: Vec<AddressProofInputs>,
}

fn tree_info_from_context(
    context: &photon_models::MerkleContextV2,
) -> Result<TreeInfo, IndexerError> {
    Ok(TreeInfo {
        tree_type: TreeType::from(context.tree_type as u64),
        tree: decode_base58_to_pubkey(&context.tree)?,
        queue: decode_base58_to_pubkey(&context.queue)?,
        cpi_context: decode_base58_option_to_pubkey(&context.cpi_context)?,
        next_tree_info: context
            .next_tree_context
            .as_ref()
            .map(|next| {
                Ok::<_, IndexerError>(NextTreeInfo {
                    tree_type: TreeType::from(next.tree_type as u64),
                    tree: decode_base58_to_pubkey(&next.tree)?,
                    queue: decode_base58_to_pubkey(&next.queue)?,
                    cpi_context: decode_base58_option_to_pubkey(&next.cpi_context)?,
                })
            })
            .transpose()?,
    })
}

impl TryFrom<&photon_models::AccountV2> for CompressedAccount {
    type Error = IndexerError;

    fn try_from(account: &photon_models::AccountV2) -> Result<Self, Self::Error> {
        let data = account
            .data
            .as_ref()
            .map(|data| {
                Ok::<_, IndexerError>(CompressedAccountData {
                    discriminator: data.discriminator.to_le_bytes(),
                    data: base64::decode(&data.data)?,
                    data_hash: decode_base58_to_fixed_array(&data.data_hash)?,
                })
            })
            .transpose()?;

        Ok(CompressedAccount {
            address: account
                .address
                .as_ref()
                .map(|address| decode_base58_to_fixed_array(address))
                .transpose()?,
            data,
            hash: decode_base58_to_fixed_array(&account.hash)?,
            lamports: account.lamports,
            leaf_index: u32::try_from(account.leaf_index)
                .map_err(|_| IndexerError::InvalidResponseData)?,
            owner: decode_base58_to_pubkey(&account.owner)?,
            prove_by_index: account.prove_by_index,
            seq: account.seq,
            slot_created: account.slot_created,
            tree_info: tree_info_from_context(&account.merkle_context)?,
        })
    }
}

impl ValidityProofWithContext {
    pub(crate) fn from_api_model_v2(
        value: &photon_models::CompressedProofWithContextV2,
    ) -> Result<Self, IndexerError> {
        let proof = value
            .compressed_proof
            .as_ref()
            .map(|proof| CompressedProof::try_from_slices(&proof.a, &proof.b, &proof.c))
            .transpose()?;

        let accounts = value
            .accounts
            .iter()
            .map(|account| {
                Ok(AccountProofInputs {
                    hash: decode_base58_to_fixed_array(&account.hash)?,
                    root: decode_base58_to_fixed_array(&account.root)?,
                    root_index: RootIndex {
                        root_index: account.root_index.root_index,
                        prove_by_index: account.root_index.prove_by_index,
                    },
                    leaf_index: account.leaf_index,
                    tree_info: tree_info_from_context(&account.merkle_context)?,
                })
            })
            .collect::<Result<Vec<_>, IndexerError>>()?;

        let addresses = value
            .addresses
            .iter()
            .map(|address| {
                Ok(AddressProofInputs {
                    address: decode_base58_to_fixed_array(&address.address)?,
                    root: decode_base58_to_fixed_array(&address.root)?,
                    root_index: address.root_index,
                    tree_info: tree_info_from_context(&address.merkle_context)?,
                })
            })
            .collect::<Result<Vec<_>, IndexerError>>()?;

        Ok(Self {
            proof: ValidityProof::new(proof),
            accounts,
            addresses,
        })
    }
}

/// Maps a `getQueueInfo` queue type to the tree type it belongs to. The
/// input queue of v2 state trees is not a tree of its own and is skipped.
pub(crate) fn tree_type_from_queue_type(queue_type: u8) -> Option<TreeType> {
    match queue_type {
        1 => Some(TreeType::StateV1),
        2 => Some(TreeType::AddressV1),
        4 => Some(TreeType::AddressV2),
        5 => Some(TreeType::StateV2),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tree_type_from_queue_type() {
        assert_eq!(tree_type_from_queue_type(1), Some(TreeType::StateV1));
        assert_eq!(tree_type_from_queue_type(2), Some(TreeType::AddressV1));
        assert_eq!(tree_type_from_queue_type(3), None);
        assert_eq!(tree_type_from_queue_type(4), Some(TreeType::AddressV2));
        assert_eq!(tree_type_from_queue_type(5), Some(TreeType::StateV2));
    }
}
