use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::{DelegationSdkError, Result},
    instruction::PackedStateTreeInfo,
};

/// Metadata of an existing compressed account with an address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CompressedAccountMeta {
    /// Merkle tree context.
    pub tree_info: PackedStateTreeInfo,
    /// Address.
    pub address: [u8; 32],
    /// Output merkle tree index.
    pub output_state_tree_index: u8,
}

impl CompressedAccountMeta {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.try_to_vec().map_err(|_| DelegationSdkError::Borsh)
    }
}
