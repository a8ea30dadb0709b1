use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::{DelegationSdkError, Result},
    instruction::PackedAccounts,
    Pubkey,
};

#[repr(u64)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeType {
    #[default]
    StateV1 = 1,
    AddressV1 = 2,
    StateV2 = 3,
    AddressV2 = 4,
    Unknown = 255,
}

impl From<u64> for TreeType {
    fn from(value: u64) -> Self {
        match value {
            1 => TreeType::StateV1,
            2 => TreeType::AddressV1,
            3 => TreeType::StateV2,
            4 => TreeType::AddressV2,
            _ => TreeType::Unknown,
        }
    }
}

impl TreeType {
    pub fn is_state(&self) -> bool {
        matches!(self, TreeType::StateV1 | TreeType::StateV2)
    }

    pub fn is_address(&self) -> bool {
        matches!(self, TreeType::AddressV1 | TreeType::AddressV2)
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct NextTreeInfo {
    pub cpi_context: Option<Pubkey>,
    pub queue: Pubkey,
    pub tree: Pubkey,
    pub tree_type: TreeType,
}

/// Tree and queue pair as reported by the indexer.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct TreeInfo {
    pub cpi_context: Option<Pubkey>,
    pub next_tree_info: Option<NextTreeInfo>,
    pub queue: Pubkey,
    pub tree: Pubkey,
    pub tree_type: TreeType,
}

impl TreeInfo {
    /// Get the index of the output tree in the packed accounts.
    /// For StateV1, it returns the index of the tree account.
    /// For StateV2, it returns the index of the queue account.
    /// (For V2 trees new state is inserted into the output queue.)
    pub fn pack_output_tree_index(&self, packed_accounts: &mut PackedAccounts) -> Result<u8> {
        packed_accounts.insert_or_get(self.get_output_pubkey()?)
    }

    pub fn get_output_pubkey(&self) -> Result<Pubkey> {
        match self.tree_type {
            TreeType::StateV1 => Ok(self.tree),
            TreeType::StateV2 => Ok(self.queue),
            tree_type => Err(DelegationSdkError::InvalidPackTreeType(tree_type)),
        }
    }

    /// Inserts tree then queue and returns the packed state tree reference
    /// of an existing account.
    pub fn pack_state_tree_info(
        &self,
        packed_accounts: &mut PackedAccounts,
        root_index: u16,
        leaf_index: u32,
        prove_by_index: bool,
    ) -> Result<PackedStateTreeInfo> {
        Ok(PackedStateTreeInfo {
            root_index,
            prove_by_index,
            merkle_tree_pubkey_index: packed_accounts.insert_or_get(self.tree)?,
            queue_pubkey_index: packed_accounts.insert_or_get(self.queue)?,
            leaf_index,
        })
    }

    pub fn address_tree_info(&self) -> AddressTreeInfo {
        AddressTreeInfo {
            tree: self.tree,
            queue: self.queue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTreeInfo {
    pub tree: Pubkey,
    pub queue: Pubkey,
}

impl AddressTreeInfo {
    pub fn pack(
        &self,
        packed_accounts: &mut PackedAccounts,
        root_index: u16,
    ) -> Result<PackedAddressTreeInfo> {
        let address_merkle_tree_pubkey_index = packed_accounts.insert_or_get(self.tree)?;
        let address_queue_pubkey_index = packed_accounts.insert_or_get(self.queue)?;
        Ok(crate::address::pack_address_tree_info(
            root_index,
            address_merkle_tree_pubkey_index,
            address_queue_pubkey_index,
        ))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PackedStateTreeInfo {
    pub root_index: u16,
    pub prove_by_index: bool,
    pub merkle_tree_pubkey_index: u8,
    pub queue_pubkey_index: u8,
    pub leaf_index: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PackedAddressTreeInfo {
    pub address_merkle_tree_pubkey_index: u8,
    pub address_queue_pubkey_index: u8,
    pub root_index: u16,
}

impl PackedAddressTreeInfo {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.try_to_vec().map_err(|_| DelegationSdkError::Borsh)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tree_info(tree_type: TreeType) -> TreeInfo {
        TreeInfo {
            tree: Pubkey::new_unique(),
            queue: Pubkey::new_unique(),
            tree_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_pack_output_tree_index() {
        let mut packed = PackedAccounts::default();
        let v1 = tree_info(TreeType::StateV1);
        let v2 = tree_info(TreeType::StateV2);

        assert_eq!(v1.pack_output_tree_index(&mut packed).unwrap(), 0);
        assert_eq!(v2.pack_output_tree_index(&mut packed).unwrap(), 1);
        let pubkeys = packed
            .to_account_metas()
            .0
            .into_iter()
            .map(|m| m.pubkey)
            .collect::<Vec<_>>();
        assert_eq!(pubkeys, vec![v1.tree, v2.queue]);

        let address = tree_info(TreeType::AddressV2);
        assert_eq!(
            address.pack_output_tree_index(&mut packed),
            Err(DelegationSdkError::InvalidPackTreeType(TreeType::AddressV2))
        );
    }

    #[test]
    fn test_pack_address_tree_info_inserts_tree_then_queue() {
        let mut packed = PackedAccounts::default();
        let existing = Pubkey::new_unique();
        packed.insert_or_get(existing).unwrap();

        let info = tree_info(TreeType::AddressV2).address_tree_info();
        let packed_info = info.pack(&mut packed, 12).unwrap();
        assert_eq!(
            packed_info,
            PackedAddressTreeInfo {
                address_merkle_tree_pubkey_index: 1,
                address_queue_pubkey_index: 2,
                root_index: 12,
            }
        );
        // Packing again reuses the slots.
        assert_eq!(info.pack(&mut packed, 12).unwrap(), packed_info);
        assert_eq!(packed.len(), 3);
        assert_eq!(packed_info.to_bytes().unwrap(), vec![1, 2, 12, 0]);
    }

    #[test]
    fn test_tree_type_from_u64() {
        assert_eq!(TreeType::from(1), TreeType::StateV1);
        assert_eq!(TreeType::from(4), TreeType::AddressV2);
        assert_eq!(TreeType::from(9), TreeType::Unknown);
        assert!(TreeType::StateV2.is_state());
        assert!(TreeType::AddressV1.is_address());
    }
}
