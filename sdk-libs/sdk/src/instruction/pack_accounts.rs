use std::collections::HashMap;

use crate::{
    error::{DelegationSdkError, Result},
    instruction::system_accounts::{
        get_light_system_account_metas, get_light_system_account_metas_small,
        SystemAccountMetaConfig, SystemAccountVariant,
    },
    AccountMeta, Pubkey,
};

/// Deduplicating collection of the accounts an instruction references.
///
/// Accounts inserted through [`PackedAccounts::insert_or_get`] are assigned
/// dense `u8` slots in first-insertion order. Packed instruction data refers
/// to accounts by those slots instead of by pubkey.
#[derive(Default, Debug)]
pub struct PackedAccounts {
    pub pre_accounts: Vec<AccountMeta>,
    system_accounts: Vec<AccountMeta>,
    map: HashMap<Pubkey, (u8, AccountMeta)>,
}

impl PackedAccounts {
    pub fn new_with_system_accounts(config: SystemAccountMetaConfig) -> Self {
        Self::new_with_system_accounts_variant(config, SystemAccountVariant::Full)
    }

    pub fn new_with_system_accounts_small(config: SystemAccountMetaConfig) -> Self {
        Self::new_with_system_accounts_variant(config, SystemAccountVariant::Small)
    }

    pub fn new_with_system_accounts_variant(
        config: SystemAccountMetaConfig,
        variant: SystemAccountVariant,
    ) -> Self {
        let mut remaining_accounts = PackedAccounts::default();
        remaining_accounts.add_system_accounts(config, variant);
        remaining_accounts
    }

    pub fn add_pre_accounts_signer(&mut self, pubkey: Pubkey) {
        self.pre_accounts.push(AccountMeta {
            pubkey,
            is_signer: true,
            is_writable: false,
        });
    }

    pub fn add_pre_accounts_signer_mut(&mut self, pubkey: Pubkey) {
        self.pre_accounts.push(AccountMeta {
            pubkey,
            is_signer: true,
            is_writable: true,
        });
    }

    pub fn add_pre_accounts_meta(&mut self, account_meta: AccountMeta) {
        self.pre_accounts.push(account_meta);
    }

    pub fn add_pre_accounts_metas(&mut self, account_metas: &[AccountMeta]) {
        self.pre_accounts.extend_from_slice(account_metas);
    }

    /// Appends the protocol accounts. They are kept apart from the
    /// deduplicated set and never receive a slot.
    pub fn add_system_accounts(
        &mut self,
        config: SystemAccountMetaConfig,
        variant: SystemAccountVariant,
    ) {
        let metas = match variant {
            SystemAccountVariant::Full => get_light_system_account_metas(config),
            SystemAccountVariant::Small => get_light_system_account_metas_small(config),
        };
        self.system_accounts.extend(metas);
    }

    /// Returns the index of the provided `pubkey` in the collection.
    ///
    /// If the provided `pubkey` is not a part of the collection, it gets
    /// inserted with the next free index.
    ///
    /// If the provided `pubkey` already exists in the collection, its already
    /// existing index is returned and its flags are left untouched.
    ///
    /// Indices are `u8`, inserting a 257th distinct account fails with
    /// [`DelegationSdkError::TooManyAccounts`].
    pub fn insert_or_get(&mut self, pubkey: Pubkey) -> Result<u8> {
        self.insert_or_get_config(pubkey, false, true)
    }

    pub fn insert_or_get_read_only(&mut self, pubkey: Pubkey) -> Result<u8> {
        self.insert_or_get_config(pubkey, false, false)
    }

    pub fn insert_or_get_config(
        &mut self,
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    ) -> Result<u8> {
        if let Some((index, _)) = self.map.get(&pubkey) {
            return Ok(*index);
        }
        let index =
            u8::try_from(self.map.len()).map_err(|_| DelegationSdkError::TooManyAccounts)?;
        self.map.insert(
            pubkey,
            (
                index,
                AccountMeta {
                    pubkey,
                    is_signer,
                    is_writable,
                },
            ),
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn hash_set_accounts_to_metas(&self) -> Vec<AccountMeta> {
        let mut packed_accounts = self.map.values().collect::<Vec<_>>();
        // hash maps are not sorted so we need to sort manually and collect into a vector again
        packed_accounts.sort_by_key(|(index, _)| *index);
        packed_accounts
            .into_iter()
            .map(|(_, meta)| meta.clone())
            .collect()
    }

    fn get_offsets(&self) -> (usize, usize) {
        let system_accounts_start_offset = self.pre_accounts.len();
        let packed_accounts_start_offset =
            system_accounts_start_offset + self.system_accounts.len();
        (system_accounts_start_offset, packed_accounts_start_offset)
    }

    /// Converts the collection of accounts to a vector of [`AccountMeta`],
    /// which can be used as remaining accounts in instructions.
    ///
    /// Returns the metas together with the offsets at which the system
    /// accounts and the packed accounts start.
    pub fn to_account_metas(&self) -> (Vec<AccountMeta>, usize, usize) {
        let packed_accounts = self.hash_set_accounts_to_metas();
        let (system_accounts_start_offset, packed_accounts_start_offset) = self.get_offsets();
        (
            [
                self.pre_accounts.clone(),
                self.system_accounts.clone(),
                packed_accounts,
            ]
            .concat(),
            system_accounts_start_offset,
            packed_accounts_start_offset,
        )
    }

    /// System accounts followed by the packed accounts, the tail appended
    /// after an instruction's fixed accounts.
    pub fn remaining_account_metas(&self) -> Vec<AccountMeta> {
        let (metas, system_accounts_start_offset, _) = self.to_account_metas();
        metas[system_accounts_start_offset..].to_vec()
    }
}
