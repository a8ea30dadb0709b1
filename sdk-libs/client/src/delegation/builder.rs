use std::sync::Arc;

use counter_delegation_sdk::{
    address::{derive_address_from_seed, derive_counter_address_seed, CompressedAddress},
    instruction::{
        counter_program::{self, DelegateArgs, DelegationAccounts, UndelegateArgs},
        CompressedAccountMeta, PackedAccounts, PackedAddressTreeInfo, SystemAccountMetaConfig,
        TreeInfo, ValidityProof,
    },
    Instruction, Pubkey, DEFAULT_COMPUTE_UNIT_LIMIT, PROOF_COMPUTE_UNIT_LIMIT,
};
use solana_compute_budget_interface::ComputeBudgetInstruction;
use tracing::debug;

use super::{
    tree::{resolve_address_tree, resolve_output_tree},
    DelegationError,
};
use crate::{
    config::DelegationConfig,
    indexer::Indexer,
    proof::{
        get_compressed_record, get_inclusion_proof, resolve_proof_strategy, ProofError,
        ProofStrategy,
    },
    rpc::RpcConnection,
};

/// Instructions of one action, ready to be signed by the payer.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltDelegation {
    pub instructions: Vec<Instruction>,
    /// Set when the delegation record is created.
    pub address_tree_info: Option<PackedAddressTreeInfo>,
    /// Set when an existing delegation record is consumed.
    pub account_meta: Option<CompressedAccountMeta>,
    pub compressed_address: Option<CompressedAddress>,
    pub remaining_accounts_len: usize,
}

impl BuiltDelegation {
    fn plain(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            address_tree_info: None,
            account_meta: None,
            compressed_address: None,
            remaining_accounts_len: 0,
        }
    }
}

/// Builds the counter program instructions that move the counter between
/// the base ledger, the compressed delegation record and the ephemeral
/// layer.
///
/// `indexer` and `rpc` are used for reads only. Nothing is sent.
pub struct DelegationInstructionBuilder<I: Indexer, R: RpcConnection> {
    indexer: Arc<I>,
    rpc: Arc<R>,
    config: DelegationConfig,
    payer: Option<Pubkey>,
    counter: Option<Pubkey>,
    validator: Option<Pubkey>,
}

impl<I: Indexer, R: RpcConnection> DelegationInstructionBuilder<I, R> {
    /// Counter and validator default to the ones of `config`.
    pub fn new(indexer: Arc<I>, rpc: Arc<R>, config: DelegationConfig) -> Self {
        let counter = Some(config.counter_address());
        let validator = Some(config.validator);
        Self {
            indexer,
            rpc,
            config,
            payer: None,
            counter,
            validator,
        }
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_counter(mut self, counter: Option<Pubkey>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_validator(mut self, validator: Option<Pubkey>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &DelegationConfig {
        &self.config
    }

    fn payer(&self) -> Result<Pubkey, DelegationError> {
        self.payer.ok_or(DelegationError::MissingPayer)
    }

    fn counter(&self) -> Result<Pubkey, DelegationError> {
        self.counter.ok_or(DelegationError::MissingCounter)
    }

    fn delegation_accounts(&self) -> Result<DelegationAccounts, DelegationError> {
        Ok(DelegationAccounts {
            payer: self.payer()?,
            counter: self.counter()?,
            validator: self.validator.ok_or(DelegationError::MissingValidator)?,
            compressed_delegation_program: self.config.compressed_delegation_program_id,
            compressed_delegation_cpi_signer: self.config.compressed_delegation_cpi_signer(),
        })
    }

    fn packed_accounts(&self) -> PackedAccounts {
        PackedAccounts::new_with_system_accounts_small(SystemAccountMetaConfig::new(
            self.config.compressed_delegation_program_id,
        ))
    }

    fn compressed_address(&self, counter: &Pubkey, address_tree: &Pubkey) -> CompressedAddress {
        derive_address_from_seed(
            &derive_counter_address_seed(counter),
            &address_tree.to_bytes(),
            &self.config.compressed_delegation_program_id.to_bytes(),
        )
    }

    /// Packs the output state tree. `queue_tree` is the tree whose queue
    /// receives new state unless the output policy selects a state tree.
    async fn pack_output_tree(
        &self,
        packed_accounts: &mut PackedAccounts,
        queue_tree: &TreeInfo,
    ) -> Result<u8, DelegationError> {
        match resolve_output_tree(self.indexer.as_ref(), &self.config.output_tree).await? {
            Some(state_tree) => Ok(state_tree.pack_output_tree_index(packed_accounts)?),
            None => Ok(packed_accounts.insert_or_get(queue_tree.queue)?),
        }
    }

    /// Moves the counter into a compressed delegation record owned by the
    /// compressed delegation program.
    ///
    /// Creates the counter first if it does not exist on the base ledger.
    pub async fn delegate(&self) -> Result<BuiltDelegation, DelegationError> {
        let accounts = self.delegation_accounts()?;

        let mut instructions = Vec::with_capacity(3);
        if self.rpc.get_account(accounts.counter).await?.is_none() {
            debug!("Counter {} does not exist, creating it", accounts.counter);
            instructions.push(counter_program::create_counter(
                self.config.counter_program_id,
                accounts.payer,
                accounts.counter,
            ));
        }

        let address_tree =
            resolve_address_tree(self.indexer.as_ref(), &self.config.address_tree).await?;
        let address = self.compressed_address(&accounts.counter, &address_tree.tree);
        let strategy =
            resolve_proof_strategy(self.indexer.as_ref(), address, address_tree.tree).await?;

        let mut packed_accounts = self.packed_accounts();
        let (address_tree_info, account_meta, output_state_tree_index) = match &strategy {
            ProofStrategy::NewAddress { root_index, .. } => {
                let address_tree_info = address_tree
                    .address_tree_info()
                    .pack(&mut packed_accounts, *root_index)?;
                let output_state_tree_index = self
                    .pack_output_tree(&mut packed_accounts, &address_tree)
                    .await?;
                debug!(
                    "Creating delegation record, address tree index {} output index {}",
                    address_tree_info.address_merkle_tree_pubkey_index, output_state_tree_index
                );
                (Some(address_tree_info), None, output_state_tree_index)
            }
            ProofStrategy::ExistingAccount {
                root_index,
                prove_by_index,
                leaf_index,
                account,
                ..
            } => {
                let tree_info = account.tree_info.pack_state_tree_info(
                    &mut packed_accounts,
                    *root_index,
                    *leaf_index,
                    *prove_by_index,
                )?;
                let output_state_tree_index = self
                    .pack_output_tree(&mut packed_accounts, &account.tree_info)
                    .await?;
                let account_meta = CompressedAccountMeta {
                    tree_info,
                    address,
                    output_state_tree_index,
                };
                debug!(
                    "Updating delegation record at leaf {} output index {}",
                    leaf_index, output_state_tree_index
                );
                (None, Some(account_meta), output_state_tree_index)
            }
        };

        let args = DelegateArgs {
            validity_proof_bytes: strategy.proof().to_bytes()?,
            address_tree_info_bytes: address_tree_info
                .as_ref()
                .map(PackedAddressTreeInfo::to_bytes)
                .transpose()?,
            output_state_tree_index,
            account_meta_bytes: account_meta
                .as_ref()
                .map(CompressedAccountMeta::to_bytes)
                .transpose()?,
        };
        let remaining_accounts = packed_accounts.remaining_account_metas();
        let remaining_accounts_len = remaining_accounts.len();
        instructions.push(counter_program::delegate(
            self.config.counter_program_id,
            accounts,
            &args,
            remaining_accounts,
        )?);
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(
            PROOF_COMPUTE_UNIT_LIMIT,
        ));

        Ok(BuiltDelegation {
            instructions,
            address_tree_info,
            account_meta,
            compressed_address: Some(address),
            remaining_accounts_len,
        })
    }

    /// Restores the counter on the base ledger from its compressed
    /// delegation record.
    pub async fn undelegate(&self) -> Result<BuiltDelegation, DelegationError> {
        let accounts = self.delegation_accounts()?;

        let address_tree =
            resolve_address_tree(self.indexer.as_ref(), &self.config.address_tree).await?;
        let address = self.compressed_address(&accounts.counter, &address_tree.tree);
        let record = get_compressed_record(self.indexer.as_ref(), address).await?;
        let record_data = record
            .data
            .as_ref()
            .ok_or(ProofError::CompressedRecordNotFound)?
            .data
            .clone();
        let inclusion = get_inclusion_proof(self.indexer.as_ref(), &record).await?;

        let mut packed_accounts = self.packed_accounts();
        let tree_info = record.tree_info.pack_state_tree_info(
            &mut packed_accounts,
            inclusion.root_index,
            inclusion.leaf_index,
            inclusion.prove_by_index,
        )?;
        let output_state_tree_index = self
            .pack_output_tree(&mut packed_accounts, &record.tree_info)
            .await?;
        let account_meta = CompressedAccountMeta {
            tree_info,
            address,
            output_state_tree_index,
        };
        debug!(
            "Undelegating record at leaf {} root index {}",
            inclusion.leaf_index, inclusion.root_index
        );

        let args = UndelegateArgs {
            validity_proof_bytes: inclusion.proof.to_bytes()?,
            account_meta_bytes: account_meta.to_bytes()?,
            compressed_delegated_account_bytes: record_data,
        };
        let remaining_accounts = packed_accounts.remaining_account_metas();
        let remaining_accounts_len = remaining_accounts.len();
        let instructions = vec![
            counter_program::undelegate(
                self.config.counter_program_id,
                accounts,
                &args,
                remaining_accounts,
            )?,
            ComputeBudgetInstruction::set_compute_unit_limit(PROOF_COMPUTE_UNIT_LIMIT),
        ];

        Ok(BuiltDelegation {
            instructions,
            address_tree_info: None,
            account_meta: Some(account_meta),
            compressed_address: Some(address),
            remaining_accounts_len,
        })
    }

    /// Sent to the ephemeral endpoint.
    pub fn schedule_undelegate(&self) -> Result<BuiltDelegation, DelegationError> {
        let payer = self.payer()?;
        let counter = self.counter()?;
        Ok(BuiltDelegation::plain(vec![
            counter_program::schedule_undelegate(self.config.counter_program_id, payer, counter),
            ComputeBudgetInstruction::set_compute_unit_limit(DEFAULT_COMPUTE_UNIT_LIMIT),
        ]))
    }

    pub fn create_counter(&self) -> Result<BuiltDelegation, DelegationError> {
        let payer = self.payer()?;
        let counter = self.counter()?;
        Ok(BuiltDelegation::plain(vec![counter_program::create_counter(
            self.config.counter_program_id,
            payer,
            counter,
        )]))
    }

    pub fn increment_counter(&self) -> Result<BuiltDelegation, DelegationError> {
        let counter = self.counter()?;
        Ok(BuiltDelegation::plain(vec![
            counter_program::increment_counter(self.config.counter_program_id, counter),
        ]))
    }

    /// Tops up the payer's balance on the ephemeral layer for `validator`.
    pub fn fund_ephemeral_balance(&self) -> Result<BuiltDelegation, DelegationError> {
        let payer = self.payer()?;
        let validator = self.validator.ok_or(DelegationError::MissingValidator)?;
        Ok(BuiltDelegation::plain(vec![
            counter_program::fund_ephemeral_balance(
                self.config.counter_program_id,
                self.config.delegation_program_id,
                payer,
                validator,
            )?,
            ComputeBudgetInstruction::set_compute_unit_limit(DEFAULT_COMPUTE_UNIT_LIMIT),
        ]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plain_has_no_compressed_state() {
        let built = BuiltDelegation::plain(vec![]);
        assert!(built.address_tree_info.is_none());
        assert!(built.account_meta.is_none());
        assert!(built.compressed_address.is_none());
        assert_eq!(built.remaining_accounts_len, 0);
    }
}
