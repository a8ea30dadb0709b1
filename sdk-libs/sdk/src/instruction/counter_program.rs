//! Instruction encoders of the counter program.
//!
//! Every instruction is an 8 byte discriminator followed by borsh encoded
//! arguments. Instructions that interact with compressed state take the
//! packed remaining accounts after their fixed accounts.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::{DelegationSdkError, Result},
    AccountMeta, Instruction, Pubkey, CREATE_COUNTER, DELEGATE, DELEGATE_BUFFER_SEED,
    DELEGATION_METADATA_SEED, DELEGATION_RECORD_SEED,
    EPHEMERAL_BALANCE_SEED, FUND_EPHEMERAL_BALANCE, INCREMENT_COUNTER, MAGIC_CONTEXT_ID,
    MAGIC_PROGRAM_ID, PROGRAM_ID_SYSTEM, SCHEDULE_UNDELEGATE, UNDELEGATE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DelegateArgs {
    pub validity_proof_bytes: Vec<u8>,
    pub address_tree_info_bytes: Option<Vec<u8>>,
    pub output_state_tree_index: u8,
    pub account_meta_bytes: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct UndelegateArgs {
    pub validity_proof_bytes: Vec<u8>,
    pub account_meta_bytes: Vec<u8>,
    pub compressed_delegated_account_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FundEphemeralBalanceArgs {
    pub validator: [u8; 32],
}

/// Fixed accounts shared by `delegate` and `undelegate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationAccounts {
    pub payer: Pubkey,
    pub counter: Pubkey,
    pub validator: Pubkey,
    pub compressed_delegation_program: Pubkey,
    pub compressed_delegation_cpi_signer: Pubkey,
}

impl DelegationAccounts {
    fn to_account_metas(self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.payer, true),
            AccountMeta::new(self.counter, false),
            AccountMeta::new_readonly(self.validator, false),
            AccountMeta::new_readonly(self.compressed_delegation_program, false),
            AccountMeta::new_readonly(self.compressed_delegation_cpi_signer, false),
        ]
    }
}

fn instruction_data<T: BorshSerialize>(discriminator: [u8; 8], args: &T) -> Result<Vec<u8>> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|_| DelegationSdkError::Borsh)?;
    Ok(data)
}

pub fn create_counter(program_id: Pubkey, payer: Pubkey, counter: Pubkey) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(counter, false),
            AccountMeta::new_readonly(PROGRAM_ID_SYSTEM, false),
        ],
        data: CREATE_COUNTER.to_vec(),
    }
}

pub fn increment_counter(program_id: Pubkey, counter: Pubkey) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![AccountMeta::new(counter, false)],
        data: INCREMENT_COUNTER.to_vec(),
    }
}

pub fn delegate(
    program_id: Pubkey,
    accounts: DelegationAccounts,
    args: &DelegateArgs,
    remaining_accounts: Vec<AccountMeta>,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id,
        accounts: [accounts.to_account_metas(), remaining_accounts].concat(),
        data: instruction_data(DELEGATE, args)?,
    })
}

pub fn undelegate(
    program_id: Pubkey,
    accounts: DelegationAccounts,
    args: &UndelegateArgs,
    remaining_accounts: Vec<AccountMeta>,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id,
        accounts: [accounts.to_account_metas(), remaining_accounts].concat(),
        data: instruction_data(UNDELEGATE, args)?,
    })
}

/// Commits the counter and hands it back from the ephemeral layer. Sent to
/// the ephemeral endpoint.
pub fn schedule_undelegate(program_id: Pubkey, payer: Pubkey, counter: Pubkey) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(counter, false),
            AccountMeta::new_readonly(MAGIC_PROGRAM_ID, false),
            AccountMeta::new(MAGIC_CONTEXT_ID, false),
        ],
        data: SCHEDULE_UNDELEGATE.to_vec(),
    }
}

/// PDAs the delegation program uses to escrow the payer's ephemeral balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralBalancePdas {
    pub ephemeral_balance: Pubkey,
    pub delegate_buffer: Pubkey,
    pub delegation_record: Pubkey,
    pub delegation_metadata: Pubkey,
}

impl EphemeralBalancePdas {
    pub fn derive(payer: &Pubkey, delegation_program_id: &Pubkey) -> Self {
        let (ephemeral_balance, _) = Pubkey::find_program_address(
            &[EPHEMERAL_BALANCE_SEED, payer.as_ref(), &[0]],
            delegation_program_id,
        );
        let (delegate_buffer, _) = Pubkey::find_program_address(
            &[DELEGATE_BUFFER_SEED, ephemeral_balance.as_ref()],
            &PROGRAM_ID_SYSTEM,
        );
        let (delegation_record, _) = Pubkey::find_program_address(
            &[DELEGATION_RECORD_SEED, ephemeral_balance.as_ref()],
            delegation_program_id,
        );
        let (delegation_metadata, _) = Pubkey::find_program_address(
            &[DELEGATION_METADATA_SEED, ephemeral_balance.as_ref()],
            delegation_program_id,
        );
        Self {
            ephemeral_balance,
            delegate_buffer,
            delegation_record,
            delegation_metadata,
        }
    }
}

pub fn fund_ephemeral_balance(
    program_id: Pubkey,
    delegation_program_id: Pubkey,
    payer: Pubkey,
    validator: Pubkey,
) -> Result<Instruction> {
    let pdas = EphemeralBalancePdas::derive(&payer, &delegation_program_id);
    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(payer, true),
            AccountMeta::new_readonly(payer, true),
            AccountMeta::new(pdas.ephemeral_balance, false),
            AccountMeta::new(pdas.delegate_buffer, false),
            AccountMeta::new(pdas.delegation_record, false),
            AccountMeta::new(pdas.delegation_metadata, false),
            AccountMeta::new_readonly(delegation_program_id, false),
            AccountMeta::new_readonly(PROGRAM_ID_SYSTEM, false),
        ],
        data: instruction_data(
            FUND_EPHEMERAL_BALANCE,
            &FundEphemeralBalanceArgs {
                validator: validator.to_bytes(),
            },
        )?,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn delegation_accounts() -> DelegationAccounts {
        DelegationAccounts {
            payer: Pubkey::new_unique(),
            counter: Pubkey::new_unique(),
            validator: Pubkey::new_unique(),
            compressed_delegation_program: Pubkey::new_unique(),
            compressed_delegation_cpi_signer: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_create_and_increment_counter() {
        let program_id = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let counter = Pubkey::new_unique();

        let ix = create_counter(program_id, payer, counter);
        assert_eq!(ix.data, CREATE_COUNTER.to_vec());
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(counter, false),
                AccountMeta::new_readonly(PROGRAM_ID_SYSTEM, false),
            ]
        );

        let ix = increment_counter(program_id, counter);
        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data, INCREMENT_COUNTER.to_vec());
        assert_eq!(ix.accounts, vec![AccountMeta::new(counter, false)]);
    }

    #[test]
    fn test_delegate_appends_remaining_accounts() {
        let accounts = delegation_accounts();
        let tree = Pubkey::new_unique();
        let args = DelegateArgs {
            validity_proof_bytes: vec![0],
            address_tree_info_bytes: Some(vec![1, 2, 3, 0]),
            output_state_tree_index: 2,
            account_meta_bytes: None,
        };
        let ix = delegate(
            Pubkey::new_unique(),
            accounts,
            &args,
            vec![AccountMeta::new(tree, false)],
        )
        .unwrap();

        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[0], AccountMeta::new(accounts.payer, true));
        assert_eq!(ix.accounts[1], AccountMeta::new(accounts.counter, false));
        assert_eq!(
            ix.accounts[2],
            AccountMeta::new_readonly(accounts.validator, false)
        );
        assert_eq!(ix.accounts[5], AccountMeta::new(tree, false));

        assert_eq!(&ix.data[..8], &DELEGATE);
        // vec len (4) + proof, option tag + vec len + address tree info,
        // output index, none tag
        assert_eq!(
            &ix.data[8..],
            &[1, 0, 0, 0, 0, 1, 4, 0, 0, 0, 1, 2, 3, 0, 2, 0]
        );
        assert_eq!(DelegateArgs::try_from_slice(&ix.data[8..]).unwrap(), args);
    }

    #[test]
    fn test_undelegate_data() {
        let args = UndelegateArgs {
            validity_proof_bytes: vec![0],
            account_meta_bytes: vec![7; 42],
            compressed_delegated_account_bytes: vec![1, 2],
        };
        let ix = undelegate(Pubkey::new_unique(), delegation_accounts(), &args, vec![]).unwrap();
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(&ix.data[..8], &UNDELEGATE);
        assert_eq!(UndelegateArgs::try_from_slice(&ix.data[8..]).unwrap(), args);
    }

    #[test]
    fn test_schedule_undelegate_accounts() {
        let payer = Pubkey::new_unique();
        let counter = Pubkey::new_unique();
        let ix = schedule_undelegate(Pubkey::new_unique(), payer, counter);
        assert_eq!(ix.data, SCHEDULE_UNDELEGATE.to_vec());
        assert_eq!(ix.accounts[2], AccountMeta::new_readonly(MAGIC_PROGRAM_ID, false));
        assert_eq!(ix.accounts[3], AccountMeta::new(MAGIC_CONTEXT_ID, false));
    }

    #[test]
    fn test_fund_ephemeral_balance() {
        let payer = Pubkey::new_unique();
        let validator = Pubkey::new_unique();
        let ix = fund_ephemeral_balance(
            Pubkey::new_unique(),
            crate::DELEGATION_PROGRAM_ID,
            payer,
            validator,
        )
        .unwrap();

        let pdas = EphemeralBalancePdas::derive(&payer, &crate::DELEGATION_PROGRAM_ID);
        let expected_balance = Pubkey::find_program_address(
            &[b"balance", payer.as_ref(), &[0]],
            &crate::DELEGATION_PROGRAM_ID,
        )
        .0;
        assert_eq!(pdas.ephemeral_balance, expected_balance);
        assert_eq!(
            ix.accounts[6],
            AccountMeta::new_readonly(crate::DELEGATION_PROGRAM_ID, false)
        );
        assert_eq!(ix.accounts.len(), 8);
        assert_eq!(ix.accounts[1], AccountMeta::new_readonly(payer, true));
        assert_eq!(ix.accounts[2].pubkey, pdas.ephemeral_balance);
        assert_eq!(ix.accounts[3].pubkey, pdas.delegate_buffer);
        assert_eq!(ix.accounts[4].pubkey, pdas.delegation_record);
        assert_eq!(ix.accounts[5].pubkey, pdas.delegation_metadata);
        assert_eq!(&ix.data[..8], &FUND_EPHEMERAL_BALANCE);
        assert_eq!(&ix.data[8..], validator.as_ref());
    }

    #[test]
    fn test_fund_ephemeral_balance_uses_given_delegation_program() {
        let payer = Pubkey::new_unique();
        let delegation_program_id = Pubkey::new_unique();
        let ix = fund_ephemeral_balance(
            Pubkey::new_unique(),
            delegation_program_id,
            payer,
            Pubkey::new_unique(),
        )
        .unwrap();

        let pdas = EphemeralBalancePdas::derive(&payer, &delegation_program_id);
        assert_ne!(
            pdas,
            EphemeralBalancePdas::derive(&payer, &crate::DELEGATION_PROGRAM_ID)
        );
        assert_eq!(
            pdas.delegation_record,
            Pubkey::find_program_address(
                &[b"delegation", pdas.ephemeral_balance.as_ref()],
                &delegation_program_id,
            )
            .0
        );
        assert_eq!(ix.accounts[2].pubkey, pdas.ephemeral_balance);
        assert_eq!(ix.accounts[5].pubkey, pdas.delegation_metadata);
        assert_eq!(
            ix.accounts[6],
            AccountMeta::new_readonly(delegation_program_id, false)
        );
    }
}
