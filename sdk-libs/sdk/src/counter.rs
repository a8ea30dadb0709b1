use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::{DelegationSdkError, Result},
    Pubkey, COUNTER_DISCRIMINATOR, COUNTER_SEED,
};

/// On-chain state of the counter program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Counter {
    pub count: u64,
}

impl Counter {
    pub const LEN: usize = COUNTER_DISCRIMINATOR.len() + 8;

    /// Decodes discriminator prefixed account data. Trailing bytes are
    /// ignored.
    pub fn try_from_account_data(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(DelegationSdkError::AccountDataTooSmall {
                expected: Self::LEN,
                actual: data.len(),
            });
        }
        let (discriminator, rest) = data.split_at(COUNTER_DISCRIMINATOR.len());
        if discriminator != COUNTER_DISCRIMINATOR {
            let mut found = [0u8; 8];
            found.copy_from_slice(discriminator);
            return Err(DelegationSdkError::InvalidDiscriminator(found));
        }
        let mut count = [0u8; 8];
        count.copy_from_slice(&rest[..8]);
        Ok(Self {
            count: u64::from_le_bytes(count),
        })
    }

    pub fn to_account_data(&self) -> Vec<u8> {
        let mut data = COUNTER_DISCRIMINATOR.to_vec();
        data.extend_from_slice(&self.count.to_le_bytes());
        data
    }
}

/// The counter PDA `["counter"]` of `program_id`. The same identity is used
/// on the base ledger, in compressed state and on the ephemeral layer.
pub fn find_counter_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COUNTER_SEED], program_id)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_counter() {
        let data = Counter { count: 42 }.to_account_data();
        assert_eq!(data.len(), Counter::LEN);
        assert_eq!(
            Counter::try_from_account_data(&data).unwrap(),
            Counter { count: 42 }
        );

        let mut padded = data.clone();
        padded.extend_from_slice(&[0; 16]);
        assert_eq!(Counter::try_from_account_data(&padded).unwrap().count, 42);
    }

    #[test]
    fn test_decode_counter_errors() {
        assert_eq!(
            Counter::try_from_account_data(&[0; 4]),
            Err(DelegationSdkError::AccountDataTooSmall {
                expected: 16,
                actual: 4
            })
        );
        let mut data = Counter { count: 1 }.to_account_data();
        data[0] = 0;
        let mut expected = COUNTER_DISCRIMINATOR;
        expected[0] = 0;
        assert_eq!(
            Counter::try_from_account_data(&data),
            Err(DelegationSdkError::InvalidDiscriminator(expected))
        );
    }

    #[test]
    fn test_counter_address_is_stable() {
        let program_id = Pubkey::new_unique();
        assert_eq!(
            find_counter_address(&program_id),
            find_counter_address(&program_id)
        );
        assert_ne!(
            find_counter_address(&program_id).0,
            find_counter_address(&Pubkey::new_unique()).0
        );
    }
}
