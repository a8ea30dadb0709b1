use thiserror::Error;

pub type Result<T> = std::result::Result<T, DelegationSdkError>;

#[derive(Debug, Error, PartialEq)]
pub enum DelegationSdkError {
    #[error("Borsh error.")]
    Borsh,
    #[error("Proof component `{0}` has invalid length {1}")]
    InvalidProofLength(&'static str, usize),
    #[error("Account data is too small: expected at least {expected} bytes, got {actual}")]
    AccountDataTooSmall { expected: usize, actual: usize },
    #[error("Invalid account discriminator: {0:?}")]
    InvalidDiscriminator([u8; 8]),
    #[error("Root index {0} does not fit into u16")]
    RootIndexOverflow(u64),
    #[error("Leaf index {0} does not fit into u32")]
    LeafIndexOverflow(u64),
    #[error("Packed accounts are limited to {} distinct accounts", u8::MAX as usize + 1)]
    TooManyAccounts,
    #[error("Tree type {0:?} cannot be used as output tree")]
    InvalidPackTreeType(crate::instruction::TreeType),
}
