pub mod address;
pub mod constants;
pub use constants::*;
pub mod counter;
pub mod error;
pub mod instruction;
pub mod proof;

pub use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
