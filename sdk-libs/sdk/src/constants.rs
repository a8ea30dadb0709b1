use solana_sdk::pubkey;

use crate::Pubkey;

/// Seed of the CPI authority.
pub const CPI_AUTHORITY_PDA_SEED: &[u8] = b"cpi_authority";

/// ID of the account-compression program.
pub const PROGRAM_ID_ACCOUNT_COMPRESSION: Pubkey =
    pubkey!("compr6CUsB5m2jS4Y3831ztGSTnDpnKJTKS95d64XVq");
pub const PROGRAM_ID_NOOP: Pubkey = pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");
/// ID of the light-system program.
pub const PROGRAM_ID_LIGHT_SYSTEM: Pubkey = pubkey!("SySTEM1eSU2p4BGQfQpimFEWWSC1XDFeun3Nqzz3rT7");
pub const PROGRAM_ID_SYSTEM: Pubkey = pubkey!("11111111111111111111111111111111");

pub const ACCOUNT_COMPRESSION_AUTHORITY_PDA: Pubkey =
    pubkey!("HwXnGK3tPkkVY6P439H2p68AxpeuWXd5PcrAxFpbmfbA");
/// Registered program record of the light-system program.
pub const REGISTERED_PROGRAM_PDA: Pubkey = pubkey!("35hkDgaAKwMCaxRz2ocSZ6NaUrtKkyNqU6c4RV3tYJRh");

/// Delegation program of the ephemeral layer.
pub const DELEGATION_PROGRAM_ID: Pubkey = pubkey!("DELeGGvXpWV2fqJUhqcF5ZSYMS4JTLjteaAMARRSaeSh");
pub const MAGIC_PROGRAM_ID: Pubkey = pubkey!("Magic11111111111111111111111111111111111111");
pub const MAGIC_CONTEXT_ID: Pubkey = pubkey!("MagicContext1111111111111111111111111111111");

/// Batched (v2) address tree the delegation records live in.
pub const ADDRESS_TREE: Pubkey = pubkey!("EzKE84aVTkCUhDHLELqyJaq1Y7UVVmqxXqZjVHwHY3rK");
/// Output queue paired with [`ADDRESS_TREE`].
pub const OUTPUT_QUEUE: Pubkey = pubkey!("6L7SzhYB3anwEQ9cphpJ1U7Scwj57bx2xueReg7R9cKU");

pub const DEFAULT_VALIDATOR: Pubkey = pubkey!("45cWPYAk14mYTsn5GvNu89y3kxA1XqAzzbPH7bSPCajA");

pub const COUNTER_SEED: &[u8] = b"counter";
pub const EPHEMERAL_BALANCE_SEED: &[u8] = b"balance";
pub const DELEGATE_BUFFER_SEED: &[u8] = b"buffer";
pub const DELEGATION_RECORD_SEED: &[u8] = b"delegation";
pub const DELEGATION_METADATA_SEED: &[u8] = b"delegation-metadata";

// sha256("global:<instruction>")[..8]
pub const CREATE_COUNTER: [u8; 8] = [174, 255, 78, 222, 78, 250, 200, 80];
pub const INCREMENT_COUNTER: [u8; 8] = [16, 125, 2, 171, 73, 24, 207, 229];
pub const DELEGATE: [u8; 8] = [90, 147, 75, 178, 85, 88, 4, 137];
pub const UNDELEGATE: [u8; 8] = [131, 148, 180, 198, 91, 104, 42, 238];
pub const SCHEDULE_UNDELEGATE: [u8; 8] = [49, 76, 90, 144, 21, 32, 70, 55];
pub const FUND_EPHEMERAL_BALANCE: [u8; 8] = [129, 167, 30, 178, 43, 86, 171, 157];

/// sha256("account:Counter")[..8]
pub const COUNTER_DISCRIMINATOR: [u8; 8] = [255, 176, 4, 245, 188, 253, 124, 25];

/// Compute unit limit for instructions carrying a validity proof.
pub const PROOF_COMPUTE_UNIT_LIMIT: u32 = 1_000_000;
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 200_000;
