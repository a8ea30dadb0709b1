use crate::{
    AccountMeta, Pubkey, ACCOUNT_COMPRESSION_AUTHORITY_PDA, CPI_AUTHORITY_PDA_SEED,
    PROGRAM_ID_ACCOUNT_COMPRESSION, PROGRAM_ID_LIGHT_SYSTEM, PROGRAM_ID_NOOP, PROGRAM_ID_SYSTEM,
    REGISTERED_PROGRAM_PDA,
};

/// Which protocol accounts the receiving program expects in front of its
/// packed accounts.
///
/// The layout is a property of the program being called: the compressed
/// delegation program expects [`SystemAccountVariant::Small`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SystemAccountVariant {
    #[default]
    Full,
    Small,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SystemAccountMetaConfig {
    pub self_program: Pubkey,
    pub cpi_context: Option<Pubkey>,
    pub sol_compression_recipient: Option<Pubkey>,
    pub sol_pool_pda: Option<Pubkey>,
}

impl SystemAccountMetaConfig {
    pub fn new(self_program: Pubkey) -> Self {
        Self {
            self_program,
            ..Default::default()
        }
    }

    pub fn new_with_cpi_context(self_program: Pubkey, cpi_context: Pubkey) -> Self {
        Self {
            self_program,
            cpi_context: Some(cpi_context),
            ..Default::default()
        }
    }

    pub fn cpi_signer(&self) -> Pubkey {
        get_cpi_authority_pda(&self.self_program)
    }
}

/// CPI authority of `program_id`, the signer it uses when invoking the
/// light system program.
pub fn get_cpi_authority_pda(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[CPI_AUTHORITY_PDA_SEED], program_id).0
}

pub fn get_light_system_account_metas(config: SystemAccountMetaConfig) -> Vec<AccountMeta> {
    let cpi_signer = config.cpi_signer();

    let mut vec = vec![
        // 1. Light system program
        AccountMeta::new_readonly(PROGRAM_ID_LIGHT_SYSTEM, false),
        // 2. CPI signer of the invoking program
        AccountMeta::new_readonly(cpi_signer, false),
        // 3. Registered program PDA
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        // 4. Noop program
        AccountMeta::new_readonly(PROGRAM_ID_NOOP, false),
        // 5. Account compression authority
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY_PDA, false),
        // 6. Account compression program
        AccountMeta::new_readonly(PROGRAM_ID_ACCOUNT_COMPRESSION, false),
        // 7. Invoking program
        AccountMeta::new_readonly(config.self_program, false),
    ];
    if let Some(pubkey) = config.sol_pool_pda {
        vec.push(AccountMeta::new(pubkey, false));
    }
    if let Some(pubkey) = config.sol_compression_recipient {
        vec.push(AccountMeta::new(pubkey, false));
    }
    vec.push(AccountMeta::new_readonly(PROGRAM_ID_SYSTEM, false));
    if let Some(pubkey) = config.cpi_context {
        vec.push(AccountMeta::new(pubkey, false));
    }
    vec
}

/// Same accounts as [`get_light_system_account_metas`] without the noop
/// program and the invoking program.
pub fn get_light_system_account_metas_small(config: SystemAccountMetaConfig) -> Vec<AccountMeta> {
    let cpi_signer = config.cpi_signer();

    let mut vec = vec![
        AccountMeta::new_readonly(PROGRAM_ID_LIGHT_SYSTEM, false),
        AccountMeta::new_readonly(cpi_signer, false),
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY_PDA, false),
        AccountMeta::new_readonly(PROGRAM_ID_ACCOUNT_COMPRESSION, false),
        AccountMeta::new_readonly(PROGRAM_ID_SYSTEM, false),
    ];
    if let Some(pubkey) = config.sol_pool_pda {
        vec.push(AccountMeta::new(pubkey, false));
    }
    if let Some(pubkey) = config.sol_compression_recipient {
        vec.push(AccountMeta::new(pubkey, false));
    }
    if let Some(pubkey) = config.cpi_context {
        vec.push(AccountMeta::new(pubkey, false));
    }
    vec
}
