use counter_delegation_sdk::Pubkey;

use crate::config::DelegationConfig;

/// Owner of the counter account, classified against the programs of the
/// delegation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerTag {
    BaseProgram,
    DelegationProgram,
    CompressedDelegationProgram,
    Unknown(Pubkey),
}

/// Programs an owner is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerPrograms {
    pub base_program: Pubkey,
    pub delegation_program: Pubkey,
    pub compressed_delegation_program: Pubkey,
}

impl OwnerPrograms {
    pub fn new(
        base_program: Pubkey,
        delegation_program: Pubkey,
        compressed_delegation_program: Pubkey,
    ) -> Self {
        Self {
            base_program,
            delegation_program,
            compressed_delegation_program,
        }
    }

    pub fn classify(&self, owner: &Pubkey) -> OwnerTag {
        if *owner == self.base_program {
            OwnerTag::BaseProgram
        } else if *owner == self.delegation_program {
            OwnerTag::DelegationProgram
        } else if *owner == self.compressed_delegation_program {
            OwnerTag::CompressedDelegationProgram
        } else {
            OwnerTag::Unknown(*owner)
        }
    }
}

impl From<&DelegationConfig> for OwnerPrograms {
    fn from(config: &DelegationConfig) -> Self {
        Self {
            base_program: config.counter_program_id,
            delegation_program: config.delegation_program_id,
            compressed_delegation_program: config.compressed_delegation_program_id,
        }
    }
}

/// Last observed owners and counter values. `None` means not observed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnershipState {
    pub mainnet_owner: Option<OwnerTag>,
    pub ephemeral_owner: Option<OwnerTag>,
    pub mainnet_counter: Option<u64>,
    pub ephemeral_counter: Option<u64>,
}

impl OwnershipState {
    pub fn gates(&self) -> ActionGates {
        ActionGates::from(self)
    }
}

/// Actions that are valid for an [`OwnershipState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionGates {
    pub delegate: bool,
    pub undelegate: bool,
    pub increment_mainnet: bool,
    pub increment_ephemeral: bool,
    pub schedule_undelegate: bool,
}

impl From<&OwnershipState> for ActionGates {
    fn from(state: &OwnershipState) -> Self {
        let mainnet = state.mainnet_owner;
        let ephemeral = state.ephemeral_owner;
        let ephemeral_is_base = ephemeral == Some(OwnerTag::BaseProgram);
        Self {
            delegate: matches!(mainnet, None | Some(OwnerTag::BaseProgram)),
            undelegate: ephemeral == Some(OwnerTag::DelegationProgram)
                && mainnet == Some(OwnerTag::CompressedDelegationProgram),
            increment_mainnet: mainnet != Some(OwnerTag::CompressedDelegationProgram),
            increment_ephemeral: ephemeral_is_base,
            schedule_undelegate: ephemeral_is_base,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn programs() -> OwnerPrograms {
        OwnerPrograms::new(Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique())
    }

    #[test]
    fn test_classify() {
        let programs = programs();
        assert_eq!(
            programs.classify(&programs.base_program),
            OwnerTag::BaseProgram
        );
        assert_eq!(
            programs.classify(&programs.delegation_program),
            OwnerTag::DelegationProgram
        );
        assert_eq!(
            programs.classify(&counter_delegation_sdk::DELEGATION_PROGRAM_ID),
            OwnerTag::Unknown(counter_delegation_sdk::DELEGATION_PROGRAM_ID)
        );
        assert_eq!(
            programs.classify(&programs.compressed_delegation_program),
            OwnerTag::CompressedDelegationProgram
        );
        let other = Pubkey::new_unique();
        assert_eq!(programs.classify(&other), OwnerTag::Unknown(other));
    }

    #[test]
    fn test_programs_follow_config() {
        let mut config = DelegationConfig::new(Pubkey::new_unique(), Pubkey::new_unique());
        config.delegation_program_id = Pubkey::new_unique();
        let programs = OwnerPrograms::from(&config);
        assert_eq!(
            programs,
            OwnerPrograms::new(
                config.counter_program_id,
                config.delegation_program_id,
                config.compressed_delegation_program_id,
            )
        );
        assert_eq!(
            programs.classify(&config.delegation_program_id),
            OwnerTag::DelegationProgram
        );
    }

    #[test]
    fn test_gates_initial_state() {
        let gates = OwnershipState::default().gates();
        assert!(gates.delegate);
        assert!(gates.increment_mainnet);
        assert!(!gates.undelegate);
        assert!(!gates.increment_ephemeral);
        assert!(!gates.schedule_undelegate);
    }

    #[test]
    fn test_gates_on_base_ledger() {
        let state = OwnershipState {
            mainnet_owner: Some(OwnerTag::BaseProgram),
            mainnet_counter: Some(3),
            ..Default::default()
        };
        let gates = state.gates();
        assert!(gates.delegate);
        assert!(gates.increment_mainnet);
        assert!(!gates.undelegate);
    }

    #[test]
    fn test_gates_delegated() {
        let state = OwnershipState {
            mainnet_owner: Some(OwnerTag::CompressedDelegationProgram),
            ephemeral_owner: Some(OwnerTag::BaseProgram),
            ephemeral_counter: Some(4),
            ..Default::default()
        };
        let gates = state.gates();
        assert!(!gates.delegate);
        assert!(!gates.increment_mainnet);
        assert!(!gates.undelegate);
        assert!(gates.increment_ephemeral);
        assert!(gates.schedule_undelegate);
    }

    #[test]
    fn test_gates_undelegation_scheduled() {
        let state = OwnershipState {
            mainnet_owner: Some(OwnerTag::CompressedDelegationProgram),
            ephemeral_owner: Some(OwnerTag::DelegationProgram),
            ..Default::default()
        };
        let gates = state.gates();
        assert!(gates.undelegate);
        assert!(!gates.delegate);
        assert!(!gates.increment_ephemeral);
        assert!(!gates.schedule_undelegate);
    }

    #[test]
    fn test_gates_unknown_owner() {
        let state = OwnershipState {
            mainnet_owner: Some(OwnerTag::Unknown(Pubkey::new_unique())),
            ..Default::default()
        };
        let gates = state.gates();
        assert!(!gates.delegate);
        assert!(gates.increment_mainnet);
    }
}
