use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use counter_delegation_sdk::{counter::Counter, Pubkey};
use solana_sdk::account::Account;
use tracing::{debug, trace};

use super::{
    state::{ActionGates, OwnerPrograms, OwnerTag, OwnershipState},
    OwnershipError,
};
use crate::rpc::RpcConnection;

/// Which ledger an observation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Base,
    Ephemeral,
}

/// Tracks who owns the counter on the base and the ephemeral ledger.
///
/// The state only changes on observations, a one-shot [`fetch`] or a
/// subscription notification. Sending a transaction does not change it.
///
/// [`fetch`]: OwnershipTracker::fetch
#[derive(Debug, Clone)]
pub struct OwnershipTracker {
    counter: Pubkey,
    programs: OwnerPrograms,
    state: Arc<RwLock<OwnershipState>>,
}

impl OwnershipTracker {
    pub fn new(counter: Pubkey, programs: OwnerPrograms) -> Self {
        Self {
            counter,
            programs,
            state: Arc::new(RwLock::new(OwnershipState::default())),
        }
    }

    pub fn counter(&self) -> Pubkey {
        self.counter
    }

    pub fn programs(&self) -> &OwnerPrograms {
        &self.programs
    }

    fn read(&self) -> RwLockReadGuard<'_, OwnershipState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, OwnershipState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> OwnershipState {
        *self.read()
    }

    pub fn gates(&self) -> ActionGates {
        self.read().gates()
    }

    fn decode_counter(&self, data: &[u8]) -> Result<u64, OwnershipError> {
        Counter::try_from_account_data(data)
            .map(|counter| counter.count)
            .map_err(|source| OwnershipError::CounterDecode {
                account: self.counter.to_string(),
                source,
            })
    }

    /// Applies an observed account of `layer`. Data is decoded as a counter
    /// when present, the owner is recorded in any case.
    pub fn apply_update(
        &self,
        layer: Layer,
        owner: &Pubkey,
        data: &[u8],
    ) -> Result<OwnerTag, OwnershipError> {
        let tag = self.programs.classify(owner);
        let count = if data.is_empty() {
            None
        } else {
            Some(self.decode_counter(data))
        };

        let mut state = self.write();
        match layer {
            Layer::Base => state.mainnet_owner = Some(tag),
            Layer::Ephemeral => state.ephemeral_owner = Some(tag),
        }
        trace!("{:?} owner of {} is {:?}", layer, self.counter, tag);

        match count {
            Some(Ok(count)) => {
                match layer {
                    Layer::Base => state.mainnet_counter = Some(count),
                    Layer::Ephemeral => state.ephemeral_counter = Some(count),
                }
                Ok(tag)
            }
            Some(Err(e)) => Err(e),
            None => Ok(tag),
        }
    }

    /// Reads the counter once from both ledgers.
    ///
    /// The ephemeral ledger is only queried while the base account is owned
    /// by the compressed delegation program.
    pub async fn fetch<B, E>(
        &self,
        base: &B,
        ephemeral: &E,
    ) -> Result<OwnershipState, OwnershipError>
    where
        B: RpcConnection + ?Sized,
        E: RpcConnection + ?Sized,
    {
        let Some(account) = base.get_account(self.counter).await? else {
            debug!("Counter {} does not exist on the base ledger", self.counter);
            return Ok(self.snapshot());
        };
        let tag = self.programs.classify(&account.owner);
        if tag == OwnerTag::CompressedDelegationProgram {
            self.apply_update(Layer::Base, &account.owner, &[])?;
            if let Some(ephemeral_account) = ephemeral.get_account(self.counter).await? {
                self.apply_account(Layer::Ephemeral, &ephemeral_account)?;
            }
        } else {
            self.apply_account(Layer::Base, &account)?;
        }
        Ok(self.snapshot())
    }

    fn apply_account(&self, layer: Layer, account: &Account) -> Result<OwnerTag, OwnershipError> {
        self.apply_update(layer, &account.owner, &account.data)
    }
}
