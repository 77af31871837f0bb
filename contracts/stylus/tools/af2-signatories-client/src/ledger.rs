//! Concurrent in-memory host for the agreement state machine.
//!
//! Off-chain there is no EVM to serialise transactions, so the ledger provides the equivalent
//! per-id exclusion itself. Records are spread over shards, each a `RwLock<MemoryStore>`:
//! - signature recovery and identifier checks run before any lock is taken;
//! - the status check and the single write run under the shard's write lock, so of a racing
//!   `sign` and `cancel` the first to commit wins and the other observes the terminal status;
//! - the outcome is broadcast after the lock is released.
//!
//! Ids are keccak digests, so their leading bytes already spread uniformly across shards.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use alloy_primitives::{Address, FixedBytes};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

use af2_signatories_types::{
    Agreement, AgreementError, AgreementId, AgreementStore, MemoryStore, Outcome, SignerRecovery,
    Signatories, Transition,
};

use crate::recovery::K256Recovery;

/// Immutable ledger configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Administrative owner (`getOwnerSC`).
    pub owner: Address,
    /// Service address bound into every agreement id (`getAddrSC`).
    pub service: Address,
    /// Number of lock shards.
    pub shards: usize,
    /// Outcomes buffered per subscriber before slow receivers start lagging.
    pub event_capacity: usize,
}

impl LedgerConfig {
    pub const DEFAULT_SHARDS: usize = 16;
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    pub fn new(owner: Address, service: Address) -> Self {
        Self {
            owner,
            service,
            shards: Self::DEFAULT_SHARDS,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }
}

/// In-memory agreement ledger.
pub struct Ledger<R = K256Recovery> {
    owner: Address,
    machine: Signatories<R>,
    shards: Box<[RwLock<MemoryStore>]>,
    outcomes: broadcast::Sender<Outcome>,
}

impl Ledger<K256Recovery> {
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_recovery(config, K256Recovery)
    }
}

impl<R: SignerRecovery> Ledger<R> {
    pub fn with_recovery(config: LedgerConfig, recovery: R) -> Self {
        let shards = (0..config.shards.max(1))
            .map(|_| RwLock::new(MemoryStore::new()))
            .collect();
        let (outcomes, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            owner: config.owner,
            machine: Signatories::new(config.service, recovery),
            shards,
            outcomes,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn service_address(&self) -> Address {
        self.machine.service_address()
    }

    /// Receive every outcome committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Outcome> {
        self.outcomes.subscribe()
    }

    /// Current record for `id`; `Undefined` with empty evidence if never written.
    pub fn query(&self, id: AgreementId) -> Agreement {
        self.read_shard(&id).get(&id)
    }

    /// Accept `id` as party B (`caller`).
    #[instrument(skip_all, fields(id = %id, actor = %caller))]
    pub fn sign(
        &self,
        caller: Address,
        id: AgreementId,
        addr_a: Address,
        payload_hash: FixedBytes<32>,
        sign_a: &[u8],
        sign_b: &[u8],
    ) -> Result<Outcome, AgreementError> {
        let transition = self
            .machine
            .authorize_sign(caller, id, addr_a, payload_hash, sign_a, sign_b)
            .inspect_err(|err| debug!(reason = %err, "sign rejected"))?;
        self.commit(transition)
    }

    /// Withdraw `id` as party A (`caller`).
    #[instrument(skip_all, fields(id = %id, actor = %caller))]
    pub fn cancel(
        &self,
        caller: Address,
        id: AgreementId,
        addr_b: Address,
        payload_hash: FixedBytes<32>,
        sign_a: &[u8],
    ) -> Result<Outcome, AgreementError> {
        let transition = self
            .machine
            .authorize_cancel(caller, id, addr_b, payload_hash, sign_a)
            .inspect_err(|err| debug!(reason = %err, "cancel rejected"))?;
        self.commit(transition)
    }

    fn commit(&self, transition: Transition) -> Result<Outcome, AgreementError> {
        let id = transition.id();
        let committed = {
            // A poisoned shard still holds whole records: `set` is a single insert.
            let mut shard = self.shards[self.shard_index(&id)]
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            transition.apply(&mut *shard)
        };
        let outcome = committed.inspect_err(|err| debug!(reason = %err, "commit rejected"))?;

        info!(outcome = outcome.label(), "agreement committed");
        // Having no subscribers is not an error.
        let _ = self.outcomes.send(outcome.clone());
        Ok(outcome)
    }

    fn read_shard(&self, id: &AgreementId) -> RwLockReadGuard<'_, MemoryStore> {
        self.shards[self.shard_index(id)]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn shard_index(&self, id: &AgreementId) -> usize {
        let mut word = [0u8; 8];
        word.copy_from_slice(&id.as_slice()[..8]);
        (u64::from_be_bytes(word) % self.shards.len() as u64) as usize
    }
}
