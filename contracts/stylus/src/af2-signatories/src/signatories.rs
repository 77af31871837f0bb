//! Contract entrypoint: storage layout and the public ABI.
//!
//! ABI surface (Solidity names):
//! - `query(bytes32) returns (uint8 status, bytes evidence)`
//! - `sign(bytes32 id, address addrA, bytes32 hashC, bytes signA, bytes signB)`
//! - `cancel(bytes32 id, address addrB, bytes32 hashC, bytes signA)`
//! - `getOwnerSC() returns (address)`, `getAddrSC() returns (address)`
//!
//! Rejections revert with `Error(string)` carrying the protocol reason string.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{aliases::U8, Address, FixedBytes},
    prelude::*,
    stylus_core::log,
};

use af2_signatories_types::{Agreement, AgreementId, AgreementStore, Outcome, Signatories, Status};

use crate::{errors::revert_data, events, utils::crypto::EcrecoverPrecompile};

sol_storage! {
    #[entrypoint]
    pub struct Af2Signatories {
        /// Deployer, fixed by the constructor.
        address owner;

        /// Agreement records by id. Ids never written read as `Undefined` with empty evidence.
        mapping(bytes32 => AgreementSlot) agreements;
    }

    /// Stored form of an agreement record.
    pub struct AgreementSlot {
        uint8 status;
        bytes evidence;
    }
}

#[public]
impl Af2Signatories {
    #[constructor]
    pub fn constructor(&mut self) {
        // Deployment goes through the Stylus deployer contract, so the deployer EOA is the
        // transaction origin rather than the message sender.
        let owner = self.vm().tx_origin();
        self.owner.set(owner);
    }

    #[selector(name = "getOwnerSC")]
    pub fn get_owner_sc(&self) -> Address {
        self.owner.get()
    }

    #[selector(name = "getAddrSC")]
    pub fn get_addr_sc(&self) -> Address {
        self.vm().contract_address()
    }

    /// Current `(status, evidence)` for `id`. Never reverts.
    pub fn query(&self, id: FixedBytes<32>) -> (u8, Bytes) {
        let agreement = self.machine().query(self, id);
        (agreement.status.as_u8(), Bytes::from(agreement.evidence))
    }

    /// Accept an agreement as party B (the caller).
    ///
    /// `sign_a` must recover to `addr_a` and `sign_b` to the caller, both over
    /// `keccak256(id || hash_c)`. Stores `sign_b` as evidence.
    pub fn sign(
        &mut self,
        id: FixedBytes<32>,
        addr_a: Address,
        hash_c: FixedBytes<32>,
        sign_a: Bytes,
        sign_b: Bytes,
    ) -> Result<(), Vec<u8>> {
        let caller = self.vm().msg_sender();
        let transition = self
            .machine()
            .authorize_sign(caller, id, addr_a, hash_c, sign_a.as_slice(), sign_b.as_slice())
            .map_err(revert_data)?;
        let outcome = transition.apply(self).map_err(revert_data)?;
        self.emit_outcome(outcome);
        Ok(())
    }

    /// Withdraw an agreement as party A (the caller). Stores `sign_a` as evidence.
    pub fn cancel(
        &mut self,
        id: FixedBytes<32>,
        addr_b: Address,
        hash_c: FixedBytes<32>,
        sign_a: Bytes,
    ) -> Result<(), Vec<u8>> {
        let caller = self.vm().msg_sender();
        let transition = self
            .machine()
            .authorize_cancel(caller, id, addr_b, hash_c, sign_a.as_slice())
            .map_err(revert_data)?;
        let outcome = transition.apply(self).map_err(revert_data)?;
        self.emit_outcome(outcome);
        Ok(())
    }
}

impl Af2Signatories {
    /// Borrows the host; commit only after the returned machine is dropped.
    fn machine(&self) -> Signatories<EcrecoverPrecompile<'_>> {
        Signatories::new(self.vm().contract_address(), EcrecoverPrecompile::new(self.vm()))
    }

    /// Only called once the record has been written.
    fn emit_outcome(&self, outcome: Outcome) {
        log(
            self.vm(),
            events::Result {
                actor: outcome.actor,
                id: outcome.id,
                outcome: outcome.label().into(),
            },
        );
    }
}

impl AgreementStore for Af2Signatories {
    fn get(&self, id: &AgreementId) -> Agreement {
        let slot = self.agreements.getter(*id);
        Agreement::new(decode_status(slot.status.get()), slot.evidence.get_bytes())
    }

    fn status(&self, id: &AgreementId) -> Status {
        decode_status(self.agreements.getter(*id).status.get())
    }

    fn set(&mut self, id: AgreementId, status: Status, evidence: Vec<u8>) {
        let mut slot = self.agreements.setter(id);
        slot.status.set(U8::from(status.as_u8()));
        slot.evidence.set_bytes(evidence);
    }
}

/// Only values written by `set` are ever stored.
fn decode_status(raw: U8) -> Status {
    Status::try_from(raw.to::<u8>()).unwrap_or_default()
}
