//! Sign/cancel state machine.
//!
//! A transition runs in two phases:
//! - authorisation ([`Signatories::authorize_sign`], [`Signatories::authorize_cancel`]) is pure:
//!   it hashes, recovers signers and checks the identifier, without touching storage;
//! - commit ([`Transition::apply`]) checks the current status and performs the single write.
//!
//! Hosts that serialise execution (the contract) run both back to back via
//! [`Signatories::sign`]/[`Signatories::cancel`]. Concurrent hosts run the first phase outside
//! their per-id lock and only the commit under it.

use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes};

use crate::{
    agreement::{Agreement, AgreementId, Outcome, Status},
    digest::{derive_id, signed_message},
    errors::{AgreementError, Party},
    recovery::SignerRecovery,
    store::AgreementStore,
};

/// State machine bound to one service address.
#[derive(Clone, Debug)]
pub struct Signatories<R> {
    service: Address,
    recovery: R,
}

impl<R: SignerRecovery> Signatories<R> {
    pub const fn new(service: Address, recovery: R) -> Self {
        Self { service, recovery }
    }

    /// Address bound into every identifier this instance accepts.
    pub const fn service_address(&self) -> Address {
        self.service
    }

    /// Authorise `caller` (party B) to sign `id`.
    ///
    /// Order: A's evidence, then the identifier. B's evidence is recovered here but only reported
    /// by [`Transition::apply`] once the record is known to be open.
    pub fn authorize_sign(
        &self,
        caller: Address,
        id: AgreementId,
        addr_a: Address,
        payload_hash: FixedBytes<32>,
        sign_a: &[u8],
        sign_b: &[u8],
    ) -> Result<Transition, AgreementError> {
        let message = signed_message(id, payload_hash);

        if self.recovery.recover_signer(message, sign_a) != Some(addr_a) {
            return Err(AgreementError::InvalidEvidence(Party::A));
        }
        if derive_id(addr_a, caller, self.service, payload_hash) != id {
            return Err(AgreementError::InvalidIdentifier);
        }

        let signed_by_caller = self.recovery.recover_signer(message, sign_b) == Some(caller);

        Ok(Transition {
            id,
            actor: caller,
            target: Status::Signed,
            evidence: sign_b.to_vec(),
            deferred: (!signed_by_caller).then_some(AgreementError::InvalidEvidence(Party::B)),
        })
    }

    /// Authorise `caller` (party A) to cancel `id`.
    ///
    /// The identifier is checked before A's evidence: a cancel driven by B fails as an identifier
    /// mismatch whatever signature it carries.
    pub fn authorize_cancel(
        &self,
        caller: Address,
        id: AgreementId,
        addr_b: Address,
        payload_hash: FixedBytes<32>,
        sign_a: &[u8],
    ) -> Result<Transition, AgreementError> {
        if derive_id(caller, addr_b, self.service, payload_hash) != id {
            return Err(AgreementError::InvalidIdentifier);
        }

        let message = signed_message(id, payload_hash);
        if self.recovery.recover_signer(message, sign_a) != Some(caller) {
            return Err(AgreementError::InvalidEvidence(Party::A));
        }

        Ok(Transition {
            id,
            actor: caller,
            target: Status::Canceled,
            evidence: sign_a.to_vec(),
            deferred: None,
        })
    }

    pub fn sign<S: AgreementStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Address,
        id: AgreementId,
        addr_a: Address,
        payload_hash: FixedBytes<32>,
        sign_a: &[u8],
        sign_b: &[u8],
    ) -> Result<Outcome, AgreementError> {
        self.authorize_sign(caller, id, addr_a, payload_hash, sign_a, sign_b)?
            .apply(store)
    }

    pub fn cancel<S: AgreementStore + ?Sized>(
        &self,
        store: &mut S,
        caller: Address,
        id: AgreementId,
        addr_b: Address,
        payload_hash: FixedBytes<32>,
        sign_a: &[u8],
    ) -> Result<Outcome, AgreementError> {
        self.authorize_cancel(caller, id, addr_b, payload_hash, sign_a)?
            .apply(store)
    }

    pub fn query<S: AgreementStore + ?Sized>(&self, store: &S, id: AgreementId) -> Agreement {
        store.get(&id)
    }
}

/// An authorised, not yet committed, transition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a transition does nothing until applied"]
pub struct Transition {
    id: AgreementId,
    actor: Address,
    target: Status,
    evidence: Vec<u8>,
    /// Rejection reported only after the status check.
    deferred: Option<AgreementError>,
}

impl Transition {
    pub fn id(&self) -> AgreementId {
        self.id
    }

    pub fn actor(&self) -> Address {
        self.actor
    }

    pub fn target(&self) -> Status {
        self.target
    }

    /// Check the record is still open and write it. Nothing is written on error.
    pub fn apply<S: AgreementStore + ?Sized>(self, store: &mut S) -> Result<Outcome, AgreementError> {
        match store.status(&self.id) {
            Status::Signed => return Err(AgreementError::AlreadySigned),
            Status::Canceled => return Err(AgreementError::AlreadyCanceled),
            Status::Undefined => {}
        }
        if let Some(err) = self.deferred {
            return Err(err);
        }

        store.set(self.id, self.target, self.evidence);
        Ok(Outcome {
            actor: self.actor,
            id: self.id,
            status: self.target,
        })
    }
}
