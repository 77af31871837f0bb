use std::fmt;

use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::SigningKey;

use af2_signatories_types::{personal_message_hash, signed_message, AgreementId};

use crate::recovery::address_of;

/// A party's key, signing the way wallets do for `signMessage(bytes)`.
pub struct PartySigner {
    key: SigningKey,
    address: Address,
}

impl PartySigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// Load a raw 32-byte secp256k1 secret.
    pub fn from_slice(secret: &[u8]) -> Result<Self, k256::ecdsa::Error> {
        SigningKey::from_slice(secret).map(Self::new)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign the personal-message wrap of `message`, returning `r || s || v` with v in {27, 28}.
    pub fn sign_message(&self, message: FixedBytes<32>) -> Result<Vec<u8>, k256::ecdsa::Error> {
        let digest = personal_message_hash(message.as_slice());
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(digest.as_slice())?;

        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&signature.to_bytes());
        out.push(27 + recovery_id.to_byte());
        Ok(out)
    }

    /// Evidence for `id`: a signature over `keccak256(id || payloadHash)`.
    pub fn sign_agreement(
        &self,
        id: AgreementId,
        payload_hash: FixedBytes<32>,
    ) -> Result<Vec<u8>, k256::ecdsa::Error> {
        self.sign_message(signed_message(id, payload_hash))
    }
}

impl fmt::Debug for PartySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartySigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
