//! Signer recovery seam.
//!
//! The contract recovers through the EVM `ecrecover` precompile; off-chain tooling recovers with
//! `k256`. Both implement [`SignerRecovery`] over the same 65-byte `r || s || v` layout.

use alloy_primitives::{Address, FixedBytes};

use crate::digest::personal_message_hash;

/// A 65-byte signature split into its components, with `v` normalised to a recovery id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableParts {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// 0 or 1.
    pub recovery_id: u8,
}

impl RecoverableParts {
    /// `v` in the 27/28 form expected by `ecrecover`.
    pub const fn v(&self) -> u8 {
        self.recovery_id + 27
    }
}

/// Split `r || s || v`. Accepts `v` in {0, 1, 27, 28}; anything else is not a signature.
pub fn split_signature(sig: &[u8]) -> Option<RecoverableParts> {
    if sig.len() != 65 {
        return None;
    }
    let recovery_id = match sig[64] {
        27 | 28 => sig[64] - 27,
        0 | 1 => sig[64],
        _ => return None,
    };
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig[0..32]);
    s.copy_from_slice(&sig[32..64]);
    Some(RecoverableParts { r, s, recovery_id })
}

/// Recovers the address that produced a signature.
pub trait SignerRecovery {
    /// Recover from a raw 32-byte digest. `None` when the signature is malformed or no public key
    /// can be recovered.
    fn recover_prehash(&self, digest: FixedBytes<32>, signature: &[u8]) -> Option<Address>;

    /// Recover the signer of `message` under the personal-message domain wrap.
    ///
    /// A `None` never equals an expected address, so callers fall through to their
    /// invalid-evidence path.
    fn recover_signer(&self, message: FixedBytes<32>, signature: &[u8]) -> Option<Address> {
        self.recover_prehash(personal_message_hash(message.as_slice()), signature)
    }
}

impl<R: SignerRecovery + ?Sized> SignerRecovery for &R {
    fn recover_prehash(&self, digest: FixedBytes<32>, signature: &[u8]) -> Option<Address> {
        (**self).recover_prehash(digest, signature)
    }
}
