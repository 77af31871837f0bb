use alloy_primitives::{keccak256, Address, FixedBytes};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use af2_signatories_types::{split_signature, SignerRecovery};

/// Ethereum address of a public key: low 20 bytes of `keccak256(x || y)`.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the SEC1 0x04 tag.
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash.as_slice()[12..])
}

/// [`SignerRecovery`] over `k256`, matching `ecrecover`.
#[derive(Clone, Copy, Debug, Default)]
pub struct K256Recovery;

impl SignerRecovery for K256Recovery {
    fn recover_prehash(&self, digest: FixedBytes<32>, signature: &[u8]) -> Option<Address> {
        let parts = split_signature(signature)?;

        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&parts.r);
        rs[32..].copy_from_slice(&parts.s);
        let sig = Signature::from_slice(&rs).ok()?;
        let recovery_id = RecoveryId::from_byte(parts.recovery_id)?;

        // `ecrecover` accepts high-s signatures but k256 only verifies low-s ones. Negating s
        // flips the parity of the recovered point.
        let (sig, recovery_id) = match sig.normalize_s() {
            Some(low) => (
                low,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (sig, recovery_id),
        };

        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id).ok()?;
        Some(address_of(&key))
    }
}
