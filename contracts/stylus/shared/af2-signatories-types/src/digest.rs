//! Identifier and message digests.
//!
//! All encodings are tightly packed (`abi.encodePacked`): every field is fixed width, so no
//! separators or length prefixes are needed, and off-chain signers reproduce the same bytes with
//! `solidityPackedKeccak256`.

use alloc::{string::ToString, vec::Vec};

use alloy_primitives::{keccak256, Address, FixedBytes};

use crate::agreement::AgreementId;

/// EIP-191 "personal message" prefix.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// `keccak256(addrA || addrB || service || payloadHash)`.
pub fn derive_id(
    addr_a: Address,
    addr_b: Address,
    service: Address,
    payload_hash: FixedBytes<32>,
) -> AgreementId {
    let mut buf = Vec::with_capacity(20 + 20 + 20 + 32);
    buf.extend_from_slice(addr_a.as_slice());
    buf.extend_from_slice(addr_b.as_slice());
    buf.extend_from_slice(service.as_slice());
    buf.extend_from_slice(payload_hash.as_slice());
    keccak256(buf)
}

/// Message both parties sign: `keccak256(id || payloadHash)`.
pub fn signed_message(id: AgreementId, payload_hash: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 + 32);
    buf.extend_from_slice(id.as_slice());
    buf.extend_from_slice(payload_hash.as_slice());
    keccak256(buf)
}

/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
///
/// This is the digest wallets produce for `signMessage(bytes)` and what `ethers.hashMessage`
/// returns for a string payload.
pub fn personal_message_hash(message: &[u8]) -> FixedBytes<32> {
    let len = message.len().to_string();
    let mut buf = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + len.len() + message.len());
    buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    buf.extend_from_slice(len.as_bytes());
    buf.extend_from_slice(message);
    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    const A: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const B: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
    const SERVICE: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    #[test]
    fn personal_message_hash_matches_wallet_convention() {
        assert_eq!(
            personal_message_hash(b"Hello World"),
            b256!("a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2")
        );
    }

    #[test]
    fn derive_id_hashes_packed_fields_in_order() {
        let payload = personal_message_hash(b"valid hashC");

        let mut packed = Vec::new();
        packed.extend_from_slice(A.as_slice());
        packed.extend_from_slice(B.as_slice());
        packed.extend_from_slice(SERVICE.as_slice());
        packed.extend_from_slice(payload.as_slice());
        assert_eq!(packed.len(), 92);

        assert_eq!(derive_id(A, B, SERVICE, payload), keccak256(&packed));
    }

    #[test]
    fn every_field_changes_the_id() {
        let payload = personal_message_hash(b"valid hashC");
        let other_payload = personal_message_hash(b"invalid hashC");
        let id = derive_id(A, B, SERVICE, payload);

        assert_ne!(id, derive_id(B, A, SERVICE, payload));
        assert_ne!(id, derive_id(A, A, SERVICE, payload));
        assert_ne!(id, derive_id(A, B, Address::ZERO, payload));
        assert_ne!(id, derive_id(A, B, SERVICE, other_payload));
        assert_eq!(id, derive_id(A, B, SERVICE, payload));
    }

    #[test]
    fn signed_message_binds_payload() {
        let payload = personal_message_hash(b"valid hashC");
        let id = derive_id(A, B, SERVICE, payload);

        let mut packed = Vec::new();
        packed.extend_from_slice(id.as_slice());
        packed.extend_from_slice(payload.as_slice());
        assert_eq!(signed_message(id, payload), keccak256(&packed));
        assert_ne!(signed_message(id, payload), signed_message(id, FixedBytes::ZERO));
    }
}
