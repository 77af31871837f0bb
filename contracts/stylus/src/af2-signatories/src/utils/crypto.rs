//! Signer recovery through the EVM `ecrecover` precompile.

use stylus_sdk::{
    alloy_primitives::{address, Address, FixedBytes},
    prelude::calls::context::Call,
    stylus_core::Host,
};

use af2_signatories_types::{split_signature, SignerRecovery};

/// The `ecrecover` precompile.
pub const ECRECOVER: Address = address!("0000000000000000000000000000000000000001");

/// Gas forwarded to the precompile (it costs 3000).
const ECRECOVER_GAS: u64 = 50_000;

/// [`SignerRecovery`] backed by the precompile at address `0x01`, called through `host`.
#[derive(Clone, Copy)]
pub struct EcrecoverPrecompile<'a> {
    host: &'a dyn Host,
}

impl<'a> EcrecoverPrecompile<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }
}

impl SignerRecovery for EcrecoverPrecompile<'_> {
    fn recover_prehash(&self, digest: FixedBytes<32>, signature: &[u8]) -> Option<Address> {
        let parts = split_signature(signature)?;
        ecrecover_address(self.host, digest, parts.v(), &parts.r, &parts.s)
    }
}

/// Precompile calldata: `digest || v || r || s`, each a 32-byte word.
pub fn ecrecover_input(digest: FixedBytes<32>, v: u8, r: &[u8; 32], s: &[u8; 32]) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    // v as 32-byte big-endian word.
    input[63] = v;
    input[64..96].copy_from_slice(r);
    input[96..128].copy_from_slice(s);
    input
}

/// Recover an EOA address from a 32-byte digest and `(v, r, s)`, `v` in {27, 28}.
///
/// The precompile signals failure with empty output or the zero address; both map to `None`.
pub fn ecrecover_address(
    host: &dyn Host,
    digest: FixedBytes<32>,
    v: u8,
    r: &[u8; 32],
    s: &[u8; 32],
) -> Option<Address> {
    let input = ecrecover_input(digest, v, r, s);
    let out = host
        .static_call(&Call::new().gas(ECRECOVER_GAS), ECRECOVER, &input)
        .ok()?;
    if out.len() < 32 {
        return None;
    }
    // 32-byte word with the address in the low 20 bytes.
    let recovered = Address::from_slice(&out[12..32]);
    (recovered != Address::ZERO).then_some(recovered)
}
