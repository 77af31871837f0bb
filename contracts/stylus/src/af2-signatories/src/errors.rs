//! Revert encoding.

use alloc::vec::Vec;

use stylus_sdk::alloy_sol_types::{Revert, SolError};

use af2_signatories_types::AgreementError;

/// Encode a rejection as standard `Error(string)` revert data, so callers observe the reason
/// string exactly as a Solidity `require` would produce it.
pub fn revert_data(err: AgreementError) -> Vec<u8> {
    Revert {
        reason: err.reason().into(),
    }
    .abi_encode()
}
