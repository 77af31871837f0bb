//! Off-chain side of AF2 signatory agreements.
//!
//! - [`signer`]: party keys producing personal-message signatures the contract accepts;
//! - [`recovery`]: `k256` signer recovery, bit-compatible with the `ecrecover` precompile;
//! - [`ledger`]: a concurrent in-memory host for the state machine, with outcome broadcast.

pub mod ledger;
pub mod recovery;
pub mod signer;

pub use af2_signatories_types as types;
pub use ledger::{Ledger, LedgerConfig};
pub use recovery::{address_of, K256Recovery};
pub use signer::PartySigner;
