//! Protocol core for two-party signatory agreements.
//!
//! Everything here is deterministic and allocation-light so the same code runs inside the
//! Stylus contract (WASM, `no_std`) and in off-chain tooling.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod agreement;
pub mod digest;
pub mod errors;
pub mod machine;
pub mod recovery;
pub mod store;

pub use agreement::{Agreement, AgreementId, Outcome, Status};
pub use digest::{derive_id, personal_message_hash, signed_message};
pub use errors::{AgreementError, ErrorKind, Party};
pub use machine::{Signatories, Transition};
pub use recovery::{split_signature, RecoverableParts, SignerRecovery};
pub use store::{AgreementStore, MemoryStore};
