//! Stylus contract for two-party signatory agreements.
//!
//! Party B accepts (`sign`) or party A withdraws (`cancel`) an agreement identified by
//! `keccak256(addrA || addrB || contract || payloadHash)`. Each transition is authorised purely by
//! recovering signatures over `keccak256(id || payloadHash)` (personal-message wrapped).
//!
//! The protocol rules live in `af2-signatories-types`; this crate binds them to contract storage,
//! the `ecrecover` precompile, the `Result` event and `Error(string)` reverts.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

extern crate alloc;

pub mod errors;
pub mod events;
pub mod interfaces;
pub mod signatories;
pub mod utils;

pub use signatories::Af2Signatories;
