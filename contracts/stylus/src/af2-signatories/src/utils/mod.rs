//! Host-side helpers for the contract.
//!
//! These stay small and deterministic, as they run inside Stylus / WASM.

pub mod crypto;
