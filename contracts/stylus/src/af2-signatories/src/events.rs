//! Events emitted by the contract.
//!
//! Kept in their own module: the Solidity event is named `Result`, which would otherwise shadow
//! `core::result::Result`.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    /// Emitted once per committed transition, after the record is written.
    event Result(address actor, bytes32 id, string outcome);
}
