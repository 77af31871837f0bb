//! Solidity ABI interface for the contract.
//!
//! Not needed to implement the contract, but it pins the external selectors (which must stay
//! identical to the Solidity deployment's) and enables cross-contract calls if desired.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    interface IAf2Signatories {
        function getOwnerSC() external view returns (address);
        function getAddrSC() external view returns (address);
        function query(bytes32 id) external view returns (uint8 status, bytes evidence);
        function sign(bytes32 id, address addrA, bytes32 hashC, bytes signA, bytes signB) external;
        function cancel(bytes32 id, address addrB, bytes32 hashC, bytes signA) external;
    }
}

#[cfg(test)]
mod tests {
    use super::IAf2Signatories::*;
    use crate::events;
    use stylus_sdk::{
        alloy_primitives::keccak256,
        alloy_sol_types::{SolCall, SolEvent},
    };

    fn selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    #[test]
    fn selectors_match_solidity_signatures() {
        assert_eq!(getOwnerSCCall::SELECTOR, selector("getOwnerSC()"));
        assert_eq!(getAddrSCCall::SELECTOR, selector("getAddrSC()"));
        assert_eq!(queryCall::SELECTOR, selector("query(bytes32)"));
        assert_eq!(
            signCall::SELECTOR,
            selector("sign(bytes32,address,bytes32,bytes,bytes)")
        );
        assert_eq!(
            cancelCall::SELECTOR,
            selector("cancel(bytes32,address,bytes32,bytes)")
        );
    }

    #[test]
    fn result_event_topic() {
        assert_eq!(
            events::Result::SIGNATURE_HASH,
            keccak256("Result(address,bytes32,string)")
        );
    }
}
