#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

#[cfg(not(any(test, feature = "export-abi")))]
#[no_mangle]
pub extern "C" fn main() {}

/// ABI export entrypoint used by `cargo stylus export-abi`.
#[cfg(feature = "export-abi")]
fn main() {
    use stylus_sdk::abi::export::print_abi;

    // `query`, `sign`, `cancel`, `getOwnerSC` and `getAddrSC` come from the `#[public]` impl.
    use af2_signatories::Af2Signatories;

    print_abi::<Af2Signatories>("BUSL-1.1", "pragma solidity ^0.8.23;");
}
