//! Chain Adapters - alloy-rs 0.9 against the Monad RPC
//!
//! Three pieces:
//! - `provider`: shared read-only RPC connection
//! - `token`: ERC-20 view calls with static fallbacks (TokenQuery port)
//! - `transfer`: custodial BTM disbursement (ChainTransferer port)
//!
//! All contract calls use raw keccak-selector calldata rather than
//! generated bindings; the BTM ABI surface used here is five view
//! functions and `transfer`, not worth a codegen step.

pub mod provider;
pub mod token;
pub mod transfer;

use alloy::primitives::{keccak256, Address};

/// Build ERC-20 calldata: 4-byte selector + 32-byte-padded address args.
pub(crate) fn erc20_calldata(signature: &str, args: &[Address]) -> Vec<u8> {
    let selector = &keccak256(signature.as_bytes())[..4];
    let mut calldata = Vec::with_capacity(4 + 32 * args.len());
    calldata.extend_from_slice(selector);
    for arg in args {
        let mut padded = [0u8; 32];
        padded[12..].copy_from_slice(arg.as_slice());
        calldata.extend_from_slice(&padded);
    }
    calldata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_of_selector() {
        let addr = Address::ZERO;
        let calldata = erc20_calldata("balanceOf(address)", &[addr]);
        // 0x70a08231 is the canonical balanceOf selector
        assert_eq!(&calldata[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(calldata.len(), 36);
    }

    #[test]
    fn test_no_arg_call_is_selector_only() {
        let calldata = erc20_calldata("decimals()", &[]);
        assert_eq!(calldata.len(), 4);
    }
}
