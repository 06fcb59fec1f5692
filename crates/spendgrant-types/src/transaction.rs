//! Transaction submission and confirmation types

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// Receipt for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    /// True for status 0x1, false for a revert
    pub success: bool,
}

/// How long to wait for a receipt, and how often to poll.
///
/// On timeout the transaction may still land later: callers must treat
/// "no receipt yet" as indeterminate, not failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPolicy {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            poll_interval_ms: 2_000,
        }
    }
}

/// Hex-quantity helpers for wallet/node RPC payloads.
pub fn to_hex_quantity(value: U256) -> String {
    format!("0x{value:x}")
}

/// Parse a 0x-prefixed hex quantity (e.g. a block number) into u64.
pub fn from_hex_quantity(s: &str) -> Option<u64> {
    u64::from_str_radix(s.strip_prefix("0x")?, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_quantity_round_trip() {
        assert_eq!(to_hex_quantity(U256::from(300_000u64)), "0x493e0");
        assert_eq!(from_hex_quantity("0x493e0"), Some(300_000));
        assert_eq!(from_hex_quantity("0x0"), Some(0));
        assert_eq!(from_hex_quantity("493e0"), None);
    }

    #[test]
    fn zero_value_is_0x0() {
        assert_eq!(to_hex_quantity(U256::ZERO), "0x0");
    }
}
