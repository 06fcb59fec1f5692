//! Chain and fee configuration
//!
//! All environment-derived configuration (RPC endpoint, authority contract
//! address, chain id) is explicit and passed into components at construction.
//! There is no process-wide implicit state.

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

/// Sentinel token address denoting the chain's native asset.
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Maximum uint48 value; used as the "unbounded" permission end sentinel.
pub const MAX_UINT48: u64 = 281_474_976_710_655;

/// Default recurring allowance period: 30 days in seconds.
pub const DEFAULT_PERIOD_SECS: u64 = 2_592_000;

/// Base Sepolia chain id.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

/// SpendPermissionManager deployment on Base Sepolia.
pub const BASE_SEPOLIA_SPEND_PERMISSION_MANAGER: Address =
    address!("f85210B21cC50302F477BA56686d2019dC9b67Ad");

/// Network profile binding a chain id, an RPC endpoint, and the authority
/// contract that stores permissions and enforces allowance rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// EVM chain id
    pub chain_id: u64,
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Address of the spend-permission authority contract
    pub spend_permission_manager: Address,
}

impl ChainProfile {
    /// Base Sepolia with the canonical SpendPermissionManager deployment.
    pub fn base_sepolia(rpc_url: impl Into<String>) -> Self {
        Self {
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            rpc_url: rpc_url.into(),
            spend_permission_manager: BASE_SEPOLIA_SPEND_PERMISSION_MANAGER,
        }
    }

    /// Chain id as a 0x-prefixed hex string, the form wallet RPC methods take.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

/// Explicit EIP-1559 fee parameters for delegated submissions.
///
/// Fees are never estimated implicitly: with no interactive user present to
/// bump a stuck transaction, under-specification is worse than overpaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    /// Maximum total fee per gas, in wei
    pub max_fee_per_gas: U256,
    /// Maximum priority fee per gas, in wei
    pub max_priority_fee_per_gas: U256,
    /// Gas limit
    pub gas_limit: u64,
}

impl FeePolicy {
    /// 1 gwei / 1 gwei / 300k gas.
    pub fn testnet_default() -> Self {
        Self {
            max_fee_per_gas: U256::from(1_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            gas_limit: 300_000,
        }
    }

    /// Scale both fee caps by an integer factor, for fee-bump retries after
    /// an underpriced rejection.
    pub fn bumped(&self, factor: u64) -> Self {
        Self {
            max_fee_per_gas: self.max_fee_per_gas * U256::from(factor),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas * U256::from(factor),
            gas_limit: self.gas_limit,
        }
    }
}
