//! Error types for SpendGrant
//!
//! Every failure is scoped to the single operation attempted; nothing here is
//! fatal to the process. Variants carry enough context (operation, addresses,
//! amounts) to diagnose without re-deriving state.

use alloy_primitives::{B256, U256};
use thiserror::Error;

/// Result type for SpendGrant operations
pub type Result<T> = std::result::Result<T, SpendGrantError>;

/// SpendGrant error types
#[derive(Debug, Clone, Error)]
pub enum SpendGrantError {
    // ========================================================================
    // Permission Validation Errors
    // ========================================================================

    /// Allowance must be greater than zero
    #[error("Invalid allowance: must be > 0, got {amount}")]
    InvalidAmount { amount: U256 },

    /// Period must be greater than zero
    #[error("Invalid period: must be > 0 seconds")]
    InvalidPeriod,

    /// Validity window must satisfy start < end
    #[error("Invalid validity window: start {start} >= end {end}")]
    InvalidWindow { start: u64, end: u64 },

    // ========================================================================
    // Signing Errors
    // ========================================================================

    /// The user declined the provider prompt
    #[error("User rejected {operation}")]
    UserRejected { operation: String },

    /// No wallet provider session is available
    #[error("Wallet provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    /// The active chain differs from the signing domain's chain
    #[error("Network mismatch: domain expects chain {expected}, provider is on chain {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    // ========================================================================
    // Approval Errors
    // ========================================================================

    /// The authority contract rejected the signature
    #[error("Authority rejected permission signature: {reason}")]
    SignatureInvalid { reason: String },

    /// The permission was already approved on-chain
    #[error("Permission already approved on-chain")]
    AlreadyApproved,

    // ========================================================================
    // Spend Errors
    // ========================================================================

    /// Requested amount exceeds the permission's per-period allowance
    #[error("Spend amount {requested} exceeds allowance {allowance}")]
    ExceedsAllowance { requested: U256, allowance: U256 },

    /// The permission must be approved on-chain before spending
    #[error("Permission is not approved on-chain")]
    PermissionNotApproved,

    /// Now is outside the permission's [start, end] window
    #[error("Permission expired: valid until {end}, now {now}")]
    PermissionExpired { end: u64, now: u64 },

    // ========================================================================
    // Connection & Sub-Account Errors
    // ========================================================================

    /// The provider returned zero controlled accounts
    #[error("Provider returned no accounts")]
    NoAccounts,

    /// The user or provider declined the chain switch
    #[error("Chain switch to {chain_id} rejected")]
    ChainSwitchRejected { chain_id: u64 },

    /// Provider-side sub-account creation failed
    #[error("Sub-account creation failed: {reason}")]
    SubAccountCreationFailed { reason: String },

    /// A call batch must contain at least one call; retrying cannot fix this
    #[error("Call batch is empty")]
    EmptyBatch,

    // ========================================================================
    // Transaction Errors
    // ========================================================================

    /// The transaction was mined but reverted, with no decodable reason
    #[error("{operation} transaction {tx_hash} reverted")]
    Reverted { operation: String, tx_hash: B256 },

    /// Fee parameters were too low for current network conditions
    #[error("Transaction underpriced: {message}")]
    Underpriced { message: String },

    /// No receipt arrived within the configured wait.
    /// The transaction may still land later; this is indeterminate, not failed.
    #[error("No receipt for {tx_hash} after {waited_ms}ms (indeterminate, do not blindly resubmit)")]
    ConfirmationTimeout { tx_hash: B256, waited_ms: u64 },

    // ========================================================================
    // Transport & State Errors
    // ========================================================================

    /// Transport or node failure during a JSON-RPC call
    #[error("RPC failure in {method}: {message}")]
    Rpc { method: String, message: String },

    /// Illegal permission lifecycle transition
    #[error("Invalid state transition: {event} not legal from {from}")]
    InvalidStateTransition { from: String, event: String },
}

impl SpendGrantError {
    /// Create an RPC error with method context
    pub fn rpc(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rpc {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Check if this failure is worth retrying (with backoff / higher fees)
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Rpc { .. } | Self::Underpriced { .. })
    }

    /// Check if this is an indeterminate outcome: the operation may have
    /// succeeded even though no confirmation arrived. Callers must not treat
    /// this as a failure and must not double-submit blindly.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::ConfirmationTimeout { .. })
    }

    /// Get an error code for API surfaces
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidPeriod => "INVALID_PERIOD",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
            Self::UserRejected { .. } => "USER_REJECTED",
            Self::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            Self::NetworkMismatch { .. } => "NETWORK_MISMATCH",
            Self::SignatureInvalid { .. } => "SIGNATURE_INVALID",
            Self::AlreadyApproved => "ALREADY_APPROVED",
            Self::ExceedsAllowance { .. } => "EXCEEDS_ALLOWANCE",
            Self::PermissionNotApproved => "PERMISSION_NOT_APPROVED",
            Self::PermissionExpired { .. } => "PERMISSION_EXPIRED",
            Self::NoAccounts => "NO_ACCOUNTS",
            Self::ChainSwitchRejected { .. } => "CHAIN_SWITCH_REJECTED",
            Self::SubAccountCreationFailed { .. } => "SUB_ACCOUNT_CREATION_FAILED",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::Reverted { .. } => "REVERTED",
            Self::Underpriced { .. } => "UNDERPRICED",
            Self::ConfirmationTimeout { .. } => "CONFIRMATION_TIMEOUT",
            Self::Rpc { .. } => "RPC_FAILURE",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_indeterminate_not_retriable() {
        let err = SpendGrantError::ConfirmationTimeout {
            tx_hash: B256::ZERO,
            waited_ms: 60_000,
        };
        assert!(err.is_indeterminate());
        assert!(!err.is_retriable());
        assert_eq!(err.error_code(), "CONFIRMATION_TIMEOUT");
    }

    #[test]
    fn rpc_and_underpriced_are_retriable() {
        assert!(SpendGrantError::rpc("eth_sendTransaction", "connection reset").is_retriable());
        assert!(SpendGrantError::Underpriced {
            message: "max fee per gas less than block base fee".into()
        }
        .is_retriable());
    }

    #[test]
    fn fatal_errors_are_neither_retriable_nor_indeterminate() {
        let err = SpendGrantError::ExceedsAllowance {
            requested: U256::from(2u8),
            allowance: U256::from(1u8),
        };
        assert!(!err.is_retriable());
        assert!(!err.is_indeterminate());
    }
}
