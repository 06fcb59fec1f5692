//! Permission lifecycle state machine
//!
//! The lifecycle is observed externally via on-chain state; this model exists
//! so callers track where a permission stands without guessing the authority
//! contract's internal accounting. Per-period allowance bookkeeping (reset
//! boundaries, partial periods) is opaque to the client: exhaustion and reset
//! arrive as observed events, they are never computed locally.

use crate::{SpendGrantError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a permission stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    /// Constructed locally, not yet signed
    Created,
    /// Signed off-chain via the wallet provider
    SignedOffChain,
    /// Activated on-chain by the authority contract
    ApprovedOnChain,
    /// Allowance available in the current period
    Spendable,
    /// Current period's allowance fully drawn; resets at the next boundary
    AllowanceExhausted,
    /// Past `end`, or revoked by the account
    Expired,
}

/// Externally observed lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionEvent {
    /// Wallet provider returned a signature
    Signed,
    /// Authority contract accepted `approveWithSignature`
    Approved,
    /// Cumulative spend reached the allowance for the current period
    Exhausted,
    /// A period boundary passed and the allowance reset
    PeriodRolled,
    /// `now > end`, or the account revoked the permission
    Expired,
}

impl PermissionState {
    /// Apply an observed event, returning the next state or rejecting an
    /// illegal transition.
    pub fn transition(self, event: PermissionEvent) -> Result<Self> {
        use PermissionEvent as E;
        use PermissionState as S;
        let next = match (self, event) {
            (S::Created, E::Signed) => S::SignedOffChain,
            (S::SignedOffChain, E::Approved) => S::ApprovedOnChain,
            // approval makes the permission spendable immediately
            (S::ApprovedOnChain | S::Spendable, E::Exhausted) => S::AllowanceExhausted,
            (S::AllowanceExhausted, E::PeriodRolled) => S::Spendable,
            (_, E::Expired) => S::Expired,
            (from, event) => {
                return Err(SpendGrantError::InvalidStateTransition {
                    from: from.to_string(),
                    event: format!("{event:?}"),
                })
            }
        };
        Ok(next)
    }

    /// Whether a spend attempt is sensible from this state.
    pub fn is_spendable(&self) -> bool {
        matches!(self, Self::ApprovedOnChain | Self::Spendable)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::SignedOffChain => "signed-off-chain",
            Self::ApprovedOnChain => "approved-on-chain",
            Self::Spendable => "spendable",
            Self::AllowanceExhausted => "allowance-exhausted",
            Self::Expired => "expired",
        };
        f.write_str(s)
    }
}
