//! Spend permission types
//!
//! A `SpendPermission` is a capped, time-windowed grant of spending rights
//! from a user-owned account to a spender, without handing over custody. It
//! is signed off-chain over a frozen typed-data schema, approved on-chain by
//! the authority contract, and drawn down by the spender over time.

use crate::{SpendGrantError, Result, MAX_UINT48};
use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A delegated spend authorization. Fields are immutable once signed: any
/// mutation invalidates the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendPermission {
    /// Granting (primary) account
    pub account: Address,
    /// Account permitted to draw funds
    pub spender: Address,
    /// Asset address; `NATIVE_TOKEN` denotes the native asset
    pub token: Address,
    /// Maximum cumulative amount spendable per period (uint160 range, > 0)
    pub allowance: U256,
    /// Length of the recurring allowance window, in seconds (> 0)
    pub period: u64,
    /// Start of the validity window, epoch seconds (uint48)
    pub start: u64,
    /// End of the validity window, epoch seconds (uint48);
    /// `MAX_UINT48` means unbounded
    pub end: u64,
    /// Uniqueness value preventing replay collision between otherwise
    /// identical permissions
    pub salt: B256,
    /// Opaque bytes reserved for future policy extensions; not interpreted
    pub extra_data: Bytes,
}

impl SpendPermission {
    /// Check the local invariants: `allowance` nonzero and within uint160,
    /// `period` a nonzero uint48, `start < end <= MAX_UINT48`. The declared
    /// widths are enforced here so an out-of-range value fails locally
    /// instead of signing a payload the schema cannot represent. Salt
    /// uniqueness is the signer's responsibility and is not enforced here.
    pub fn validate(&self) -> Result<()> {
        if self.allowance.is_zero() || (self.allowance >> 160) != U256::ZERO {
            return Err(SpendGrantError::InvalidAmount {
                amount: self.allowance,
            });
        }
        if self.period == 0 || self.period > MAX_UINT48 {
            return Err(SpendGrantError::InvalidPeriod);
        }
        if self.start >= self.end || self.end > MAX_UINT48 {
            return Err(SpendGrantError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Check whether `now` falls inside the `[start, end]` validity window.
    pub fn in_window(&self, now: u64) -> bool {
        self.start <= now && now <= self.end
    }
}

/// A permission plus the one-time signature over its typed-data encoding.
/// The signature is opaque: it is never recomputed or mutated, only carried
/// to the authority contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPermission {
    pub permission: SpendPermission,
    /// Hex signature bytes as returned by `eth_signTypedData_v4`
    pub signature: Bytes,
}

/// A request to draw `amount` against an approved permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendRequest {
    pub permission: SpendPermission,
    pub amount: U256,
}

impl SpendRequest {
    /// Advisory local pre-check before submission: `0 < amount <= allowance`
    /// and now inside the validity window. Per-period cumulative tracking is
    /// the authority contract's job and is not re-derived here.
    pub fn validate(&self, now: u64) -> Result<()> {
        if self.amount.is_zero() {
            return Err(SpendGrantError::InvalidAmount {
                amount: self.amount,
            });
        }
        if self.amount > self.permission.allowance {
            return Err(SpendGrantError::ExceedsAllowance {
                requested: self.amount,
                allowance: self.permission.allowance,
            });
        }
        if !self.permission.in_window(now) {
            return Err(SpendGrantError::PermissionExpired {
                end: self.permission.end,
                now,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_UINT48, NATIVE_TOKEN};

    fn permission(allowance: u64) -> SpendPermission {
        SpendPermission {
            account: Address::repeat_byte(0x11),
            spender: Address::repeat_byte(0x22),
            token: NATIVE_TOKEN,
            allowance: U256::from(allowance),
            period: 2_592_000,
            start: 1_761_221_758,
            end: MAX_UINT48,
            salt: B256::repeat_byte(0x42),
            extra_data: Bytes::new(),
        }
    }

    #[test]
    fn valid_permission_passes() {
        permission(90_000_000_000_000).validate().unwrap();
    }

    #[test]
    fn zero_allowance_rejected() {
        let err = permission(0).validate().unwrap_err();
        assert!(matches!(err, SpendGrantError::InvalidAmount { .. }));
    }

    #[test]
    fn inverted_window_rejected() {
        let mut p = permission(1);
        p.end = p.start;
        assert!(matches!(
            p.validate().unwrap_err(),
            SpendGrantError::InvalidWindow { .. }
        ));
    }

    #[test]
    fn zero_period_rejected() {
        let mut p = permission(1);
        p.period = 0;
        assert!(matches!(
            p.validate().unwrap_err(),
            SpendGrantError::InvalidPeriod
        ));
    }

    #[test]
    fn allowance_wider_than_uint160_rejected() {
        let mut p = permission(1);
        p.allowance = U256::ONE << 200;
        assert!(matches!(
            p.validate().unwrap_err(),
            SpendGrantError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn allowance_at_uint160_max_passes() {
        let mut p = permission(1);
        p.allowance = (U256::ONE << 160) - U256::ONE;
        p.validate().unwrap();
    }

    #[test]
    fn period_beyond_uint48_rejected() {
        let mut p = permission(1);
        p.period = MAX_UINT48 + 1;
        assert!(matches!(
            p.validate().unwrap_err(),
            SpendGrantError::InvalidPeriod
        ));
    }

    #[test]
    fn end_beyond_uint48_rejected() {
        let mut p = permission(1);
        p.end = MAX_UINT48 + 1;
        assert!(matches!(
            p.validate().unwrap_err(),
            SpendGrantError::InvalidWindow { .. }
        ));
    }

    #[test]
    fn spend_over_allowance_rejected_locally() {
        let req = SpendRequest {
            permission: permission(90_000_000_000_000),
            amount: U256::from(200_000_000_000_000u64),
        };
        assert!(matches!(
            req.validate(1_761_221_800).unwrap_err(),
            SpendGrantError::ExceedsAllowance { .. }
        ));
    }

    #[test]
    fn spend_within_allowance_passes() {
        let req = SpendRequest {
            permission: permission(90_000_000_000_000),
            amount: U256::from(10_000_000_000_000u64),
        };
        req.validate(1_761_221_800).unwrap();
    }

    #[test]
    fn spend_outside_window_is_expired() {
        let mut p = permission(1_000);
        p.end = p.start + 60;
        let req = SpendRequest {
            permission: p,
            amount: U256::from(1u8),
        };
        assert!(matches!(
            req.validate(1_761_221_758 + 120).unwrap_err(),
            SpendGrantError::PermissionExpired { .. }
        ));
    }

    #[test]
    fn signed_permission_json_round_trip_preserves_fields() {
        let signed = SignedPermission {
            permission: permission(90_000_000_000_000),
            signature: Bytes::from(vec![0xab; 65]),
        };
        let json = serde_json::to_string(&signed).unwrap();
        let back: SignedPermission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signed);
        // camelCase wire names, matching the typed-data message fields
        assert!(json.contains("\"extraData\""));
        assert!(json.contains("\"spender\""));
    }
}
