//! Permission construction
//!
//! Builder for `SpendPermission` records. Defaults follow the deployed flow:
//! native-token sentinel, 30-day period, `start = now`, unbounded `end`.
//! Salts come from the OS CSPRNG; a colliding salt for the same
//! (account, spender, token) tuple would make two permissions
//! indistinguishable on-chain.

use alloy_primitives::{Address, Bytes, B256, U256};
use rand::rngs::OsRng;
use rand::RngCore;
use spendgrant_types::{
    Result, SpendPermission, DEFAULT_PERIOD_SECS, MAX_UINT48, NATIVE_TOKEN,
};

/// Builder for `SpendPermission`.
#[derive(Debug, Clone)]
pub struct PermissionBuilder {
    account: Address,
    spender: Address,
    token: Address,
    allowance: U256,
    period: u64,
    start: Option<u64>,
    end: u64,
    salt: Option<B256>,
    extra_data: Bytes,
}

impl PermissionBuilder {
    /// Start a permission from granting account to spender.
    pub fn new(account: Address, spender: Address) -> Self {
        Self {
            account,
            spender,
            token: NATIVE_TOKEN,
            allowance: U256::ZERO,
            period: DEFAULT_PERIOD_SECS,
            start: None,
            end: MAX_UINT48,
            salt: None,
            extra_data: Bytes::new(),
        }
    }

    /// Set the asset address (defaults to the native-token sentinel).
    pub fn token(mut self, token: Address) -> Self {
        self.token = token;
        self
    }

    /// Set the per-period allowance in wei. Required: zero fails `build`.
    pub fn allowance(mut self, allowance: U256) -> Self {
        self.allowance = allowance;
        self
    }

    /// Set the recurring period length in seconds (defaults to 30 days).
    pub fn period(mut self, seconds: u64) -> Self {
        self.period = seconds;
        self
    }

    /// Set an explicit window start (defaults to build time).
    pub fn valid_from(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the window end (defaults to the unbounded `MAX_UINT48` sentinel).
    pub fn valid_until(mut self, end: u64) -> Self {
        self.end = end;
        self
    }

    /// Pin the salt. Only for deterministic tests; normal construction draws
    /// a fresh one from the OS CSPRNG.
    pub fn salt(mut self, salt: B256) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Attach opaque policy-extension bytes (not interpreted by this SDK).
    pub fn extra_data(mut self, data: Bytes) -> Self {
        self.extra_data = data;
        self
    }

    /// Build with `start` defaulting to the current time.
    pub fn build(self) -> Result<SpendPermission> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.build_at(now)
    }

    /// Build with an explicit "now", validating all local invariants.
    pub fn build_at(self, now: u64) -> Result<SpendPermission> {
        let permission = SpendPermission {
            account: self.account,
            spender: self.spender,
            token: self.token,
            allowance: self.allowance,
            period: self.period,
            start: self.start.unwrap_or(now),
            end: self.end,
            salt: self.salt.unwrap_or_else(fresh_salt),
            extra_data: self.extra_data,
        };
        permission.validate()?;
        Ok(permission)
    }
}

/// 256-bit salt from the OS CSPRNG.
fn fresh_salt() -> B256 {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    B256::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendgrant_types::SpendGrantError;

    const NOW: u64 = 1_761_221_758;

    fn builder() -> PermissionBuilder {
        PermissionBuilder::new(Address::repeat_byte(0x11), Address::repeat_byte(0x22))
    }

    #[test]
    fn defaults_follow_the_deployed_flow() {
        let p = builder()
            .allowance(U256::from(90_000_000_000_000u64))
            .build_at(NOW)
            .unwrap();
        assert_eq!(p.token, NATIVE_TOKEN);
        assert_eq!(p.period, DEFAULT_PERIOD_SECS);
        assert_eq!(p.start, NOW);
        assert_eq!(p.end, MAX_UINT48);
        assert!(p.extra_data.is_empty());
        assert_ne!(p.salt, B256::ZERO);
    }

    #[test]
    fn salts_are_unique_between_builds() {
        let allowance = U256::from(1u8);
        let a = builder().allowance(allowance).build_at(NOW).unwrap();
        let b = builder().allowance(allowance).build_at(NOW).unwrap();
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn zero_allowance_fails_build() {
        assert!(matches!(
            builder().build_at(NOW).unwrap_err(),
            SpendGrantError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn start_after_end_fails_build() {
        let err = builder()
            .allowance(U256::from(1u8))
            .valid_from(NOW)
            .valid_until(NOW)
            .build_at(NOW)
            .unwrap_err();
        assert!(matches!(err, SpendGrantError::InvalidWindow { .. }));
    }

    #[test]
    fn pinned_salt_is_respected() {
        let salt = B256::repeat_byte(0x42);
        let p = builder()
            .allowance(U256::from(1u8))
            .salt(salt)
            .build_at(NOW)
            .unwrap();
        assert_eq!(p.salt, salt);
    }
}
