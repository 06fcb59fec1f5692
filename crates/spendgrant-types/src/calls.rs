//! Sub-account and call-batch types
//!
//! A sub-account is a capability-scoped account created under and controlled
//! by a primary account, used to isolate funds for one application domain. It
//! delegates by account creation rather than by signed capability grant, so
//! there is no permission object in this flow.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A capability-scoped account owned by a primary (universal) account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccount {
    /// Address of the sub-account
    pub address: Address,
    /// Primary account that controls it
    pub owner: Address,
    /// True if this resolution created the account, false if an existing one
    /// was reused
    pub created: bool,
}

/// One call within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Call {
    /// A plain value transfer with no calldata.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self {
            to,
            value,
            data: Bytes::new(),
        }
    }

    /// A contract invocation carrying calldata and optional value.
    pub fn contract(to: Address, value: U256, data: Bytes) -> Self {
        Self { to, value, data }
    }
}

/// An ordered sequence of calls submitted atomically as one logical
/// operation from a sub-account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallBatch {
    pub calls: Vec<Call>,
}

impl CallBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(call: Call) -> Self {
        Self { calls: vec![call] }
    }

    pub fn push(&mut self, call: Call) {
        self.calls.push(call);
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Sum of `value` across the batch: the native balance the sub-account
    /// needs before gas. Advisory only; insufficient funds surface as a
    /// provider-level execution failure.
    pub fn total_value(&self) -> U256 {
        self.calls
            .iter()
            .fold(U256::ZERO, |acc, call| acc.saturating_add(call.value))
    }
}

/// Opaque identifier returned by the call-batch execution transport.
/// Used only for external status correlation, never decoded locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallsId(pub String);

impl fmt::Display for CallsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_total_value_sums_calls() {
        let mut batch = CallBatch::new();
        batch.push(Call::transfer(Address::repeat_byte(0x01), U256::from(100u8)));
        batch.push(Call::contract(
            Address::repeat_byte(0x02),
            U256::from(50u8),
            Bytes::from(vec![0xde, 0xad]),
        ));
        assert_eq!(batch.total_value(), U256::from(150u8));
    }

    #[test]
    fn empty_batch_has_zero_value() {
        assert_eq!(CallBatch::new().total_value(), U256::ZERO);
        assert!(CallBatch::new().is_empty());
    }
}
