//! SpendGrant Types - Canonical domain types for delegated spend authorization
//!
//! This crate contains all foundational types for SpendGrant with zero
//! dependencies on other spendgrant crates. It defines:
//!
//! - Permission types (SpendPermission, SignedPermission, SpendRequest)
//! - Sub-account and call-batch types
//! - Chain and transaction types (ChainProfile, FeePolicy, TransactionReceipt)
//! - The permission lifecycle state machine
//!
//! # Architectural Invariants
//!
//! 1. Private keys never enter this SDK; signing is delegated to the wallet
//!    provider, submission to the node
//! 2. A permission's fields are immutable once signed; the signature is
//!    produced once and never recomputed
//! 3. Local validation is advisory; allowance accounting is enforced by the
//!    on-chain authority contract

pub mod calls;
pub mod chain;
pub mod error;
pub mod permission;
pub mod state;
pub mod transaction;

pub use calls::*;
pub use chain::*;
pub use error::*;
pub use permission::*;
pub use state::*;
pub use transaction::*;

/// Version of the SpendGrant types schema
pub const TYPES_VERSION: &str = "0.1.0";
