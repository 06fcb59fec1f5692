//! SpendGrant Executor - on-chain activation and bounded spending
//!
//! Submits the two authority-contract write operations:
//! `approveWithSignature(permission, signature)` activates a signed permission,
//! `spend(permission, amount)` draws down its allowance. Both run with explicit
//! fee parameters and a bounded confirmation wait; a timeout is reported as
//! indeterminate, never as a failure.

pub mod abi;
pub mod approve;
pub mod spend;
pub mod submit;

pub use approve::AuthoritySubmitter;
pub use spend::SpendExecutor;
