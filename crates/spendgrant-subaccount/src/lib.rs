//! SpendGrant Sub-Accounts - delegation by account creation
//!
//! A parallel delegation mechanism to signed permissions: instead of granting
//! a capability over the primary account's funds, the wallet creates a
//! capability-scoped sub-account under the primary account, and the
//! application executes atomic call batches from it. Same wallet-provider
//! transport, no permission object.

pub mod connect;
pub mod manager;

pub use connect::connect;
pub use manager::SubAccountManager;
