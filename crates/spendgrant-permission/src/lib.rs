//! SpendGrant Permission - construction and off-chain authorization
//!
//! Builds spend permissions, encodes them as EIP-712 typed data over a frozen
//! schema, and obtains the controlling account's signature through the wallet
//! provider. The private key never enters this crate.

pub mod model;
pub mod signer;
pub mod typed_data;

pub use model::PermissionBuilder;
pub use signer::PermissionSigner;
pub use typed_data::{Eip712Domain, TypedData};
