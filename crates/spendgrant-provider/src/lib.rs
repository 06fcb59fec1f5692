//! SpendGrant Provider - the injected wallet-provider capability
//!
//! The wallet provider (key custody, consent UI, chain switching) is an
//! external collaborator. This crate models it as an injected capability
//! implementing `request(method, params) -> result`, never a global
//! singleton, so every component is testable with a substitute.

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use spendgrant_types::{Result, SpendGrantError};

pub use http::HttpRpcProvider;
pub use mock::MockProvider;

/// EIP-1193 style request/response capability.
///
/// Each call suspends the caller until the provider responds (user approval,
/// network inclusion) or errors; these are the only suspension points in the
/// SDK. Cancellation happens only provider-side (the user rejects).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Issue a single request-response exchange.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

/// EIP-1193 provider error codes.
pub mod codes {
    /// The user rejected the request
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method/account has not been authorized
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the requested method
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains
    pub const DISCONNECTED: i64 = 4900;
    /// The provider is disconnected from the requested chain
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// The requested chain has not been added to the wallet
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
}

/// Map a provider/node error `{code, message}` onto the SpendGrant taxonomy.
///
/// Anything not recognized stays an `Rpc` error, which callers treat as
/// transient and retryable.
pub fn classify_provider_error(method: &str, code: i64, message: &str) -> SpendGrantError {
    match code {
        codes::USER_REJECTED => SpendGrantError::UserRejected {
            operation: method.to_string(),
        },
        codes::UNAUTHORIZED | codes::DISCONNECTED | codes::CHAIN_DISCONNECTED => {
            SpendGrantError::ProviderUnavailable {
                reason: format!("{method}: {message}"),
            }
        }
        _ if message.to_ascii_lowercase().contains("underpriced") => {
            SpendGrantError::Underpriced {
                message: message.to_string(),
            }
        }
        _ => SpendGrantError::rpc(method, format!("code {code}: {message}")),
    }
}
