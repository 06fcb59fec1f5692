//! SpendGrant SDK - delegated spend authorization for EVM smart wallets
//!
//! A spend permission grants a spender a capped, time-windowed right to move
//! a specific token on a user's behalf, without custody changing hands. The
//! flow is a sequential pipeline of suspending calls, each stage's output
//! being the next stage's required input:
//!
//! ```text
//! connect → build → sign (off-chain) → approve (on-chain) → spend
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use alloy_primitives::U256;
//! use spendgrant_sdk::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(HttpRpcProvider::new("https://sepolia.base.org")?);
//!     let app = AppMetadata::new("My Checkout", "https://shop.example.org");
//!     let grant = SpendGrant::new(provider, ChainProfile::base_sepolia("https://sepolia.base.org"), app);
//!
//!     // user side: connect and sign a permission for the backend spender
//!     let account = grant.connect().await?;
//!     let permission = PermissionBuilder::new(account, backend_wallet)
//!         .allowance(U256::from(90_000_000_000_000u64))
//!         .build()?;
//!     let signed = grant.signer().request_signature(&permission).await?;
//!
//!     // spender side: activate, then draw down over time
//!     grant.submitter(backend_wallet).approve(&signed).await?;
//!     let receipt = grant
//!         .executor(backend_wallet)
//!         .spend(&SpendRequest { permission, amount: U256::from(10_000_000_000_000u64) })
//!         .await?;
//!     assert!(receipt.success);
//!     Ok(())
//! }
//! ```
//!
//! At most one transaction per permission should be in flight at a time;
//! that ordering is the caller's responsibility, the SDK takes no locks.

pub use spendgrant_executor::{AuthoritySubmitter, SpendExecutor};
pub use spendgrant_permission::{Eip712Domain, PermissionBuilder, PermissionSigner, TypedData};
pub use spendgrant_provider::{HttpRpcProvider, MockProvider, WalletProvider};
pub use spendgrant_subaccount::SubAccountManager;
pub use spendgrant_types::*;

use alloy_primitives::Address;
use std::sync::Arc;

/// Application identity presented to the wallet, and the chains it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub app_name: String,
    /// Origin that scopes sub-accounts for this application
    pub app_domain: String,
}

impl AppMetadata {
    pub fn new(app_name: impl Into<String>, app_domain: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_domain: app_domain.into(),
        }
    }
}

/// Entry point wiring one provider session and one chain profile into the
/// permission and sub-account flows.
pub struct SpendGrant {
    provider: Arc<dyn WalletProvider>,
    profile: ChainProfile,
    fees: FeePolicy,
    app: AppMetadata,
}

impl SpendGrant {
    pub fn new(provider: Arc<dyn WalletProvider>, profile: ChainProfile, app: AppMetadata) -> Self {
        Self {
            provider,
            profile,
            fees: FeePolicy::testnet_default(),
            app,
        }
    }

    /// Replace the default fee policy for submitted transactions.
    pub fn with_fees(mut self, fees: FeePolicy) -> Self {
        self.fees = fees;
        self
    }

    /// Request wallet access and pin the session to the configured chain.
    /// The wallet's connect prompt shows `app.app_name`.
    pub async fn connect(&self) -> Result<Address> {
        spendgrant_subaccount::connect(self.provider.as_ref(), &self.profile, &self.app.app_name)
            .await
    }

    /// Typed-data signing client for the granting account.
    pub fn signer(&self) -> PermissionSigner {
        PermissionSigner::new(self.provider.clone(), self.profile.clone())
    }

    /// Authorization submitter sending from `spender`.
    pub fn submitter(&self, spender: Address) -> AuthoritySubmitter {
        AuthoritySubmitter::new(
            self.provider.clone(),
            self.profile.clone(),
            self.fees.clone(),
            spender,
        )
    }

    /// Spend executor sending from `spender`.
    pub fn executor(&self, spender: Address) -> SpendExecutor {
        SpendExecutor::new(
            self.provider.clone(),
            self.profile.clone(),
            self.fees.clone(),
            spender,
        )
    }

    /// Sub-account manager scoped to this application's domain.
    pub fn sub_accounts(&self) -> SubAccountManager {
        SubAccountManager::new(
            self.provider.clone(),
            self.profile.clone(),
            self.app.app_domain.clone(),
        )
    }
}
