//! Spend executor
//!
//! Draws down an approved permission's allowance by a specific amount. The
//! local pre-check is advisory: per-period cumulative tracking is enforced by
//! the authority contract, not re-derived here.

use crate::{abi, submit};
use alloy_primitives::Address;
use spendgrant_provider::WalletProvider;
use spendgrant_types::{
    ChainProfile, ConfirmationPolicy, FeePolicy, Result, SpendGrantError, SpendRequest,
    TransactionReceipt,
};
use std::sync::Arc;
use tracing::info;

/// Submits `spend` transactions against approved permissions.
pub struct SpendExecutor {
    provider: Arc<dyn WalletProvider>,
    profile: ChainProfile,
    fees: FeePolicy,
    confirmation: ConfirmationPolicy,
    /// The spender's wallet; must match `permission.spender` on-chain
    sender: Address,
}

impl SpendExecutor {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        profile: ChainProfile,
        fees: FeePolicy,
        sender: Address,
    ) -> Self {
        Self {
            provider,
            profile,
            fees,
            confirmation: ConfirmationPolicy::default(),
            sender,
        }
    }

    /// Override the receipt wait (timeout and poll cadence).
    pub fn with_confirmation(mut self, confirmation: ConfirmationPolicy) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Spend `request.amount` against the permission; blocks until mined or
    /// the wait elapses. Validation failures reject before any submission.
    pub async fn spend(&self, request: &SpendRequest) -> Result<TransactionReceipt> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.spend_at(request, now).await
    }

    /// `spend` with an explicit "now" for the window pre-check.
    pub async fn spend_at(&self, request: &SpendRequest, now: u64) -> Result<TransactionReceipt> {
        request.permission.validate()?;
        request.validate(now)?;

        let data = abi::encode_spend(&request.permission, request.amount);
        info!(
            spender = %request.permission.spender,
            amount = %request.amount,
            manager = %self.profile.spend_permission_manager,
            "submitting spend"
        );

        let tx_hash = submit::send_transaction(
            self.provider.as_ref(),
            self.sender,
            self.profile.spend_permission_manager,
            &data,
            &self.fees,
        )
        .await
        .map_err(|err| classify_spend_error(err, request, now))?;

        let receipt =
            submit::wait_for_receipt(self.provider.as_ref(), tx_hash, &self.confirmation).await?;
        if !receipt.success {
            return Err(SpendGrantError::Reverted {
                operation: "spend".into(),
                tx_hash,
            });
        }
        Ok(receipt)
    }
}

/// Map node-reported revert reasons onto the spend taxonomy.
fn classify_spend_error(err: SpendGrantError, request: &SpendRequest, now: u64) -> SpendGrantError {
    let SpendGrantError::Rpc { ref message, .. } = err else {
        return err;
    };
    let lower = message.to_ascii_lowercase();
    if lower.contains("exceeds") && lower.contains("allowance") {
        SpendGrantError::ExceedsAllowance {
            requested: request.amount,
            allowance: request.permission.allowance,
        }
    } else if lower.contains("not approved") || lower.contains("unauthorized") {
        SpendGrantError::PermissionNotApproved
    } else if lower.contains("expired")
        || lower.contains("before permission start")
        || lower.contains("after permission end")
    {
        SpendGrantError::PermissionExpired {
            end: request.permission.end,
            now,
        }
    } else {
        err
    }
}
