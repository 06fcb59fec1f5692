//! Authorization submitter
//!
//! Activates a signed permission on-chain so future spends against it are
//! accepted. No local dedupe: submitting the same (permission, signature)
//! twice is authority-contract-defined behavior, surfaced here as
//! `AlreadyApproved` when the node reports the duplicate revert.

use crate::{abi, submit};
use alloy_primitives::Address;
use spendgrant_provider::WalletProvider;
use spendgrant_types::{
    ChainProfile, ConfirmationPolicy, FeePolicy, Result, SignedPermission, SpendGrantError,
    TransactionReceipt,
};
use std::sync::Arc;
use tracing::info;

/// Submits `approveWithSignature` transactions to the authority contract.
pub struct AuthoritySubmitter {
    provider: Arc<dyn WalletProvider>,
    profile: ChainProfile,
    fees: FeePolicy,
    confirmation: ConfirmationPolicy,
    /// Account the transaction is sent from (the spender's wallet)
    sender: Address,
}

impl AuthoritySubmitter {
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

    /// Activate `signed` on-chain; blocks until mined or the wait elapses.
    pub async fn approve(&self, signed: &SignedPermission) -> Result<TransactionReceipt> {
        signed.permission.validate()?;

        let data = abi::encode_approve_with_signature(signed);
        info!(
            account = %signed.permission.account,
            spender = %signed.permission.spender,
            manager = %self.profile.spend_permission_manager,
            "submitting approveWithSignature"
        );

        let tx_hash = submit::send_transaction(
            self.provider.as_ref(),
            self.sender,
            self.profile.spend_permission_manager,
            &data,
            &self.fees,
        )
        .await
        .map_err(classify_approve_error)?;

        let receipt =
            submit::wait_for_receipt(self.provider.as_ref(), tx_hash, &self.confirmation).await?;
        if !receipt.success {
            return Err(SpendGrantError::Reverted {
                operation: "approveWithSignature".into(),
                tx_hash,
            });
        }
        Ok(receipt)
    }
}

/// Map node-reported revert reasons at submission time onto the approval
/// taxonomy. Unrecognized failures keep their transport classification.
fn classify_approve_error(err: SpendGrantError) -> SpendGrantError {
    let SpendGrantError::Rpc { ref message, .. } = err else {
        return err;
    };
    let lower = message.to_ascii_lowercase();
    if lower.contains("invalid signature") || lower.contains("unauthorized spend permission") {
        SpendGrantError::SignatureInvalid {
            reason: message.clone(),
        }
    } else if lower.contains("already approved") {
        SpendGrantError::AlreadyApproved
    } else {
        err
    }
}
