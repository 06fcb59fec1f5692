//! Sub-account resolution and batch execution
//!
//! Lookup-before-create: resolving a sub-account asks the wallet for existing
//! ones scoped to (primary account, app domain) and only creates when none
//! exists, so repeated connects never proliferate redundant delegated
//! accounts. Resolutions are cached for the session.

use crate::connect::parse_address;
use alloy_primitives::Address;
use serde_json::{json, Value};
use spendgrant_provider::WalletProvider;
use spendgrant_types::{
    to_hex_quantity, CallBatch, CallsId, ChainProfile, Result, SpendGrantError, SubAccount,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Resolves capability-scoped sub-accounts and executes call batches.
pub struct SubAccountManager {
    provider: Arc<dyn WalletProvider>,
    profile: ChainProfile,
    /// Application domain the sub-accounts are scoped to
    app_domain: String,
    /// Session cache: primary account -> resolved sub-account
    resolved: RwLock<HashMap<Address, SubAccount>>,
}

impl SubAccountManager {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        profile: ChainProfile,
        app_domain: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            profile,
            app_domain: app_domain.into(),
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the sub-account for `primary`, creating one only if the wallet
    /// knows none for this (account, domain) scope. Idempotent: a second call
    /// returns the same address without another create.
    pub async fn resolve_sub_account(&self, primary: Address) -> Result<SubAccount> {
        if let Some(existing) = self.resolved.read().await.get(&primary) {
            debug!(primary = %primary, sub = %existing.address, "sub-account from session cache");
            return Ok(existing.clone());
        }

        let response = self
            .provider
            .request(
                "wallet_getSubAccounts",
                json!([{
                    "account": primary.to_string(),
                    "domain": self.app_domain,
                }]),
            )
            .await?;

        let sub_account = match first_sub_account(&response)? {
            Some(address) => SubAccount {
                address,
                owner: primary,
                created: false,
            },
            None => {
                let created = self
                    .provider
                    .request(
                        "wallet_addSubAccount",
                        json!([{"account": {"type": "create"}}]),
                    )
                    .await
                    .map_err(|err| SpendGrantError::SubAccountCreationFailed {
                        reason: err.to_string(),
                    })?;
                let address = descriptor_address(&created).ok_or_else(|| {
                    SpendGrantError::SubAccountCreationFailed {
                        reason: "creation response had no address".into(),
                    }
                })?;
                SubAccount {
                    address: parse_address(address)?,
                    owner: primary,
                    created: true,
                }
            }
        };

        info!(
            primary = %primary,
            sub = %sub_account.address,
            created = sub_account.created,
            "sub-account resolved"
        );
        self.resolved
            .write()
            .await
            .insert(primary, sub_account.clone());
        Ok(sub_account)
    }

    /// Submit `batch` atomically from the sub-account. The returned id is
    /// opaque, for external status correlation only.
    pub async fn execute_batch(&self, sub_account: &SubAccount, batch: &CallBatch) -> Result<CallsId> {
        if batch.is_empty() {
            return Err(SpendGrantError::EmptyBatch);
        }

        let calls: Vec<Value> = batch
            .calls
            .iter()
            .map(|call| {
                json!({
                    "to": call.to.to_string(),
                    "value": to_hex_quantity(call.value),
                    "data": call.data.to_string(),
                })
            })
            .collect();

        let result = self
            .provider
            .request(
                "wallet_sendCalls",
                json!([{
                    "version": "2.0",
                    "from": sub_account.address.to_string(),
                    "chainId": self.profile.chain_id_hex(),
                    "calls": calls,
                }]),
            )
            .await?;

        let calls_id = parse_calls_id(&result)?;
        info!(
            sub = %sub_account.address,
            calls = batch.calls.len(),
            total_value = %batch.total_value(),
            %calls_id,
            "call batch submitted"
        );
        Ok(calls_id)
    }
}

/// `wallet_getSubAccounts` returns `{subAccounts: [{address, ...}, ...]}`.
fn first_sub_account(response: &Value) -> Result<Option<Address>> {
    let Some(first) = response["subAccounts"].as_array().and_then(|l| l.first()) else {
        return Ok(None);
    };
    let address = descriptor_address(first).ok_or_else(|| {
        SpendGrantError::rpc("wallet_getSubAccounts", "sub-account entry had no address")
    })?;
    parse_address(address).map(Some)
}

fn descriptor_address(descriptor: &Value) -> Option<&str> {
    descriptor["address"].as_str()
}

/// Wallets return either a bare id string or `{id}` depending on version.
fn parse_calls_id(result: &Value) -> Result<CallsId> {
    if let Some(id) = result.as_str() {
        return Ok(CallsId(id.to_string()));
    }
    if let Some(id) = result["id"].as_str() {
        return Ok(CallsId(id.to_string()));
    }
    Err(SpendGrantError::rpc(
        "wallet_sendCalls",
        "response had no calls id",
    ))
}
