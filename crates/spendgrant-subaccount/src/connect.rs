//! Wallet session establishment
//!
//! Requests account access and pins the session to the configured network.
//! Connect order follows the wallet's expectations: `wallet_connect` first,
//! then `eth_requestAccounts`, then the chain switch.

use alloy_primitives::Address;
use serde_json::json;
use spendgrant_provider::WalletProvider;
use spendgrant_types::{ChainProfile, Result, SpendGrantError};
use tracing::info;

/// Connect to the wallet and switch to `profile`'s chain. `app_name` is the
/// display name the wallet shows in its connect prompt.
///
/// Returns the primary (universal) account. A provider that returns zero
/// accounts is a distinct `NoAccounts` error, never an empty success; a
/// declined chain switch is `ChainSwitchRejected`.
pub async fn connect(
    provider: &dyn WalletProvider,
    profile: &ChainProfile,
    app_name: &str,
) -> Result<Address> {
    provider
        .request("wallet_connect", json!([{"appName": app_name}]))
        .await?;

    let accounts = provider.request("eth_requestAccounts", json!([])).await?;
    let primary = accounts
        .as_array()
        .and_then(|list| list.first())
        .and_then(|v| v.as_str())
        .ok_or(SpendGrantError::NoAccounts)?;
    let primary = parse_address(primary)?;

    provider
        .request(
            "wallet_switchEthereumChain",
            json!([{"chainId": profile.chain_id_hex()}]),
        )
        .await
        .map_err(|err| match err {
            SpendGrantError::UserRejected { .. } => SpendGrantError::ChainSwitchRejected {
                chain_id: profile.chain_id,
            },
            other => other,
        })?;

    info!(account = %primary, chain_id = profile.chain_id, "wallet connected");
    Ok(primary)
}

pub(crate) fn parse_address(s: &str) -> Result<Address> {
    let raw = hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| SpendGrantError::rpc("eth_requestAccounts", format!("bad address: {e}")))?;
    if raw.len() != 20 {
        return Err(SpendGrantError::rpc(
            "eth_requestAccounts",
            format!("address is {} bytes, expected 20", raw.len()),
        ));
    }
    Ok(Address::from_slice(&raw))
}
