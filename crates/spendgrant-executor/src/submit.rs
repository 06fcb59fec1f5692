//! Shared transaction submission and confirmation waiting
//!
//! Fee parameters are always explicit: in a delegated-signer context there is
//! no interactive user to bump a stuck transaction, so nothing here estimates
//! fees implicitly. Receipt waits are bounded; on timeout the transaction may
//! still land later, so the timeout error carries the hash for re-polling.

use alloy_primitives::{Address, Bytes, B256};
use serde_json::{json, Value};
use spendgrant_types::{
    from_hex_quantity, to_hex_quantity, ConfirmationPolicy, FeePolicy, Result, SpendGrantError,
    TransactionReceipt,
};
use spendgrant_provider::WalletProvider;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Submit a contract write via `eth_sendTransaction`, returning the hash.
pub async fn send_transaction(
    provider: &dyn WalletProvider,
    from: Address,
    to: Address,
    data: &Bytes,
    fees: &FeePolicy,
) -> Result<B256> {
    let params = json!([{
        "from": from.to_string(),
        "to": to.to_string(),
        "data": data.to_string(),
        "gas": format!("0x{:x}", fees.gas_limit),
        "maxFeePerGas": to_hex_quantity(fees.max_fee_per_gas),
        "maxPriorityFeePerGas": to_hex_quantity(fees.max_priority_fee_per_gas),
        "value": "0x0",
    }]);
    let result = provider.request("eth_sendTransaction", params).await?;
    let tx_hash = parse_tx_hash(&result)?;
    debug!(%tx_hash, %to, "transaction submitted");
    Ok(tx_hash)
}

/// Poll `eth_getTransactionReceipt` until the transaction is mined or the
/// configured wait elapses.
pub async fn wait_for_receipt(
    provider: &dyn WalletProvider,
    tx_hash: B256,
    policy: &ConfirmationPolicy,
) -> Result<TransactionReceipt> {
    let deadline = Instant::now() + Duration::from_millis(policy.timeout_ms);
    loop {
        let result = provider
            .request("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
            .await?;
        if !result.is_null() {
            let receipt = parse_receipt(tx_hash, &result)?;
            info!(%tx_hash, block = receipt.block_number, success = receipt.success, "transaction mined");
            return Ok(receipt);
        }
        if Instant::now() >= deadline {
            warn!(%tx_hash, waited_ms = policy.timeout_ms, "no receipt before deadline");
            return Err(SpendGrantError::ConfirmationTimeout {
                tx_hash,
                waited_ms: policy.timeout_ms,
            });
        }
        tokio::time::sleep(Duration::from_millis(policy.poll_interval_ms)).await;
    }
}

fn parse_tx_hash(result: &Value) -> Result<B256> {
    let s = result
        .as_str()
        .ok_or_else(|| SpendGrantError::rpc("eth_sendTransaction", "non-string tx hash"))?;
    let raw = hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| SpendGrantError::rpc("eth_sendTransaction", format!("bad tx hash: {e}")))?;
    if raw.len() != 32 {
        return Err(SpendGrantError::rpc(
            "eth_sendTransaction",
            format!("tx hash is {} bytes, expected 32", raw.len()),
        ));
    }
    Ok(B256::from_slice(&raw))
}

fn parse_receipt(tx_hash: B256, result: &Value) -> Result<TransactionReceipt> {
    let status = result["status"]
        .as_str()
        .and_then(from_hex_quantity)
        .ok_or_else(|| SpendGrantError::rpc("eth_getTransactionReceipt", "missing status"))?;
    let block_number = result["blockNumber"]
        .as_str()
        .and_then(from_hex_quantity)
        .ok_or_else(|| SpendGrantError::rpc("eth_getTransactionReceipt", "missing blockNumber"))?;
    Ok(TransactionReceipt {
        tx_hash,
        block_number,
        success: status == 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendgrant_provider::MockProvider;
    use spendgrant_types::ChainProfile;

    fn fast_policy() -> ConfirmationPolicy {
        ConfirmationPolicy {
            timeout_ms: 40,
            poll_interval_ms: 5,
        }
    }

    #[tokio::test]
    async fn receipt_found_after_polling() {
        let mock = MockProvider::new();
        mock.on("eth_getTransactionReceipt", Value::Null).await;
        mock.on(
            "eth_getTransactionReceipt",
            json!({"status": "0x1", "blockNumber": "0x1a4"}),
        )
        .await;

        let receipt = wait_for_receipt(&mock, B256::repeat_byte(0x01), &fast_policy())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.block_number, 420);
        assert_eq!(mock.call_count("eth_getTransactionReceipt").await, 2);
    }

    #[tokio::test]
    async fn deadline_reports_timeout_not_revert() {
        let mock = MockProvider::new();
        mock.on("eth_getTransactionReceipt", Value::Null).await;

        let err = wait_for_receipt(&mock, B256::repeat_byte(0x02), &fast_policy())
            .await
            .unwrap_err();
        assert!(err.is_indeterminate());
        assert!(matches!(
            err,
            SpendGrantError::ConfirmationTimeout { waited_ms: 40, .. }
        ));
    }

    #[tokio::test]
    async fn reverted_receipt_is_not_a_timeout() {
        let mock = MockProvider::new();
        mock.on(
            "eth_getTransactionReceipt",
            json!({"status": "0x0", "blockNumber": "0x10"}),
        )
        .await;

        let receipt = wait_for_receipt(&mock, B256::repeat_byte(0x03), &fast_policy())
            .await
            .unwrap();
        assert!(!receipt.success);
    }

    #[tokio::test]
    async fn send_transaction_carries_explicit_fees() {
        let mock = MockProvider::new();
        mock.on("eth_sendTransaction", json!(format!("0x{}", "11".repeat(32))))
            .await;

        let profile = ChainProfile::base_sepolia("https://sepolia.base.org");
        let fees = FeePolicy::testnet_default();
        send_transaction(
            &mock,
            Address::repeat_byte(0x22),
            profile.spend_permission_manager,
            &Bytes::from(vec![0xde, 0xad]),
            &fees,
        )
        .await
        .unwrap();

        let (_, params) = mock.requests().await.pop().unwrap();
        let tx = &params[0];
        assert_eq!(tx["gas"], "0x493e0");
        assert_eq!(tx["maxFeePerGas"], "0x3b9aca00");
        assert_eq!(tx["maxPriorityFeePerGas"], "0x3b9aca00");
        assert_eq!(tx["data"], "0xdead");
    }
}
