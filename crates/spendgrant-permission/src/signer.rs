//! Signing client
//!
//! Obtains the controlling account's signature over an encoded permission via
//! the wallet provider. One request-response exchange; the caller suspends
//! until the provider returns or the user rejects. No local state mutation.

use crate::typed_data::{Eip712Domain, TypedData};
use alloy_primitives::Bytes;
use serde_json::{json, Value};
use spendgrant_provider::WalletProvider;
use spendgrant_types::{
    from_hex_quantity, ChainProfile, Result, SignedPermission, SpendGrantError, SpendPermission,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Requests typed-data signatures from the granting account.
pub struct PermissionSigner {
    provider: Arc<dyn WalletProvider>,
    profile: ChainProfile,
}

impl PermissionSigner {
    pub fn new(provider: Arc<dyn WalletProvider>, profile: ChainProfile) -> Self {
        Self { provider, profile }
    }

    /// Sign `permission` with its granting account.
    ///
    /// The active chain is checked against the signing domain first; a
    /// mismatch fails with `NetworkMismatch` before any prompt is shown.
    pub async fn request_signature(
        &self,
        permission: &SpendPermission,
    ) -> Result<SignedPermission> {
        permission.validate()?;
        self.ensure_active_chain().await?;

        let domain = Eip712Domain::spend_permission_manager(&self.profile);
        let typed_data = TypedData::for_permission(permission, &domain);
        debug!(
            account = %permission.account,
            digest = %typed_data.signing_hash(),
            "requesting typed-data signature"
        );

        let result = self
            .provider
            .request(
                "eth_signTypedData_v4",
                json!([
                    permission.account.to_string(),
                    typed_data.to_json_string(),
                ]),
            )
            .await?;

        let signature = parse_signature(&result)?;
        info!(
            account = %permission.account,
            spender = %permission.spender,
            "permission signed"
        );
        Ok(SignedPermission {
            permission: permission.clone(),
            signature,
        })
    }

    async fn ensure_active_chain(&self) -> Result<()> {
        let result = self.provider.request("eth_chainId", json!([])).await?;
        let actual = result
            .as_str()
            .and_then(from_hex_quantity)
            .ok_or_else(|| SpendGrantError::rpc("eth_chainId", "non-hex chain id"))?;
        if actual != self.profile.chain_id {
            return Err(SpendGrantError::NetworkMismatch {
                expected: self.profile.chain_id,
                actual,
            });
        }
        Ok(())
    }
}

fn parse_signature(result: &Value) -> Result<Bytes> {
    let hex_sig = result
        .as_str()
        .ok_or_else(|| SpendGrantError::rpc("eth_signTypedData_v4", "non-string signature"))?;
    let raw = hex::decode(hex_sig.strip_prefix("0x").unwrap_or(hex_sig)).map_err(|e| {
        SpendGrantError::SignatureInvalid {
            reason: format!("signature is not valid hex: {e}"),
        }
    })?;
    if raw.is_empty() {
        return Err(SpendGrantError::SignatureInvalid {
            reason: "empty signature".into(),
        });
    }
    Ok(Bytes::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PermissionBuilder;
    use alloy_primitives::{Address, U256};
    use spendgrant_provider::MockProvider;

    const NOW: u64 = 1_761_221_758;

    fn permission() -> SpendPermission {
        PermissionBuilder::new(Address::repeat_byte(0x11), Address::repeat_byte(0x22))
            .allowance(U256::from(90_000_000_000_000u64))
            .build_at(NOW)
            .unwrap()
    }

    fn signer(mock: Arc<MockProvider>) -> PermissionSigner {
        PermissionSigner::new(mock, ChainProfile::base_sepolia("https://sepolia.base.org"))
    }

    #[tokio::test]
    async fn signs_when_chain_matches() {
        let mock = Arc::new(MockProvider::new());
        mock.on("eth_chainId", json!("0x14a34")).await;
        mock.on("eth_signTypedData_v4", json!(format!("0x{}", "ab".repeat(65))))
            .await;

        let signed = signer(mock.clone())
            .request_signature(&permission())
            .await
            .unwrap();
        assert_eq!(signed.signature.len(), 65);
        assert_eq!(mock.call_count("eth_signTypedData_v4").await, 1);

        // the second param is the JSON-encoded typed data string
        let (_, params) = mock.requests().await.pop().unwrap();
        let payload: Value =
            serde_json::from_str(params[1].as_str().unwrap()).unwrap();
        assert_eq!(payload["primaryType"], "SpendPermission");
    }

    #[tokio::test]
    async fn wrong_chain_fails_before_any_prompt() {
        let mock = Arc::new(MockProvider::new());
        mock.on("eth_chainId", json!("0x2105")).await; // Base mainnet

        let err = signer(mock.clone())
            .request_signature(&permission())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SpendGrantError::NetworkMismatch {
                expected: 84532,
                actual: 8453
            }
        ));
        assert_eq!(mock.call_count("eth_signTypedData_v4").await, 0);
    }

    #[tokio::test]
    async fn user_rejection_surfaces() {
        let mock = Arc::new(MockProvider::new());
        mock.on("eth_chainId", json!("0x14a34")).await;
        mock.on_error("eth_signTypedData_v4", 4001, "User rejected request")
            .await;

        let err = signer(mock).request_signature(&permission()).await.unwrap_err();
        assert!(matches!(err, SpendGrantError::UserRejected { .. }));
    }

    #[tokio::test]
    async fn invalid_permission_never_reaches_the_provider() {
        let mock = Arc::new(MockProvider::new());
        let invalid =
            PermissionBuilder::new(Address::repeat_byte(0x11), Address::repeat_byte(0x22))
                .build_at(NOW);
        assert!(invalid.is_err());

        let mut p = permission();
        p.allowance = U256::ZERO;
        let err = signer(mock.clone()).request_signature(&p).await.unwrap_err();
        assert!(matches!(err, SpendGrantError::InvalidAmount { .. }));
        assert!(mock.requests().await.is_empty());
    }
}
