//! EIP-712 typed-data encoding for spend permissions
//!
//! The schema below is a frozen contract: every deployed signature was
//! produced over exactly this type table and field order, so any reordering
//! or width change invalidates all of them retroactively. Versioning happens
//! only by bumping the domain `version`.
//!
//! ```text
//! SpendPermission(address account,address spender,address token,
//!                 uint160 allowance,uint48 period,uint48 start,
//!                 uint48 end,uint256 salt,bytes extraData)
//! ```

use alloy_primitives::{Address, B256, U256};
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use spendgrant_types::{ChainProfile, SpendPermission};

/// Domain name the SpendPermissionManager verifies against.
pub const DOMAIN_NAME: &str = "Spend Permission Manager";
/// Domain version; bump only on a deliberate schema break.
pub const DOMAIN_VERSION: &str = "1";
/// Primary type name in the types table.
pub const PRIMARY_TYPE: &str = "SpendPermission";

const SPEND_PERMISSION_TYPE: &str = "SpendPermission(address account,address spender,\
address token,uint160 allowance,uint48 period,uint48 start,uint48 end,uint256 salt,\
bytes extraData)";

const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-712 domain descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// The SpendPermissionManager domain for a chain profile.
    pub fn spend_permission_manager(profile: &ChainProfile) -> Self {
        Self {
            name: DOMAIN_NAME.to_string(),
            version: DOMAIN_VERSION.to_string(),
            chain_id: profile.chain_id,
            verifying_contract: profile.spend_permission_manager,
        }
    }

    /// `hashStruct(EIP712Domain)` per EIP-712.
    pub fn separator(&self) -> B256 {
        let mut hasher = Keccak256::new();
        hasher.update(keccak(EIP712_DOMAIN_TYPE.as_bytes()));
        hasher.update(keccak(self.name.as_bytes()));
        hasher.update(keccak(self.version.as_bytes()));
        hasher.update(word_u64(self.chain_id));
        hasher.update(word_address(self.verifying_contract));
        B256::from_slice(&hasher.finalize())
    }
}

/// A fully assembled `eth_signTypedData_v4` payload for one permission.
///
/// Deterministic: identical permission fields (including salt) always produce
/// an identical payload and an identical signing hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedData {
    json: Value,
    domain: Eip712Domain,
    message_hash: B256,
}

impl TypedData {
    pub fn for_permission(permission: &SpendPermission, domain: &Eip712Domain) -> Self {
        let json = json!({
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "version", "type": "string"},
                    {"name": "chainId", "type": "uint256"},
                    {"name": "verifyingContract", "type": "address"},
                ],
                "SpendPermission": [
                    {"name": "account", "type": "address"},
                    {"name": "spender", "type": "address"},
                    {"name": "token", "type": "address"},
                    {"name": "allowance", "type": "uint160"},
                    {"name": "period", "type": "uint48"},
                    {"name": "start", "type": "uint48"},
                    {"name": "end", "type": "uint48"},
                    {"name": "salt", "type": "uint256"},
                    {"name": "extraData", "type": "bytes"},
                ],
            },
            "primaryType": PRIMARY_TYPE,
            "domain": {
                "name": domain.name,
                "version": domain.version,
                "chainId": domain.chain_id,
                "verifyingContract": domain.verifying_contract.to_string(),
            },
            "message": {
                "account": permission.account.to_string(),
                "spender": permission.spender.to_string(),
                "token": permission.token.to_string(),
                "allowance": permission.allowance.to_string(),
                "period": permission.period,
                "start": permission.start,
                "end": permission.end,
                "salt": permission.salt.to_string(),
                "extraData": permission.extra_data.to_string(),
            },
        });

        Self {
            json,
            domain: domain.clone(),
            message_hash: hash_struct(permission),
        }
    }

    /// The JSON payload to pass as the second `eth_signTypedData_v4` param.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Compact JSON string, as the wire method expects.
    pub fn to_json_string(&self) -> String {
        self.json.to_string()
    }

    /// `hashStruct(message)` for the permission.
    pub fn message_hash(&self) -> B256 {
        self.message_hash
    }

    /// The digest the wallet actually signs:
    /// `keccak256(0x19 || 0x01 || domainSeparator || hashStruct(message))`.
    pub fn signing_hash(&self) -> B256 {
        let mut hasher = Keccak256::new();
        hasher.update([0x19, 0x01]);
        hasher.update(self.domain.separator());
        hasher.update(self.message_hash);
        B256::from_slice(&hasher.finalize())
    }
}

fn hash_struct(p: &SpendPermission) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(keccak(SPEND_PERMISSION_TYPE.as_bytes()));
    hasher.update(word_address(p.account));
    hasher.update(word_address(p.spender));
    hasher.update(word_address(p.token));
    hasher.update(p.allowance.to_be_bytes::<32>());
    hasher.update(word_u64(p.period));
    hasher.update(word_u64(p.start));
    hasher.update(word_u64(p.end));
    hasher.update(p.salt);
    // dynamic `bytes` member: hash of the contents
    hasher.update(keccak(&p.extra_data));
    B256::from_slice(&hasher.finalize())
}

fn keccak(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

fn word_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

fn word_u64(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use spendgrant_types::{MAX_UINT48, NATIVE_TOKEN};

    fn profile() -> ChainProfile {
        ChainProfile::base_sepolia("https://sepolia.base.org")
    }

    fn permission() -> SpendPermission {
        SpendPermission {
            account: Address::repeat_byte(0x11),
            spender: Address::repeat_byte(0x22),
            token: NATIVE_TOKEN,
            allowance: U256::from(90_000_000_000_000u64),
            period: 2_592_000,
            start: 1_761_221_758,
            end: MAX_UINT48,
            salt: B256::repeat_byte(0x42),
            extra_data: Bytes::new(),
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let domain = Eip712Domain::spend_permission_manager(&profile());
        let a = TypedData::for_permission(&permission(), &domain);
        let b = TypedData::for_permission(&permission(), &domain);
        assert_eq!(a.to_json_string(), b.to_json_string());
        assert_eq!(a.signing_hash(), b.signing_hash());
    }

    #[test]
    fn digest_depends_on_salt() {
        let domain = Eip712Domain::spend_permission_manager(&profile());
        let mut other = permission();
        other.salt = B256::repeat_byte(0x43);
        let a = TypedData::for_permission(&permission(), &domain);
        let b = TypedData::for_permission(&other, &domain);
        assert_ne!(a.signing_hash(), b.signing_hash());
    }

    #[test]
    fn domain_separator_depends_on_chain_id() {
        let base = Eip712Domain::spend_permission_manager(&profile());
        let mut mainnet = base.clone();
        mainnet.chain_id = 8453;
        assert_ne!(base.separator(), mainnet.separator());
    }

    #[test]
    fn schema_field_order_is_frozen() {
        let domain = Eip712Domain::spend_permission_manager(&profile());
        let td = TypedData::for_permission(&permission(), &domain);
        let fields: Vec<&str> = td.json()["types"]["SpendPermission"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            [
                "account", "spender", "token", "allowance", "period", "start", "end", "salt",
                "extraData"
            ]
        );
    }

    #[test]
    fn message_values_use_wire_shapes() {
        let domain = Eip712Domain::spend_permission_manager(&profile());
        let td = TypedData::for_permission(&permission(), &domain);
        let message = &td.json()["message"];
        // allowance is a decimal string, salt and extraData are hex strings
        assert_eq!(message["allowance"], "90000000000000");
        assert!(message["salt"].as_str().unwrap().starts_with("0x"));
        assert_eq!(message["extraData"], "0x");
        assert_eq!(message["end"].as_u64(), Some(MAX_UINT48));
        assert_eq!(td.json()["primaryType"], "SpendPermission");
        assert_eq!(td.json()["domain"]["name"], DOMAIN_NAME);
    }

    #[test]
    fn empty_and_nonempty_extra_data_hash_differently() {
        let domain = Eip712Domain::spend_permission_manager(&profile());
        let mut with_data = permission();
        with_data.extra_data = Bytes::from(vec![0x01]);
        let a = TypedData::for_permission(&permission(), &domain);
        let b = TypedData::for_permission(&with_data, &domain);
        assert_ne!(a.message_hash(), b.message_hash());
    }
}
