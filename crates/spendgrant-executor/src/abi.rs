//! ABI call encoding for the SpendPermissionManager
//!
//! The on-chain tuple widens the typed-data fields to the authority ABI's
//! declared widths: `allowance`/`period`/`start`/`end` travel as `uint256`
//! and `salt` as `bytes32`. Field order is fixed and must match the
//! typed-data schema exactly:
//! `(account, spender, token, allowance, period, start, end, salt, extraData)`.

use alloy_primitives::{Address, Bytes, U256};
use sha3::{Digest, Keccak256};
use spendgrant_types::{SignedPermission, SpendPermission};

const APPROVE_WITH_SIGNATURE: &str = "approveWithSignature((address,address,address,\
uint256,uint256,uint256,uint256,bytes32,bytes),bytes)";

const SPEND: &str =
    "spend((address,address,address,uint256,uint256,uint256,uint256,bytes32,bytes),uint256)";

/// First four bytes of the keccak-256 of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Calldata for `approveWithSignature(permission, signature)`.
pub fn encode_approve_with_signature(signed: &SignedPermission) -> Bytes {
    let permission = encode_permission_tuple(&signed.permission);
    let signature = encode_dynamic_bytes(&signed.signature);

    let mut out = Vec::with_capacity(4 + 64 + permission.len() + signature.len());
    out.extend_from_slice(&selector(APPROVE_WITH_SIGNATURE));
    // two dynamic top-level args: head is two offset words
    out.extend_from_slice(&word_usize(64));
    out.extend_from_slice(&word_usize(64 + permission.len()));
    out.extend_from_slice(&permission);
    out.extend_from_slice(&signature);
    Bytes::from(out)
}

/// Calldata for `spend(permission, amount)`.
pub fn encode_spend(permission: &SpendPermission, amount: U256) -> Bytes {
    let tuple = encode_permission_tuple(permission);

    let mut out = Vec::with_capacity(4 + 64 + tuple.len());
    out.extend_from_slice(&selector(SPEND));
    out.extend_from_slice(&word_usize(64));
    out.extend_from_slice(&amount.to_be_bytes::<32>());
    out.extend_from_slice(&tuple);
    Bytes::from(out)
}

/// The permission as a dynamic ABI tuple: nine head words (the ninth is the
/// offset of `extraData`) followed by the `extraData` tail.
fn encode_permission_tuple(p: &SpendPermission) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 * 10);
    out.extend_from_slice(&word_address(p.account));
    out.extend_from_slice(&word_address(p.spender));
    out.extend_from_slice(&word_address(p.token));
    out.extend_from_slice(&p.allowance.to_be_bytes::<32>());
    out.extend_from_slice(&word_u64(p.period));
    out.extend_from_slice(&word_u64(p.start));
    out.extend_from_slice(&word_u64(p.end));
    out.extend_from_slice(p.salt.as_slice());
    out.extend_from_slice(&word_usize(9 * 32));
    out.extend_from_slice(&encode_dynamic_bytes(&p.extra_data));
    out
}

/// Length word followed by contents padded to a 32-byte boundary.
fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
    let padded_len = bytes.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded_len);
    out.extend_from_slice(&word_usize(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(32 + padded_len, 0);
    out
}

fn word_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

fn word_u64(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

fn word_usize(value: usize) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}
