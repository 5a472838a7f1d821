//! Hash computation for receipts and redemption claims.
//!
//! The leaf hash committed for a transfer claim must be byte-identical to
//! what the counterpart chain's contract independently recomputes, so the
//! layouts here are fixed:
//!
//! ```text
//! leaf = keccak256(
//!     keccak256(amount as uint256, big-endian) ||
//!     keccak256(canonical target address bytes) ||
//!     keccak256(receipt id, utf-8)
//! )
//! ```
//!
//! Token keys bind a receipt sequence to its (home chain, target chain,
//! symbol) tuple:
//!
//! ```text
//! token_key = keccak256(
//!     keccak256(home_chain_id) || keccak256(target_chain_id) || keccak256(symbol)
//! )
//! ```

use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;

/// Compute keccak256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Amount as a 32-byte big-endian word (uint256, left-padded).
pub fn amount_to_bytes32(amount: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..32].copy_from_slice(&amount.to_be_bytes());
    word
}

/// Compute the leaf hash committing a single transfer claim.
pub fn compute_leaf_hash(amount: u128, target_address: &[u8], receipt_id: &str) -> [u8; 32] {
    let mut data = [0u8; 96];
    data[0..32].copy_from_slice(&keccak256(&amount_to_bytes32(amount)));
    data[32..64].copy_from_slice(&keccak256(target_address));
    data[64..96].copy_from_slice(&keccak256(receipt_id.as_bytes()));
    keccak256(&data)
}

/// Compute the per-(chain, token) key hash receipts are sequenced under.
pub fn compute_token_key(home_chain_id: &str, target_chain_id: &str, symbol: &str) -> [u8; 32] {
    let mut data = [0u8; 96];
    data[0..32].copy_from_slice(&keccak256(home_chain_id.as_bytes()));
    data[32..64].copy_from_slice(&keccak256(target_chain_id.as_bytes()));
    data[64..96].copy_from_slice(&keccak256(symbol.as_bytes()));
    keccak256(&data)
}

/// Format a receipt id: lowercase hex token key, a dot, then the
/// sequence number.
pub fn format_receipt_id(token_key: &[u8; 32], sequence: u64) -> String {
    format!("{}.{}", hex::encode(token_key), sequence)
}

/// Split a receipt id back into its token key and sequence number.
pub fn parse_receipt_id(receipt_id: &str) -> Result<([u8; 32], u64), ContractError> {
    let invalid = || ContractError::InvalidReceiptId {
        receipt_id: receipt_id.to_string(),
    };

    let (key_hex, seq_str) = receipt_id.split_once('.').ok_or_else(invalid)?;
    let sequence: u64 = seq_str.parse().map_err(|_| invalid())?;
    if sequence == 0 {
        return Err(invalid());
    }

    let key_bytes = hex::decode(key_hex).map_err(|_| invalid())?;
    let token_key: [u8; 32] = key_bytes.try_into().map_err(|_| invalid())?;
    Ok((token_key, sequence))
}

/// Convert 32-byte hash to a 0x-prefixed hex string (for attributes).
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// keccak256("hello") known-answer check
    #[test]
    fn test_keccak256_basic() {
        let result = keccak256(b"hello");
        assert_eq!(
            bytes32_to_hex(&result),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_amount_encoding_left_padded() {
        let word = amount_to_bytes32(1_000_000_000_000_000_000);
        assert_eq!(&word[0..16], &[0u8; 16]);
        assert_eq!(
            &word[16..32],
            &1_000_000_000_000_000_000u128.to_be_bytes()
        );
    }

    #[test]
    fn test_leaf_hash_stable() {
        let addr = [0x11u8; 20];
        let a = compute_leaf_hash(100, &addr, "aa.1");
        let b = compute_leaf_hash(100, &addr, "aa.1");
        assert_eq!(a, b);

        // Any field change moves the hash
        assert_ne!(a, compute_leaf_hash(101, &addr, "aa.1"));
        assert_ne!(a, compute_leaf_hash(100, &[0x12u8; 20], "aa.1"));
        assert_ne!(a, compute_leaf_hash(100, &addr, "aa.2"));
    }

    #[test]
    fn test_token_key_distinct_per_tuple() {
        let k1 = compute_token_key("home", "ethereum", "ELF");
        let k2 = compute_token_key("home", "ethereum", "USDT");
        let k3 = compute_token_key("home", "ton", "ELF");
        assert_ne!(k1, k2);
        assert_ne!(k1, k3);
        assert_ne!(k2, k3);
    }

    #[test]
    fn test_receipt_id_roundtrip() {
        let key = compute_token_key("home", "ethereum", "ELF");
        let id = format_receipt_id(&key, 7);
        let (parsed_key, seq) = parse_receipt_id(&id).unwrap();
        assert_eq!(parsed_key, key);
        assert_eq!(seq, 7);
    }

    #[test]
    fn test_parse_receipt_id_rejects_malformed() {
        assert!(parse_receipt_id("deadbeef").is_err());
        assert!(parse_receipt_id("deadbeef.x").is_err());
        assert!(parse_receipt_id("nothex.1").is_err());
        // sequence numbers start at 1
        let key = compute_token_key("home", "ethereum", "ELF");
        assert!(parse_receipt_id(&format!("{}.0", hex::encode(key))).is_err());
        // key must be exactly 32 bytes
        assert!(parse_receipt_id("dead.1").is_err());
    }
}
