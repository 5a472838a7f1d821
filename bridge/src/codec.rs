//! Fixed-width wire codec for receipt messages.
//!
//! Every field occupies one or more 32-byte blocks: integers are
//! big-endian, left-padded with `0x00`; hash and address bytes are
//! right-aligned within their blocks. Field order is
//! `[sequence, token_key_hash, amount, leaf_hash, target_address,
//! (timestamp)]`.
//!
//! Family differences:
//! - **EVM**: 20-byte hex-decoded target address, no timestamp
//!   (160-byte message).
//! - **TVM**: 36-byte target-address blob decoded from URL-safe base64,
//!   right-aligned in two blocks, plus an 8-byte big-endian timestamp
//!   appended (200-byte message).
//! - **SVM**: 32-byte base58-decoded target address, no timestamp
//!   (160-byte message).
//!
//! The decoder is the exact inverse; the counterpart chain's contract
//! must be able to reproduce these bytes bit for bit.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::state::ChainFamily;

/// EVM/SVM addresses occupy one block, TVM blobs occupy two.
const EVM_ADDRESS_LEN: usize = 20;
const TVM_ADDRESS_LEN: usize = 36;
const SVM_ADDRESS_LEN: usize = 32;

const EVM_MESSAGE_LEN: usize = 160;
const TVM_MESSAGE_LEN: usize = 200;
const SVM_MESSAGE_LEN: usize = 160;

/// A decoded receipt message.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptMessage {
    pub sequence: u64,
    pub token_key: [u8; 32],
    pub amount: Uint128,
    pub leaf_hash: [u8; 32],
    /// Raw canonical address bytes for the destination family
    pub target_address: Vec<u8>,
    /// Present for TVM messages only
    pub timestamp: Option<u64>,
}

// ============================================================================
// Address codecs
// ============================================================================

/// Decode a text target address into the family's canonical bytes.
pub fn decode_target_address(
    family: ChainFamily,
    address: &str,
) -> Result<Vec<u8>, ContractError> {
    let bytes = match family {
        ChainFamily::Evm => {
            let stripped = address.strip_prefix("0x").unwrap_or(address);
            hex::decode(stripped).map_err(|_| invalid_address(family, address))?
        }
        ChainFamily::Tvm => URL_SAFE_NO_PAD
            .decode(address.trim_end_matches('='))
            .map_err(|_| invalid_address(family, address))?,
        ChainFamily::Svm => bs58::decode(address)
            .into_vec()
            .map_err(|_| invalid_address(family, address))?,
    };
    if bytes.len() != address_len(family) {
        return Err(invalid_address(family, address));
    }
    Ok(bytes)
}

fn address_len(family: ChainFamily) -> usize {
    match family {
        ChainFamily::Evm => EVM_ADDRESS_LEN,
        ChainFamily::Tvm => TVM_ADDRESS_LEN,
        ChainFamily::Svm => SVM_ADDRESS_LEN,
    }
}

fn invalid_address(family: ChainFamily, address: &str) -> ContractError {
    ContractError::InvalidAddress {
        reason: format!("not a valid {} address: {}", family.as_str(), address),
    }
}

/// Fixed-width digest a home (bech32) address occupies in a message's
/// target slot. Counterpart chains cannot carry variable-length bech32
/// text, so inbound messages commit to `keccak256(address_utf8)`
/// truncated or padded to the family's slot width.
pub fn home_address_digest(family: ChainFamily, address: &str) -> Vec<u8> {
    let hash = crate::hash::keccak256(address.as_bytes());
    match family {
        ChainFamily::Evm => hash[32 - EVM_ADDRESS_LEN..].to_vec(),
        ChainFamily::Svm => hash.to_vec(),
        ChainFamily::Tvm => {
            let mut digest = vec![0u8; TVM_ADDRESS_LEN - 32];
            digest.extend_from_slice(&hash);
            digest
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a receipt message for the given chain family.
pub fn encode_message(
    family: ChainFamily,
    message: &ReceiptMessage,
) -> Result<Vec<u8>, ContractError> {
    if message.target_address.len() != address_len(family) {
        return Err(ContractError::InvalidAddress {
            reason: format!(
                "expected {} address bytes for {}, got {}",
                address_len(family),
                family.as_str(),
                message.target_address.len()
            ),
        });
    }

    let mut data = Vec::with_capacity(message_len(family));

    // sequence: uint256, big-endian, left-padded
    data.extend_from_slice(&[0u8; 24]);
    data.extend_from_slice(&message.sequence.to_be_bytes());

    data.extend_from_slice(&message.token_key);

    // amount: uint256, big-endian, left-padded
    data.extend_from_slice(&[0u8; 16]);
    data.extend_from_slice(&message.amount.u128().to_be_bytes());

    data.extend_from_slice(&message.leaf_hash);

    // address: raw bytes right-aligned to a 32-byte multiple
    let blocks = message.target_address.len().div_ceil(32);
    let padding = blocks * 32 - message.target_address.len();
    data.extend_from_slice(&vec![0u8; padding]);
    data.extend_from_slice(&message.target_address);

    if matches!(family, ChainFamily::Tvm) {
        let ts = message.timestamp.ok_or_else(|| ContractError::InvalidMessage {
            reason: "tvm message requires a timestamp".to_string(),
        })?;
        data.extend_from_slice(&ts.to_be_bytes());
    }

    debug_assert_eq!(data.len(), message_len(family));
    Ok(data)
}

fn message_len(family: ChainFamily) -> usize {
    match family {
        ChainFamily::Evm => EVM_MESSAGE_LEN,
        ChainFamily::Tvm => TVM_MESSAGE_LEN,
        ChainFamily::Svm => SVM_MESSAGE_LEN,
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a receipt message for the given chain family, recovering the
/// original field tuple exactly.
pub fn decode_message(family: ChainFamily, data: &[u8]) -> Result<ReceiptMessage, ContractError> {
    if data.len() != message_len(family) {
        return Err(ContractError::InvalidMessage {
            reason: format!(
                "expected {} bytes for a {} message, got {}",
                message_len(family),
                family.as_str(),
                data.len()
            ),
        });
    }

    let sequence = read_u64_word(&data[0..32])?;
    let mut token_key = [0u8; 32];
    token_key.copy_from_slice(&data[32..64]);
    let amount = read_u128_word(&data[64..96])?;
    let mut leaf_hash = [0u8; 32];
    leaf_hash.copy_from_slice(&data[96..128]);

    let (target_address, timestamp) = match family {
        ChainFamily::Evm => (data[140..160].to_vec(), None),
        ChainFamily::Svm => (data[128..160].to_vec(), None),
        ChainFamily::Tvm => {
            // 36-byte blob right-aligned in blocks 5-6, then 8 raw bytes
            let address = data[156..192].to_vec();
            let mut ts = [0u8; 8];
            ts.copy_from_slice(&data[192..200]);
            (address, Some(u64::from_be_bytes(ts)))
        }
    };

    Ok(ReceiptMessage {
        sequence,
        token_key,
        amount: Uint128::new(amount),
        leaf_hash,
        target_address,
        timestamp,
    })
}

fn read_u64_word(word: &[u8]) -> Result<u64, ContractError> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(ContractError::InvalidMessage {
            reason: "sequence field out of u64 range".to_string(),
        });
    }
    let mut be = [0u8; 8];
    be.copy_from_slice(&word[24..32]);
    Ok(u64::from_be_bytes(be))
}

fn read_u128_word(word: &[u8]) -> Result<u128, ContractError> {
    if word[..16].iter().any(|b| *b != 0) {
        return Err(ContractError::InvalidMessage {
            reason: "amount field out of u128 range".to_string(),
        });
    }
    let mut be = [0u8; 16];
    be.copy_from_slice(&word[16..32]);
    Ok(u128::from_be_bytes(be))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{compute_leaf_hash, compute_token_key};

    fn sample(family: ChainFamily, address: Vec<u8>, timestamp: Option<u64>) -> ReceiptMessage {
        let token_key = compute_token_key("home", "target", "ELF");
        ReceiptMessage {
            sequence: 42,
            token_key,
            amount: Uint128::new(5_000_000_000),
            leaf_hash: compute_leaf_hash(5_000_000_000, &address, "abc.42"),
            target_address: address,
            timestamp,
        }
    }

    #[test]
    fn test_evm_roundtrip() {
        let msg = sample(ChainFamily::Evm, vec![0xabu8; 20], None);
        let encoded = encode_message(ChainFamily::Evm, &msg).unwrap();
        assert_eq!(encoded.len(), 160);
        // address right-aligned: 12 zero bytes then the address
        assert_eq!(&encoded[128..140], &[0u8; 12]);
        assert_eq!(&encoded[140..160], &[0xabu8; 20][..]);

        let decoded = decode_message(ChainFamily::Evm, &encoded).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_tvm_roundtrip_with_timestamp() {
        let msg = sample(ChainFamily::Tvm, vec![0x07u8; 36], Some(1_700_000_000));
        let encoded = encode_message(ChainFamily::Tvm, &msg).unwrap();
        assert_eq!(encoded.len(), 200);
        // 36-byte blob right-aligned within two blocks
        assert_eq!(&encoded[128..156], &[0u8; 28]);
        assert_eq!(&encoded[192..200], &1_700_000_000u64.to_be_bytes());

        let decoded = decode_message(ChainFamily::Tvm, &encoded).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_svm_roundtrip() {
        let msg = sample(ChainFamily::Svm, vec![0x5au8; 32], None);
        let encoded = encode_message(ChainFamily::Svm, &msg).unwrap();
        assert_eq!(encoded.len(), 160);

        let decoded = decode_message(ChainFamily::Svm, &encoded).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_tampered_message_fails_leaf_check() {
        let msg = sample(ChainFamily::Evm, vec![0xabu8; 20], None);
        let mut encoded = encode_message(ChainFamily::Evm, &msg).unwrap();
        // flip a bit in the amount word
        encoded[95] ^= 0x01;

        let decoded = decode_message(ChainFamily::Evm, &encoded).unwrap();
        let recomputed = compute_leaf_hash(
            decoded.amount.u128(),
            &decoded.target_address,
            "abc.42",
        );
        assert_ne!(recomputed, decoded.leaf_hash);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert!(decode_message(ChainFamily::Evm, &[0u8; 159]).is_err());
        assert!(decode_message(ChainFamily::Tvm, &[0u8; 160]).is_err());
    }

    #[test]
    fn test_tvm_encode_requires_timestamp() {
        let msg = sample(ChainFamily::Tvm, vec![0x07u8; 36], None);
        assert!(encode_message(ChainFamily::Tvm, &msg).is_err());
    }

    #[test]
    fn test_decode_evm_address_forms() {
        let bytes =
            decode_target_address(ChainFamily::Evm, "0x55d398326f99059fF775485246999027B3197955")
                .unwrap();
        assert_eq!(bytes.len(), 20);
        let no_prefix =
            decode_target_address(ChainFamily::Evm, "55d398326f99059fF775485246999027B3197955")
                .unwrap();
        assert_eq!(bytes, no_prefix);
        assert!(decode_target_address(ChainFamily::Evm, "0x1234").is_err());
    }

    #[test]
    fn test_decode_tvm_address() {
        let blob = [0x17u8; 36];
        let text = URL_SAFE_NO_PAD.encode(blob);
        let decoded = decode_target_address(ChainFamily::Tvm, &text).unwrap();
        assert_eq!(decoded, blob);
        assert!(decode_target_address(ChainFamily::Tvm, "!!!").is_err());
    }

    #[test]
    fn test_decode_svm_address() {
        let raw = [0x2au8; 32];
        let text = bs58::encode(raw).into_string();
        let decoded = decode_target_address(ChainFamily::Svm, &text).unwrap();
        assert_eq!(decoded, raw);
        assert!(decode_target_address(ChainFamily::Svm, "0OIl").is_err());
    }
}
