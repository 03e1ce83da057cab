//! FieldCommitment: SHA-256 commitments truncated into the BN254 scalar field
//!
//! A commitment is the SHA-256 digest of a string with its last hex nibble
//! dropped (63 of 64 hex characters, i.e. 252 bits). Every commitment is
//! therefore strictly smaller than the BN254 scalar modulus (~2^253.6) and can
//! be used directly as a circuit input.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use sha2::{Digest, Sha256};
use std::fmt;

/// A 252-bit commitment, stored big-endian with the top nibble always zero
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldCommitment([u8; 32]);

impl FieldCommitment {
    /// Commit to arbitrary UTF-8 text
    pub fn commit(data: &str) -> Self {
        let digest: [u8; 32] = Sha256::digest(data.as_bytes()).into();
        Self::from_digest(digest)
    }

    /// Truncate a raw SHA-256 digest to its top 252 bits
    pub fn from_digest(digest: [u8; 32]) -> Self {
        let mut out = [0u8; 32];
        out[0] = digest[0] >> 4;
        for i in 1..32 {
            out[i] = (digest[i - 1] << 4) | (digest[i] >> 4);
        }
        Self(out)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The commitment as a scalar field element (exact, no reduction happens)
    pub fn to_field(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }

    /// Decimal form, as carried in public signals
    pub fn to_decimal(&self) -> String {
        field_to_decimal(self.to_field())
    }

    /// Lowercase hex without leading zeros ("0" for zero)
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Debug for FieldCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldCommitment(0x{})", self.to_hex())
    }
}

/// Commit to a task identifier. Depends on `task_id` alone.
pub fn hash_task_id(task_id: &str) -> FieldCommitment {
    FieldCommitment::commit(task_id)
}

/// Commit to an agent's raw output. The result is never published.
pub fn hash_output(output_data: &str) -> FieldCommitment {
    FieldCommitment::commit(output_data)
}

/// Render any prime field element as a canonical decimal string
pub fn field_to_decimal<F: PrimeField>(value: F) -> String {
    let digits = value.into_bigint().to_string();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a canonical decimal string into a prime field element.
///
/// Rejects empty input, signs, leading zeros and anything that is not already
/// reduced below the modulus.
pub fn field_from_decimal<F: PrimeField>(text: &str) -> Option<F> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = F::from_str(text).ok()?;
    (field_to_decimal(value) == text).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer_abc() {
        // SHA-256("abc") = ba7816bf...f20015ad; the final nibble is dropped
        let c = FieldCommitment::commit("abc");
        assert_eq!(
            c.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015a"
        );
    }

    #[test]
    fn test_matches_truncated_hex_digest() {
        for input in ["t1", "dup", "", "agent_a_task_001", "Ünïcødé ✓"] {
            let full = hex::encode(Sha256::digest(input.as_bytes()));
            let expected = full[..63].trim_start_matches('0');
            assert_eq!(hash_task_id(input).to_hex(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_top_nibble_always_clear() {
        for i in 0..64 {
            let c = hash_output(&format!("output-{}", i));
            assert_eq!(c.as_bytes()[0] & 0xF0, 0);
        }
    }

    #[test]
    fn test_task_hash_deterministic() {
        assert_eq!(hash_task_id("same_task_id"), hash_task_id("same_task_id"));
        assert_ne!(hash_task_id("same_task_id"), hash_task_id("other_task_id"));
    }

    #[test]
    fn test_decimal_round_trips_through_field() {
        let c = hash_task_id("t1");
        let parsed: Fr = field_from_decimal(&c.to_decimal()).unwrap();
        assert_eq!(parsed, c.to_field());
    }

    #[test]
    fn test_zero_commitment() {
        let zero = FieldCommitment::from_digest([0u8; 32]);
        assert!(zero.is_zero());
        assert_eq!(zero.to_hex(), "0");
        assert_eq!(zero.to_decimal(), "0");
        assert!(!hash_output("").is_zero());
    }

    #[test]
    fn test_decimal_parsing_is_strict() {
        assert_eq!(field_from_decimal::<Fr>("42"), Some(Fr::from(42u64)));
        assert_eq!(field_from_decimal::<Fr>("0"), Some(Fr::from(0u64)));
        assert!(field_from_decimal::<Fr>("").is_none());
        assert!(field_from_decimal::<Fr>("007").is_none());
        assert!(field_from_decimal::<Fr>("-1").is_none());
        assert!(field_from_decimal::<Fr>("12a").is_none());
        // The scalar modulus itself is not a canonical element
        let modulus = Fr::MODULUS.to_string();
        assert!(field_from_decimal::<Fr>(&modulus).is_none());
    }
}
