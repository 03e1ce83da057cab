//! ProofEnvelope: the Groth16/BN128-shaped proof object and its wire form
//!
//! Wire form is base64 (standard alphabet) of the compact JSON text:
//! `{"pi_a":[..3],"pi_b":[[..2],[..2],[..2]],"pi_c":[..3],"protocol":"groth16","curve":"bn128"}`

use crate::error::VerificationError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const PROTOCOL: &str = "groth16";
pub const CURVE: &str = "bn128";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEnvelope {
    pub pi_a: [String; 3],
    pub pi_b: [[String; 2]; 3],
    pub pi_c: [String; 3],
    pub protocol: String,
    pub curve: String,
}

impl ProofEnvelope {
    /// Build an envelope with the fixed protocol and curve tags
    pub fn new(pi_a: [String; 3], pi_b: [[String; 2]; 3], pi_c: [String; 3]) -> Self {
        Self {
            pi_a,
            pi_b,
            pi_c,
            protocol: PROTOCOL.to_string(),
            curve: CURVE.to_string(),
        }
    }

    /// Serialize to JSON, then base64
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json.as_bytes()))
    }

    /// Reverse of `encode`. Does not check the protocol header.
    pub fn decode(encoded: &str) -> Result<Self, VerificationError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Reject envelopes from a different proving system or curve
    pub fn check_header(&self) -> Result<(), VerificationError> {
        if self.protocol != PROTOCOL || self.curve != CURVE {
            return Err(VerificationError::UnsupportedProof {
                protocol: self.protocol.clone(),
                curve: self.curve.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProofEnvelope {
        ProofEnvelope::new(
            ["1".into(), "2".into(), "1".into()],
            [
                ["3".into(), "4".into()],
                ["5".into(), "6".into()],
                ["1".into(), "0".into()],
            ],
            ["7".into(), "8".into(), "1".into()],
        )
    }

    #[test]
    fn test_encode_decode() {
        let env = sample();
        let encoded = env.encode().unwrap();
        assert_eq!(ProofEnvelope::decode(&encoded).unwrap(), env);
    }

    #[test]
    fn test_wire_json_layout() {
        let encoded = sample().encode().unwrap();
        let json = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"pi_a":["1","2","1"],"pi_b":[["3","4"],["5","6"],["1","0"]],"pi_c":["7","8","1"],"protocol":"groth16","curve":"bn128"}"#
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            ProofEnvelope::decode("!!not base64!!"),
            Err(VerificationError::Base64(_))
        ));
        let not_json = STANDARD.encode(b"hello");
        assert!(matches!(
            ProofEnvelope::decode(&not_json),
            Err(VerificationError::Json(_))
        ));
        let short = STANDARD.encode(br#"{"pi_a":["1"],"pi_b":[],"pi_c":[],"protocol":"groth16","curve":"bn128"}"#);
        assert!(ProofEnvelope::decode(&short).is_err());
    }

    #[test]
    fn test_header_check() {
        let mut env = sample();
        assert!(env.check_header().is_ok());
        env.protocol = "plonk".into();
        assert!(matches!(
            env.check_header(),
            Err(VerificationError::UnsupportedProof { .. })
        ));
    }
}
