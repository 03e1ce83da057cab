//! Development backend used when no circuit artifacts are installed.
//!
//! Envelopes carry random 32-byte hex fillers in place of curve points. The
//! compliance flag is computed directly from the witness and the verifier
//! trusts the generator's `verified` flag, so none of this is a security
//! boundary.

use super::{ProofBackend, ProofMode, ProvedStatement, Verdict};
use crate::error::{GenerationError, VerificationError};
use crate::zk::circuit::PUBLIC_INPUTS;
use crate::zk::envelope::{CURVE, PROTOCOL};
use crate::zk::{DecodedSignals, ProofEnvelope, PublicSignals, SlaWitness};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MOCK_ACCEPTED: &str = "[DEV MODE] Mock ZK proof accepted: Constraints satisfied locally";
pub const MOCK_REJECTED: &str = "[DEV MODE] Mock ZK proof rejected: Constraints not satisfied";

/// Placeholder verification key: snarkjs layout, zeroed points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockVerificationKey {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: [String; 3],
    pub vk_beta_2: [[String; 2]; 3],
    pub vk_gamma_2: [[String; 2]; 3],
    pub vk_delta_2: [[String; 2]; 3],
    #[serde(rename = "IC")]
    pub ic: Vec<[String; 3]>,
}

impl Default for MockVerificationKey {
    fn default() -> Self {
        let g1 = || ["0".to_string(), "0".to_string(), "0".to_string()];
        let g2 = || {
            [
                ["0".to_string(), "0".to_string()],
                ["0".to_string(), "0".to_string()],
                ["0".to_string(), "0".to_string()],
            ]
        };
        Self {
            protocol: PROTOCOL.to_string(),
            curve: CURVE.to_string(),
            n_public: PUBLIC_INPUTS,
            vk_alpha_1: g1(),
            vk_beta_2: g2(),
            vk_gamma_2: g2(),
            vk_delta_2: g2(),
            ic: (0..=PUBLIC_INPUTS).map(|_| g1()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    key: MockVerificationKey,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verification_key(&self) -> &MockVerificationKey {
        &self.key
    }
}

fn filler<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    hex::encode(bytes)
}

fn filler_envelope<R: Rng>(rng: &mut R) -> ProofEnvelope {
    ProofEnvelope::new(
        [filler(rng), filler(rng), "1".to_string()],
        [
            [filler(rng), filler(rng)],
            [filler(rng), filler(rng)],
            ["1".to_string(), "0".to_string()],
        ],
        [filler(rng), filler(rng), "1".to_string()],
    )
}

impl ProofBackend for MockBackend {
    fn mode(&self) -> ProofMode {
        ProofMode::Mock
    }

    fn prove(&self, witness: &SlaWitness) -> Result<ProvedStatement, GenerationError> {
        let compliance = witness.compliance();
        if !compliance.is_compliant() {
            debug!("Mock proof records SLA breach: {}", compliance.breaches().join(", "));
        }

        let signals = PublicSignals {
            task_id_hash: witness.task_id_hash,
            sla_deadline: witness.sla_deadline,
            bias_threshold: witness.bias_threshold,
            compliant: compliance.is_compliant(),
        };

        Ok(ProvedStatement {
            envelope: filler_envelope(&mut rand::thread_rng()),
            public_signals: signals.to_wire(),
            compliant: compliance.is_compliant(),
        })
    }

    fn verify(
        &self,
        envelope: &ProofEnvelope,
        signals: &DecodedSignals,
        claimed_compliant: bool,
    ) -> Result<Verdict, VerificationError> {
        if envelope.protocol != self.key.protocol || envelope.curve != self.key.curve {
            return Err(VerificationError::UnsupportedProof {
                protocol: envelope.protocol.clone(),
                curve: envelope.curve.clone(),
            });
        }
        if claimed_compliant != signals.compliant {
            warn!(
                "Mock proof for {} claims verified={} but complianceFlag={}",
                signals.task_id_hash,
                claimed_compliant,
                u8::from(signals.compliant)
            );
        }

        let message = if claimed_compliant {
            MOCK_ACCEPTED
        } else {
            MOCK_REJECTED
        };
        Ok(Verdict {
            valid: claimed_compliant,
            message: message.to_string(),
        })
    }
}
