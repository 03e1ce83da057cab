//! Proof request / artifact / result types shared by generator and verifier

use crate::error::VerificationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything an agent knows about a finished task. Transient: built per
/// request and dropped after generation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofInput {
    pub task_id: String,
    /// Unix seconds
    pub completion_timestamp: u64,
    /// Absolute unix seconds
    pub sla_deadline: u64,
    /// 0-100
    pub bias_score: u8,
    /// 0-100
    pub bias_threshold: u8,
    /// Raw agent output; only its commitment ever leaves the generator
    pub output_data: String,
}

impl fmt::Debug for ProofInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofInput")
            .field("task_id", &self.task_id)
            .field("completion_timestamp", &self.completion_timestamp)
            .field("sla_deadline", &self.sla_deadline)
            .field("bias_score", &self.bias_score)
            .field("bias_threshold", &self.bias_threshold)
            .field("output_data", &"<redacted>")
            .finish()
    }
}

/// A self-contained SLA proof, ready to hand to any verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaProof {
    /// base64(JSON(ProofEnvelope))
    pub proof: String,
    /// `[taskIdHash, slaDeadline, biasThreshold, complianceFlag]`
    pub public_signals: Vec<String>,
    /// Character length of `proof`
    pub proof_size_bytes: usize,
    /// Hex form of the task id commitment
    pub task_id_hash: String,
    /// Compliance outcome at generation time
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,
    pub task_id_hash: String,
    pub sla_deadline: u64,
    pub bias_threshold: u64,
    pub message: String,
}

impl VerificationResult {
    /// Downgrade a verification failure into a structured negative result
    pub(crate) fn from_error(proof: &SlaProof, error: &VerificationError) -> Self {
        Self {
            valid: false,
            task_id_hash: proof.task_id_hash.clone(),
            sla_deadline: 0,
            bias_threshold: 0,
            message: format!("Verification error: {}", error),
        }
    }
}
