//! ProofVerifier: checks a `SlaProof` and reports what it attests

use super::types::{SlaProof, VerificationResult};
use crate::backend::{self, ArtifactPaths, ProofBackend, ProofMode};
use crate::error::VerificationError;
use crate::zk::{DecodedSignals, ProofEnvelope};
use log::{info, warn};
use std::sync::Arc;

/// Stateless apart from the cached verification key; safe to share across threads.
#[derive(Clone)]
pub struct ProofVerifier {
    backend: Arc<dyn ProofBackend>,
}

impl ProofVerifier {
    pub fn new(backend: Arc<dyn ProofBackend>) -> Self {
        Self { backend }
    }

    /// Probe `paths` and use Groth16 if the verification key is present
    pub fn from_artifacts(paths: &ArtifactPaths) -> Self {
        Self::new(backend::for_verifying(paths))
    }

    pub fn mode(&self) -> ProofMode {
        self.backend.mode()
    }

    /// Verify `proof`. Never fails: malformed input yields `valid == false`
    /// with a `"Verification error: ..."` message.
    pub fn verify_proof(&self, proof: &SlaProof) -> VerificationResult {
        match self.check(proof) {
            Ok(result) => {
                // Decoded signal, not the caller-supplied taskIdHash
                let task: String = result.task_id_hash.chars().take(12).collect();
                info!("Verified SLA proof for task {}: valid={}", task, result.valid);
                result
            }
            Err(e) => {
                warn!("SLA proof verification error: {}", e);
                VerificationResult::from_error(proof, &e)
            }
        }
    }

    fn check(&self, proof: &SlaProof) -> Result<VerificationResult, VerificationError> {
        let envelope = ProofEnvelope::decode(&proof.proof)?;
        envelope.check_header()?;
        let signals = DecodedSignals::decode(&proof.public_signals)?;
        let verdict = self.backend.verify(&envelope, &signals, proof.verified)?;

        Ok(VerificationResult {
            valid: verdict.valid,
            task_id_hash: signals.task_id_hash,
            sla_deadline: signals.sla_deadline,
            bias_threshold: signals.bias_threshold,
            message: verdict.message,
        })
    }
}
