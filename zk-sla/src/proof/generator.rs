//! ProofGenerator: proves an agent's SLA outcome without revealing its output

use super::types::{ProofInput, SlaProof};
use crate::backend::{self, ArtifactPaths, ProofBackend, ProofMode};
use crate::error::GenerationError;
use crate::zk::SlaWitness;
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Cheap to clone; clones share the backend and its cached keys.
#[derive(Clone)]
pub struct ProofGenerator {
    backend: Arc<dyn ProofBackend>,
}

impl ProofGenerator {
    pub fn new(backend: Arc<dyn ProofBackend>) -> Self {
        Self { backend }
    }

    /// Probe `paths` and use Groth16 if every artifact is present, mock otherwise
    pub fn from_artifacts(paths: &ArtifactPaths) -> Self {
        Self::new(backend::for_proving(paths))
    }

    pub fn mode(&self) -> ProofMode {
        self.backend.mode()
    }

    /// Generate a proof for `input`.
    ///
    /// A late, biased or empty-output task still yields a proof, with
    /// `verified == false` and a zero compliance flag.
    pub fn generate_proof(&self, input: &ProofInput) -> Result<SlaProof, GenerationError> {
        let witness = SlaWitness::from_input(input);
        let statement = self.backend.prove(&witness)?;
        let proof = statement.envelope.encode()?;
        let task_id_hash = witness.task_id_hash.to_hex();

        info!(
            "Generated {} SLA proof for task {}: compliant={}, {} bytes",
            self.backend.mode().name(),
            &task_id_hash[..task_id_hash.len().min(12)],
            statement.compliant,
            proof.len()
        );

        Ok(SlaProof {
            proof_size_bytes: proof.len(),
            proof,
            public_signals: statement.public_signals,
            task_id_hash,
            verified: statement.compliant,
        })
    }

    /// Run `generate_proof` on the blocking pool, giving up after `limit`.
    ///
    /// The proving thread is not cancelled on timeout; it finishes in the
    /// background and its result is dropped.
    pub async fn generate_proof_within(
        &self,
        input: ProofInput,
        limit: Duration,
    ) -> Result<SlaProof, GenerationError> {
        let generator = self.clone();
        let task = tokio::task::spawn_blocking(move || generator.generate_proof(&input));
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(GenerationError::Backend(format!("proving task failed: {}", join))),
            Err(_) => Err(GenerationError::Timeout(limit)),
        }
    }
}
