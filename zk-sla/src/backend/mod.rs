//! Proving backends: real Groth16 or a development mock behind one trait
//!
//! The backend is chosen once, when a generator or verifier is built, by
//! probing the artifact directory:
//! - **Groth16**: arkworks Groth16 over BN254, keys loaded lazily from disk
//! - **Mock**: structurally valid but cryptographically meaningless envelopes,
//!   compliance evaluated directly (dev/test only, NOT a security boundary)

pub mod artifacts;
pub mod groth16;
pub mod mock;

pub use artifacts::{ArtifactPaths, ArtifactProbe, CircuitManifest};
pub use groth16::Groth16Backend;
pub use mock::{MockBackend, MockVerificationKey};

use crate::error::{GenerationError, VerificationError};
use crate::zk::{DecodedSignals, ProofEnvelope, SlaWitness};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which proving system a backend runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofMode {
    /// Real Groth16 proofs over BN254
    Groth16,
    /// Development stand-in (no cryptographic guarantees)
    Mock,
}

impl ProofMode {
    pub fn name(&self) -> &str {
        match self {
            ProofMode::Groth16 => "Groth16 (BN254)",
            ProofMode::Mock => "Mock (dev mode)",
        }
    }

    pub fn is_cryptographic(&self) -> bool {
        !matches!(self, ProofMode::Mock)
    }
}

/// Output of a backend's proving routine
#[derive(Debug, Clone)]
pub struct ProvedStatement {
    pub envelope: ProofEnvelope,
    /// Wire-form public signals, in protocol order
    pub public_signals: Vec<String>,
    pub compliant: bool,
}

/// A backend's judgement on a decoded proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: String,
}

/// Shared interface of the real and mock proving systems
pub trait ProofBackend: Send + Sync {
    fn mode(&self) -> ProofMode;

    /// Produce a proof for the witness. Non-compliance is not an error.
    fn prove(&self, witness: &SlaWitness) -> Result<ProvedStatement, GenerationError>;

    /// Check a decoded envelope against its public signals.
    ///
    /// `claimed_compliant` is the generator's embedded `verified` flag; only the
    /// mock backend relies on it.
    fn verify(
        &self,
        envelope: &ProofEnvelope,
        signals: &DecodedSignals,
        claimed_compliant: bool,
    ) -> Result<Verdict, VerificationError>;
}

/// Backend for a prover: Groth16 iff manifest, proving key and verification key exist
pub fn for_proving(paths: &ArtifactPaths) -> Arc<dyn ProofBackend> {
    let probe = paths.probe();
    if probe.can_prove() {
        info!("Circuit artifacts found in {}, using Groth16 prover", paths.dir.display());
        Arc::new(Groth16Backend::new(paths.clone()))
    } else {
        warn!(
            "Circuit artifacts missing in {} ({}), falling back to mock proofs",
            paths.dir.display(),
            probe.missing().join(", ")
        );
        Arc::new(MockBackend::new())
    }
}

/// Backend for a verifier: Groth16 iff the verification key exists
pub fn for_verifying(paths: &ArtifactPaths) -> Arc<dyn ProofBackend> {
    let probe = paths.probe();
    if probe.can_verify() {
        info!("Verification key found in {}, using Groth16 verifier", paths.dir.display());
        Arc::new(Groth16Backend::new(paths.clone()))
    } else {
        warn!(
            "Verification key missing in {}, falling back to mock verification key",
            paths.dir.display()
        );
        Arc::new(MockBackend::new())
    }
}
