//! ZK-SLA: zero-knowledge proofs of agent SLA compliance
//!
//! An agent proves it finished a task before its deadline and within its
//! bias tolerance, without revealing its output or its completion time.
//! Proofs are Groth16 over BN254 when circuit artifacts are installed and a
//! development mock otherwise; verifiers see the same wire format either way.

pub mod backend;
pub mod config;
pub mod error;
pub mod proof;
pub mod request;
pub mod zk;

pub use backend::{ArtifactPaths, ProofBackend, ProofMode};
pub use config::ZkSlaConfig;
pub use error::{ArtifactError, GenerationError, RequestError, ValidationError, VerificationError};
pub use proof::{ProofGenerator, ProofInput, ProofVerifier, SlaProof, VerificationResult};
pub use request::{api_info, prove_sla, ProveSlaRequest, ProveSlaResponse};
pub use zk::{hash_task_id, FieldCommitment};
