//! SLA proof generation and verification
//!
//! `ProofGenerator` turns a `ProofInput` into a portable `SlaProof`;
//! `ProofVerifier` checks one and always answers with a `VerificationResult`.
//! Both pick their backend once, at construction.

pub mod generator;
pub mod types;
pub mod verifier;

pub use generator::ProofGenerator;
pub use types::{ProofInput, SlaProof, VerificationResult};
pub use verifier::ProofVerifier;
