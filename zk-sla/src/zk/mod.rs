//! Zero-Knowledge module for ZK-SLA
//!
//! Proves SLA compliance without revealing the agent's output or its true
//! completion time:
//! - commitment: SHA-256 commitments truncated into the BN254 scalar field
//! - predicate: the host-side compliance predicate
//! - circuit: the same predicate as Groth16-ready R1CS constraints
//! - envelope / signals: the proof and public-signal wire formats

pub mod circuit;
pub mod commitment;
pub mod envelope;
pub mod predicate;
pub mod signals;

pub use circuit::{SlaCircuit, SlaWitness, PUBLIC_INPUTS};
pub use commitment::{hash_output, hash_task_id, FieldCommitment};
pub use envelope::ProofEnvelope;
pub use predicate::Compliance;
pub use signals::{DecodedSignals, PublicSignals};
