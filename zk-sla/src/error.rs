//! Error types for ZK-SLA proof generation and verification
//!
//! - `ValidationError`: a calling-layer request is incomplete or out of range
//! - `ArtifactError`: circuit manifest / proving key / verification key I/O
//! - `GenerationError`: the proving backend failed (never an SLA breach)
//! - `RequestError`: either of the above, as seen by the prove-SLA use case
//! - `VerificationError`: malformed proof material; always absorbed into a
//!   `VerificationResult` by the verifier

use std::path::PathBuf;
use std::time::Duration;

/// A request rejected before it reaches the proving core
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid timestamp in {field}: {reason}")]
    InvalidTimestamp { field: &'static str, reason: String },
}

/// Failures while reading, writing or checking circuit artifacts
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key serialization error: {0}")]
    Serialization(String),

    #[error("Circuit mismatch: {0}")]
    CircuitMismatch(String),

    #[error("Setup failed: {0}")]
    Setup(String),
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ark_serialize::SerializationError> for ArtifactError {
    fn from(e: ark_serialize::SerializationError) -> Self {
        ArtifactError::Serialization(e.to_string())
    }
}

/// Proof generation failures. A non-compliant agent is NOT an error.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Failed to generate ZK proof: {0}")]
    Backend(String),

    #[error("Failed to load proving artifacts: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Failed to encode proof envelope: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Proof generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Failures of the prove-SLA use case
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to generate ZK-SLA proof: {0}")]
    Generation(#[from] GenerationError),
}

/// Reasons a proof could not be checked at all
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid base64 proof: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid proof JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed proof envelope: {0}")]
    MalformedEnvelope(String),

    #[error("malformed public signals: {0}")]
    MalformedSignals(String),

    #[error("unsupported proof {protocol}/{curve}")]
    UnsupportedProof { protocol: String, curve: String },

    #[error("verification key unavailable: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("backend failure: {0}")]
    Backend(String),
}
