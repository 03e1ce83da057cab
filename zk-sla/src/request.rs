//! Prove-SLA use case: validate a request, prove, verify, and report
//!
//! Request and response shapes are the JSON contract of the prove-SLA
//! endpoint. Routing, persistence and transport belong to the caller.

use crate::backend::ProofMode;
use crate::config::ZkSlaConfig;
use crate::error::{RequestError, ValidationError};
use crate::proof::{ProofGenerator, ProofInput, ProofVerifier};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Incoming request. Every field is optional on the wire so that absence is
/// reported as a validation error rather than a parse error.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveSlaRequest {
    pub task_id: Option<String>,
    pub agent_id: Option<String>,
    pub task_description: Option<String>,
    /// RFC 3339 completion time
    pub completed_at: Option<String>,
    /// Deadline relative to completion; negative means already late
    pub sla_deadline_seconds: Option<i64>,
    pub output_data: Option<String>,
    pub bias_score: Option<i64>,
    pub bias_threshold: Option<i64>,
}

impl fmt::Debug for ProveSlaRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProveSlaRequest")
            .field("task_id", &self.task_id)
            .field("agent_id", &self.agent_id)
            .field("completed_at", &self.completed_at)
            .field("sla_deadline_seconds", &self.sla_deadline_seconds)
            .field("output_data", &self.output_data.as_ref().map(|_| "<redacted>"))
            .field("bias_score", &self.bias_score)
            .field("bias_threshold", &self.bias_threshold)
            .finish()
    }
}

/// A request that passed validation, with its derived `ProofInput`
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub agent_id: String,
    pub task_description: Option<String>,
    pub sla_deadline_seconds: i64,
    pub input: ProofInput,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn bias(value: i64, field: &'static str) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or(ValidationError::OutOfRange {
            field,
            value,
            min: 0,
            max: 100,
        })
}

impl ProveSlaRequest {
    pub fn validate(self, config: &ZkSlaConfig) -> Result<ValidatedRequest, ValidationError> {
        let task_id = required(self.task_id, "taskId")?;
        let agent_id = required(self.agent_id, "agentId")?;
        let completed_at = required(self.completed_at, "completedAt")?;
        let sla_deadline_seconds = self
            .sla_deadline_seconds
            .ok_or(ValidationError::MissingField("slaDeadlineSeconds"))?;
        let output_data = required(self.output_data, "outputData")?;

        let bias_score = bias(self.bias_score.unwrap_or(0), "biasScore")?;
        let bias_threshold = match self.bias_threshold {
            Some(t) => bias(t, "biasThreshold")?,
            None => config.default_bias_threshold,
        };

        let completion = DateTime::parse_from_rfc3339(&completed_at)
            .map_err(|e| ValidationError::InvalidTimestamp {
                field: "completedAt",
                reason: e.to_string(),
            })?
            .timestamp();
        if completion < 0 {
            return Err(ValidationError::InvalidTimestamp {
                field: "completedAt",
                reason: "before the Unix epoch".to_string(),
            });
        }

        let sla_deadline = completion
            .checked_add(sla_deadline_seconds)
            .filter(|d| *d >= 0)
            .ok_or(ValidationError::OutOfRange {
                field: "slaDeadlineSeconds",
                value: sla_deadline_seconds,
                min: -completion,
                max: i64::MAX - completion,
            })?;

        Ok(ValidatedRequest {
            agent_id,
            task_description: self.task_description.filter(|d| !d.is_empty()),
            sla_deadline_seconds,
            input: ProofInput {
                task_id,
                completion_timestamp: completion as u64,
                sla_deadline: sla_deadline as u64,
                bias_score,
                bias_threshold,
                output_data,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// `"N/A"` when the request had none
    pub task_description: String,
    pub sla_deadline_seconds: i64,
    pub bias_threshold: u8,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveSlaResponse {
    pub proof_id: String,
    pub agent_id: String,
    pub task_id: String,
    pub proof: String,
    pub public_signals: Vec<String>,
    pub proof_size_bytes: usize,
    /// Verifier's verdict, not the generator's claim
    pub verified: bool,
    pub message: String,
    pub metadata: ResponseMetadata,
}

/// `proof_<unix millis>_<first 8 chars of task id>`
pub fn proof_id(task_id: &str, at: DateTime<Utc>) -> String {
    let prefix: String = task_id.chars().take(8).collect();
    format!("proof_{}_{}", at.timestamp_millis(), prefix)
}

/// Validate, generate within the configured timeout, then verify.
pub async fn prove_sla(
    generator: &ProofGenerator,
    verifier: &ProofVerifier,
    request: ProveSlaRequest,
    config: &ZkSlaConfig,
) -> Result<ProveSlaResponse, RequestError> {
    let request = request.validate(config)?;
    let proof = generator
        .generate_proof_within(request.input.clone(), config.prove_timeout)
        .await?;
    let verification = verifier.verify_proof(&proof);

    let generated_at = Utc::now();
    let proof_id = proof_id(&request.input.task_id, generated_at);
    info!(
        "Prove-SLA {} for agent {}: verified={}",
        proof_id, request.agent_id, verification.valid
    );

    Ok(ProveSlaResponse {
        proof_id,
        agent_id: request.agent_id,
        task_id: request.input.task_id,
        proof: proof.proof,
        public_signals: proof.public_signals,
        proof_size_bytes: proof.proof_size_bytes,
        verified: verification.valid,
        message: verification.message,
        metadata: ResponseMetadata {
            task_description: request
                .task_description
                .unwrap_or_else(|| "N/A".to_string()),
            sla_deadline_seconds: request.sla_deadline_seconds,
            bias_threshold: request.input.bias_threshold,
            generated_at,
        },
    })
}

/// Self-description of the prove-SLA endpoint
pub fn api_info(mode: ProofMode) -> serde_json::Value {
    serde_json::json!({
        "name": "ZK-SLA Proof API",
        "version": "1.0.0",
        "description": "Generate Zero-Knowledge proofs for SLA compliance",
        "endpoints": {
            "POST": {
                "description": "Generate and verify a ZK-SLA proof",
                "body": {
                    "taskId": "string (required)",
                    "agentId": "string (required)",
                    "taskDescription": "string (optional)",
                    "completedAt": "RFC 3339 timestamp (required)",
                    "slaDeadlineSeconds": "number (required)",
                    "outputData": "string (required, will be hashed)",
                    "biasScore": "number 0-100 (optional, default 0)",
                    "biasThreshold": "number 0-100 (optional, default 5)"
                }
            }
        },
        "cryptography": {
            "provingSystem": "Groth16 (arkworks)",
            "curve": "BN254",
            "hash": "SHA-256 truncated to 252 bits",
            "mode": mode.name(),
            "cryptographic": mode.is_cryptographic()
        }
    })
}
