//! Public signals: fixed positional wire contract
//!
//! `[taskIdHash, slaDeadline, biasThreshold, complianceFlag]`, all decimal
//! integer strings. Order is part of the protocol.

use super::commitment::{field_from_decimal, FieldCommitment};
use super::circuit::PUBLIC_INPUTS;
use crate::error::VerificationError;
use ark_bn254::Fr;

pub const TASK_ID_HASH: usize = 0;
pub const SLA_DEADLINE: usize = 1;
pub const BIAS_THRESHOLD: usize = 2;
pub const COMPLIANCE_FLAG: usize = 3;

/// Typed public signals, as produced by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicSignals {
    pub task_id_hash: FieldCommitment,
    pub sla_deadline: u64,
    pub bias_threshold: u8,
    pub compliant: bool,
}

impl PublicSignals {
    pub fn to_wire(&self) -> Vec<String> {
        vec![
            self.task_id_hash.to_decimal(),
            self.sla_deadline.to_string(),
            self.bias_threshold.to_string(),
            if self.compliant { "1" } else { "0" }.to_string(),
        ]
    }
}

/// Public signals as read back by a verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSignals {
    /// Decimal field element, exactly as transmitted
    pub task_id_hash: String,
    pub sla_deadline: u64,
    pub bias_threshold: u64,
    pub compliant: bool,
    /// The same four values as scalar field elements, for the pairing check
    pub field_elements: [Fr; PUBLIC_INPUTS],
}

impl DecodedSignals {
    pub fn decode(signals: &[String]) -> Result<Self, VerificationError> {
        if signals.len() != PUBLIC_INPUTS {
            return Err(VerificationError::MalformedSignals(format!(
                "expected {} public signals, got {}",
                PUBLIC_INPUTS,
                signals.len()
            )));
        }

        let task_id_hash = field_at(signals, TASK_ID_HASH, "taskIdHash")?;
        let sla_deadline = integer_at(signals, SLA_DEADLINE, "slaDeadline")?;
        let bias_threshold = integer_at(signals, BIAS_THRESHOLD, "biasThreshold")?;
        let compliant = match signals[COMPLIANCE_FLAG].as_str() {
            "0" => false,
            "1" => true,
            other => {
                return Err(VerificationError::MalformedSignals(format!(
                    "complianceFlag must be 0 or 1, got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            task_id_hash: signals[TASK_ID_HASH].clone(),
            sla_deadline,
            bias_threshold,
            compliant,
            field_elements: [
                task_id_hash,
                Fr::from(sla_deadline),
                Fr::from(bias_threshold),
                Fr::from(u64::from(compliant)),
            ],
        })
    }
}

fn field_at(signals: &[String], index: usize, name: &str) -> Result<Fr, VerificationError> {
    field_from_decimal(&signals[index]).ok_or_else(|| {
        VerificationError::MalformedSignals(format!(
            "{} is not a canonical field element: {:?}",
            name, signals[index]
        ))
    })
}

fn integer_at(signals: &[String], index: usize, name: &str) -> Result<u64, VerificationError> {
    let text = &signals[index];
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if !canonical {
        return Err(VerificationError::MalformedSignals(format!(
            "{} is not a decimal integer: {:?}",
            name, text
        )));
    }
    text.parse().map_err(|e| {
        VerificationError::MalformedSignals(format!("{} out of range: {}", name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zk::commitment::hash_task_id;

    fn signals() -> PublicSignals {
        PublicSignals {
            task_id_hash: hash_task_id("t1"),
            sla_deadline: 1030,
            bias_threshold: 5,
            compliant: true,
        }
    }

    #[test]
    fn test_wire_order() {
        let wire = signals().to_wire();
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[TASK_ID_HASH], hash_task_id("t1").to_decimal());
        assert_eq!(wire[SLA_DEADLINE], "1030");
        assert_eq!(wire[BIAS_THRESHOLD], "5");
        assert_eq!(wire[COMPLIANCE_FLAG], "1");
    }

    #[test]
    fn test_decode_wire() {
        let decoded = DecodedSignals::decode(&signals().to_wire()).unwrap();
        assert_eq!(decoded.task_id_hash, hash_task_id("t1").to_decimal());
        assert_eq!(decoded.sla_deadline, 1030);
        assert_eq!(decoded.bias_threshold, 5);
        assert!(decoded.compliant);
        assert_eq!(decoded.field_elements[0], hash_task_id("t1").to_field());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let good = signals().to_wire();

        assert!(DecodedSignals::decode(&good[..3]).is_err());

        let mut bad_flag = good.clone();
        bad_flag[COMPLIANCE_FLAG] = "2".into();
        assert!(DecodedSignals::decode(&bad_flag).is_err());

        let mut bad_deadline = good.clone();
        bad_deadline[SLA_DEADLINE] = "-5".into();
        assert!(DecodedSignals::decode(&bad_deadline).is_err());

        let mut padded = good.clone();
        padded[BIAS_THRESHOLD] = "05".into();
        assert!(DecodedSignals::decode(&padded).is_err());

        let mut huge = good;
        huge[SLA_DEADLINE] = "18446744073709551616".into();
        assert!(DecodedSignals::decode(&huge).is_err());
    }
}
