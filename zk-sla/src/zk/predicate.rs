//! Compliance predicate: the one definition of "SLA-compliant"
//!
//! ```text
//! time_valid   = completion_timestamp <= sla_deadline
//! bias_valid   = bias_score <= bias_threshold
//! output_valid = output_hash != 0
//! compliant    = time_valid && bias_valid && output_valid
//! ```
//!
//! `SlaCircuit` encodes exactly this conjunction as R1CS constraints; the mock
//! backend evaluates it directly.

use super::commitment::FieldCommitment;
use serde::{Deserialize, Serialize};

/// Clause-by-clause outcome of the compliance predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    pub time_valid: bool,
    pub bias_valid: bool,
    pub output_valid: bool,
}

impl Compliance {
    pub fn evaluate(
        completion_timestamp: u64,
        sla_deadline: u64,
        bias_score: u8,
        bias_threshold: u8,
        output_hash: &FieldCommitment,
    ) -> Self {
        Self {
            time_valid: completion_timestamp <= sla_deadline,
            bias_valid: bias_score <= bias_threshold,
            output_valid: !output_hash.is_zero(),
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.time_valid && self.bias_valid && self.output_valid
    }

    /// Names of the violated clauses, for operator logs
    pub fn breaches(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.time_valid {
            out.push("deadline");
        }
        if !self.bias_valid {
            out.push("bias");
        }
        if !self.output_valid {
            out.push("output");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zk::commitment::hash_output;

    #[test]
    fn test_all_clauses_hold() {
        let c = Compliance::evaluate(1000, 1030, 2, 5, &hash_output("ok"));
        assert!(c.is_compliant());
        assert!(c.breaches().is_empty());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let c = Compliance::evaluate(1030, 1030, 5, 5, &hash_output("ok"));
        assert!(c.is_compliant());
    }

    #[test]
    fn test_each_clause_breaks_compliance() {
        let late = Compliance::evaluate(1100, 1030, 2, 5, &hash_output("ok"));
        assert!(!late.is_compliant());
        assert_eq!(late.breaches(), vec!["deadline"]);

        let biased = Compliance::evaluate(1000, 1030, 50, 5, &hash_output("ok"));
        assert!(!biased.is_compliant());
        assert_eq!(biased.breaches(), vec!["bias"]);

        let zero = FieldCommitment::from_digest([0u8; 32]);
        let empty = Compliance::evaluate(1000, 1030, 2, 5, &zero);
        assert!(!empty.is_compliant());
        assert_eq!(empty.breaches(), vec!["output"]);
    }
}
