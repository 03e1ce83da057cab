//! SlaCircuit: the compliance predicate as R1CS over the BN254 scalar field
//!
//! Public inputs (in wire order): `taskIdHash, slaDeadline, biasThreshold,
//! complianceFlag`. Private witness: `completionTimestamp, biasScore,
//! outputHash`.
//!
//! Constraints:
//! - 64-bit range checks on both timestamps and both bias values
//! - `a <= b` as the top bit of the 65-bit decomposition of `b - a + 2^64`
//! - `outputHash != 0` via `h * inv = z`, `h * (1 - z) = 0`
//! - `complianceFlag = time_ok * bias_ok * z`
//!
//! The flag is public and bound to the witness, so a proof for a late or
//! biased task still verifies but cannot claim compliance.

use super::commitment::{field_to_decimal, hash_output, hash_task_id, FieldCommitment};
use super::predicate::Compliance;
use crate::proof::ProofInput;
use ark_bn254::Fr;
use ark_ff::Field;
use ark_relations::lc;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError, SynthesisMode,
    Variable,
};

pub const CIRCUIT_NAME: &str = "sla_proof";
pub const CIRCUIT_VERSION: u32 = 1;

/// Number of public inputs, excluding the constant one
pub const PUBLIC_INPUTS: usize = 4;

const RANGE_BITS: usize = 64;

/// The six circuit inputs derived from a `ProofInput`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SlaWitness {
    pub task_id_hash: FieldCommitment,
    pub sla_deadline: u64,
    pub bias_threshold: u8,
    pub completion_timestamp: u64,
    pub bias_score: u8,
    pub output_hash: FieldCommitment,
}

impl SlaWitness {
    pub fn from_input(input: &ProofInput) -> Self {
        Self {
            task_id_hash: hash_task_id(&input.task_id),
            sla_deadline: input.sla_deadline,
            bias_threshold: input.bias_threshold,
            completion_timestamp: input.completion_timestamp,
            bias_score: input.bias_score,
            output_hash: hash_output(&input.output_data),
        }
    }

    pub fn compliance(&self) -> Compliance {
        Compliance::evaluate(
            self.completion_timestamp,
            self.sla_deadline,
            self.bias_score,
            self.bias_threshold,
            &self.output_hash,
        )
    }

    /// Circuit inputs as named decimal strings, public ones first
    pub fn decimal_inputs(&self) -> [(&'static str, String); 6] {
        [
            ("taskIdHash", self.task_id_hash.to_decimal()),
            ("slaDeadline", self.sla_deadline.to_string()),
            ("biasThreshold", self.bias_threshold.to_string()),
            ("completionTimestamp", self.completion_timestamp.to_string()),
            ("biasScore", self.bias_score.to_string()),
            ("outputHash", self.output_hash.to_decimal()),
        ]
    }
}

/// Size of the synthesized constraint system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitShape {
    pub public_inputs: usize,
    pub witnesses: usize,
    pub constraints: usize,
}

/// The SLA compliance circuit. `blank()` is used for key generation.
#[derive(Clone, Default)]
pub struct SlaCircuit {
    witness: Option<SlaWitness>,
}

impl SlaCircuit {
    pub fn blank() -> Self {
        Self { witness: None }
    }

    pub fn new(witness: SlaWitness) -> Self {
        Self {
            witness: Some(witness),
        }
    }

    /// Public inputs in wire order, available once a witness is assigned
    pub fn public_inputs(&self) -> Option<[Fr; PUBLIC_INPUTS]> {
        let w = self.witness.as_ref()?;
        Some([
            w.task_id_hash.to_field(),
            Fr::from(w.sla_deadline),
            Fr::from(u64::from(w.bias_threshold)),
            Fr::from(u64::from(w.compliance().is_compliant())),
        ])
    }

    /// Synthesize the blank circuit and report its dimensions
    pub fn shape() -> Result<CircuitShape, SynthesisError> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(SynthesisMode::Setup);
        SlaCircuit::blank().generate_constraints(cs.clone())?;
        Ok(CircuitShape {
            public_inputs: cs.num_instance_variables() - 1,
            witnesses: cs.num_witness_variables(),
            constraints: cs.num_constraints(),
        })
    }

    fn synthesize(
        witness: Option<SlaWitness>,
        public: Option<[Fr; PUBLIC_INPUTS]>,
        cs: &ConstraintSystemRef<Fr>,
    ) -> Result<(), SynthesisError> {
        let w = witness;

        // Public inputs first: allocation order is the wire order
        let task_id_hash = cs.new_input_variable(|| assigned(public.map(|p| p[0])))?;
        let sla_deadline = cs.new_input_variable(|| assigned(public.map(|p| p[1])))?;
        let bias_threshold = cs.new_input_variable(|| assigned(public.map(|p| p[2])))?;
        let compliance_flag = cs.new_input_variable(|| assigned(public.map(|p| p[3])))?;

        let completion = cs.new_witness_variable(|| {
            assigned(w.map(|w| Fr::from(w.completion_timestamp)))
        })?;
        let bias_score =
            cs.new_witness_variable(|| assigned(w.map(|w| Fr::from(u64::from(w.bias_score)))))?;
        let output_hash =
            cs.new_witness_variable(|| assigned(w.map(|w| w.output_hash.to_field())))?;

        // Bind taskIdHash into the constraint system
        let task_sq = cs.new_witness_variable(|| {
            assigned(w.map(|w| {
                let h = w.task_id_hash.to_field();
                h * h
            }))
        })?;
        cs.enforce_constraint(lc!() + task_id_hash, lc!() + task_id_hash, lc!() + task_sq)?;

        let completion_val = w.map(|w| w.completion_timestamp);
        let deadline_val = w.map(|w| w.sla_deadline);
        let score_val = w.map(|w| u64::from(w.bias_score));
        let threshold_val = w.map(|w| u64::from(w.bias_threshold));

        enforce_range(cs, completion, completion_val)?;
        enforce_range(cs, sla_deadline, deadline_val)?;
        enforce_range(cs, bias_score, score_val)?;
        enforce_range(cs, bias_threshold, threshold_val)?;

        let (time_ok, time_val) =
            less_or_equal(cs, (completion, completion_val), (sla_deadline, deadline_val))?;
        let (bias_ok, bias_val) =
            less_or_equal(cs, (bias_score, score_val), (bias_threshold, threshold_val))?;
        let output_ok = is_nonzero(cs, output_hash, w.map(|w| w.output_hash.to_field()))?;

        let both_val = time_val.zip(bias_val).map(|(t, b)| t && b);
        let both = cs.new_witness_variable(|| assigned(both_val.map(bool_to_field)))?;
        cs.enforce_constraint(lc!() + time_ok, lc!() + bias_ok, lc!() + both)?;
        cs.enforce_constraint(lc!() + both, lc!() + output_ok, lc!() + compliance_flag)?;

        Ok(())
    }
}

impl ConstraintSynthesizer<Fr> for SlaCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let public = self.public_inputs();
        Self::synthesize(self.witness, public, &cs)
    }
}

fn assigned(value: Option<Fr>) -> Result<Fr, SynthesisError> {
    value.ok_or(SynthesisError::AssignmentMissing)
}

fn bool_to_field(b: bool) -> Fr {
    Fr::from(u64::from(b))
}

fn pow2(n: usize) -> Fr {
    let mut acc = Fr::from(1u64);
    for _ in 0..n {
        acc = acc + acc;
    }
    acc
}

/// Allocate `n` boolean-constrained witness bits of `value`, little-endian
fn alloc_bits(
    cs: &ConstraintSystemRef<Fr>,
    value: Option<u128>,
    n: usize,
) -> Result<Vec<Variable>, SynthesisError> {
    (0..n)
        .map(|i| {
            let bit = value.map(|v| (v >> i) & 1 == 1);
            let var = cs.new_witness_variable(|| assigned(bit.map(bool_to_field)))?;
            cs.enforce_constraint(lc!() + var, lc!() + Variable::One - var, lc!())?;
            Ok(var)
        })
        .collect()
}

fn pack_bits(bits: &[Variable]) -> ark_relations::r1cs::LinearCombination<Fr> {
    let mut packed = lc!();
    let mut coeff = Fr::from(1u64);
    for bit in bits {
        packed = packed + (coeff, *bit);
        coeff = coeff + coeff;
    }
    packed
}

/// Constrain `var` to fit in 64 bits
fn enforce_range(
    cs: &ConstraintSystemRef<Fr>,
    var: Variable,
    value: Option<u64>,
) -> Result<(), SynthesisError> {
    let bits = alloc_bits(cs, value.map(u128::from), RANGE_BITS)?;
    cs.enforce_constraint(pack_bits(&bits), lc!() + Variable::One, lc!() + var)
}

/// Returns a boolean variable equal to `a <= b` for range-checked `a`, `b`
fn less_or_equal(
    cs: &ConstraintSystemRef<Fr>,
    (a, a_val): (Variable, Option<u64>),
    (b, b_val): (Variable, Option<u64>),
) -> Result<(Variable, Option<bool>), SynthesisError> {
    let offset = 1u128 << RANGE_BITS;
    let diff = a_val
        .zip(b_val)
        .map(|(a, b)| u128::from(b) + offset - u128::from(a));
    let bits = alloc_bits(cs, diff, RANGE_BITS + 1)?;
    cs.enforce_constraint(
        pack_bits(&bits),
        lc!() + Variable::One,
        lc!() + b - a + (pow2(RANGE_BITS), Variable::One),
    )?;
    Ok((bits[RANGE_BITS], diff.map(|d| d >> RANGE_BITS == 1)))
}

/// Returns a boolean variable equal to `h != 0`
fn is_nonzero(
    cs: &ConstraintSystemRef<Fr>,
    h: Variable,
    h_val: Option<Fr>,
) -> Result<Variable, SynthesisError> {
    let zero = Fr::from(0u64);
    let inv_val = h_val.map(|h| h.inverse().unwrap_or(zero));
    let flag_val = h_val.map(|h| h != zero);
    let inv = cs.new_witness_variable(|| assigned(inv_val))?;
    let flag = cs.new_witness_variable(|| assigned(flag_val.map(bool_to_field)))?;
    cs.enforce_constraint(lc!() + h, lc!() + inv, lc!() + flag)?;
    cs.enforce_constraint(lc!() + h, lc!() + Variable::One - flag, lc!())?;
    Ok(flag)
}

/// Debug rendering of the circuit inputs, for `log::debug!`
pub(crate) fn describe_inputs(witness: &SlaWitness) -> String {
    witness
        .decimal_inputs()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decimal rendering of circuit public inputs, i.e. the wire public signals
pub(crate) fn public_signal_strings(public: &[Fr; PUBLIC_INPUTS]) -> Vec<String> {
    public.iter().map(|f| field_to_decimal(*f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness(completion: u64, deadline: u64, score: u8, threshold: u8, output: &str) -> SlaWitness {
        SlaWitness::from_input(&ProofInput {
            task_id: "circuit-task".to_string(),
            completion_timestamp: completion,
            sla_deadline: deadline,
            bias_score: score,
            bias_threshold: threshold,
            output_data: output.to_string(),
        })
    }

    fn run(w: SlaWitness, public: [Fr; PUBLIC_INPUTS]) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        SlaCircuit::synthesize(Some(w), Some(public), &cs).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_flag_matches_predicate() {
        let cases = [
            witness(1000, 1030, 2, 5, "ok"),
            witness(1100, 1030, 2, 5, "late"),
            witness(1000, 1030, 50, 5, "biased"),
            witness(1030, 1030, 5, 5, "edge"),
            witness(0, 0, 0, 0, "zeros"),
            witness(u64::MAX, u64::MAX, 100, 100, "max"),
            witness(u64::MAX, 0, 0, 100, "max-late"),
        ];
        for w in cases {
            let circuit = SlaCircuit::new(w);
            let public = circuit.public_inputs().unwrap();
            let cs = ConstraintSystem::<Fr>::new_ref();
            circuit.generate_constraints(cs.clone()).unwrap();
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(public[3], bool_to_field(w.compliance().is_compliant()));
        }
    }

    #[test]
    fn test_forged_compliance_flag_unsatisfiable() {
        let late = witness(1100, 1030, 2, 5, "late");
        let mut public = SlaCircuit::new(late).public_inputs().unwrap();
        assert_eq!(public[3], Fr::from(0u64));
        public[3] = Fr::from(1u64);
        assert!(!run(late, public));
    }

    #[test]
    fn test_zero_output_hash_not_compliant() {
        let mut w = witness(1000, 1030, 2, 5, "ok");
        w.output_hash = FieldCommitment::from_digest([0u8; 32]);
        let public = SlaCircuit::new(w).public_inputs().unwrap();
        assert_eq!(public[3], Fr::from(0u64));
        assert!(run(w, public));

        let mut forged = public;
        forged[3] = Fr::from(1u64);
        assert!(!run(w, forged));
    }

    #[test]
    fn test_wrong_public_deadline_unsatisfiable() {
        let w = witness(1000, 1030, 2, 5, "ok");
        let mut public = SlaCircuit::new(w).public_inputs().unwrap();
        public[1] = Fr::from(999u64);
        assert!(!run(w, public));
    }

    #[test]
    fn test_shape() {
        let shape = SlaCircuit::shape().unwrap();
        assert_eq!(shape.public_inputs, PUBLIC_INPUTS);
        assert!(shape.constraints > 4 * RANGE_BITS);

        let cs = ConstraintSystem::<Fr>::new_ref();
        SlaCircuit::new(witness(1, 2, 3, 4, "x"))
            .generate_constraints(cs.clone())
            .unwrap();
        assert_eq!(cs.num_constraints(), shape.constraints);
        assert_eq!(cs.num_witness_variables(), shape.witnesses);
    }

    #[test]
    fn test_decimal_inputs_order() {
        let w = witness(1000, 1030, 2, 5, "ok");
        let names: Vec<&str> = w.decimal_inputs().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "taskIdHash",
                "slaDeadline",
                "biasThreshold",
                "completionTimestamp",
                "biasScore",
                "outputHash"
            ]
        );
        assert!(describe_inputs(&w).starts_with("taskIdHash="));
    }
}
