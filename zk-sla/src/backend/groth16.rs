//! Groth16 over BN254 with arkworks.
//!
//! Keys are read from the artifact directory on first use and cached for the
//! lifetime of the backend. A lost initialization race only costs a second
//! load; the first stored key wins.

use super::{ArtifactPaths, ProofBackend, ProofMode, ProvedStatement, Verdict};
use crate::error::{ArtifactError, GenerationError, VerificationError};
use crate::zk::circuit::{describe_inputs, public_signal_strings};
use crate::zk::commitment::{field_from_decimal, field_to_decimal};
use crate::zk::{DecodedSignals, ProofEnvelope, SlaCircuit, SlaWitness};
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey};
use ark_snark::SNARK;
use log::debug;
use std::sync::{Arc, OnceLock};

pub const VERIFIED: &str = "ZK proof verified: Agent proved SLA compliance without revealing internals";
pub const PAIRING_FAILED: &str = "ZK proof verification failed: Constraints not satisfied";
pub const BREACH_ATTESTED: &str =
    "ZK proof verification failed: Constraints not satisfied (circuit attests SLA breach)";

pub struct Groth16Backend {
    artifacts: ArtifactPaths,
    proving_key: OnceLock<Arc<ProvingKey<Bn254>>>,
    verifying_key: OnceLock<Arc<PreparedVerifyingKey<Bn254>>>,
}

impl Groth16Backend {
    pub fn new(artifacts: ArtifactPaths) -> Self {
        Self {
            artifacts,
            proving_key: OnceLock::new(),
            verifying_key: OnceLock::new(),
        }
    }

    pub fn artifacts(&self) -> &ArtifactPaths {
        &self.artifacts
    }

    fn proving_key(&self) -> Result<Arc<ProvingKey<Bn254>>, ArtifactError> {
        if let Some(pk) = self.proving_key.get() {
            return Ok(pk.clone());
        }
        let pk = self.artifacts.load_proving_key()?;
        Ok(self.proving_key.get_or_init(|| Arc::new(pk)).clone())
    }

    fn verifying_key(&self) -> Result<Arc<PreparedVerifyingKey<Bn254>>, ArtifactError> {
        if let Some(pvk) = self.verifying_key.get() {
            return Ok(pvk.clone());
        }
        let vk = self.artifacts.load_verifying_key()?;
        let pvk = Groth16::<Bn254>::process_vk(&vk)
            .map_err(|e| ArtifactError::Serialization(e.to_string()))?;
        Ok(self.verifying_key.get_or_init(|| Arc::new(pvk)).clone())
    }
}

impl ProofBackend for Groth16Backend {
    fn mode(&self) -> ProofMode {
        ProofMode::Groth16
    }

    fn prove(&self, witness: &SlaWitness) -> Result<ProvedStatement, GenerationError> {
        let pk = self.proving_key()?;
        debug!("Groth16 circuit inputs: {}", describe_inputs(witness));

        let circuit = SlaCircuit::new(*witness);
        let public = circuit
            .public_inputs()
            .ok_or_else(|| GenerationError::Backend("circuit witness not assigned".into()))?;
        let proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rand::thread_rng())
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        Ok(ProvedStatement {
            envelope: envelope_from_proof(&proof),
            public_signals: public_signal_strings(&public),
            compliant: public[3] == Fr::from(1u64),
        })
    }

    fn verify(
        &self,
        envelope: &ProofEnvelope,
        signals: &DecodedSignals,
        _claimed_compliant: bool,
    ) -> Result<Verdict, VerificationError> {
        let proof = proof_from_envelope(envelope)?;
        let pvk = self.verifying_key()?;
        let pairing_ok =
            Groth16::<Bn254>::verify_with_processed_vk(&pvk, &signals.field_elements, &proof)
                .map_err(|e| VerificationError::Backend(e.to_string()))?;

        let (valid, message) = match (pairing_ok, signals.compliant) {
            (true, true) => (true, VERIFIED),
            (true, false) => (false, BREACH_ATTESTED),
            (false, _) => (false, PAIRING_FAILED),
        };
        Ok(Verdict {
            valid,
            message: message.to_string(),
        })
    }
}

// Points use snarkjs projective notation: affine points as [x, y, 1],
// the point at infinity as [0, 1, 0].

fn g1_to_wire(p: &G1Affine) -> [String; 3] {
    if p.is_zero() {
        return ["0".into(), "1".into(), "0".into()];
    }
    [field_to_decimal(p.x), field_to_decimal(p.y), "1".into()]
}

fn fq2_to_wire(f: &Fq2) -> [String; 2] {
    [field_to_decimal(f.c0), field_to_decimal(f.c1)]
}

fn g2_to_wire(p: &G2Affine) -> [[String; 2]; 3] {
    if p.is_zero() {
        return [
            ["0".into(), "0".into()],
            ["1".into(), "0".into()],
            ["0".into(), "0".into()],
        ];
    }
    [
        fq2_to_wire(&p.x),
        fq2_to_wire(&p.y),
        ["1".into(), "0".into()],
    ]
}

fn envelope_from_proof(proof: &Proof<Bn254>) -> ProofEnvelope {
    ProofEnvelope::new(g1_to_wire(&proof.a), g2_to_wire(&proof.b), g1_to_wire(&proof.c))
}

fn malformed(what: &str, detail: impl std::fmt::Display) -> VerificationError {
    VerificationError::MalformedEnvelope(format!("{}: {}", what, detail))
}

fn fq(text: &str, what: &str) -> Result<Fq, VerificationError> {
    field_from_decimal(text).ok_or_else(|| malformed(what, format!("{:?} is not a base field element", text)))
}

fn g1_from_wire(coords: &[String; 3], what: &str) -> Result<G1Affine, VerificationError> {
    match coords[2].as_str() {
        "0" => return Ok(G1Affine::identity()),
        "1" => {}
        z => return Err(malformed(what, format!("unsupported z coordinate {:?}", z))),
    }
    let p = G1Affine::new_unchecked(fq(&coords[0], what)?, fq(&coords[1], what)?);
    if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed(what, "point not on curve"));
    }
    Ok(p)
}

fn g2_from_wire(coords: &[[String; 2]; 3], what: &str) -> Result<G2Affine, VerificationError> {
    match (coords[2][0].as_str(), coords[2][1].as_str()) {
        ("0", "0") => return Ok(G2Affine::identity()),
        ("1", "0") => {}
        z => return Err(malformed(what, format!("unsupported z coordinate {:?}", z))),
    }
    let x = Fq2::new(fq(&coords[0][0], what)?, fq(&coords[0][1], what)?);
    let y = Fq2::new(fq(&coords[1][0], what)?, fq(&coords[1][1], what)?);
    let p = G2Affine::new_unchecked(x, y);
    if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed(what, "point not on curve"));
    }
    Ok(p)
}

fn proof_from_envelope(envelope: &ProofEnvelope) -> Result<Proof<Bn254>, VerificationError> {
    Ok(Proof {
        a: g1_from_wire(&envelope.pi_a, "pi_a")?,
        b: g2_from_wire(&envelope.pi_b, "pi_b")?,
        c: g1_from_wire(&envelope.pi_c, "pi_c")?,
    })
}
