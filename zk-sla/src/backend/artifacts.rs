//! Circuit artifacts: manifest, proving key and verification key on disk
//!
//! Layout of the artifact directory (default `<crate>/circuits/compiled/`):
//! - `sla_proof.circuit.json`: manifest of the circuit the keys were built for
//! - `sla_proof.zkey`: Groth16 proving key (ark-serialize, uncompressed)
//! - `verification_key.bin`: Groth16 verifying key (ark-serialize, compressed)
//!
//! `setup` writes all three from a single-party key generation. It is a
//! development convenience, NOT a trusted setup ceremony.

use crate::error::ArtifactError;
use crate::zk::circuit::{SlaCircuit, CIRCUIT_NAME, CIRCUIT_VERSION, PUBLIC_INPUTS};
use ark_bn254::Bn254;
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CIRCUIT_FILE: &str = "sla_proof.circuit.json";
pub const PROVING_KEY_FILE: &str = "sla_proof.zkey";
pub const VERIFICATION_KEY_FILE: &str = "verification_key.bin";

/// Locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub circuit: PathBuf,
    pub proving_key: PathBuf,
    pub verification_key: PathBuf,
}

/// Which artifacts are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactProbe {
    pub circuit: bool,
    pub proving_key: bool,
    pub verification_key: bool,
}

impl ArtifactProbe {
    pub fn can_prove(&self) -> bool {
        self.circuit && self.proving_key && self.verification_key
    }

    pub fn can_verify(&self) -> bool {
        self.verification_key
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.circuit {
            out.push(CIRCUIT_FILE);
        }
        if !self.proving_key {
            out.push(PROVING_KEY_FILE);
        }
        if !self.verification_key {
            out.push(VERIFICATION_KEY_FILE);
        }
        out
    }
}

/// Identity of the circuit a key pair was generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitManifest {
    pub name: String,
    pub version: u32,
    pub public_inputs: usize,
    pub constraints: usize,
    pub created_at: DateTime<Utc>,
}

impl CircuitManifest {
    /// Manifest describing the circuit compiled into this binary
    pub fn current() -> Result<Self, ArtifactError> {
        let shape = SlaCircuit::shape().map_err(|e| ArtifactError::Setup(e.to_string()))?;
        Ok(Self {
            name: CIRCUIT_NAME.to_string(),
            version: CIRCUIT_VERSION,
            public_inputs: shape.public_inputs,
            constraints: shape.constraints,
            created_at: Utc::now(),
        })
    }

    /// Same circuit, ignoring when the manifest was written
    pub fn describes_same_circuit(&self, other: &CircuitManifest) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.public_inputs == other.public_inputs
            && self.constraints == other.constraints
    }
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            circuit: dir.join(CIRCUIT_FILE),
            proving_key: dir.join(PROVING_KEY_FILE),
            verification_key: dir.join(VERIFICATION_KEY_FILE),
            dir,
        }
    }

    /// `<crate root>/circuits/compiled`
    pub fn well_known() -> Self {
        Self::in_dir(
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("circuits")
                .join("compiled"),
        )
    }

    pub fn probe(&self) -> ArtifactProbe {
        ArtifactProbe {
            circuit: self.circuit.is_file(),
            proving_key: self.proving_key.is_file(),
            verification_key: self.verification_key.is_file(),
        }
    }

    pub fn load_manifest(&self) -> Result<CircuitManifest, ArtifactError> {
        let json = std::fs::read_to_string(&self.circuit)
            .map_err(|e| ArtifactError::io(&self.circuit, e))?;
        serde_json::from_str(&json)
            .map_err(|e| ArtifactError::CircuitMismatch(format!("unreadable manifest: {}", e)))
    }

    /// Load the proving key after checking the manifest against the compiled circuit
    pub fn load_proving_key(&self) -> Result<ProvingKey<Bn254>, ArtifactError> {
        let manifest = self.load_manifest()?;
        let current = CircuitManifest::current()?;
        if !manifest.describes_same_circuit(&current) {
            return Err(ArtifactError::CircuitMismatch(format!(
                "artifacts built for {} v{} ({} constraints), compiled circuit is {} v{} ({} constraints)",
                manifest.name,
                manifest.version,
                manifest.constraints,
                current.name,
                current.version,
                current.constraints
            )));
        }

        let bytes = std::fs::read(&self.proving_key)
            .map_err(|e| ArtifactError::io(&self.proving_key, e))?;
        // Proving key is read without subgroup checks; only the verifying key is validated
        let pk = ProvingKey::<Bn254>::deserialize_uncompressed_unchecked(bytes.as_slice())?;
        check_input_count(&pk.vk)?;
        info!(
            "Loaded proving key from {} ({} bytes)",
            self.proving_key.display(),
            bytes.len()
        );
        Ok(pk)
    }

    pub fn load_verifying_key(&self) -> Result<VerifyingKey<Bn254>, ArtifactError> {
        let bytes = std::fs::read(&self.verification_key)
            .map_err(|e| ArtifactError::io(&self.verification_key, e))?;
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes.as_slice())?;
        check_input_count(&vk)?;
        info!("Loaded verification key from {}", self.verification_key.display());
        Ok(vk)
    }
}

fn check_input_count(vk: &VerifyingKey<Bn254>) -> Result<(), ArtifactError> {
    let inputs = vk.gamma_abc_g1.len().saturating_sub(1);
    if inputs != PUBLIC_INPUTS {
        return Err(ArtifactError::CircuitMismatch(format!(
            "key expects {} public inputs, circuit has {}",
            inputs, PUBLIC_INPUTS
        )));
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    std::fs::write(path, bytes).map_err(|e| ArtifactError::io(path, e))
}

/// Development key generation: synthesize the circuit, run a single-party
/// Groth16 setup and write manifest + keys into `dir`.
pub fn setup<R: RngCore + CryptoRng>(
    dir: impl AsRef<Path>,
    rng: &mut R,
) -> Result<ArtifactPaths, ArtifactError> {
    let paths = ArtifactPaths::in_dir(dir);
    std::fs::create_dir_all(&paths.dir).map_err(|e| ArtifactError::io(&paths.dir, e))?;

    let manifest = CircuitManifest::current()?;
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(SlaCircuit::blank(), rng)
        .map_err(|e| ArtifactError::Setup(e.to_string()))?;

    let mut pk_bytes = Vec::new();
    pk.serialize_uncompressed(&mut pk_bytes)?;
    let mut vk_bytes = Vec::new();
    vk.serialize_compressed(&mut vk_bytes)?;
    let manifest_json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| ArtifactError::Serialization(e.to_string()))?;

    write_file(&paths.circuit, manifest_json.as_bytes())?;
    write_file(&paths.proving_key, &pk_bytes)?;
    write_file(&paths.verification_key, &vk_bytes)?;

    info!(
        "Generated development Groth16 keys in {}: {} constraints, pk={}B, vk={}B",
        paths.dir.display(),
        manifest.constraints,
        pk_bytes.len(),
        vk_bytes.len()
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let probe = paths.probe();
        assert!(!probe.can_prove());
        assert!(!probe.can_verify());
        assert_eq!(probe.missing().len(), 3);
    }

    #[test]
    fn test_well_known_location() {
        let paths = ArtifactPaths::well_known();
        assert!(paths.dir.ends_with("zk-sla/circuits/compiled"));
        assert_eq!(paths.verification_key.file_name().unwrap(), VERIFICATION_KEY_FILE);
    }

    #[test]
    fn test_setup_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(dir.path(), &mut rand::thread_rng()).unwrap();
        assert!(paths.probe().can_prove());

        let manifest = paths.load_manifest().unwrap();
        assert_eq!(manifest.name, CIRCUIT_NAME);
        assert_eq!(manifest.public_inputs, PUBLIC_INPUTS);

        let pk = paths.load_proving_key().unwrap();
        let vk = paths.load_verifying_key().unwrap();
        assert_eq!(pk.vk, vk);
    }

    #[test]
    fn test_manifest_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths = setup(dir.path(), &mut rand::thread_rng()).unwrap();

        let mut manifest = paths.load_manifest().unwrap();
        manifest.constraints += 1;
        std::fs::write(&paths.circuit, serde_json::to_string(&manifest).unwrap()).unwrap();

        assert!(matches!(
            paths.load_proving_key(),
            Err(ArtifactError::CircuitMismatch(_))
        ));
    }

    #[test]
    fn test_corrupt_verification_key() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        std::fs::write(&paths.verification_key, b"not a key").unwrap();
        assert!(matches!(
            paths.load_verifying_key(),
            Err(ArtifactError::Serialization(_))
        ));
    }
}
