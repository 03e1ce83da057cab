//! zksla CLI: generate and verify ZK-SLA proofs
//!
//! Commands:
//!   zksla prove    run the prove-SLA use case on a request JSON file
//!   zksla verify   verify an SlaProof JSON file
//!   zksla info     endpoint description and artifact status
//!   zksla setup    development-only Groth16 key generation
//!   zksla demo     run the four reference scenarios end to end

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zk_sla::backend::artifacts;
use zk_sla::{
    api_info, prove_sla, ProofGenerator, ProofInput, ProofVerifier, ProveSlaRequest, SlaProof,
    ZkSlaConfig,
};

#[derive(Parser)]
#[command(author, version, about = "Zero-knowledge SLA compliance proofs")]
struct Cli {
    /// Directory holding the circuit manifest and Groth16 keys
    #[arg(long, global = true, value_name = "DIR")]
    circuits_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and verify a proof for a prove-SLA request
    Prove {
        /// Request JSON (camelCase fields, as accepted by the prove-SLA endpoint)
        request: PathBuf,
    },
    /// Verify a proof produced by `prove` or by the library
    Verify {
        /// SlaProof JSON
        proof: PathBuf,
    },
    /// Print the endpoint description and which artifacts are installed
    Info,
    /// Generate development Groth16 keys (single party, NOT a trusted setup)
    Setup {
        /// Output directory, defaults to the configured circuits dir
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Run the on-time, late, biased and shared-task-id scenarios
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let mut config = ZkSlaConfig::from_env();
    if let Some(dir) = cli.circuits_dir {
        config.circuits_dir = dir;
    }

    match cli.command {
        Commands::Prove { request } => cmd_prove(&config, request).await,
        Commands::Verify { proof } => cmd_verify(&config, proof),
        Commands::Info => cmd_info(&config),
        Commands::Setup { out } => cmd_setup(&config, out),
        Commands::Demo => cmd_demo(&config),
    }
}

async fn cmd_prove(config: &ZkSlaConfig, path: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading request {}", path.display()))?;
    let request: ProveSlaRequest =
        serde_json::from_str(&json).with_context(|| format!("parsing request {}", path.display()))?;

    let generator = ProofGenerator::from_artifacts(&config.artifacts());
    let verifier = ProofVerifier::from_artifacts(&config.artifacts());
    let response = prove_sla(&generator, &verifier, request, config).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_verify(config: &ZkSlaConfig, path: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading proof {}", path.display()))?;
    let proof: SlaProof =
        serde_json::from_str(&json).with_context(|| format!("parsing proof {}", path.display()))?;

    let verifier = ProofVerifier::from_artifacts(&config.artifacts());
    let result = verifier.verify_proof(&proof);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_info(config: &ZkSlaConfig) -> Result<()> {
    let paths = config.artifacts();
    let generator = ProofGenerator::from_artifacts(&paths);
    let mut info = api_info(generator.mode());
    info["artifacts"] = serde_json::json!({
        "dir": paths.dir.display().to_string(),
        "present": paths.probe(),
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn cmd_setup(config: &ZkSlaConfig, out: Option<PathBuf>) -> Result<()> {
    let dir = out.unwrap_or_else(|| config.circuits_dir.clone());
    println!("Generating development Groth16 keys in {}", dir.display());
    println!("  These keys come from a single-party setup and must not secure real SLAs.");
    let paths = artifacts::setup(&dir, &mut rand::thread_rng())
        .with_context(|| format!("key generation in {}", dir.display()))?;
    println!("  {}", paths.circuit.display());
    println!("  {}", paths.proving_key.display());
    println!("  {}", paths.verification_key.display());
    Ok(())
}

fn demo_input(task_id: &str, completion: u64, bias_score: u8, output: &str) -> ProofInput {
    ProofInput {
        task_id: task_id.to_string(),
        completion_timestamp: completion,
        sla_deadline: 1030,
        bias_score,
        bias_threshold: 5,
        output_data: output.to_string(),
    }
}

fn cmd_demo(config: &ZkSlaConfig) -> Result<()> {
    let generator = ProofGenerator::from_artifacts(&config.artifacts());
    let verifier = ProofVerifier::from_artifacts(&config.artifacts());
    println!("ZK-SLA demo ({} prover, {} verifier)", generator.mode().name(), verifier.mode().name());
    println!("{}", "-".repeat(60));

    let scenarios = [
        ("A on time", demo_input("t1", 1000, 2, "ok")),
        ("B late", demo_input("t1", 1100, 2, "ok")),
        ("C biased", demo_input("t1", 1000, 50, "ok")),
    ];
    for (label, input) in &scenarios {
        let proof = generator.generate_proof(input)?;
        let result = verifier.verify_proof(&proof);
        println!(
            "  {:<10} verified={:<5} valid={:<5} {} bytes  {}",
            label, proof.verified, result.valid, proof.proof_size_bytes, result.message
        );
    }

    let first = generator.generate_proof(&demo_input("dup", 1000, 2, "first output"))?;
    let second = generator.generate_proof(&demo_input("dup", 1000, 2, "second output"))?;
    println!(
        "  {:<10} taskIdHash stable across outputs: {}",
        "D dup",
        first.public_signals[0] == second.public_signals[0]
    );
    Ok(())
}
