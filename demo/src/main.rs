// SafePay demo driver: wires the historical directory, the live store,
// and the classifier into one scoring engine and scores transactions
// from the command line.

use anyhow::{bail, Context, Result};
use chrono::Timelike;
use party_directory::PartyDirectory;
use rust_decimal::Decimal;
use scoring_engine::{
    LogisticClassifier, ModelArtifact, PartyId, ScoringConfig, ScoringEngine,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const USAGE: &str = "\
SafePay fraud-scoring demo

USAGE:
    safepay-demo export-model [PATH]           write the demo model artifact
    safepay-demo score   RECEIVER AMOUNT [HOUR]    hybrid transaction scoring
    safepay-demo predict RECEIVER AMOUNT [HOUR]    rule-free model prediction
    safepay-demo recipients                    list the demo recipient sample

ENVIRONMENT:
    SAFEPAY_CONFIG            TOML config path (else built-in defaults)
    SAFEPAY_MODEL_PATH        classifier artifact (default ./data/fraud_model.bin)
    SAFEPAY_USERS_CSV         users export (default ./data/upi_users.csv)
    SAFEPAY_TRANSACTIONS_CSV  transactions export (default ./data/upi_transactions.csv)
";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("export-model") => export_model(args.get(2).map(PathBuf::from)),
        Some("score") => score(&args[2..], true),
        Some("predict") => score(&args[2..], false),
        Some("recipients") => recipients(),
        _ => {
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    }
}

fn load_config() -> Result<ScoringConfig> {
    match std::env::var("SAFEPAY_CONFIG") {
        Ok(path) => ScoringConfig::from_file(&path)
            .with_context(|| format!("loading config from {path}")),
        Err(_) => Ok(ScoringConfig::from_env()?),
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn load_directory() -> Result<Arc<PartyDirectory>> {
    let directory = PartyDirectory::new();

    let users = env_path("SAFEPAY_USERS_CSV", "./data/upi_users.csv");
    directory
        .load_parties_csv(&users)
        .with_context(|| format!("loading users export {}", users.display()))?;

    let transactions = env_path("SAFEPAY_TRANSACTIONS_CSV", "./data/upi_transactions.csv");
    if transactions.exists() {
        directory
            .load_transactions_csv(&transactions)
            .with_context(|| format!("loading transactions export {}", transactions.display()))?;
    } else {
        warn!(
            path = %transactions.display(),
            "no transactions export; historical activity starts empty"
        );
    }

    Ok(Arc::new(directory))
}

fn build_engine() -> Result<ScoringEngine> {
    let config = load_config()?;
    let directory = load_directory()?;
    let live = Arc::new(live_store::LiveStore::new());
    let classifier = Arc::new(LogisticClassifier::open(&config.model_path));

    Ok(ScoringEngine::new(
        directory.clone(),
        directory,
        classifier,
        config.telemetry_provider(),
    )
    .with_live_store(live.clone(), live))
}

fn score(args: &[String], hybrid: bool) -> Result<()> {
    let [receiver, amount, rest @ ..] = args else {
        bail!("usage: safepay-demo score|predict RECEIVER AMOUNT [HOUR]");
    };
    let receiver = PartyId::new(receiver.as_str());
    let amount: Decimal = amount
        .parse()
        .with_context(|| format!("bad amount '{amount}'"))?;
    let hour = match rest.first() {
        Some(hour) => hour.parse().with_context(|| format!("bad hour '{hour}'"))?,
        None => chrono::Local::now().hour(),
    };

    let engine = build_engine()?;
    let result = if hybrid {
        engine.score_transaction(amount, &receiver, hour)?
    } else {
        engine.predict_transaction(amount, &receiver, hour)?
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn recipients() -> Result<()> {
    let directory = load_directory()?;
    let sample = directory.demo_recipients();
    println!("{}", serde_json::to_string_pretty(&sample)?);
    Ok(())
}

/// Hand-tuned demo coefficients, one per classifier feature position.
/// Stand-in for a real training export; positive pushes toward fraud.
const DEMO_WEIGHTS: [f64; scoring_engine::FEATURE_COUNT] = [
    1.2,  // normalized amount
    0.8,  // 24h frequency
    3.5,  // blacklist
    0.6,  // device mismatch
    0.6,  // VPN/proxy
    0.4,  // biometric proxy
    -0.8, // hours since last
    -2.5, // trust score
    -1.2, // account age
    0.9,  // high-risk hour
    1.8,  // past fraud flags
    1.1,  // location inconsistent
    1.0,  // capped amount
    0.5,  // context anomalies
    1.6,  // complaints
    0.7,  // merchant mismatch
    1.4,  // amount > 100k
    1.2,  // amount > 50k
    1.5,  // suspicious verification
    -1.0, // verified
    -0.6, // geo normal
    0.8,  // geo unusual
];

const DEMO_INTERCEPT: f64 = -4.0;

fn export_model(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from("./data/fraud_model.bin"));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let artifact = ModelArtifact {
        version: "demo-1".to_string(),
        weights: DEMO_WEIGHTS.to_vec(),
        intercept: DEMO_INTERCEPT,
    };
    write_artifact(&artifact, &path)?;
    info!(path = %path.display(), "demo model artifact written");
    Ok(())
}

fn write_artifact(artifact: &ModelArtifact, path: &Path) -> Result<()> {
    let encoded = bincode::serialize(artifact).context("encoding model artifact")?;
    std::fs::write(path, encoded).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
