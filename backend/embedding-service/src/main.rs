//! Embedding Service - Main entry point
//!
//! Prepares rating data for the two-tower embedding model and serves
//! nearest-neighbor item lookups from its item embeddings.
//!
//! # Modes
//! - `partition` (default): split the ratings file per user into JSON-lines files
//! - `convert`: convert a delimited ratings file to JSON lines
//! - `neighbors`: find the closest item to `--item <id>`
//! - `predict`: score `--payload <json>` with the `--type rating|recommendation` model
//! - `evaluate`: recommendation accuracy on `--split <path>`

use anyhow::{anyhow, Context, Result};
use embedding_service::jobs::{
    run_convert_job, run_evaluate_job, run_neighbor_job, run_partition_job,
};
use embedding_service::{Config, HttpModelClient, PredictionKind, Predictor};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Service run mode
#[derive(Debug, Clone, PartialEq)]
enum RunMode {
    Partition,
    Convert,
    Neighbors,
    Predict,
    Evaluate,
}

impl RunMode {
    fn from_args(args: &[String]) -> Self {
        match arg_value(args, "--mode") {
            Some("partition") | None => RunMode::Partition,
            Some("convert") => RunMode::Convert,
            Some("neighbors") => RunMode::Neighbors,
            Some("predict") => RunMode::Predict,
            Some("evaluate") => RunMode::Evaluate,
            Some(other) => {
                warn!("Unknown mode '{}', using default 'partition'", other);
                RunMode::Partition
            }
        }
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn required_arg<'a>(args: &'a [String], flag: &str) -> Result<&'a str> {
    arg_value(args, flag).ok_or_else(|| anyhow!("missing required argument {}", flag))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "embedding_service=info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let mode = RunMode::from_args(&args);

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Starting {} in {:?} mode", config.service.service_name, mode);

    match mode {
        RunMode::Partition => {
            let report = run_partition_job(&config.service, &config.dataset)?;
            for split in &report.splits {
                info!("{}: {} records -> {}", split.name, split.records, split.path.display());
            }
        }
        RunMode::Convert => {
            let source = PathBuf::from(required_arg(&args, "--source")?);
            let target = PathBuf::from(required_arg(&args, "--target")?);
            run_convert_job(&source, &target, config.dataset.delimiter)?;
        }
        RunMode::Neighbors => {
            let item_id = required_arg(&args, "--item")?
                .parse::<u64>()
                .context("--item must be an integer item id")?;
            let client = HttpModelClient::new(config.providers.clone())?;
            let report = run_neighbor_job(&config, &client, item_id).await?;
            println!(
                "{}\t{}\t{:.6}",
                report.query_id, report.neighbor.item_id, report.neighbor.distance
            );
        }
        RunMode::Predict => {
            let kind = PredictionKind::parse(arg_value(&args, "--type").unwrap_or("recommendation"));
            let payload = required_arg(&args, "--payload")?;
            let client = Arc::new(HttpModelClient::new(config.providers.clone())?);
            let predictor = Predictor::new(client, config.dataset.recommend_threshold);
            let prediction = predictor.predict(kind, payload).await?;
            println!("{}", prediction);
        }
        RunMode::Evaluate => {
            let split = arg_value(&args, "--split")
                .map(PathBuf::from)
                .unwrap_or_else(|| config.service.output_dir.join("test.jsonl"));
            let client = HttpModelClient::new(config.providers.clone())?;
            let report = run_evaluate_job(&config.dataset, &client, &split).await?;
            println!("{:.4}", report.accuracy);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_mode_from_args() {
        assert_eq!(RunMode::from_args(&args(&["bin"])), RunMode::Partition);
        assert_eq!(
            RunMode::from_args(&args(&["bin", "--mode", "neighbors", "--item", "1"])),
            RunMode::Neighbors
        );
        assert_eq!(RunMode::from_args(&args(&["bin", "--mode", "bogus"])), RunMode::Partition);
    }

    #[test]
    fn test_required_arg() {
        let list = args(&["bin", "--item"]);
        assert!(required_arg(&list, "--item").is_err());
        let list = args(&["bin", "--item", "42"]);
        assert_eq!(required_arg(&list, "--item").unwrap(), "42");
    }
}
