use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qdrant_seed::verify::verify;
use qdrant_seed::{Endpoint, FixtureConfig, QdrantClient, RecordGenerator, Seeder, VectorStore};
use qdrant_seed::config::{DEFAULT_HOST, DEFAULT_PORT};

/// Creates realistic test collections for exercising qdrant-dump.
#[derive(Parser, Debug)]
#[command(name = "qdrant-seed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Vector store host
    #[arg(long, default_value = DEFAULT_HOST, global = true)]
    host: String,

    #[arg(long, default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    /// API key, sent as the `api-key` header when set
    #[arg(long, env = "QDRANT_API_KEY", default_value = "", hide_env_values = true, global = true)]
    api_key: String,

    /// JSON fixture file replacing the built-in collection set
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random source; omit for OS entropy
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Drop, recreate and fill every fixture collection (default)
    Seed,
    /// Check that the fixture collections are in their seeded state
    Verify,
    /// List the collections the service holds
    List,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    // Strictly sequential: one thread is all we need
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("[\u{2717}] Could not start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[\u{2717}] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("warn,qdrant_seed=info"));

    tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_level(true)
    .with_writer(std::io::stderr)
    .init();
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let endpoint = Endpoint::new(&args.host, args.port).with_api_key(&args.api_key);

    let config = match &args.config {
        Some(path) => FixtureConfig::load(path)?,
        None => FixtureConfig::default(),
    };

    let client = match QdrantClient::connect(&endpoint).await {
        Ok((client, info)) => {
            println!("[\u{2713}] Connected to Qdrant at {}:{}", args.host, args.port);
            if !info.version.is_empty() {
                println!("    Server version: {}", info.version);
            }
            println!();
            client
        }
        Err(e) => {
            println!("[\u{2717}] Failed to connect to Qdrant: {}", e);
            println!("    Make sure Qdrant is running: docker run -p 6333:6333 qdrant/qdrant");
            return Ok(ExitCode::FAILURE);
        }
    };

    match args.command.unwrap_or(Command::Seed) {
        Command::Seed => seed(&client, &endpoint, &config, args.seed).await,
        Command::Verify => check(&client, &config).await,
        Command::List => list(&client).await,
    }
}

async fn seed(client: &QdrantClient, endpoint: &Endpoint, config: &FixtureConfig, rng_seed: Option<u64>) -> anyhow::Result<ExitCode> {
    let generator = match rng_seed {
        Some(s) => RecordGenerator::seeded(s, config),
        None => RecordGenerator::from_entropy(config),
    };

    Seeder::new(client, config, generator)
    .run()
    .await
    .context("seeding aborted")?;

    println!("[\u{2713}] All test collections created!");
    println!("\nYou can now test qdrant-dump with:");
    println!("  ./target/release/qdrant-dump --url {} --collection all --out ./backups", endpoint.url());
    Ok(ExitCode::SUCCESS)
}

async fn check(client: &QdrantClient, config: &FixtureConfig) -> anyhow::Result<ExitCode> {
    let reports = verify(client, config).await.context("verification aborted")?;

    let mut clean = true;
    for report in &reports {
        if report.is_ok() {
            println!("[\u{2713}] {}: {} points, as seeded", report.name, config.points_per_collection);
        } else {
            clean = false;
            println!("[\u{2717}] {}:", report.name);
            for m in &report.mismatches {
                println!("    - {}", m);
            }
        }
    }

    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::from(2) })
}

async fn list(client: &QdrantClient) -> anyhow::Result<ExitCode> {
    let names = client.list_collections().await.context("could not list collections")?;
    println!("Found {} collections.", names.len());
    for name in names {
        println!("  \u{2022} {}", name);
    }
    Ok(ExitCode::SUCCESS)
}
