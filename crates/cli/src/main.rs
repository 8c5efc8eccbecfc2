use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pixseek_indexer::{FeatureExtractor, HashExtractor, ImageIndexer, IndexStats};
use pixseek_search::{EngineConfig, RankedMatch, SimilarityEngine};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_CONFIG_FILE: &str = "pixseek.toml";

#[derive(Parser)]
#[command(name = "pixseek")]
#[command(about = "Image similarity search over deep feature vectors", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Index store directory
    #[arg(long, global = true, default_value = ".pixseek")]
    store_dir: PathBuf,

    /// Engine config file (TOML)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from every image under a directory
    Build {
        /// Image collection root
        directory: PathBuf,
    },

    /// Add specific images to an existing index
    Add {
        /// Image files to append
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Find the images most similar to a probe
    Search {
        /// Probe image file
        #[arg(conflicts_with = "id")]
        image: Option<PathBuf>,

        /// Query by an identifier already in the index instead
        #[arg(long)]
        id: Option<String>,

        /// Number of results to return
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Report index readiness and entry count
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(&cli.config).await?;
    let extractor: Arc<dyn FeatureExtractor> = Arc::new(HashExtractor::default());

    match cli.command {
        Commands::Build { directory } => {
            let mut indexer = ImageIndexer::new(extractor, &cli.store_dir);
            let stats = indexer.build(&directory).await?;
            report_stats(&stats, cli.json)?;
        }
        Commands::Add { paths } => {
            let mut indexer = ImageIndexer::new(extractor, &cli.store_dir);
            let stats = indexer.add(&paths).await?;
            report_stats(&stats, cli.json)?;
        }
        Commands::Search { image, id, top_k } => {
            let engine = SimilarityEngine::initialize(&cli.store_dir, config).await;
            let matches = match (image, id) {
                (Some(image), None) => {
                    let vector = extractor
                        .extract(&image)
                        .await
                        .with_context(|| format!("failed to extract {}", image.display()))?;
                    engine.query(&vector, top_k)?
                }
                (None, Some(id)) => engine.query_by_identifier(&id, top_k)?,
                _ => bail!("provide either a probe image or --id"),
            };
            report_matches(&matches, cli.json)?;
        }
        Commands::Status => {
            let engine = SimilarityEngine::initialize(&cli.store_dir, config).await;
            let status = engine.status();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("ready: {}", status.ready);
                println!("count: {}", status.count);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn load_config(path: &PathBuf) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    EngineConfig::from_toml_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn report_stats(stats: &IndexStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }
    println!(
        "indexed {} of {} images in {} ms",
        stats.indexed, stats.scanned, stats.time_ms
    );
    for skipped in &stats.skipped {
        println!("skipped: {skipped}");
    }
    Ok(())
}

fn report_matches(matches: &[RankedMatch], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(matches)?);
        return Ok(());
    }
    for (rank, m) in matches.iter().enumerate() {
        let marker = if m.is_exact_match { " (exact)" } else { "" };
        println!("{:>2}. {:.4}  {}{marker}", rank + 1, m.score, m.identifier);
    }
    Ok(())
}
