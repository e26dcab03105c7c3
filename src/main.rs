use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use tracing::{debug, info};

use cohorts::pipeline::{run_clustering, ClusterOptions};
use cohorts::recommend::recommend_projects;
use cohorts::render::render_report;
use cohorts::store::{load_records, load_themes};
use cohorts::summarize::{summarize_clusters, ChatSummarizer};

/// Cohorts - groups learners into learning-path clusters from AI image descriptions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the description record store
    #[arg(short, long, default_value = "data/metadata.json")]
    records: std::path::PathBuf,

    /// Path to the inferred theme catalog
    #[arg(short, long, default_value = "data/themes.json")]
    themes: std::path::PathBuf,

    /// Output directory for generated files
    #[arg(short, long, default_value = "out")]
    output_dir: String,

    /// Number of clusters (defaults to a user-count heuristic)
    #[arg(short, long)]
    k: Option<usize>,

    /// Maximum k-means iterations
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,

    /// Seed for centroid initialization (omit for a randomized run)
    #[arg(long)]
    seed: Option<u64>,

    /// Generate a natural-language summary per cluster
    #[arg(long)]
    summarize: bool,

    /// OpenAI-compatible API base URL for cluster summaries
    #[arg(long, default_value = "https://api.openai.com/v1")]
    api_base: String,

    /// Model used for cluster summaries
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Print project recommendations for one user instead of clustering
    #[arg(long)]
    recommend_user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting cohorts");

    let args = Args::parse();

    let records = load_records(&args.records)
        .with_context(|| format!("loading record store {}", args.records.display()))?;
    info!(
        "Loaded {} description records from {}",
        records.len(),
        args.records.display()
    );

    if let Some(user) = &args.recommend_user {
        let recommendations = recommend_projects(&records, user)?;
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    let catalog = load_themes(&args.themes);

    let pipeline_start = std::time::Instant::now();
    let options = ClusterOptions {
        k: args.k,
        max_iterations: args.max_iterations,
        seed: args.seed,
    };
    let clusters = run_clustering(&records, &catalog, &options)?;
    info!(
        "Clustering completed - duration={:.2}s, clusters={}",
        pipeline_start.elapsed().as_secs_f32(),
        clusters.len()
    );

    let reports = if args.summarize && !clusters.is_empty() {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set when --summarize is used"))?;
        let summarizer = ChatSummarizer::new(&args.api_base, &args.model, &api_key, 120)?;

        let summary_start = std::time::Instant::now();
        let reports = summarize_clusters(&summarizer, &clusters, &records).await;
        info!(
            "Cluster summaries completed - duration={:.2}s, clusters={}",
            summary_start.elapsed().as_secs_f32(),
            reports.len()
        );
        reports
    } else {
        Vec::new()
    };

    // persist to a date-scoped directory
    let today = Utc::now();
    let ymd = format!(
        "{:04}-{:02}-{:02}",
        today.year(),
        today.month(),
        today.day()
    );
    let date_dir = std::path::Path::new(&args.output_dir).join(&ymd);
    std::fs::create_dir_all(&date_dir)?;
    debug!("Output directory: {}", date_dir.display());

    std::fs::write(
        date_dir.join("clusters.json"),
        serde_json::to_vec_pretty(&clusters)?,
    )?;
    debug!("Wrote clusters.json");

    if !reports.is_empty() {
        std::fs::write(
            date_dir.join("summaries.json"),
            serde_json::to_vec_pretty(&reports)?,
        )?;
        debug!("Wrote summaries.json");
    }

    std::fs::write(
        date_dir.join("report.md"),
        render_report(&clusters, &reports).as_bytes(),
    )?;
    debug!("Wrote report.md");

    info!("Output persisted - directory={}", date_dir.display());
    Ok(())
}
