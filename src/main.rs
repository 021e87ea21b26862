use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use sift::bluesky::client::PublicAtpClient;
use sift::config::Config;
use sift::labeler::Labeler;
use sift::reference::ReferenceLists;

/// Sift: Automated policy labeling for Bluesky.
///
/// Evaluates a post against trust-and-safety keyword lists, news-source
/// attribution, reference-image matching, and scam heuristics, and prints
/// the policy labels it would apply.
#[derive(Parser)]
#[command(name = "sift", version, about)]
struct Cli {
    /// Directory containing the reference lists (overrides SIFT_INPUT_DIR)
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate a post and print its policy labels
    Moderate {
        /// The post to moderate (bsky.app URL or at:// URI)
        url: String,
    },

    /// Moderate a post and print the scam score breakdown
    Explain {
        /// The post to explain (bsky.app URL or at:// URI)
        url: String,

        /// Emit the breakdown as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sift=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.input_dir {
        config.input_dir = dir;
    }
    config.require_input_dir()?;

    let client = PublicAtpClient::new(&config.public_api_url)?;
    let reference = ReferenceLists::load(&config.input_dir)?;
    let labeler = Labeler::new(client, reference);

    match cli.command {
        Commands::Moderate { url } => {
            let labels = labeler.moderate_post(&url).await?;
            print_labels(&labels);
        }

        Commands::Explain { url, json } => {
            let (labels, breakdown) = labeler.explain_post(&url).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                println!("{}", "Scam score breakdown".bold());
                println!("  profile shape:  {}", breakdown.profile);
                println!("  emoji density:  {}", breakdown.emoji);
                println!("  language:       {}", breakdown.language);
                println!("  malicious URL:  {}", breakdown.malicious_url);
                println!("  shortener:      {}", breakdown.shortener);
                println!(
                    "  total:          {} (threshold {}, URL present: {})",
                    breakdown.total(),
                    sift::labeler::scam::SCAM_THRESHOLD,
                    breakdown.has_url
                );
                println!();
            }

            print_labels(&labels);
        }
    }

    Ok(())
}

fn print_labels(labels: &[String]) {
    if labels.is_empty() {
        println!("{}", "No policy labels".green());
    } else {
        for label in labels {
            println!("{}", label.red().bold());
        }
    }
}
