use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use statement_matcher::{
    load_transactions, summarize, CategoryRuleSet, MatcherConfig, SingleFileMatcher,
};

/// Find duplicates, recurring payments, category hints and reconciling
/// pairs in a single statement.
#[derive(Debug, Parser)]
#[command(name = "statement-matcher", version, about)]
struct Cli {
    /// Transactions file (.csv or .json) with id, amount, description, date, category, type
    file: PathBuf,

    /// JSON file overriding matcher thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file replacing the built-in category keyword families
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print matches as JSON instead of a text listing
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut matcher = SingleFileMatcher::new();

    if let Some(path) = &cli.config {
        let config = MatcherConfig::from_file(path)?;
        matcher = matcher.with_config(config)?;
    }

    if let Some(path) = &cli.rules {
        matcher = matcher.with_rules(CategoryRuleSet::from_file(path)?);
    }

    let transactions = load_transactions(&cli.file)?;
    tracing::info!(count = transactions.len(), file = %cli.file.display(), "loaded transactions");

    let matches = matcher.find_matches(&transactions);

    if cli.json {
        let output = serde_json::to_string_pretty(&matches).context("Failed to serialize matches")?;
        println!("{}", output);
        return Ok(());
    }

    println!("🔍 Statement Matcher - {}", cli.file.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for m in &matches {
        println!(
            "\n[{}] {} ({:.0}% confidence)",
            m.match_type,
            m.id,
            m.confidence * 100.0
        );
        println!("   {}", m.reason);
        if let Some(suggestion) = &m.suggestion {
            println!("   → {}", suggestion);
        }
        for tx in &m.transactions {
            println!("     {} | {:>10.2} | {}", tx.date, tx.amount, tx.description);
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ {}", summarize(&matches).summary());

    Ok(())
}
