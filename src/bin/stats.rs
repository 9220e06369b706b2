//! Companion CLI: crawl Twitter search results and export statistics.
//!
//! Usage: `blaster-stats <query> [query…] [--out DIR]`
//!
//! Fetches tweets for up to five queries concurrently (real API with
//! `TWITTER_BEARER_TOKEN` set, generated data otherwise), merges and
//! deduplicates them, computes aggregate statistics, and writes
//! `tweets.csv`, `tweets.json` and `stats.json` to the output directory.

use blaster::config::BlasterConfig;
use blaster::twitter::{compute_stats, export_dir};
use blaster_search::config::MAX_QUERIES;
use blaster_search::providers::TwitterProvider;
use blaster_search::{Provider, Tweet};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (queries, out_dir) = parse_args(std::env::args().skip(1))?;

    let config = BlasterConfig::load("blaster.toml")?;
    let search_config = config.search_config();
    let provider = TwitterProvider::new(config.credentials.twitter_bearer_token.clone());

    tracing::info!(queries = queries.len(), "fetching tweets");

    let futures = queries
        .iter()
        .map(|query| provider.search(query, &search_config));
    let outcomes = join_all(futures).await;

    let mut seen = HashSet::new();
    let mut tweets: Vec<Tweet> = Vec::new();
    for (query, outcome) in queries.iter().zip(outcomes) {
        match outcome {
            Ok(batch) => {
                tracing::info!(query, count = batch.len(), "query fetched");
                tweets.extend(batch.into_iter().filter(|t| seen.insert(t.id.clone())));
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "query failed");
            }
        }
    }

    let stats = compute_stats(&tweets);
    tracing::info!(
        total = stats.total,
        positive = stats.sentiment.positive,
        negative = stats.sentiment.negative,
        "stats computed"
    );

    let paths = export_dir(&out_dir, &tweets, &stats)?;
    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

/// Split positional queries from the `--out DIR` flag.
fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<(Vec<String>, PathBuf)> {
    let mut queries = Vec::new();
    let mut out_dir = PathBuf::from("export");

    let mut args = args;
    while let Some(arg) = args.next() {
        if arg == "--out" {
            let Some(dir) = args.next() else {
                anyhow::bail!("--out requires a directory");
            };
            out_dir = PathBuf::from(dir);
        } else if arg == "--help" || arg == "-h" {
            anyhow::bail!("usage: blaster-stats <query> [query…] [--out DIR]");
        } else {
            queries.push(arg);
        }
    }

    if queries.is_empty() {
        anyhow::bail!("usage: blaster-stats <query> [query…] [--out DIR]");
    }
    if queries.len() > MAX_QUERIES {
        anyhow::bail!("at most {MAX_QUERIES} queries");
    }
    Ok((queries, out_dir))
}
