//! CSV/JSON export for tweet batches and their statistics.
//!
//! Writers take any `io::Write` so tests can target buffers; the
//! directory helper wires them to files for the companion CLI.

use blaster_search::Tweet;
use std::io::Write;
use std::path::Path;

use crate::error::{BlasterError, Result};

use super::stats::TweetStats;

/// Write tweets as CSV: a header row, then one row per tweet.
pub fn write_tweets_csv<W: Write>(writer: W, tweets: &[Tweet]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for tweet in tweets {
        csv_writer
            .serialize(tweet)
            .map_err(|e| BlasterError::Export(format!("CSV row failed: {e}")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write tweets as a pretty-printed JSON array.
pub fn write_tweets_json<W: Write>(mut writer: W, tweets: &[Tweet]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, tweets)
        .map_err(|e| BlasterError::Export(format!("tweet JSON failed: {e}")))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write stats as pretty-printed JSON.
pub fn write_stats_json<W: Write>(mut writer: W, stats: &TweetStats) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, stats)
        .map_err(|e| BlasterError::Export(format!("stats JSON failed: {e}")))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write `tweets.csv`, `tweets.json` and `stats.json` into `dir`.
///
/// The directory is created if missing. Returns the three file paths in
/// that order.
pub fn export_dir(dir: impl AsRef<Path>, tweets: &[Tweet], stats: &TweetStats) -> Result<[std::path::PathBuf; 3]> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let csv_path = dir.join("tweets.csv");
    let json_path = dir.join("tweets.json");
    let stats_path = dir.join("stats.json");

    write_tweets_csv(std::fs::File::create(&csv_path)?, tweets)?;
    write_tweets_json(std::fs::File::create(&json_path)?, tweets)?;
    write_stats_json(std::fs::File::create(&stats_path)?, stats)?;

    tracing::info!(dir = %dir.display(), tweets = tweets.len(), "export written");
    Ok([csv_path, json_path, stats_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::stats::compute_stats;

    fn tweet(id: &str, author: &str, text: &str) -> Tweet {
        Tweet {
            id: id.into(),
            text: text.into(),
            author_username: author.into(),
            author_name: author.to_uppercase(),
            created_at: "2026-08-07T00:00:00Z".into(),
            like_count: 10,
            retweet_count: 2,
            reply_count: 1,
            url: format!("https://twitter.com/{author}/status/{id}"),
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let tweets = vec![tweet("1", "alice", "first"), tweet("2", "bob", "second")];
        let mut buf = Vec::new();
        write_tweets_csv(&mut buf, &tweets).expect("csv written");
        let out = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("id"));
        assert!(lines[0].contains("author_username"));
        assert!(lines[1].contains("alice"));
        assert!(lines[2].contains("second"));
    }

    #[test]
    fn csv_escapes_embedded_commas_and_quotes() {
        let tweets = vec![tweet("1", "alice", "hello, \"world\"")];
        let mut buf = Vec::new();
        write_tweets_csv(&mut buf, &tweets).expect("csv written");
        let out = String::from_utf8(buf).expect("utf8");
        assert!(out.contains("\"hello, \"\"world\"\"\""));
    }

    #[test]
    fn json_round_trips() {
        let tweets = vec![tweet("1", "alice", "first")];
        let mut buf = Vec::new();
        write_tweets_json(&mut buf, &tweets).expect("json written");
        let decoded: Vec<Tweet> = serde_json::from_slice(&buf).expect("parse");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].author_username, "alice");
    }

    #[test]
    fn stats_json_contains_sections() {
        let tweets = vec![tweet("1", "alice", "great stuff")];
        let stats = compute_stats(&tweets);
        let mut buf = Vec::new();
        write_stats_json(&mut buf, &stats).expect("stats written");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("parse");
        assert_eq!(value["total"], 1);
        assert!(value["top_authors"].is_array());
        assert!(value["sentiment"]["positive"].is_number());
    }

    #[test]
    fn empty_batch_still_produces_valid_files() {
        let stats = compute_stats(&[]);
        let mut csv_buf = Vec::new();
        write_tweets_csv(&mut csv_buf, &[]).expect("csv written");
        // No rows, no header either — serde-based csv writes headers per record.
        let mut json_buf = Vec::new();
        write_tweets_json(&mut json_buf, &[]).expect("json written");
        let decoded: Vec<Tweet> = serde_json::from_slice(&json_buf).expect("parse");
        assert!(decoded.is_empty());
        let mut stats_buf = Vec::new();
        write_stats_json(&mut stats_buf, &stats).expect("stats written");
    }
}
