//! Aggregate statistics over a batch of tweets.
//!
//! Top authors by tweet count, keyword frequencies over stop-word-filtered
//! text, and a naive lexicon-based sentiment tally. All of it is a single
//! pass plus a top-N sort — nothing here survives the request.

use blaster_search::Tweet;
use serde::Serialize;
use std::collections::HashMap;

/// How many authors/keywords the rankings keep.
pub const TOP_N: usize = 10;

/// Words ignored when counting keywords.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "you", "your", "are", "was", "but", "not",
    "all", "can", "has", "have", "had", "its", "it's", "out", "about", "into", "just", "like",
    "what", "when", "who", "how", "why", "from", "they", "them", "their", "there", "here",
    "will", "would", "should", "could", "been", "being", "than", "then", "too", "very", "more",
    "most", "some", "any", "our", "ours", "over", "under", "off", "on", "in", "of", "to", "a",
    "an", "is", "it", "at", "by", "as", "be", "or", "if", "so", "we", "my", "me", "i",
];

/// Naive positive lexicon.
const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "love", "amazing", "excellent", "awesome", "happy", "excited", "best",
    "wonderful", "fantastic", "progress", "win", "winning", "beautiful", "brilliant", "nice",
    "perfect", "impressive", "helpful",
];

/// Naive negative lexicon.
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "hate", "awful", "worst", "horrible", "disappointed", "disappointing",
    "broken", "fail", "failing", "failure", "sad", "angry", "annoying", "overhyped", "useless",
    "problem", "wrong", "scam",
];

/// Tweet count for one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    /// Author handle.
    pub username: String,
    /// Number of tweets by this author in the batch.
    pub count: usize,
}

/// Occurrence count for one keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    /// Lowercased keyword.
    pub keyword: String,
    /// Occurrences across the batch.
    pub count: usize,
}

/// Naive sentiment tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    /// Tweets with more positive than negative lexicon hits.
    pub positive: usize,
    /// Tweets with more negative than positive lexicon hits.
    pub negative: usize,
    /// Everything else.
    pub neutral: usize,
}

/// Aggregate statistics for one tweet batch.
#[derive(Debug, Clone, Serialize)]
pub struct TweetStats {
    /// Batch size.
    pub total: usize,
    /// Top authors by tweet count, ties broken alphabetically.
    pub top_authors: Vec<AuthorCount>,
    /// Top keywords by occurrence, ties broken alphabetically.
    pub keyword_counts: Vec<KeywordCount>,
    /// Sentiment tally over the whole batch.
    pub sentiment: SentimentBreakdown,
}

/// Compute aggregate statistics over `tweets`.
pub fn compute_stats(tweets: &[Tweet]) -> TweetStats {
    let mut authors: HashMap<&str, usize> = HashMap::new();
    let mut keywords: HashMap<String, usize> = HashMap::new();
    let mut sentiment = SentimentBreakdown::default();

    for tweet in tweets {
        *authors.entry(tweet.author_username.as_str()).or_default() += 1;

        let words: Vec<String> = tokenize(&tweet.text);
        for word in &words {
            if is_keyword(word) {
                *keywords.entry(word.clone()).or_default() += 1;
            }
        }

        match classify(&words) {
            Sentiment::Positive => sentiment.positive += 1,
            Sentiment::Negative => sentiment.negative += 1,
            Sentiment::Neutral => sentiment.neutral += 1,
        }
    }

    TweetStats {
        total: tweets.len(),
        top_authors: top_n(authors, |(username, count)| AuthorCount {
            username: username.to_owned(),
            count,
        }),
        keyword_counts: top_n(keywords, |(keyword, count)| KeywordCount { keyword, count }),
        sentiment,
    }
}

enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Lowercase words with surrounding punctuation trimmed; URLs and
/// mentions dropped.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|w| !w.starts_with("http") && !w.starts_with('@'))
        .map(|w| {
            w.to_lowercase()
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '#')
                .to_owned()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Keep words long enough to mean something and not on the stop list.
fn is_keyword(word: &str) -> bool {
    word.len() > 2 && !STOPWORDS.contains(&word)
}

/// Classify one tweet by comparing lexicon hits.
fn classify(words: &[String]) -> Sentiment {
    let positive = words
        .iter()
        .filter(|w| POSITIVE_WORDS.contains(&w.as_str()))
        .count();
    let negative = words
        .iter()
        .filter(|w| NEGATIVE_WORDS.contains(&w.as_str()))
        .count();
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Sort by count descending, then name ascending, and keep [`TOP_N`].
fn top_n<K, V, F>(counts: HashMap<K, usize>, make: F) -> Vec<V>
where
    K: Ord,
    F: Fn((K, usize)) -> V,
{
    let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries.into_iter().map(make).collect()
}
