//! Twitter companion variant: aggregate statistics and CSV/JSON export.

pub mod export;
pub mod stats;

pub use export::export_dir;
pub use stats::{compute_stats, TweetStats};
