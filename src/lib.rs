//! # blaster
//!
//! Search-aggregation web service. Accepts a query over HTTP, fans it out
//! to the category providers in [`blaster_search`], optionally crawls a
//! handful of result pages, and optionally asks DeepSeek to synthesize a
//! cited answer. The [`twitter`] module holds the companion variant:
//! aggregate statistics over crawled tweets, exported as CSV/JSON.

pub mod answer;
pub mod config;
pub mod error;
pub mod llm;
pub mod server;
pub mod twitter;

pub use config::BlasterConfig;
pub use error::{BlasterError, Result};
