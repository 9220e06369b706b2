//! Provider implementations, one module per search category.
//!
//! Each module exposes a struct implementing [`crate::provider::Provider`]
//! that fetches from (or falls back between) the external backends for its
//! category.

pub mod images;
pub mod news;
pub mod twitter;
pub mod videos;
pub mod web;

pub use images::ImagesProvider;
pub use news::NewsProvider;
pub use twitter::TwitterProvider;
pub use videos::VideosProvider;
pub use web::WebProvider;
