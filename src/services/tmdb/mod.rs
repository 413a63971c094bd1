//! External metadata lookup (TMDB API v3).
//!
//! `TmdbClient` owns the raw endpoint operations; `MetadataResolver` drives
//! the tiered fallback chain over any `MetadataBackend`.

pub mod client;
pub mod resolver;
pub mod types;

pub use client::TmdbClient;
pub use resolver::{MetadataBackend, MetadataResolver, ResolveRequest, Tier, TIER_ORDER};
pub use types::SearchHit;
