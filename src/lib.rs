//! Catalog-enrichment core for IPTV providers.
//!
//! Takes the raw catalog an Xtream-style provider serves (category names,
//! stream/series titles) and turns it into display-ready entries:
//!
//! - [`services::patterns`] compiles multilingual keyword vocabularies into
//!   reusable matchers;
//! - [`services::classifier`] buckets category names into a fixed taxonomy;
//! - [`services::normalizer`] strips noise tokens from titles and extracts
//!   year/season/part hints;
//! - [`services::xtream`] is the cached, retrying client for the provider's
//!   own catalog endpoints;
//! - [`services::tmdb`] resolves a cleaned title to a canonical record
//!   through a tiered fallback chain of external lookups.
//!
//! Rendering, playback and platform bootstrap are the caller's problem; all
//! state here is in-memory and lives for the process only.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::CoreError;
pub use models::{
    CategoryLabel, EntertainmentKind, MetadataSource, NormalizedTitle, ResolvedMetadata,
    ResourceKind,
};
pub use services::classifier::CategoryClassifier;
pub use services::normalizer::TitleNormalizer;
pub use services::patterns::PatternRegistry;
pub use services::tmdb::{MetadataResolver, ResolveRequest, TmdbClient};
pub use services::xtream::CatalogClient;
