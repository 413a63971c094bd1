//! Provider catalog integration (Xtream-style player_api).
//!
//! The client layers a session-scoped response cache and a retrying
//! transport over the provider's query-parameter action endpoint, and owns
//! playback/catchup URL templating.

pub mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::{
    AuthResponse, AuthSession, CatchupFormat, Category, LiveStream, SeriesItem, ServerInfo,
    StreamKind, UserInfo, VodStream,
};
