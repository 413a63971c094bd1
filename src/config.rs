use std::env;

/// Core configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Provider (Xtream player_api)
    pub provider_server: String,
    pub provider_username: String,
    pub provider_password: String,

    // Metadata lookup (TMDB)
    pub tmdb_api_key: String,
    pub metadata_locale: String,
    pub metadata_fallback_locale: String,

    // Transport
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub fetch_timeout_ms: u64,

    // Misc
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            provider_server: env::var("PROVIDER_SERVER")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            provider_username: env::var("PROVIDER_USERNAME").unwrap_or_default(),
            provider_password: env::var("PROVIDER_PASSWORD").unwrap_or_default(),

            tmdb_api_key: env::var("TMDB_API_KEY").unwrap_or_default(),
            metadata_locale: env::var("METADATA_LOCALE")
                .unwrap_or_else(|_| "fr-FR".to_string()),
            metadata_fallback_locale: env::var("METADATA_FALLBACK_LOCALE")
                .unwrap_or_else(|_| "en-US".to_string()),

            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            retry_base_delay_ms: env::var("RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000),

            // Use VLC user agent to avoid IPTV server blocks
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "VLC/3.0.20 LibVLC/3.0.20".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
