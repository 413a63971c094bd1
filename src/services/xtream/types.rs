//! Typed views over player_api payloads.
//!
//! Catalog entries are owned by the provider; only the fields the core reads
//! (names, ids, category ids, catchup capability) are decoded, everything
//! else is left in the raw cached payload.

use serde::{Deserialize, Serialize};

/// Credential exchange response (player_api with no action)
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthResponse {
    pub user_info: UserInfo,
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserInfo {
    pub username: String,
    pub status: String,
    #[serde(default)]
    pub exp_date: Option<String>,
    #[serde(default)]
    pub is_trial: Option<String>,
    #[serde(default)]
    pub max_connections: Option<String>,
    #[serde(default)]
    pub allowed_output_formats: Option<Vec<String>>,
}

impl UserInfo {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub timestamp_now: Option<i64>,
    #[serde(default)]
    pub time_now: Option<String>,
}

/// Authenticated session: account state plus the server/client clock offset
/// used for EPG and catchup time math.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_info: UserInfo,
    pub server_info: Option<ServerInfo>,
    /// `server timestamp_now − local timestamp` in seconds; 0 when the
    /// server does not report its clock
    pub clock_offset_secs: i64,
}

/// Category for live, VOD or series
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

/// Live stream (channel) entry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LiveStream {
    pub name: String,
    pub stream_id: i64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub epg_channel_id: Option<String>,
    #[serde(default)]
    pub stream_icon: Option<String>,
    #[serde(default)]
    pub tv_archive: Option<i32>,
    #[serde(default)]
    pub tv_archive_duration: Option<i32>,
}

impl LiveStream {
    /// Whether the provider keeps a catchup archive for this channel
    pub fn has_catchup(&self) -> bool {
        self.tv_archive.unwrap_or(0) != 0
    }
}

/// VOD (movie) entry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VodStream {
    pub name: String,
    pub stream_id: i64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub stream_icon: Option<String>,
    #[serde(default)]
    pub container_extension: Option<String>,
}

/// Series entry from get_series
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeriesItem {
    pub series_id: i64,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
}

/// What kind of playback URL to template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Live,
    Movie,
    Series,
}

/// Catchup URL formatting variants, selected by an explicit provider-supplied
/// format code. Mutually exclusive; each produces a different endpoint/path
/// shape and time encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchupFormat {
    /// timeshift.php query parameters, `YYYY-MM-DD:HH-MM` start
    Standard,
    /// /timeshift/ path segments, `YYYY-MM-DD:HH-MM` start
    TimeshiftPath,
    /// Flussonic-style `?utc=start&lutc=end` Unix range
    FlussonicRange,
    /// Unix start timestamp as a path segment
    UnixSegment,
}

impl CatchupFormat {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Standard),
            1 => Some(Self::TimeshiftPath),
            2 => Some(Self::FlussonicRange),
            3 => Some(Self::UnixSegment),
            _ => None,
        }
    }
}
