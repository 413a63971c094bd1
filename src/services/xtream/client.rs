//! Cached, retrying client for the provider's player_api catalog endpoints.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::types::*;
use crate::config::Config;
use crate::error::CoreError;
use crate::models::ResourceKind;
use crate::services::transport::{HttpGet, ReqwestTransport, RetryingTransport};

/// Cache key component for "no category filter"
const ALL: &str = "_all";

/// Catalog client over the retrying transport.
///
/// Responses for list endpoints are cached per `(resource kind, category)`
/// for the lifetime of the process; there is no TTL, no invalidation and no
/// in-flight de-duplication. Concurrent fetches for the same key may issue
/// duplicate requests and the last writer wins, which is acceptable because
/// duplicate fetches are expected to return identical payloads.
pub struct CatalogClient<T: HttpGet> {
    transport: RetryingTransport<T>,
    server: String,
    username: String,
    password: String,
    cache: RwLock<HashMap<(ResourceKind, String), Arc<Value>>>,
    clock_offset_secs: AtomicI64,
}

impl CatalogClient<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        let transport = ReqwestTransport::new(config.fetch_timeout_ms, &config.user_agent)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: HttpGet> CatalogClient<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            transport: RetryingTransport::new(
                transport,
                config.max_retries,
                Duration::from_millis(config.retry_base_delay_ms),
            ),
            server: config.provider_server.trim_end_matches('/').to_string(),
            username: config.provider_username.clone(),
            password: config.provider_password.clone(),
            cache: RwLock::new(HashMap::new()),
            clock_offset_secs: AtomicI64::new(0),
        }
    }

    fn action_url(&self, action: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/player_api.php?username={}&password={}",
            self.server,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password)
        );
        if !action.is_empty() {
            url.push_str(&format!("&action={action}"));
        }
        for (name, value) in params {
            url.push_str(&format!("&{name}={}", urlencoding::encode(value)));
        }
        url
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Exchange credentials and derive the server/client clock offset used
    /// for EPG and catchup time math. A response without the expected
    /// user-info shape is an authentication failure, not a retry case.
    pub async fn authenticate(&self) -> Result<AuthSession, CoreError> {
        let value = self.transport.request_json(&self.action_url("", &[])).await?;

        let auth: AuthResponse = serde_json::from_value(value).map_err(|e| {
            CoreError::Authentication(format!("response missing user info: {e}"))
        })?;

        let clock_offset_secs = auth
            .server_info
            .as_ref()
            .and_then(|s| s.timestamp_now)
            .map(|server_now| server_now - Utc::now().timestamp())
            .unwrap_or(0);
        self.clock_offset_secs
            .store(clock_offset_secs, Ordering::Relaxed);

        info!(
            username = %auth.user_info.username,
            status = %auth.user_info.status,
            clock_offset_secs,
            "authenticated against provider"
        );

        Ok(AuthSession {
            user_info: auth.user_info,
            server_info: auth.server_info,
            clock_offset_secs,
        })
    }

    /// `server timestamp − local timestamp`, captured at authentication
    pub fn clock_offset_secs(&self) -> i64 {
        self.clock_offset_secs.load(Ordering::Relaxed)
    }

    // ========================================================================
    // Cached list endpoints
    // ========================================================================

    /// Fetch a list resource through the session cache. A cached value is
    /// served unconditionally for the rest of the session, including
    /// error-free empty results.
    async fn fetch_cached(
        &self,
        kind: ResourceKind,
        action: &str,
        category_id: Option<&str>,
    ) -> Result<Arc<Value>, CoreError> {
        let key = (kind, category_id.unwrap_or(ALL).to_string());

        if let Some(hit) = self.cache.read().await.get(&key) {
            debug!(kind = %kind, category = %key.1, "catalog cache hit");
            return Ok(Arc::clone(hit));
        }

        let mut params = Vec::new();
        if let Some(id) = category_id {
            params.push(("category_id", id.to_string()));
        }
        let value = Arc::new(
            self.transport
                .request_json(&self.action_url(action, &params))
                .await?,
        );

        // last-writer-wins under concurrent duplicate fetches
        self.cache.write().await.insert(key, Arc::clone(&value));
        Ok(value)
    }

    fn decode_list<D: DeserializeOwned>(value: &Value) -> Vec<D> {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            // empty body decodes to null: an error-free empty result
            _ => Vec::new(),
        }
    }

    pub async fn get_live_categories(&self) -> Result<Vec<Category>, CoreError> {
        let value = self
            .fetch_cached(ResourceKind::LiveCategories, "get_live_categories", None)
            .await?;
        Ok(Self::decode_list(&value))
    }

    pub async fn get_vod_categories(&self) -> Result<Vec<Category>, CoreError> {
        let value = self
            .fetch_cached(ResourceKind::VodCategories, "get_vod_categories", None)
            .await?;
        Ok(Self::decode_list(&value))
    }

    pub async fn get_series_categories(&self) -> Result<Vec<Category>, CoreError> {
        let value = self
            .fetch_cached(ResourceKind::SeriesCategories, "get_series_categories", None)
            .await?;
        Ok(Self::decode_list(&value))
    }

    pub async fn get_live_streams(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<LiveStream>, CoreError> {
        let value = self
            .fetch_cached(ResourceKind::LiveStreams, "get_live_streams", category_id)
            .await?;
        Ok(Self::decode_list(&value))
    }

    pub async fn get_vod_streams(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<VodStream>, CoreError> {
        let value = self
            .fetch_cached(ResourceKind::VodStreams, "get_vod_streams", category_id)
            .await?;
        Ok(Self::decode_list(&value))
    }

    pub async fn get_series(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<SeriesItem>, CoreError> {
        let value = self
            .fetch_cached(ResourceKind::Series, "get_series", category_id)
            .await?;
        Ok(Self::decode_list(&value))
    }

    // ========================================================================
    // Uncached detail + EPG endpoints (opaque payloads, read by the caller)
    // ========================================================================

    pub async fn get_series_info(&self, series_id: i64) -> Result<Value, CoreError> {
        self.transport
            .request_json(&self.action_url(
                "get_series_info",
                &[("series_id", series_id.to_string())],
            ))
            .await
    }

    pub async fn get_vod_info(&self, vod_id: i64) -> Result<Value, CoreError> {
        self.transport
            .request_json(&self.action_url("get_vod_info", &[("vod_id", vod_id.to_string())]))
            .await
    }

    pub async fn get_simple_data_table(&self, stream_id: i64) -> Result<Value, CoreError> {
        self.transport
            .request_json(&self.action_url(
                "get_simple_data_table",
                &[("stream_id", stream_id.to_string())],
            ))
            .await
    }

    pub async fn get_short_epg(
        &self,
        stream_id: i64,
        limit: Option<u32>,
    ) -> Result<Value, CoreError> {
        let mut params = vec![("stream_id", stream_id.to_string())];
        if let Some(l) = limit {
            params.push(("limit", l.to_string()));
        }
        self.transport
            .request_json(&self.action_url("get_short_epg", &params))
            .await
    }

    // ========================================================================
    // Bulk preload
    // ========================================================================

    /// Fetch the live/VOD/series catalogs in a fixed order, yielding between
    /// and after each fetch so a single-threaded UI stays responsive.
    ///
    /// Progress is reported as `(step, total, Some(label))` per step and a
    /// final `(0, 0, None)` sentinel on both success and failure; the
    /// returned `Result` is the distinct success/failure signal.
    pub async fn preload(
        &self,
        mut progress: impl FnMut(u32, u32, Option<&str>) + Send,
    ) -> Result<(), CoreError> {
        const STEPS: u32 = 3;

        let result = async {
            progress(1, STEPS, Some("live streams"));
            self.get_live_streams(None).await?;
            tokio::task::yield_now().await;

            progress(2, STEPS, Some("vod streams"));
            self.get_vod_streams(None).await?;
            tokio::task::yield_now().await;

            progress(3, STEPS, Some("series"));
            self.get_series(None).await?;
            tokio::task::yield_now().await;

            Ok(())
        }
        .await;

        if let Err(ref e) = result {
            warn!(error = %e, "catalog preload failed");
        } else {
            info!("catalog preload complete");
        }
        progress(0, 0, None);
        result
    }

    // ========================================================================
    // Playback URL templating
    // ========================================================================

    /// Deterministic playback URL by stream kind, numeric id and extension
    pub fn stream_url(&self, kind: StreamKind, stream_id: i64, extension: &str) -> String {
        let segment = match kind {
            StreamKind::Live => "live",
            StreamKind::Movie => "movie",
            StreamKind::Series => "series",
        };
        format!(
            "{}/{}/{}/{}/{}.{}",
            self.server, segment, self.username, self.password, stream_id, extension
        )
    }

    /// Catchup URL in one of the four mutually exclusive provider formats.
    /// `start` is caller-local time; the clock offset captured at
    /// authentication converts it to server time.
    pub fn catchup_url(
        &self,
        format: CatchupFormat,
        stream_id: i64,
        start: DateTime<Utc>,
        duration_mins: u32,
    ) -> String {
        let server_start = start + ChronoDuration::seconds(self.clock_offset_secs());
        match format {
            CatchupFormat::Standard => format!(
                "{}/streaming/timeshift.php?username={}&password={}&stream={}&start={}&duration={}",
                self.server,
                urlencoding::encode(&self.username),
                urlencoding::encode(&self.password),
                stream_id,
                server_start.format("%Y-%m-%d:%H-%M"),
                duration_mins
            ),
            CatchupFormat::TimeshiftPath => format!(
                "{}/timeshift/{}/{}/{}/{}/{}.ts",
                self.server,
                self.username,
                self.password,
                duration_mins,
                server_start.format("%Y-%m-%d:%H-%M"),
                stream_id
            ),
            CatchupFormat::FlussonicRange => {
                let end = server_start + ChronoDuration::minutes(duration_mins as i64);
                format!(
                    "{}/live/{}/{}/{}.m3u8?utc={}&lutc={}",
                    self.server,
                    self.username,
                    self.password,
                    stream_id,
                    server_start.timestamp(),
                    end.timestamp()
                )
            }
            CatchupFormat::UnixSegment => format!(
                "{}/streaming/{}/{}/{}/{}.ts",
                self.server,
                self.username,
                self.password,
                stream_id,
                server_start.timestamp()
            ),
        }
    }
}
