//! TMDB API v3 client over the retrying transport.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::resolver::MetadataBackend;
use super::types::{
    parse_movie_details, parse_multi_results, parse_search_results, parse_tv_details, SearchHit,
};
use crate::config::Config;
use crate::error::CoreError;
use crate::models::{MetadataSource, ResolvedMetadata};
use crate::services::transport::{HttpGet, ReqwestTransport, RetryingTransport};

const BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct TmdbClient<T: HttpGet> {
    transport: RetryingTransport<T>,
    api_key: String,
    locale: String,
}

impl TmdbClient<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        let transport = ReqwestTransport::new(config.fetch_timeout_ms, &config.user_agent)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: HttpGet> TmdbClient<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            transport: RetryingTransport::new(
                transport,
                config.max_retries,
                Duration::from_millis(config.retry_base_delay_ms),
            ),
            api_key: config.tmdb_api_key.clone(),
            locale: config.metadata_locale.clone(),
        }
    }

    fn url(&self, path: &str, locale: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{BASE_URL}{path}?api_key={}&language={}",
            urlencoding::encode(&self.api_key),
            urlencoding::encode(locale)
        );
        for (name, value) in params {
            url.push_str(&format!("&{name}={}", urlencoding::encode(value)));
        }
        url
    }

    async fn get_json(
        &self,
        path: &str,
        locale: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, CoreError> {
        let url = self.url(path, locale, params);
        debug!(path, "tmdb request");
        self.transport.request_json(&url).await
    }

    /// Person record, used by callers rendering cast pages
    pub async fn person_details(&self, person_id: u64) -> Result<Value, CoreError> {
        self.get_json(&format!("/person/{person_id}"), &self.locale, &[])
            .await
    }
}

#[async_trait]
impl<T: HttpGet> MetadataBackend for TmdbClient<T> {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<SearchHit>, CoreError> {
        let data = self
            .get_json(
                &format!("/find/{external_id}"),
                &self.locale,
                &[("external_source", "imdb_id")],
            )
            .await?;

        let movie = parse_search_results(
            &serde_json::json!({ "results": data["movie_results"] }),
            MetadataSource::Movie,
        );
        if let Some(hit) = movie.into_iter().next() {
            return Ok(Some(hit));
        }

        let tv = parse_search_results(
            &serde_json::json!({ "results": data["tv_results"] }),
            MetadataSource::Tv,
        );
        Ok(tv.into_iter().next())
    }

    async fn search_movie(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchHit>, CoreError> {
        let mut params = vec![("query", title)];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("year", y));
        }
        let data = self.get_json("/search/movie", &self.locale, &params).await?;
        Ok(parse_search_results(&data, MetadataSource::Movie))
    }

    async fn search_tv(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchHit>, CoreError> {
        let mut params = vec![("query", title)];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("first_air_date_year", y));
        }
        let data = self.get_json("/search/tv", &self.locale, &params).await?;
        Ok(parse_search_results(&data, MetadataSource::Tv))
    }

    async fn search_multi(&self, title: &str) -> Result<Vec<SearchHit>, CoreError> {
        let data = self
            .get_json("/search/multi", &self.locale, &[("query", title)])
            .await?;
        Ok(parse_multi_results(&data))
    }

    async fn movie_details(&self, id: u64, locale: &str) -> Result<ResolvedMetadata, CoreError> {
        let data = self
            .get_json(
                &format!("/movie/{id}"),
                locale,
                &[("append_to_response", "credits")],
            )
            .await?;
        Ok(parse_movie_details(&data))
    }

    async fn tv_details(&self, id: u64, locale: &str) -> Result<ResolvedMetadata, CoreError> {
        let data = self
            .get_json(
                &format!("/tv/{id}"),
                locale,
                &[("append_to_response", "credits")],
            )
            .await?;
        Ok(parse_tv_details(&data))
    }
}
