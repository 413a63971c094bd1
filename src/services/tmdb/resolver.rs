//! Tiered metadata resolution: an ordered fallback chain of lookups, each
//! with its own with/without-year retry and locale-fallback rules.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::types::SearchHit;
use crate::config::Config;
use crate::error::CoreError;
use crate::models::{MetadataSource, ResolvedMetadata};

/// Lookup operations the resolver drives. Implemented by `TmdbClient`;
/// scripted in tests.
#[async_trait]
pub trait MetadataBackend: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str)
        -> Result<Option<SearchHit>, CoreError>;
    async fn search_movie(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchHit>, CoreError>;
    async fn search_tv(&self, title: &str, year: Option<u16>)
        -> Result<Vec<SearchHit>, CoreError>;
    async fn search_multi(&self, title: &str) -> Result<Vec<SearchHit>, CoreError>;
    async fn movie_details(&self, id: u64, locale: &str) -> Result<ResolvedMetadata, CoreError>;
    async fn tv_details(&self, id: u64, locale: &str) -> Result<ResolvedMetadata, CoreError>;
}

/// One step of the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    ByExternalId,
    MovieWithYear,
    MovieNoYear,
    TvWithYear,
    TvNoYear,
    Multi,
    MultiShortened,
}

/// The chain, in order. Kept as data rather than nested conditionals so the
/// walk is inspectable and each tier runs at most once per pass.
pub const TIER_ORDER: &[Tier] = &[
    Tier::ByExternalId,
    Tier::MovieWithYear,
    Tier::MovieNoYear,
    Tier::TvWithYear,
    Tier::TvNoYear,
    Tier::Multi,
    Tier::MultiShortened,
];

/// What a caller wants resolved
#[derive(Debug, Clone)]
pub struct ResolveRequest<'a> {
    pub title: &'a str,
    pub year: Option<u16>,
    /// IMDb-style external id, when the provider exposed one
    pub external_id: Option<&'a str>,
    /// TV-only callers skip the multi-search tier (and with it the
    /// shortened-title restart)
    pub skip_multi: bool,
}

enum ChainOutcome {
    Resolved(ResolvedMetadata),
    RestartWith(String),
    Exhausted,
}

/// Drives the tier chain over a backend. At most one detail record is
/// returned per resolution call; every tier runs at most once except for the
/// single shortened-title restart.
pub struct MetadataResolver<'a, B: MetadataBackend> {
    backend: &'a B,
    locale: String,
    fallback_locale: String,
}

impl<'a, B: MetadataBackend> MetadataResolver<'a, B> {
    pub fn new(backend: &'a B, config: &Config) -> Self {
        Self {
            backend,
            locale: config.metadata_locale.clone(),
            fallback_locale: config.metadata_fallback_locale.clone(),
        }
    }

    pub async fn resolve(
        &self,
        request: &ResolveRequest<'_>,
    ) -> Result<ResolvedMetadata, CoreError> {
        let mut title = request.title.to_string();
        let mut restarted = false;

        loop {
            match self.run_tiers(&title, request, restarted).await? {
                ChainOutcome::Resolved(meta) => return Ok(meta),
                ChainOutcome::RestartWith(shortened) if !restarted => {
                    debug!(original = %request.title, shortened = %shortened, "restarting chain with shortened title");
                    title = shortened;
                    restarted = true;
                }
                _ => return Err(CoreError::NoMatchFound(request.title.to_string())),
            }
        }
    }

    async fn run_tiers(
        &self,
        title: &str,
        request: &ResolveRequest<'_>,
        restarted: bool,
    ) -> Result<ChainOutcome, CoreError> {
        for tier in TIER_ORDER {
            match tier {
                Tier::ByExternalId => {
                    // a restart resumes from SearchMovie
                    if restarted {
                        continue;
                    }
                    let Some(external_id) = request.external_id else {
                        continue;
                    };
                    if let Some(hit) = self.backend.find_by_external_id(external_id).await? {
                        return Ok(ChainOutcome::Resolved(self.enrich(&hit).await?));
                    }
                }
                Tier::MovieWithYear => {
                    let Some(year) = request.year else { continue };
                    let hits = self.backend.search_movie(title, Some(year)).await?;
                    if let Some(hit) = hits.first() {
                        return Ok(ChainOutcome::Resolved(self.enrich(hit).await?));
                    }
                }
                Tier::MovieNoYear => {
                    let hits = self.backend.search_movie(title, None).await?;
                    if let Some(hit) = hits.first() {
                        return Ok(ChainOutcome::Resolved(self.enrich(hit).await?));
                    }
                }
                Tier::TvWithYear => {
                    let Some(year) = request.year else { continue };
                    let hits = self.backend.search_tv(title, Some(year)).await?;
                    if let Some(hit) = hits.first() {
                        return Ok(ChainOutcome::Resolved(self.enrich(hit).await?));
                    }
                }
                Tier::TvNoYear => {
                    let hits = self.backend.search_tv(title, None).await?;
                    if let Some(hit) = hits.first() {
                        return Ok(ChainOutcome::Resolved(self.enrich(hit).await?));
                    }
                }
                Tier::Multi => {
                    if request.skip_multi {
                        continue;
                    }
                    let hits = self.backend.search_multi(title).await?;
                    // a multi hit reports its own kind and dispatches the
                    // matching detail fetch
                    if let Some(hit) = hits.first() {
                        return Ok(ChainOutcome::Resolved(self.enrich(hit).await?));
                    }
                }
                Tier::MultiShortened => {
                    if request.skip_multi || restarted {
                        continue;
                    }
                    let shortened = shorten_title(title);
                    if shortened != title && !shortened.is_empty() {
                        return Ok(ChainOutcome::RestartWith(shortened));
                    }
                }
            }
        }
        Ok(ChainOutcome::Exhausted)
    }

    /// Detail fetch in the primary locale, with a fallback-locale synopsis
    /// splice when the primary record has none. Only the synopsis comes from
    /// the fallback response; identifiers stay primary-locale.
    async fn enrich(&self, hit: &SearchHit) -> Result<ResolvedMetadata, CoreError> {
        let primary = self.details(hit.kind, hit.id, &self.locale).await?;
        if primary.overview.is_some() {
            return Ok(primary);
        }

        match self.details(hit.kind, hit.id, &self.fallback_locale).await {
            Ok(fallback) => Ok(ResolvedMetadata {
                overview: fallback.overview,
                ..primary
            }),
            Err(e) => {
                debug!(error = %e, id = hit.id, "fallback-locale detail fetch failed, keeping primary record");
                Ok(primary)
            }
        }
    }

    async fn details(
        &self,
        kind: MetadataSource,
        id: u64,
        locale: &str,
    ) -> Result<ResolvedMetadata, CoreError> {
        match kind {
            MetadataSource::Movie => self.backend.movie_details(id, locale).await,
            MetadataSource::Tv => self.backend.tv_details(id, locale).await,
        }
    }
}

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\s*\([^)]*\)").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Shortened form used for the single chain restart: parenthetical asides
/// removed, trailing " - " suffix dropped.
fn shorten_title(title: &str) -> String {
    let no_parens = PARENTHETICAL.replace_all(title, "");
    let cut = match no_parens.rfind(" - ") {
        Some(idx) => &no_parens[..idx],
        None => no_parens.as_ref(),
    };
    SPACES.replace_all(cut, " ").trim().to_string()
}
