//! Search-result and detail-record extraction from TMDB v3 payloads.

use serde_json::Value;

use crate::models::{MetadataSource, ResolvedMetadata};

/// One row of a search response, before detail enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: u64,
    pub kind: MetadataSource,
    pub title: String,
    pub year: Option<u16>,
}

/// Rows of `results`, typed by the endpoint that produced them
pub fn parse_search_results(data: &Value, kind: MetadataSource) -> Vec<SearchHit> {
    let results = data["results"].as_array().cloned().unwrap_or_default();
    results
        .iter()
        .filter_map(|r| parse_hit(r, Some(kind)))
        .collect()
}

/// Rows of a multi-search response; each row reports its own kind and
/// non-movie/tv rows (people) are dropped.
pub fn parse_multi_results(data: &Value) -> Vec<SearchHit> {
    let results = data["results"].as_array().cloned().unwrap_or_default();
    results.iter().filter_map(|r| parse_hit(r, None)).collect()
}

fn parse_hit(r: &Value, forced_kind: Option<MetadataSource>) -> Option<SearchHit> {
    let kind = match forced_kind {
        Some(k) => k,
        None => match r["media_type"].as_str() {
            Some("movie") => MetadataSource::Movie,
            Some("tv") => MetadataSource::Tv,
            _ => return None,
        },
    };
    let (title_field, date_field) = match kind {
        MetadataSource::Movie => ("title", "release_date"),
        MetadataSource::Tv => ("name", "first_air_date"),
    };
    Some(SearchHit {
        id: r["id"].as_u64()?,
        kind,
        title: r[title_field].as_str().unwrap_or("Unknown").to_string(),
        year: r[date_field]
            .as_str()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok()),
    })
}

pub fn parse_movie_details(data: &Value) -> ResolvedMetadata {
    ResolvedMetadata {
        source: MetadataSource::Movie,
        id: data["id"].as_u64().unwrap_or(0),
        title: data["title"].as_str().unwrap_or("Unknown").to_string(),
        year: data["release_date"]
            .as_str()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok()),
        overview: non_empty(data["overview"].as_str()),
        genres: names(&data["genres"]),
        cast: cast_names(data.get("credits")),
        credited_author: director(data.get("credits")),
    }
}

pub fn parse_tv_details(data: &Value) -> ResolvedMetadata {
    ResolvedMetadata {
        source: MetadataSource::Tv,
        id: data["id"].as_u64().unwrap_or(0),
        title: data["name"].as_str().unwrap_or("Unknown").to_string(),
        year: data["first_air_date"]
            .as_str()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok()),
        overview: non_empty(data["overview"].as_str()),
        genres: names(&data["genres"]),
        cast: cast_names(data.get("credits")),
        credited_author: data["created_by"]
            .as_array()
            .and_then(|a| a.first())
            .and_then(|c| c["name"].as_str())
            .map(|s| s.to_string()),
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty()).map(|s| s.to_string())
}

fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|g| g["name"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn cast_names(credits: Option<&Value>) -> Vec<String> {
    credits
        .and_then(|c| c["cast"].as_array())
        .map(|cast| {
            cast.iter()
                .take(10)
                .filter_map(|p| p["name"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn director(credits: Option<&Value>) -> Option<String> {
    credits
        .and_then(|c| c["crew"].as_array())
        .and_then(|crew| {
            crew.iter()
                .find(|p| p["job"].as_str() == Some("Director"))
                .and_then(|p| p["name"].as_str())
                .map(|s| s.to_string())
        })
}
