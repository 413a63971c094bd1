use serde::{Deserialize, Serialize};

/// Taxonomy bucket assigned to a provider category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLabel {
    Sport,
    Manga,
    Entertainment(EntertainmentKind),
    Unclassified,
}

impl Default for CategoryLabel {
    fn default() -> Self {
        Self::Unclassified
    }
}

impl std::fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryLabel::Sport => write!(f, "sport"),
            CategoryLabel::Manga => write!(f, "manga"),
            CategoryLabel::Entertainment(kind) => write!(f, "entertainment:{}", kind),
            CategoryLabel::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Entertainment subtypes, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntertainmentKind {
    Concerts,
    Theatre,
    Spectacles,
    Blindtest,
    Karaoke,
}

impl std::fmt::Display for EntertainmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntertainmentKind::Concerts => write!(f, "concerts"),
            EntertainmentKind::Theatre => write!(f, "theatre"),
            EntertainmentKind::Spectacles => write!(f, "spectacles"),
            EntertainmentKind::Blindtest => write!(f, "blindtest"),
            EntertainmentKind::Karaoke => write!(f, "karaoke"),
        }
    }
}

/// Cleaned title plus the structured hints stripped out of it.
/// Created fresh per input, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTitle {
    pub canonical_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<u16>,
}

/// Which catalog the resolved record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Movie,
    Tv,
}

/// Canonical record produced by a successful metadata resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetadata {
    pub source: MetadataSource,
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    /// Director for movies, creator for TV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credited_author: Option<String>,
}

/// List resource kinds used as cache key components. Detail and EPG
/// endpoints are never cached, so they have no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    LiveCategories,
    LiveStreams,
    VodCategories,
    VodStreams,
    SeriesCategories,
    Series,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::LiveCategories => write!(f, "live_categories"),
            ResourceKind::LiveStreams => write!(f, "live_streams"),
            ResourceKind::VodCategories => write!(f, "vod_categories"),
            ResourceKind::VodStreams => write!(f, "vod_streams"),
            ResourceKind::SeriesCategories => write!(f, "series_categories"),
            ResourceKind::Series => write!(f, "series"),
        }
    }
}
