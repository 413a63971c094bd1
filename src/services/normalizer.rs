//! Title cleanup: strips provider noise tokens and extracts structured hints.

use lazy_static::lazy_static;
use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::models::NormalizedTitle;
use crate::services::patterns::{keys, keyword_alternation, PatternRegistry, CLEANUP_TABLE};

lazy_static! {
    // "<CODE> | " provider routing tag: 2-10 alphanumerics, optional suffix,
    // pipe separator. Never part of the title.
    static ref CATEGORY_PREFIX: Regex =
        Regex::new(r"^[A-Za-z0-9]{2,10}\S*\s*\|\s*").unwrap();

    static ref YEAR_PAREN: Regex = Regex::new(r"[\(\[]((?:19|20)\d{2})[\)\]]").unwrap();
    static ref YEAR_TRAILING: Regex = Regex::new(r"[\s\-]((?:19|20)\d{2})\s*$").unwrap();

    static ref MULTI_SPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref EDGE_SEPARATORS: Regex = Regex::new(r"^[\s\-\|:]+|[\s\-\|:]+$").unwrap();
}

/// Normalizes raw stream/series titles. Matchers are compiled once from the
/// multilingual cleanup vocabulary; results are memoized (normalization is
/// pure, so a repeated catalog title costs one lookup).
pub struct TitleNormalizer {
    season_marker: Option<Regex>,
    part_marker: Option<Regex>,
    lang_tags: Option<Regex>,
    series_words: Option<Regex>,
    quality_tags: Option<Regex>,
    cache: Mutex<LruCache<String, NormalizedTitle>>,
}

impl TitleNormalizer {
    pub fn new(registry: &PatternRegistry) -> Self {
        Self {
            season_marker: marker_with_number(keys::SEASON),
            part_marker: marker_with_number(keys::PART),
            lang_tags: registry.matcher(keys::LANG_TAGS).cloned(),
            series_words: registry.matcher(keys::SERIES).cloned(),
            quality_tags: registry.matcher(keys::QUALITY).cloned(),
            cache: Mutex::new(LruCache::new(NonZeroUsize::new(10_000).unwrap())),
        }
    }

    /// Fixed-order pipeline; each stage operates on the previous stage's
    /// output and never re-scans after removal. Never fails: an unmatched or
    /// empty title degrades, it does not raise.
    pub fn normalize(&self, raw_title: &str) -> NormalizedTitle {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(raw_title) {
                return hit.clone();
            }
        }

        let result = self.normalize_uncached(raw_title);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(raw_title.to_string(), result.clone());
        }
        result
    }

    fn normalize_uncached(&self, raw_title: &str) -> NormalizedTitle {
        // 1. leading category-prefix tag
        let mut working = CATEGORY_PREFIX.replace(raw_title, "").into_owned();

        // 2. year: parenthesized first, trailing token second
        let mut year: Option<u16> = None;
        if let Some(caps) = YEAR_PAREN.captures(&working) {
            year = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let span = caps.get(0).map(|m| (m.start(), m.end()));
            if let Some((start, end)) = span {
                working.replace_range(start..end, "");
            }
        } else if let Some(caps) = YEAR_TRAILING.captures(&working) {
            year = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let span = caps.get(0).map(|m| (m.start(), m.end()));
            if let Some((start, end)) = span {
                working.replace_range(start..end, "");
            }
        }

        // 3. season/part markers: first number wins, every marker is removed
        let mut season: Option<u16> = None;
        if let Some(re) = &self.season_marker {
            if let Some(caps) = re.captures(&working) {
                season = caps.get(1).and_then(|m| m.as_str().parse().ok());
            }
            working = re.replace_all(&working, "").into_owned();
        }
        let mut part: Option<u16> = None;
        if let Some(re) = &self.part_marker {
            if let Some(caps) = re.captures(&working) {
                part = caps.get(1).and_then(|m| m.as_str().parse().ok());
            }
            working = re.replace_all(&working, "").into_owned();
        }

        // 4. language/version, bare series words and quality tags carry no
        //    structured value, only removed
        for re in [&self.lang_tags, &self.series_words, &self.quality_tags]
            .into_iter()
            .flatten()
        {
            working = re.replace_all(&working, "").into_owned();
        }

        // 5. whitespace and separator cleanup
        let mut canonical = collapse(&working);

        // never return an empty title for a non-empty input
        if canonical.is_empty() {
            canonical = MULTI_SPACES.replace_all(raw_title.trim(), " ").into_owned();
        }

        NormalizedTitle {
            canonical_title: canonical,
            year,
            season,
            part,
        }
    }
}

/// `<word> <number>` marker matcher for one cleanup key, e.g.
/// "Saison 2", "Season 10", "Parte 3".
fn marker_with_number(key: &str) -> Option<Regex> {
    let alternation = keyword_alternation(CLEANUP_TABLE, key)?;
    Regex::new(&format!(r"(?i)\b(?:{})\s*\.?\s*(\d{{1,3}})\b", alternation)).ok()
}

fn collapse(s: &str) -> String {
    let s = MULTI_SPACES.replace_all(s, " ");
    EDGE_SEPARATORS.replace_all(&s, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TitleNormalizer {
        TitleNormalizer::new(&PatternRegistry::new())
    }

    #[test]
    fn extracts_parenthesized_year() {
        let n = normalizer().normalize("Action Movie (2021)");
        assert_eq!(n.canonical_title, "Action Movie");
        assert_eq!(n.year, Some(2021));
    }

    #[test]
    fn extracts_trailing_year() {
        let n = normalizer().normalize("Old Classic -1967");
        assert_eq!(n.canonical_title, "Old Classic");
        assert_eq!(n.year, Some(1967));

        let n = normalizer().normalize("Space Drama 2099");
        assert_eq!(n.year, Some(2099));
        // outside the 1900-2099 window the token is not a year
        let n = normalizer().normalize("Blade Runner 2149");
        assert_eq!(n.year, None);
    }

    #[test]
    fn strips_french_season_marker() {
        let n = normalizer().normalize("Show - Saison 2");
        assert_eq!(n.season, Some(2));
        assert_eq!(n.canonical_title, "Show");
    }

    #[test]
    fn first_season_and_part_numbers_win() {
        let n = normalizer().normalize("Saga Season 1 Part 2 Part 3");
        assert_eq!(n.season, Some(1));
        assert_eq!(n.part, Some(2));
        assert_eq!(n.canonical_title, "Saga");
    }

    #[test]
    fn strips_category_prefix_tag() {
        let n = normalizer().normalize("FR | Les Visiteurs (1993)");
        assert_eq!(n.canonical_title, "Les Visiteurs");
        assert_eq!(n.year, Some(1993));
    }

    #[test]
    fn strips_language_and_quality_tags() {
        let n = normalizer().normalize("Dark Waters VOSTFR 1080p WEB-DL");
        assert_eq!(n.canonical_title, "Dark Waters");
        let n = normalizer().normalize("El Reino Temporada 3 Latino HD");
        assert_eq!(n.season, Some(3));
        assert_eq!(n.canonical_title, "El Reino");
    }

    #[test]
    fn empty_input_is_total() {
        let n = normalizer().normalize("");
        assert_eq!(n.canonical_title, "");
        assert_eq!(n.year, None);
        assert_eq!(n.season, None);
        assert_eq!(n.part, None);
    }

    #[test]
    fn all_noise_falls_back_to_collapsed_raw() {
        // a title that is nothing but noise must not come back empty
        let n = normalizer().normalize("VOSTFR  1080p");
        assert_eq!(n.canonical_title, "VOSTFR 1080p");
    }

    #[test]
    fn normalization_is_idempotent() {
        let n = normalizer();
        for raw in [
            "FR | Les Visiteurs (1993) VF 1080p",
            "Show - Saison 2 VOSTFR",
            "Saga Part 2 Multi 720p",
        ] {
            let once = n.normalize(raw);
            let twice = n.normalize(&once.canonical_title);
            assert_eq!(once.canonical_title, twice.canonical_title, "raw: {raw}");
        }
    }

    #[test]
    fn repeated_calls_hit_the_memo() {
        let n = normalizer();
        let a = n.normalize("Show - Saison 2");
        let b = n.normalize("Show - Saison 2");
        assert_eq!(a, b);
    }
}
