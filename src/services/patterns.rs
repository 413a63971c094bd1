//! Locale-aware keyword tables and their compiled matchers.
//!
//! Keyword lists are static configuration: every locale contributes its own
//! vocabulary per key, and one merged case-insensitive matcher is compiled
//! per key at startup. Provider category names mix source-country vocabulary
//! unpredictably, so matching never dispatches on the item's own locale.

use regex::Regex;
use std::collections::HashMap;

/// (locale, [(key, keywords)]) — locale iteration order is fixed and
/// meaningful: flattening keeps the first occurrence of each keyword.
pub type KeywordTable = &'static [(&'static str, &'static [(&'static str, &'static [&'static str])])];

/// Taxonomy and cleanup key names
pub mod keys {
    pub const SPORT: &str = "sport";
    pub const MANGA: &str = "manga";
    pub const ENT_CONCERTS: &str = "entertainment.concerts";
    pub const ENT_THEATRE: &str = "entertainment.theatre";
    pub const ENT_SPECTACLES: &str = "entertainment.spectacles";
    pub const ENT_BLINDTEST: &str = "entertainment.blindtest";
    pub const ENT_KARAOKE: &str = "entertainment.karaoke";

    pub const LANG_TAGS: &str = "langTags";
    pub const SEASON: &str = "season";
    pub const PART: &str = "part";
    pub const SERIES: &str = "series";
    pub const QUALITY: &str = "quality";
}

/// Category taxonomy vocabulary, per locale
pub static TAXONOMY_TABLE: KeywordTable = &[
    ("en", &[
        (keys::SPORT, &["sport", "sports", "football", "soccer", "boxing", "wrestling", "ufc", "nba", "nfl", "moto gp", "formula 1"]),
        (keys::MANGA, &["manga", "anime"]),
        (keys::ENT_CONCERTS, &["concert", "concerts", "live music"]),
        (keys::ENT_THEATRE, &["theatre", "theater"]),
        (keys::ENT_SPECTACLES, &["stand up", "stand-up", "comedy show"]),
        (keys::ENT_BLINDTEST, &["blind test", "blindtest", "music quiz"]),
        (keys::ENT_KARAOKE, &["karaoke"]),
    ]),
    ("fr", &[
        (keys::SPORT, &["sport", "foot", "rugby", "ligue 1"]),
        (keys::MANGA, &["manga", "mangas", "animes"]),
        (keys::ENT_CONCERTS, &["concert", "concerts"]),
        (keys::ENT_THEATRE, &["théâtre", "theatre"]),
        (keys::ENT_SPECTACLES, &["spectacle", "spectacles", "humour", "one man show"]),
        (keys::ENT_BLINDTEST, &["blind test", "quiz musical"]),
        (keys::ENT_KARAOKE, &["karaoké", "karaoke"]),
    ]),
    ("de", &[
        (keys::SPORT, &["sport", "fussball", "bundesliga"]),
        (keys::MANGA, &["anime"]),
        (keys::ENT_CONCERTS, &["konzert", "konzerte"]),
        (keys::ENT_THEATRE, &["theater"]),
        (keys::ENT_SPECTACLES, &["kabarett"]),
        (keys::ENT_KARAOKE, &["karaoke"]),
    ]),
    ("es", &[
        (keys::SPORT, &["deporte", "deportes", "futbol", "fútbol", "la liga"]),
        (keys::MANGA, &["anime", "manga"]),
        (keys::ENT_CONCERTS, &["concierto", "conciertos"]),
        (keys::ENT_THEATRE, &["teatro"]),
        (keys::ENT_SPECTACLES, &["espectaculo", "espectáculo"]),
        (keys::ENT_KARAOKE, &["karaoke"]),
    ]),
    ("it", &[
        (keys::SPORT, &["sport", "calcio"]),
        (keys::MANGA, &["anime"]),
        (keys::ENT_CONCERTS, &["concerto", "concerti"]),
        (keys::ENT_THEATRE, &["teatro"]),
        (keys::ENT_SPECTACLES, &["spettacolo"]),
        (keys::ENT_KARAOKE, &["karaoke"]),
    ]),
    ("pt", &[
        (keys::SPORT, &["esporte", "esportes", "futebol"]),
        (keys::MANGA, &["animes", "desenhos"]),
        (keys::ENT_CONCERTS, &["show musical"]),
        (keys::ENT_THEATRE, &["teatro"]),
        (keys::ENT_SPECTACLES, &["espetaculo"]),
        (keys::ENT_KARAOKE, &["karaoke"]),
    ]),
    ("ar", &[
        (keys::SPORT, &["رياضة"]),
        (keys::MANGA, &["انمي"]),
    ]),
    ("tr", &[
        (keys::SPORT, &["spor"]),
        (keys::MANGA, &["anime"]),
        (keys::ENT_CONCERTS, &["konser"]),
        (keys::ENT_THEATRE, &["tiyatro"]),
        (keys::ENT_KARAOKE, &["karaoke"]),
    ]),
];

/// Title-cleanup vocabulary, per locale
pub static CLEANUP_TABLE: KeywordTable = &[
    ("en", &[
        (keys::LANG_TAGS, &["english", "eng", "dubbed", "subbed", "multi", "dual audio"]),
        (keys::SEASON, &["season"]),
        (keys::PART, &["part"]),
        (keys::SERIES, &["series"]),
    ]),
    ("fr", &[
        (keys::LANG_TAGS, &["vf", "vostfr", "vfq", "vff", "truefrench", "french"]),
        (keys::SEASON, &["saison"]),
        (keys::PART, &["partie"]),
        (keys::SERIES, &["série", "serie"]),
    ]),
    ("de", &[
        (keys::LANG_TAGS, &["german", "ger", "deutsch"]),
        (keys::SEASON, &["staffel"]),
        (keys::PART, &["teil"]),
        (keys::SERIES, &["serie"]),
    ]),
    ("es", &[
        (keys::LANG_TAGS, &["castellano", "latino", "spanish"]),
        (keys::SEASON, &["temporada"]),
        (keys::PART, &["parte"]),
        (keys::SERIES, &["serie"]),
    ]),
    ("it", &[
        (keys::LANG_TAGS, &["italian", "ita"]),
        (keys::SEASON, &["stagione"]),
        (keys::PART, &["parte"]),
        (keys::SERIES, &["serie"]),
    ]),
    ("pt", &[
        (keys::LANG_TAGS, &["dublado", "legendado", "nacional"]),
        (keys::SEASON, &["temporada"]),
        (keys::PART, &["parte"]),
        (keys::SERIES, &["série"]),
    ]),
    ("ar", &[
        (keys::LANG_TAGS, &["arabic"]),
        (keys::SEASON, &["موسم"]),
        (keys::PART, &["جزء"]),
    ]),
    ("tr", &[
        (keys::LANG_TAGS, &["turkish"]),
        (keys::SEASON, &["sezon"]),
        (keys::PART, &["kisim"]),
        (keys::SERIES, &["dizi"]),
    ]),
];

/// Quality/resolution/source tags. Not locale-specific; stripped whole-word.
pub static QUALITY_TAGS: &[&str] = &[
    "4k", "uhd", "fhd", "hd", "sd", "2160p", "1080p", "720p", "480p", "360p",
    "hevc", "x264", "x265", "h264", "h265", "web-dl", "webdl", "webrip",
    "bluray", "bdrip", "dvdrip", "hdrip", "hdtv", "hdcam", "hdts", "cam",
    "mkv", "mp4", "avi",
];

/// Keys whose matchers are anchored on word boundaries. Other taxonomy keys
/// match as plain substrings so phrases like "moto gp" hit inside longer
/// category names; "manga"/"anime" are anchored because they occur inside
/// unrelated words.
const WHOLE_WORD_KEYS: &[&str] = &[
    keys::MANGA,
    keys::LANG_TAGS,
    keys::SEASON,
    keys::PART,
    keys::SERIES,
    keys::QUALITY,
];

/// Flatten one key across every locale, de-duplicated by exact string
/// equality, first occurrence wins. Casing is preserved per locale for human
/// inspection; the compiled matchers are case-insensitive anyway.
pub fn flatten_unique(table: KeywordTable, key: &str) -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for (_locale, entries) in table {
        for (k, words) in *entries {
            if *k == key {
                for w in *words {
                    if !seen.contains(w) {
                        seen.push(w);
                    }
                }
            }
        }
    }
    seen
}

/// Escaped `a|b|c` alternation over the merged keyword alphabet for a key.
/// `None` when no locale defines the key.
pub fn keyword_alternation(table: KeywordTable, key: &str) -> Option<String> {
    let words = flatten_unique(table, key);
    if words.is_empty() {
        return None;
    }
    Some(
        words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

/// Compiled matchers for every taxonomy and cleanup key
pub struct PatternRegistry {
    matchers: HashMap<&'static str, Regex>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        let mut matchers = HashMap::new();

        let taxonomy_keys = [
            keys::SPORT,
            keys::MANGA,
            keys::ENT_CONCERTS,
            keys::ENT_THEATRE,
            keys::ENT_SPECTACLES,
            keys::ENT_BLINDTEST,
            keys::ENT_KARAOKE,
        ];
        for key in taxonomy_keys {
            if let Some(re) = Self::build(TAXONOMY_TABLE, key) {
                matchers.insert(key, re);
            }
        }

        let cleanup_keys = [keys::LANG_TAGS, keys::SEASON, keys::PART, keys::SERIES];
        for key in cleanup_keys {
            if let Some(re) = Self::build(CLEANUP_TABLE, key) {
                matchers.insert(key, re);
            }
        }

        // Quality tags come from a flat alphabet rather than a locale table
        let quality_alt = QUALITY_TAGS
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        if let Ok(re) = Regex::new(&format!(r"(?i)\b(?:{})\b", quality_alt)) {
            matchers.insert(keys::QUALITY, re);
        }

        Self { matchers }
    }

    /// Compile the merged matcher for one key. Missing key → `None`;
    /// callers treat absence as "no match possible".
    pub fn build(table: KeywordTable, key: &'static str) -> Option<Regex> {
        let alternation = keyword_alternation(table, key)?;
        let pattern = if WHOLE_WORD_KEYS.contains(&key) {
            format!(r"(?i)\b(?:{})\b", alternation)
        } else {
            format!(r"(?i)(?:{})", alternation)
        };
        // Alternations are built from escaped literals only
        Regex::new(&pattern).ok()
    }

    pub fn matcher(&self, key: &str) -> Option<&Regex> {
        self.matchers.get(key)
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_keeps_first_occurrence_order() {
        let words = flatten_unique(TAXONOMY_TABLE, keys::SPORT);
        // "sport" appears in en, fr, de, it: kept once, at its en position
        assert_eq!(words.iter().filter(|w| **w == "sport").count(), 1);
        assert_eq!(words[0], "sport");
        // later locales still contribute their own vocabulary
        assert!(words.contains(&"esporte"));
        assert!(words.contains(&"رياضة"));
    }

    #[test]
    fn dedup_is_case_sensitive() {
        // exact equality only: "Série" and "série" would both survive,
        // matching stays case-insensitive regardless
        let words = flatten_unique(CLEANUP_TABLE, keys::SERIES);
        assert!(words.contains(&"série"));
        assert!(words.contains(&"serie"));
    }

    #[test]
    fn missing_key_builds_no_matcher() {
        assert!(PatternRegistry::build(TAXONOMY_TABLE, "nonexistent").is_none());
        let registry = PatternRegistry::new();
        assert!(registry.matcher("nonexistent").is_none());
    }

    #[test]
    fn taxonomy_matchers_hit_inside_longer_names() {
        let registry = PatternRegistry::new();
        let sport = registry.matcher(keys::SPORT).unwrap();
        assert!(sport.is_match("FR | MOTO GP 2024"));
        assert!(sport.is_match("canales de deportes"));
    }

    #[test]
    fn whole_word_keys_do_not_match_substrings() {
        let registry = PatternRegistry::new();
        let season = registry.matcher(keys::SEASON).unwrap();
        assert!(season.is_match("Show Saison 2"));
        assert!(!season.is_match("Seasonal Cooking")); // "season" inside a word
        let lang = registry.matcher(keys::LANG_TAGS).unwrap();
        assert!(lang.is_match("Film VF"));
        assert!(!lang.is_match("vfx artists"));
    }

    #[test]
    fn every_keyword_matches_itself() {
        let registry = PatternRegistry::new();
        for key in [
            keys::SPORT,
            keys::MANGA,
            keys::ENT_CONCERTS,
            keys::ENT_THEATRE,
            keys::ENT_SPECTACLES,
            keys::ENT_BLINDTEST,
            keys::ENT_KARAOKE,
        ] {
            let matcher = registry.matcher(key).unwrap();
            for word in flatten_unique(TAXONOMY_TABLE, key) {
                assert!(matcher.is_match(word), "{key} matcher missed '{word}'");
            }
        }
    }
}
