//! Category classification over the merged multi-locale matchers.

use crate::models::{CategoryLabel, EntertainmentKind};
use crate::services::patterns::{keys, PatternRegistry};

/// Taxonomy keys in evaluation order. First matcher hit wins; no scoring,
/// no multi-label output.
const PRIORITY: &[(&str, CategoryLabel)] = &[
    (keys::SPORT, CategoryLabel::Sport),
    (keys::MANGA, CategoryLabel::Manga),
    (keys::ENT_CONCERTS, CategoryLabel::Entertainment(EntertainmentKind::Concerts)),
    (keys::ENT_THEATRE, CategoryLabel::Entertainment(EntertainmentKind::Theatre)),
    (keys::ENT_SPECTACLES, CategoryLabel::Entertainment(EntertainmentKind::Spectacles)),
    (keys::ENT_BLINDTEST, CategoryLabel::Entertainment(EntertainmentKind::Blindtest)),
    (keys::ENT_KARAOKE, CategoryLabel::Entertainment(EntertainmentKind::Karaoke)),
];

/// Tags a provider category name with a taxonomy label.
///
/// Matchers are locale-merged at build time, so one global matcher is used
/// per key regardless of the item's own locale.
pub struct CategoryClassifier<'a> {
    registry: &'a PatternRegistry,
}

impl<'a> CategoryClassifier<'a> {
    pub fn new(registry: &'a PatternRegistry) -> Self {
        Self { registry }
    }

    /// Classification is idempotent and stateless; it never fails. A name no
    /// matcher hits (or an absent matcher) degrades to `Unclassified`.
    pub fn classify(&self, category_name: &str) -> CategoryLabel {
        if category_name.is_empty() {
            return CategoryLabel::Unclassified;
        }

        for (key, label) in PRIORITY {
            if let Some(matcher) = self.registry.matcher(key) {
                if matcher.is_match(category_name) {
                    return label.clone();
                }
            }
        }

        CategoryLabel::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::patterns::{flatten_unique, TAXONOMY_TABLE};

    fn classifier_fixture() -> (PatternRegistry, Vec<(&'static str, CategoryLabel)>) {
        (PatternRegistry::new(), PRIORITY.to_vec())
    }

    #[test]
    fn every_taxonomy_keyword_classifies_alone() {
        let (registry, priority) = classifier_fixture();
        let classifier = CategoryClassifier::new(&registry);
        for (key, label) in &priority {
            for word in flatten_unique(TAXONOMY_TABLE, key) {
                let got = classifier.classify(word);
                // a keyword shared between keys resolves to the higher-priority
                // bucket, anything else is a data error
                assert_ne!(
                    got,
                    CategoryLabel::Unclassified,
                    "'{word}' ({key}) fell through"
                );
                if !priority.iter().any(|(k, l)| *k != *key && *l == got) {
                    assert_eq!(got, *label, "'{word}' classified as {got}");
                }
            }
        }
    }

    #[test]
    fn sport_wins_over_manga() {
        let registry = PatternRegistry::new();
        let classifier = CategoryClassifier::new(&registry);
        assert_eq!(
            classifier.classify("Anime Sport Channels"),
            CategoryLabel::Sport
        );
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let registry = PatternRegistry::new();
        let classifier = CategoryClassifier::new(&registry);
        assert_eq!(classifier.classify("FR | MOTO GP"), CategoryLabel::Sport);
        assert_eq!(
            classifier.classify("Les CONCERTS du samedi"),
            CategoryLabel::Entertainment(EntertainmentKind::Concerts)
        );
    }

    #[test]
    fn mixed_locale_names_classify() {
        let registry = PatternRegistry::new();
        let classifier = CategoryClassifier::new(&registry);
        // Portuguese vocabulary inside an otherwise English name
        assert_eq!(classifier.classify("BR Esportes HD"), CategoryLabel::Sport);
        assert_eq!(classifier.classify("Karaoké Party"), CategoryLabel::Entertainment(EntertainmentKind::Karaoke));
    }

    #[test]
    fn unknown_names_are_unclassified() {
        let registry = PatternRegistry::new();
        let classifier = CategoryClassifier::new(&registry);
        assert_eq!(classifier.classify("Documentaries"), CategoryLabel::Unclassified);
        assert_eq!(classifier.classify(""), CategoryLabel::Unclassified);
    }
}
