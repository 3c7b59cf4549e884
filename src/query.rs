// EDICT-Search Query Builder
// Turns user input into structured dictionary queries

use crate::deinflect::deinflect_to_kana;
use crate::entry::DictEntry;
use crate::kana::{hiragana_to_katakana, is_all_kana, is_kanji, katakana_to_hiragana};
use crate::romanization::RomanizationEnum;
use crate::types::{DictType, MatcherEnum};
use serde::{Deserialize, Serialize};

/// A structured query against one dictionary
///
/// Any of the `query` terms may match for an entry to be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Dictionary to search
    pub dict_type: DictType,
    /// Alternative search terms
    pub query: Vec<String>,
    /// `true` to match Japanese text, `false` to match English glosses
    pub is_japanese: bool,
    /// How terms are compared with dictionary text
    pub matcher: MatcherEnum,
}

impl SearchQuery {
    /// An empty exact Japanese query
    pub fn new(dict_type: DictType) -> Self {
        Self {
            dict_type,
            query: Vec::new(),
            is_japanese: true,
            matcher: MatcherEnum::Exact,
        }
    }

    /// Search for an English word in EDICT, or in the example sentences
    ///
    /// # Examples
    /// ```
    /// # use edict_search::{DictType, MatcherEnum, SearchQuery};
    /// let q = SearchQuery::search_for_english("cat", true, false);
    /// assert_eq!(q.dict_type, DictType::Edict);
    /// assert_eq!(q.matcher, MatcherEnum::Exact);
    /// assert!(!q.is_japanese);
    /// ```
    pub fn search_for_english(text: &str, is_exact: bool, in_examples: bool) -> Self {
        Self {
            dict_type: if in_examples {
                DictType::Tanaka
            } else {
                DictType::Edict
            },
            query: vec![text.trim().to_string()],
            is_japanese: false,
            matcher: if is_exact {
                MatcherEnum::Exact
            } else {
                MatcherEnum::Substring
            },
        }
    }

    /// Search EDICT for a Japanese word typed in romaji
    ///
    /// The terms are the hiragana and katakana spellings of the input. Text
    /// already written in Japanese is kept as typed; pure kana also gets its
    /// other-script spelling.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::{MatcherEnum, RomanizationEnum, SearchQuery};
    /// let q = SearchQuery::search_jp_romaji("neko", RomanizationEnum::Hepburn, MatcherEnum::Exact);
    /// assert_eq!(q.query, vec!["ねこ", "ネコ"]);
    /// ```
    pub fn search_jp_romaji(romaji: &str, system: RomanizationEnum, matcher: MatcherEnum) -> Self {
        let mut query = Self::new(DictType::Edict);
        query.query = kana_terms(romaji, system);
        query.matcher = matcher;
        query
    }

    /// Search EDICT for the dictionary forms of an inflected verb or adjective
    pub fn search_jp_deinflected(romaji: &str, system: RomanizationEnum) -> Self {
        let mut query = Self::new(DictType::Edict);
        query.query = deinflect_to_kana(romaji, system);
        query
    }

    /// Search the example sentences for a Japanese word
    pub fn search_jp_tanaka(romaji: &str, system: RomanizationEnum) -> Self {
        let mut query = Self::new(DictType::Tanaka);
        query.query = kana_terms(romaji, system);
        query.matcher = MatcherEnum::Substring;
        query
    }

    /// Build a Japanese query from romaji
    ///
    /// Deinflection takes precedence over searching the example sentences.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::{RomanizationEnum, SearchQuery};
    /// let q = SearchQuery::search_for_romaji("tabenai", RomanizationEnum::Hepburn, true, true, false);
    /// let mut terms = q.query.clone();
    /// terms.sort();
    /// assert_eq!(terms, vec!["たぶ", "たべる"]);
    /// ```
    pub fn search_for_romaji(
        romaji: &str,
        system: RomanizationEnum,
        is_exact: bool,
        is_deinflect: bool,
        is_tanaka: bool,
    ) -> Self {
        if is_deinflect {
            Self::search_jp_deinflected(romaji, system)
        } else if is_tanaka {
            Self::search_jp_tanaka(romaji, system)
        } else {
            let matcher = if is_exact {
                MatcherEnum::Exact
            } else {
                MatcherEnum::Substring
            };
            Self::search_jp_romaji(romaji, system, matcher)
        }
    }

    /// Look up every kanji of `text` in KANJIDIC
    ///
    /// # Examples
    /// ```
    /// # use edict_search::SearchQuery;
    /// let q = SearchQuery::search_kanji("日本語を話す");
    /// assert_eq!(q.query, vec!["日", "本", "語", "話"]);
    /// ```
    pub fn search_kanji(text: &str) -> Self {
        let mut query = Self::new(DictType::Kanjidic);
        for kanji in text.chars().filter(|&c| is_kanji(c)) {
            let term = kanji.to_string();
            if !query.query.contains(&term) {
                query.query.push(term);
            }
        }
        query
    }

    /// `true` when there is nothing to search for
    pub fn is_empty(&self) -> bool {
        self.query.iter().all(|t| t.trim().is_empty())
    }

    /// Check whether an entry satisfies this query
    ///
    /// Japanese queries compare every kanji spelling and reading. English queries
    /// compare each gloss case-insensitively for exact matches, or the whole
    /// English text otherwise.
    pub fn matches_entry(&self, entry: &DictEntry) -> bool {
        if self.is_japanese {
            self.query
                .iter()
                .any(|term| entry.headwords().any(|text| self.matcher.matches(term, text)))
        } else if self.matcher == MatcherEnum::Exact {
            let glosses: Vec<String> = entry.glosses().into_iter().map(normalize_gloss).collect();
            self.query
                .iter()
                .map(|term| normalize_gloss(term))
                .any(|term| glosses.contains(&term))
        } else {
            let english = entry.english.to_lowercase();
            self.query
                .iter()
                .any(|term| self.matcher.matches(&term.to_lowercase(), &english))
        }
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}: {}",
            self.dict_type,
            if self.is_japanese { "jp" } else { "en" },
            self.matcher,
            self.query.join(", ")
        )
    }
}

/// Flags of a search form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match whole words instead of substrings
    pub exact: bool,
    /// Reduce an inflected verb or adjective to its dictionary form
    pub deinflect: bool,
    /// Search the example sentences instead of EDICT
    pub in_examples: bool,
    /// Input is Japanese (romaji or kana) rather than English
    pub japanese: bool,
}

impl SearchOptions {
    /// Build the query for `text`, or `None` when the input is blank
    ///
    /// Deinflection implies an exact search outside the examples; searching
    /// the examples implies a substring search.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::{DictType, MatcherEnum, RomanizationEnum, SearchOptions};
    /// let options = SearchOptions { in_examples: true, exact: true, ..Default::default() };
    /// let q = options.resolve("cat", RomanizationEnum::Hepburn).unwrap();
    /// assert_eq!(q.dict_type, DictType::Tanaka);
    /// assert_eq!(q.matcher, MatcherEnum::Substring);
    /// assert!(options.resolve("   ", RomanizationEnum::Hepburn).is_none());
    /// ```
    pub fn resolve(&self, text: &str, system: RomanizationEnum) -> Option<SearchQuery> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if !self.japanese {
            let is_exact = self.exact && !self.in_examples;
            return Some(SearchQuery::search_for_english(text, is_exact, self.in_examples));
        }

        let in_examples = self.in_examples && !self.deinflect;
        let is_exact = self.deinflect || (self.exact && !in_examples);
        let query = SearchQuery::search_for_romaji(text, system, is_exact, self.deinflect, in_examples);
        (!query.is_empty()).then_some(query)
    }
}

/// Lower-case a gloss and drop `(…)` annotations
pub(crate) fn normalize_gloss(gloss: &str) -> String {
    let mut result = String::with_capacity(gloss.len());
    let mut depth = 0usize;
    for ch in gloss.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.extend(ch.to_lowercase()),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Kana spellings of user input, de-duplicated in order
fn kana_terms(input: &str, system: RomanizationEnum) -> Vec<String> {
    let input = input.trim();
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: String| {
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    if input.is_ascii() {
        push(system.to_hiragana(input));
        push(system.to_katakana(input));
    } else {
        push(input.to_string());
        if is_all_kana(input) {
            push(katakana_to_hiragana(input));
            push(hiragana_to_katakana(input));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ Constructors ============

    #[test]
    fn test_new() {
        let q = SearchQuery::new(DictType::Kanjidic);
        assert!(q.query.is_empty());
        assert!(q.is_japanese);
        assert_eq!(q.matcher, MatcherEnum::Exact);
        assert!(q.is_empty());
    }

    #[test]
    fn test_jp_search_with_deinflect() {
        let q = SearchQuery::search_for_romaji("tabenai", RomanizationEnum::Hepburn, true, true, false);
        let mut terms = q.query.clone();
        terms.sort();
        assert_eq!(terms, vec!["たぶ", "たべる"]);
        assert_eq!(q.dict_type, DictType::Edict);
        assert_eq!(q.matcher, MatcherEnum::Exact);
    }

    #[test]
    fn test_deinflect_wins_over_tanaka() {
        let q = SearchQuery::search_for_romaji("tabeta", RomanizationEnum::Hepburn, false, true, true);
        assert_eq!(q.dict_type, DictType::Edict);
        assert!(q.query.contains(&"たべる".to_string()));
    }

    #[test]
    fn test_tanaka_query() {
        let q = SearchQuery::search_for_romaji("neko", RomanizationEnum::Hepburn, true, false, true);
        assert_eq!(q.dict_type, DictType::Tanaka);
        assert_eq!(q.matcher, MatcherEnum::Substring);
        assert_eq!(q.query, vec!["ねこ", "ネコ"]);
    }

    #[test]
    fn test_romaji_query_matchers() {
        let q = SearchQuery::search_for_romaji("sushi", RomanizationEnum::Hepburn, false, false, false);
        assert_eq!(q.matcher, MatcherEnum::Substring);
        assert_eq!(q.query, vec!["すし", "スシ"]);

        let q = SearchQuery::search_for_romaji("si", RomanizationEnum::Kunrei, true, false, false);
        assert_eq!(q.query, vec!["し", "シ"]);
    }

    #[test]
    fn test_kana_input_kept() {
        let q = SearchQuery::search_jp_romaji("ねこ", RomanizationEnum::Hepburn, MatcherEnum::Exact);
        assert_eq!(q.query, vec!["ねこ", "ネコ"]);

        let q = SearchQuery::search_jp_romaji("ラーメン", RomanizationEnum::Hepburn, MatcherEnum::Exact);
        assert_eq!(q.query, vec!["ラーメン", "らーめん"]);

        let q = SearchQuery::search_jp_romaji("食べる", RomanizationEnum::Hepburn, MatcherEnum::Exact);
        assert_eq!(q.query, vec!["食べる"]);
    }

    #[test]
    fn test_search_kanji_dedup() {
        let q = SearchQuery::search_kanji("人々の人");
        assert_eq!(q.query, vec!["人", "々"]);
        assert_eq!(q.dict_type, DictType::Kanjidic);
        assert!(SearchQuery::search_kanji("かな").is_empty());
    }

    // ============ Entry matching ============

    fn taberu() -> DictEntry {
        DictEntry::new(
            Some("食べる".into()),
            Some("たべる".into()),
            "(v1,vt) to eat/(2) to live on (e.g. a salary); to live off",
            true,
        )
    }

    #[test]
    fn test_matches_japanese() {
        let q = SearchQuery::search_jp_romaji("taberu", RomanizationEnum::Hepburn, MatcherEnum::Exact);
        assert!(q.matches_entry(&taberu()));

        let q = SearchQuery::search_jp_romaji("tabe", RomanizationEnum::Hepburn, MatcherEnum::Exact);
        assert!(!q.matches_entry(&taberu()));

        let q = SearchQuery::search_jp_romaji("tabe", RomanizationEnum::Hepburn, MatcherEnum::StartsWith);
        assert!(q.matches_entry(&taberu()));

        let q = SearchQuery::search_jp_romaji("食べ", RomanizationEnum::Hepburn, MatcherEnum::Substring);
        assert!(q.matches_entry(&taberu()));
    }

    #[test]
    fn test_matches_english_exact() {
        let entry = taberu();
        assert!(SearchQuery::search_for_english("to eat", true, false).matches_entry(&entry));
        assert!(SearchQuery::search_for_english("To Eat", true, false).matches_entry(&entry));
        assert!(SearchQuery::search_for_english("to live on", true, false).matches_entry(&entry));
        assert!(!SearchQuery::search_for_english("eat", true, false).matches_entry(&entry));
    }

    #[test]
    fn test_matches_english_substring() {
        let entry = taberu();
        assert!(SearchQuery::search_for_english("EAT", false, false).matches_entry(&entry));
        assert!(SearchQuery::search_for_english("salary", false, false).matches_entry(&entry));
        assert!(!SearchQuery::search_for_english("drink", false, false).matches_entry(&entry));
    }

    #[test]
    fn test_normalize_gloss() {
        assert_eq!(normalize_gloss("to live on (e.g. a salary)"), "to live on");
        assert_eq!(normalize_gloss("(uk) Kitty"), "kitty");
    }

    #[test]
    fn test_display() {
        let q = SearchQuery::search_jp_romaji("neko", RomanizationEnum::Hepburn, MatcherEnum::Exact);
        assert_eq!(q.to_string(), "edict/jp/exact: ねこ, ネコ");
    }

    // ============ SearchOptions ============

    #[test]
    fn test_options_blank_input() {
        let options = SearchOptions::default();
        assert!(options.resolve("", RomanizationEnum::Hepburn).is_none());
        assert!(options.resolve(" \t", RomanizationEnum::Hepburn).is_none());
    }

    #[test]
    fn test_options_deinflect_forces_exact() {
        let options = SearchOptions {
            japanese: true,
            deinflect: true,
            in_examples: true,
            exact: false,
        };
        let q = options.resolve("tabenai", RomanizationEnum::Hepburn).unwrap();
        assert_eq!(q.dict_type, DictType::Edict);
        assert_eq!(q.matcher, MatcherEnum::Exact);
    }

    #[test]
    fn test_options_examples_force_substring() {
        let options = SearchOptions {
            japanese: true,
            in_examples: true,
            exact: true,
            ..Default::default()
        };
        let q = options.resolve("neko", RomanizationEnum::Hepburn).unwrap();
        assert_eq!(q.dict_type, DictType::Tanaka);
        assert_eq!(q.matcher, MatcherEnum::Substring);
    }

    #[test]
    fn test_options_english() {
        let options = SearchOptions {
            exact: true,
            ..Default::default()
        };
        let q = options.resolve("  cat ", RomanizationEnum::Hepburn).unwrap();
        assert_eq!(q.query, vec!["cat"]);
        assert!(!q.is_japanese);
        assert_eq!(q.matcher, MatcherEnum::Exact);
    }
}
