//! # EDICT-Search: Japanese-English Dictionary Lookup
//!
//! Offline search over the EDICT word dictionary, the KANJIDIC kanji
//! dictionary and the Tanaka corpus of example sentences.
//!
//! ## Query Kinds
//!
//! 1. **Romaji** - typed in Hepburn, Nihon-shiki or Kunrei and searched as
//!    hiragana and katakana
//!    - `SearchQuery::search_jp_romaji("neko", ...)`
//! 2. **Deinflected** - inflected verbs and adjectives reduced to their
//!    dictionary forms
//!    - `SearchQuery::search_jp_deinflected("tabemashita", ...)`
//! 3. **English** - exact gloss or substring match
//!    - `SearchQuery::search_for_english("cat", true, false)`
//! 4. **Kanji** - one KANJIDIC lookup per kanji
//!    - `SearchQuery::search_kanji("日本語")`
//!
//! ## Example Usage
//!
//! ```no_run
//! use edict_search::{Config, DictSearch, SearchQuery, RomanizationEnum};
//!
//! let config = Config::load(None, None)?;
//! let search = DictSearch::from_config(&config);
//!
//! // Exact Japanese search
//! let q = SearchQuery::search_for_romaji("taberu", RomanizationEnum::Hepburn, true, false, false);
//! let hits = search.search_limit(&q, 10)?;
//!
//! // Deinflection
//! let q = SearchQuery::search_for_romaji("tabemashita", RomanizationEnum::Hepburn, true, true, false);
//! let hits = search.search(&q)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **Romanization** - romaji ↔ kana transliteration
//! - **Deinflector** - rule-based reduction to dictionary forms
//! - **Query Builder** - turns user input into `SearchQuery`
//! - **Dictionary Loader** - decodes and parses the dictionary files
//! - **Dictionary Index** - exact-key map plus regex scan, cached with bincode
//! - **DictSearch API** - main entry point combining all components

pub mod analyze;
pub mod config;
pub mod deinflect;
pub mod dictionary;
pub mod entry;
pub mod kana;
pub mod matcher;
pub mod query;
pub mod romanization;
pub mod search;
pub mod types;

// Re-export main types and functions for convenience
pub use analyze::{analyze_characters, analyze_words, CharacterAnalysis, WordAnalysis};
pub use config::{CliOverrides, Config, ConfigError};
pub use deinflect::{deinflect, deinflect_to_kana, Deinflection, RuleKind};
pub use dictionary::{DictionaryLoader, LoadedDictionary};
pub use entry::{DictEntry, EdictEntry, KanjidicEntry, SearchHit, TanakaEntry};
pub use matcher::{DictionaryIndex, IndexStats};
pub use query::{SearchOptions, SearchQuery};
pub use romanization::RomanizationEnum;
pub use search::DictSearch;
pub use types::{DictError, DictType, MatcherEnum, ParseEnumError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
