// EDICT-Search Type Definitions
// Dictionary kinds, matchers and error types shared across the crate

use crate::config::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// The dictionaries a query can be run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictType {
    /// EDICT Japanese-English word dictionary
    Edict,
    /// KANJIDIC kanji dictionary
    Kanjidic,
    /// Tanaka corpus of example sentences
    Tanaka,
}

impl DictType {
    /// All dictionary kinds
    pub const ALL: [DictType; 3] = [DictType::Edict, DictType::Kanjidic, DictType::Tanaka];

    /// File name of the source dictionary inside the dictionary directory
    pub fn default_file_name(self) -> &'static str {
        match self {
            DictType::Edict => "edict",
            DictType::Kanjidic => "kanjidic",
            DictType::Tanaka => "examples.utf",
        }
    }

    /// File name of the cached index inside the dictionary directory
    pub fn index_file_name(self) -> &'static str {
        match self {
            DictType::Edict => "edict.idx",
            DictType::Kanjidic => "kanjidic.idx",
            DictType::Tanaka => "tanaka.idx",
        }
    }

    /// Stable lowercase name
    pub fn name(self) -> &'static str {
        match self {
            DictType::Edict => "edict",
            DictType::Kanjidic => "kanjidic",
            DictType::Tanaka => "tanaka",
        }
    }
}

impl std::fmt::Display for DictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DictType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edict" => Ok(DictType::Edict),
            "kanjidic" => Ok(DictType::Kanjidic),
            "tanaka" | "examples" => Ok(DictType::Tanaka),
            _ => Err(ParseEnumError {
                kind: "dictionary",
                value: s.to_string(),
            }),
        }
    }
}

/// How query terms are matched against dictionary text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherEnum {
    /// The whole text equals the term
    Exact,
    /// The term occurs anywhere in the text
    Substring,
    /// The text begins with the term
    StartsWith,
    /// The text ends with the term
    EndsWith,
}

impl MatcherEnum {
    /// Check whether `text` matches `query` under this matcher
    ///
    /// Comparison is case-sensitive; callers lowercase English text first.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::MatcherEnum;
    /// assert!(MatcherEnum::Exact.matches("たべる", "たべる"));
    /// assert!(MatcherEnum::Substring.matches("べ", "たべる"));
    /// assert!(!MatcherEnum::StartsWith.matches("べ", "たべる"));
    /// ```
    pub fn matches(self, query: &str, text: &str) -> bool {
        match self {
            MatcherEnum::Exact => text == query,
            MatcherEnum::Substring => text.contains(query),
            MatcherEnum::StartsWith => text.starts_with(query),
            MatcherEnum::EndsWith => text.ends_with(query),
        }
    }

    /// Build the regex string matching `term` under this matcher
    ///
    /// The term is escaped, so regex metacharacters in user input are
    /// matched literally.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::MatcherEnum;
    /// assert_eq!(MatcherEnum::Exact.to_regex("cat", false), "^cat$");
    /// assert_eq!(MatcherEnum::StartsWith.to_regex("c.t", true), "(?i)^c\\.t");
    /// ```
    pub fn to_regex(self, term: &str, case_insensitive: bool) -> String {
        let mut regex = String::new();
        if case_insensitive {
            regex.push_str("(?i)");
        }
        let escaped = regex::escape(term);
        match self {
            MatcherEnum::Exact => {
                regex.push('^');
                regex.push_str(&escaped);
                regex.push('$');
            }
            MatcherEnum::Substring => regex.push_str(&escaped),
            MatcherEnum::StartsWith => {
                regex.push('^');
                regex.push_str(&escaped);
            }
            MatcherEnum::EndsWith => {
                regex.push_str(&escaped);
                regex.push('$');
            }
        }
        regex
    }

    /// Compile the regex for `term`
    pub fn compile(self, term: &str, case_insensitive: bool) -> Result<Regex> {
        Ok(Regex::new(&self.to_regex(term, case_insensitive))?)
    }

    /// Stable lowercase name
    pub fn name(self) -> &'static str {
        match self {
            MatcherEnum::Exact => "exact",
            MatcherEnum::Substring => "substring",
            MatcherEnum::StartsWith => "starts-with",
            MatcherEnum::EndsWith => "ends-with",
        }
    }
}

impl std::fmt::Display for MatcherEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MatcherEnum {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "exact" => Ok(MatcherEnum::Exact),
            "substring" => Ok(MatcherEnum::Substring),
            "starts-with" | "prefix" => Ok(MatcherEnum::StartsWith),
            "ends-with" | "suffix" => Ok(MatcherEnum::EndsWith),
            _ => Err(ParseEnumError {
                kind: "matcher",
                value: s.to_string(),
            }),
        }
    }
}

/// Unknown name given for one of the crate's enums
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Errors raised while loading dictionaries or running queries
#[derive(Debug, Error)]
pub enum DictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dictionary {dict_type} is not available at {}", .path.display())]
    DictionaryMissing { dict_type: DictType, path: PathBuf },

    #[error("Invalid entry at line {line}: {message}")]
    InvalidEntry { line: usize, message: String },

    #[error("Invalid kanji '{0}': expected exactly one character")]
    InvalidKanji(String),

    #[error("Invalid query: empty")]
    EmptyQuery,

    #[error("Regex compilation failed: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unsupported encoding: {0}")]
    Encoding(String),

    #[error("Index cache error: {0}")]
    IndexCache(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DictError {
    /// Attach the source line number to an entry parse error
    pub fn at_line(self, line: usize) -> Self {
        match self {
            DictError::InvalidEntry { message, .. } => DictError::InvalidEntry { line, message },
            other => other,
        }
    }
}

/// Convenience `Result` alias using [`DictError`]
pub type Result<T> = std::result::Result<T, DictError>;
