// EDICT-Search Dictionary Entries
// Flat records parsed from EDICT, KANJIDIC and Tanaka corpus lines

use crate::kana::{is_katakana, CHOONPU};
use crate::types::{DictError, DictType, Result};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Fields shared by every dictionary record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    /// Kanji expression; `None` for words written only in kana
    pub kanji: Option<String>,
    /// Reading in hiragana or katakana
    pub reading: Option<String>,
    /// English translation, senses separated by `/`
    pub english: String,
    /// Marked as a common word
    pub is_common: bool,
}

impl DictEntry {
    /// Create a new entry
    pub fn new(
        kanji: Option<String>,
        reading: Option<String>,
        english: impl Into<String>,
        is_common: bool,
    ) -> Self {
        Self {
            kanji,
            reading,
            english: english.into(),
            is_common,
        }
    }

    /// An entry is valid when it has a translation and some Japanese text
    pub fn is_valid(&self) -> bool {
        !self.english.trim().is_empty() && (self.kanji.is_some() || self.reading.is_some())
    }

    /// The first kanji spelling, falling back to the first reading
    pub fn japanese(&self) -> &str {
        self.kanji_forms()
            .next()
            .or_else(|| self.readings().next())
            .unwrap_or_default()
    }

    /// Kanji spellings; EDICT2 separates alternates with `;`
    pub fn kanji_forms(&self) -> impl Iterator<Item = &str> {
        split_forms(self.kanji.as_deref())
    }

    /// Readings, split like [`DictEntry::kanji_forms`]
    pub fn readings(&self) -> impl Iterator<Item = &str> {
        split_forms(self.reading.as_deref())
    }

    /// Every kanji spelling followed by every reading
    ///
    /// # Examples
    /// ```
    /// # use edict_search::DictEntry;
    /// let entry = DictEntry::new(Some("食べる;喰べる".into()), Some("たべる".into()), "to eat", true);
    /// assert_eq!(entry.headwords().collect::<Vec<_>>(), vec!["食べる", "喰べる", "たべる"]);
    /// assert_eq!(entry.japanese(), "食べる");
    /// ```
    pub fn headwords(&self) -> impl Iterator<Item = &str> {
        self.kanji_forms().chain(self.readings())
    }

    /// Non-empty senses of the English text
    pub fn senses(&self) -> Vec<&str> {
        self.english
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Individual glosses with part-of-speech and sense-number tags removed
    ///
    /// # Examples
    /// ```
    /// # use edict_search::DictEntry;
    /// let entry = DictEntry::new(None, Some("ねこ".into()), "(n) cat/(uk) pussy; kitty", true);
    /// assert_eq!(entry.glosses(), vec!["cat", "pussy", "kitty"]);
    /// ```
    pub fn glosses(&self) -> Vec<&str> {
        self.senses()
            .into_iter()
            .map(strip_tags)
            .flat_map(|sense| sense.split(';'))
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// Format as `kanji [reading]`, or just the reading
    pub fn format_japanese(&self) -> String {
        match (&self.kanji, &self.reading) {
            (Some(kanji), Some(reading)) if kanji != reading => format!("{} [{}]", kanji, reading),
            (Some(kanji), _) => kanji.clone(),
            (None, Some(reading)) => reading.clone(),
            (None, None) => String::new(),
        }
    }
}

fn split_forms(text: Option<&str>) -> impl Iterator<Item = &str> {
    text.into_iter()
        .flat_map(|t| t.split(';'))
        .map(str::trim)
        .filter(|form| !form.is_empty())
}

/// Clean a `;`-separated EDICT2 headword list
///
/// Tags such as `(P)`, `(iK)` or reading restrictions `(食)` are dropped;
/// a `(P)` tag on any headword marks the entry common.
fn clean_headwords(text: &str, is_common: &mut bool) -> Option<String> {
    let mut forms: Vec<String> = Vec::new();

    for form in text.split(';') {
        let mut word = String::new();
        let mut tag = String::new();
        let mut in_tag = false;
        for ch in form.chars() {
            match ch {
                '(' => {
                    in_tag = true;
                    tag.clear();
                }
                ')' if in_tag => {
                    in_tag = false;
                    if tag == "P" {
                        *is_common = true;
                    }
                }
                _ if in_tag => tag.push(ch),
                _ => word.push(ch),
            }
        }

        let word = word.trim();
        if !word.is_empty() && !forms.iter().any(|f| f == word) {
            forms.push(word.to_string());
        }
    }

    (!forms.is_empty()).then(|| forms.join(";"))
}

/// Remove leading `(…)` and `{…}` tags such as `(n)`, `(1)` or `(v1,vt)`
fn strip_tags(mut sense: &str) -> &str {
    loop {
        sense = sense.trim_start();
        let close = match sense.chars().next() {
            Some('(') => ')',
            Some('{') => '}',
            _ => return sense,
        };
        match sense.find(close) {
            Some(end) => sense = &sense[end + close.len_utf8()..],
            None => return sense,
        }
    }
}

/// An EDICT word entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdictEntry {
    pub entry: DictEntry,
}

impl Deref for EdictEntry {
    type Target = DictEntry;

    fn deref(&self) -> &DictEntry {
        &self.entry
    }
}

impl EdictEntry {
    /// Create a new entry
    pub fn new(
        kanji: Option<String>,
        reading: Option<String>,
        english: impl Into<String>,
        is_common: bool,
    ) -> Self {
        Self {
            entry: DictEntry::new(kanji, reading, english, is_common),
        }
    }

    /// Ichidan (v1) verb
    pub fn is_ichidan(&self) -> bool {
        self.is_valid() && self.english.contains("v1")
    }

    /// Godan (v5*) verb
    pub fn is_godan(&self) -> bool {
        self.is_valid() && self.english.contains("v5")
    }

    /// Irregular suru verb
    pub fn is_suru(&self) -> bool {
        self.english.contains("vs-i") || self.english.contains("vs-s")
    }

    /// Irregular kuru verb
    pub fn is_kuru(&self) -> bool {
        self.english.contains("vk")
    }

    /// Any kind of verb
    pub fn is_verb(&self) -> bool {
        self.is_ichidan() || self.is_godan() || self.is_suru() || self.is_kuru()
    }

    /// Parse one EDICT (or EDICT2) line
    ///
    /// EDICT2 headwords may list `;`-separated alternates with tags such as
    /// `食べる(P);喰べる [たべる(P)]`; the tags are dropped and the
    /// alternates kept. Returns `Ok(None)` for the header and comment lines.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::EdictEntry;
    /// let e = EdictEntry::parse("食べる [たべる] /(v1,vt) to eat/(P)/").unwrap().unwrap();
    /// assert_eq!(e.kanji.as_deref(), Some("食べる"));
    /// assert_eq!(e.reading.as_deref(), Some("たべる"));
    /// assert!(e.is_common);
    /// assert!(e.is_ichidan());
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.starts_with('#') || line.starts_with("　？？？") {
            return Ok(None);
        }

        let (head, body) = line.split_once(" /").ok_or_else(|| invalid("missing '/' gloss section"))?;

        let mut is_common = false;
        let head = head.trim();
        let (kanji, reading) = match head.split_once('[') {
            Some((kanji, rest)) => {
                let reading = rest
                    .trim_end()
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("unterminated reading"))?;
                (
                    clean_headwords(kanji, &mut is_common),
                    clean_headwords(reading, &mut is_common),
                )
            }
            None => {
                let words = clean_headwords(head, &mut is_common);
                match words {
                    Some(w) if w.chars().any(crate::kana::is_kanji) => (Some(w), None),
                    w => (None, w),
                }
            }
        };
        if kanji.is_none() && reading.is_none() {
            return Err(invalid("missing headword"));
        }

        let senses: Vec<&str> = body
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter(|s| {
                if *s == "(P)" {
                    is_common = true;
                    return false;
                }
                !s.starts_with("EntL")
            })
            .collect();

        if senses.is_empty() {
            return Err(invalid("no English glosses"));
        }

        Ok(Some(Self::new(kanji, reading, senses.join("/"), is_common)))
    }
}

/// A KANJIDIC kanji entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjidicEntry {
    /// The kanji, readings (`on, kun, [names]`) and comma-separated meanings
    pub entry: DictEntry,
    /// Classical radical number (B)
    pub radical: u32,
    /// Stroke count (S)
    pub strokes: u32,
    /// SKIP code (P), e.g. `4-7-1`
    pub skip: Option<String>,
    /// School grade (G)
    pub grade: Option<u32>,
}

impl Deref for KanjidicEntry {
    type Target = DictEntry;

    fn deref(&self) -> &DictEntry {
        &self.entry
    }
}

impl KanjidicEntry {
    /// Create a new entry, rejecting anything but a single kanji character
    pub fn new(
        kanji: &str,
        reading: &str,
        english: &str,
        radical: u32,
        strokes: u32,
        skip: Option<&str>,
        grade: Option<u32>,
    ) -> Result<Self> {
        if kanji.chars().count() != 1 {
            return Err(DictError::InvalidKanji(kanji.to_string()));
        }
        Ok(Self {
            entry: DictEntry::new(
                Some(kanji.to_string()),
                non_empty(reading),
                english,
                grade.is_some(),
            ),
            radical,
            strokes,
            skip: skip.map(str::to_string),
            grade,
        })
    }

    /// The kanji character
    pub fn kanji_char(&self) -> char {
        self.kanji
            .as_deref()
            .and_then(|k| k.chars().next())
            .unwrap_or_default()
    }

    /// English meanings
    pub fn english(&self) -> Vec<&str> {
        split_list(&self.entry.english)
    }

    /// On'yomi (Chinese-derived) readings, written in katakana
    pub fn onyomi(&self) -> Vec<&str> {
        self.plain_readings()
            .into_iter()
            .filter(|r| is_onyomi(r))
            .collect()
    }

    /// Kun'yomi (native) readings, written in hiragana
    pub fn kunyomi(&self) -> Vec<&str> {
        self.plain_readings()
            .into_iter()
            .filter(|r| !is_onyomi(r))
            .collect()
    }

    /// Nanori readings used in names (the bracketed part)
    pub fn namae(&self) -> Vec<&str> {
        let reading = self.reading.as_deref().unwrap_or_default();
        match reading.find('[') {
            Some(start) => {
                let inner = &reading[start + 1..];
                let inner = inner.split(']').next().unwrap_or_default();
                split_list(inner)
            }
            None => Vec::new(),
        }
    }

    fn plain_readings(&self) -> Vec<&str> {
        let reading = self.reading.as_deref().unwrap_or_default();
        let plain = reading.split('[').next().unwrap_or_default();
        split_list(plain)
    }

    /// Parse one KANJIDIC line
    ///
    /// Returns `Ok(None)` for comment lines.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (fields, meanings) = match line.find('{') {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let english: Vec<&str> = meanings
            .split('{')
            .filter_map(|part| part.split_once('}').map(|(m, _)| m.trim()))
            .filter(|m| !m.is_empty())
            .collect();

        let mut tokens = fields.split_whitespace();
        let kanji = tokens.next().ok_or_else(|| invalid("missing kanji"))?;
        // JIS X 0208 code
        tokens.next();

        let mut radical = 0;
        let mut strokes = None;
        let mut grade = None;
        let mut skip = None;
        let mut readings: Vec<&str> = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        let mut in_names = false;

        for token in tokens {
            let first = token.chars().next().unwrap_or_default();
            if first.is_ascii_uppercase() {
                let value = &token[1..];
                match first {
                    'B' => radical = value.parse().unwrap_or(0),
                    'S' if strokes.is_none() => strokes = value.parse().ok(),
                    'G' => grade = value.parse().ok(),
                    'P' => skip = Some(value),
                    'T' => in_names = true,
                    _ => {}
                }
            } else if in_names {
                names.push(token);
            } else {
                readings.push(token);
            }
        }

        let mut reading = readings.join(", ");
        if !names.is_empty() {
            if !reading.is_empty() {
                reading.push_str(", ");
            }
            reading.push('[');
            reading.push_str(&names.join(", "));
            reading.push(']');
        }

        Self::new(
            kanji,
            &reading,
            &english.join(", "),
            radical,
            strokes.unwrap_or(0),
            skip,
            grade,
        )
        .map(Some)
    }
}

/// An example sentence from the Tanaka corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TanakaEntry {
    /// The Japanese sentence is stored as the kanji expression
    pub entry: DictEntry,
    /// Corpus sentence-pair id
    pub id: Option<String>,
}

impl Deref for TanakaEntry {
    type Target = DictEntry;

    fn deref(&self) -> &DictEntry {
        &self.entry
    }
}

impl TanakaEntry {
    /// Create a new example sentence
    pub fn new(japanese: &str, english: &str, id: Option<String>) -> Self {
        Self {
            entry: DictEntry::new(Some(japanese.to_string()), None, english, false),
            id,
        }
    }

    /// The Japanese sentence
    pub fn sentence(&self) -> &str {
        self.japanese()
    }

    /// Parse one line of the corpus
    ///
    /// Only `A:` lines carry sentence pairs; `B:` index lines and comments
    /// yield `Ok(None)`.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::TanakaEntry;
    /// let t = TanakaEntry::parse("A: 猫が好きです。\tI like cats.#ID=1_2").unwrap().unwrap();
    /// assert_eq!(t.sentence(), "猫が好きです。");
    /// assert_eq!(t.english, "I like cats.");
    /// assert_eq!(t.id.as_deref(), Some("1_2"));
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let Some(pair) = line.strip_prefix("A:") else {
            return Ok(None);
        };

        let (japanese, rest) = pair
            .trim_start()
            .split_once('\t')
            .ok_or_else(|| invalid("missing tab between sentences"))?;
        let (english, id) = match rest.split_once("#ID=") {
            Some((english, id)) => (english, non_empty(id)),
            None => (rest, None),
        };

        if japanese.trim().is_empty() || english.trim().is_empty() {
            return Err(invalid("empty sentence"));
        }

        Ok(Some(Self::new(japanese.trim(), english.trim(), id)))
    }
}

/// A record from any of the dictionaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchHit {
    Edict(EdictEntry),
    Kanjidic(KanjidicEntry),
    Tanaka(TanakaEntry),
}

impl SearchHit {
    /// Parse a line of the given dictionary
    pub fn parse(dict_type: DictType, line: &str) -> Result<Option<Self>> {
        Ok(match dict_type {
            DictType::Edict => EdictEntry::parse(line)?.map(SearchHit::Edict),
            DictType::Kanjidic => KanjidicEntry::parse(line)?.map(SearchHit::Kanjidic),
            DictType::Tanaka => TanakaEntry::parse(line)?.map(SearchHit::Tanaka),
        })
    }

    /// The fields shared by all records
    pub fn entry(&self) -> &DictEntry {
        match self {
            SearchHit::Edict(e) => &e.entry,
            SearchHit::Kanjidic(k) => &k.entry,
            SearchHit::Tanaka(t) => &t.entry,
        }
    }

    /// The dictionary this record came from
    pub fn dict_type(&self) -> DictType {
        match self {
            SearchHit::Edict(_) => DictType::Edict,
            SearchHit::Kanjidic(_) => DictType::Kanjidic,
            SearchHit::Tanaka(_) => DictType::Tanaka,
        }
    }
}

fn is_onyomi(reading: &str) -> bool {
    reading
        .chars()
        .find(|&c| c != '-' && c != CHOONPU)
        .is_some_and(is_katakana)
}

fn split_list(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn invalid(message: &str) -> DictError {
    DictError::InvalidEntry {
        line: 0,
        message: message.to_string(),
    }
}
