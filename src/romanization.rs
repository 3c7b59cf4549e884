// EDICT-Search Romanization
// Transliteration between romaji, hiragana and katakana

use crate::kana::{hiragana_to_katakana, katakana_to_hiragana, CHOONPU};
use crate::types::ParseEnumError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// Romanization systems supported for romaji input and output
///
/// Each system has its own canonical spellings (used when producing romaji)
/// but accepts the spellings of the other systems when reading romaji, so
/// `shi`, `si` and `sya`/`sha` all work regardless of the selected system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RomanizationEnum {
    /// Modified Hepburn: shi, chi, tsu, fu, ji
    #[default]
    Hepburn,
    /// Nihon-shiki: si, ti, tu, hu, zi, di, du
    NihonShiki,
    /// Kunrei-shiki: si, ti, tu, hu, zi (ぢ merges with じ)
    Kunrei,
}

/// Syllables spelled identically in every system
const COMMON: &[(&str, &str)] = &[
    ("a", "あ"), ("i", "い"), ("u", "う"), ("e", "え"), ("o", "お"),
    ("ka", "か"), ("ki", "き"), ("ku", "く"), ("ke", "け"), ("ko", "こ"),
    ("kya", "きゃ"), ("kyu", "きゅ"), ("kyo", "きょ"),
    ("ga", "が"), ("gi", "ぎ"), ("gu", "ぐ"), ("ge", "げ"), ("go", "ご"),
    ("gya", "ぎゃ"), ("gyu", "ぎゅ"), ("gyo", "ぎょ"),
    ("sa", "さ"), ("su", "す"), ("se", "せ"), ("so", "そ"),
    ("za", "ざ"), ("zu", "ず"), ("ze", "ぜ"), ("zo", "ぞ"),
    ("ta", "た"), ("te", "て"), ("to", "と"),
    ("da", "だ"), ("de", "で"), ("do", "ど"),
    ("na", "な"), ("ni", "に"), ("nu", "ぬ"), ("ne", "ね"), ("no", "の"),
    ("nya", "にゃ"), ("nyu", "にゅ"), ("nyo", "にょ"),
    ("ha", "は"), ("hi", "ひ"), ("he", "へ"), ("ho", "ほ"),
    ("hya", "ひゃ"), ("hyu", "ひゅ"), ("hyo", "ひょ"),
    ("ba", "ば"), ("bi", "び"), ("bu", "ぶ"), ("be", "べ"), ("bo", "ぼ"),
    ("bya", "びゃ"), ("byu", "びゅ"), ("byo", "びょ"),
    ("pa", "ぱ"), ("pi", "ぴ"), ("pu", "ぷ"), ("pe", "ぺ"), ("po", "ぽ"),
    ("pya", "ぴゃ"), ("pyu", "ぴゅ"), ("pyo", "ぴょ"),
    ("ma", "ま"), ("mi", "み"), ("mu", "む"), ("me", "め"), ("mo", "も"),
    ("mya", "みゃ"), ("myu", "みゅ"), ("myo", "みょ"),
    ("ya", "や"), ("yu", "ゆ"), ("yo", "よ"),
    ("ra", "ら"), ("ri", "り"), ("ru", "る"), ("re", "れ"), ("ro", "ろ"),
    ("rya", "りゃ"), ("ryu", "りゅ"), ("ryo", "りょ"),
    ("wa", "わ"),
];

const HEPBURN: &[(&str, &str)] = &[
    ("shi", "し"), ("chi", "ち"), ("tsu", "つ"), ("fu", "ふ"),
    ("ji", "じ"), ("ji", "ぢ"), ("zu", "ず"), ("zu", "づ"),
    ("sha", "しゃ"), ("shu", "しゅ"), ("sho", "しょ"),
    ("cha", "ちゃ"), ("chu", "ちゅ"), ("cho", "ちょ"),
    ("ja", "じゃ"), ("ju", "じゅ"), ("jo", "じょ"),
    ("ja", "ぢゃ"), ("ju", "ぢゅ"), ("jo", "ぢょ"),
    ("wo", "を"),
    // ti, di, tu and du are free for loanword syllables
    ("ti", "てぃ"), ("di", "でぃ"), ("tu", "とぅ"), ("du", "どぅ"),
];

const NIHON_SHIKI: &[(&str, &str)] = &[
    ("si", "し"), ("ti", "ち"), ("tu", "つ"), ("hu", "ふ"),
    ("zi", "じ"), ("di", "ぢ"), ("du", "づ"),
    ("sya", "しゃ"), ("syu", "しゅ"), ("syo", "しょ"),
    ("tya", "ちゃ"), ("tyu", "ちゅ"), ("tyo", "ちょ"),
    ("zya", "じゃ"), ("zyu", "じゅ"), ("zyo", "じょ"),
    ("dya", "ぢゃ"), ("dyu", "ぢゅ"), ("dyo", "ぢょ"),
    ("wo", "を"),
];

const KUNREI: &[(&str, &str)] = &[
    ("si", "し"), ("ti", "ち"), ("tu", "つ"), ("hu", "ふ"),
    ("zi", "じ"), ("zi", "ぢ"), ("zu", "ず"), ("zu", "づ"),
    ("sya", "しゃ"), ("syu", "しゅ"), ("syo", "しょ"),
    ("tya", "ちゃ"), ("tyu", "ちゅ"), ("tyo", "ちょ"),
    ("zya", "じゃ"), ("zyu", "じゅ"), ("zyo", "じょ"),
    ("zya", "ぢゃ"), ("zyu", "ぢゅ"), ("zyo", "ぢょ"),
    ("o", "お"), ("o", "を"),
];

/// Spellings accepted on input by every system; never produced on output
/// unless the kana has no canonical spelling in the selected system.
/// Hepburn shadows ti/di/tu/du with its loanword syllables.
const LENIENT: &[(&str, &str)] = &[
    ("shi", "し"), ("si", "し"), ("chi", "ち"), ("ti", "ち"),
    ("tsu", "つ"), ("tu", "つ"), ("fu", "ふ"), ("hu", "ふ"),
    ("ji", "じ"), ("zi", "じ"), ("di", "ぢ"), ("du", "づ"),
    ("sha", "しゃ"), ("shu", "しゅ"), ("sho", "しょ"),
    ("sya", "しゃ"), ("syu", "しゅ"), ("syo", "しょ"),
    ("cha", "ちゃ"), ("chu", "ちゅ"), ("cho", "ちょ"),
    ("tya", "ちゃ"), ("tyu", "ちゅ"), ("tyo", "ちょ"),
    ("cya", "ちゃ"), ("cyu", "ちゅ"), ("cyo", "ちょ"),
    ("ja", "じゃ"), ("ju", "じゅ"), ("jo", "じょ"),
    ("jya", "じゃ"), ("jyu", "じゅ"), ("jyo", "じょ"),
    ("zya", "じゃ"), ("zyu", "じゅ"), ("zyo", "じょ"),
    ("dya", "ぢゃ"), ("dyu", "ぢゅ"), ("dyo", "ぢょ"),
    ("wo", "を"),
];

/// Foreign-sound combinations and explicit small kana
const EXTENDED: &[(&str, &str)] = &[
    ("fa", "ふぁ"), ("fi", "ふぃ"), ("fe", "ふぇ"), ("fo", "ふぉ"),
    ("vu", "ゔ"), ("va", "ゔぁ"), ("vi", "ゔぃ"), ("ve", "ゔぇ"), ("vo", "ゔぉ"),
    ("she", "しぇ"), ("che", "ちぇ"), ("je", "じぇ"),
    ("wi", "うぃ"), ("we", "うぇ"),
    ("xa", "ぁ"), ("xi", "ぃ"), ("xu", "ぅ"), ("xe", "ぇ"), ("xo", "ぉ"),
    ("la", "ぁ"), ("li", "ぃ"), ("lu", "ぅ"), ("le", "ぇ"), ("lo", "ぉ"),
    ("xya", "ゃ"), ("xyu", "ゅ"), ("xyo", "ょ"),
    ("lya", "ゃ"), ("lyu", "ゅ"), ("lyo", "ょ"),
    ("xtsu", "っ"), ("xtu", "っ"), ("ltsu", "っ"), ("ltu", "っ"),
    ("xwa", "ゎ"), ("xka", "ゕ"), ("xke", "ゖ"),
];

/// Lookup tables for one romanization system
struct Table {
    /// romaji → hiragana (first spelling wins)
    to_kana: FxHashMap<&'static str, &'static str>,
    /// hiragana → romaji (canonical spelling wins)
    to_romaji: FxHashMap<&'static str, &'static str>,
    /// Longest romaji key, in characters
    max_romaji_len: usize,
    /// Longest kana key, in characters
    max_kana_len: usize,
}

impl Table {
    fn build(specific: &[(&'static str, &'static str)]) -> Self {
        let mut to_kana = FxHashMap::default();
        let mut to_romaji = FxHashMap::default();

        // Order matters: canonical spellings are inserted first
        for &(romaji, kana) in specific
            .iter()
            .chain(COMMON)
            .chain(LENIENT)
            .chain(EXTENDED)
        {
            to_kana.entry(romaji).or_insert(kana);
            to_romaji.entry(kana).or_insert(romaji);
        }

        let max_romaji_len = to_kana.keys().map(|k| k.chars().count()).max().unwrap_or(1);
        let max_kana_len = to_romaji.keys().map(|k| k.chars().count()).max().unwrap_or(1);

        Self {
            to_kana,
            to_romaji,
            max_romaji_len,
            max_kana_len,
        }
    }
}

impl RomanizationEnum {
    /// All supported systems
    pub const ALL: [RomanizationEnum; 3] = [
        RomanizationEnum::Hepburn,
        RomanizationEnum::NihonShiki,
        RomanizationEnum::Kunrei,
    ];

    fn table(self) -> &'static Table {
        static HEPBURN_TABLE: OnceLock<Table> = OnceLock::new();
        static NIHON_SHIKI_TABLE: OnceLock<Table> = OnceLock::new();
        static KUNREI_TABLE: OnceLock<Table> = OnceLock::new();

        match self {
            RomanizationEnum::Hepburn => HEPBURN_TABLE.get_or_init(|| Table::build(HEPBURN)),
            RomanizationEnum::NihonShiki => {
                NIHON_SHIKI_TABLE.get_or_init(|| Table::build(NIHON_SHIKI))
            }
            RomanizationEnum::Kunrei => KUNREI_TABLE.get_or_init(|| Table::build(KUNREI)),
        }
    }

    /// Convert romaji to hiragana
    ///
    /// Characters that are not romaji (kana, kanji, punctuation) pass
    /// through unchanged, so already-converted text is left intact.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::RomanizationEnum;
    /// let r = RomanizationEnum::Hepburn;
    /// assert_eq!(r.to_hiragana("taberu"), "たべる");
    /// assert_eq!(r.to_hiragana("kitte"), "きって");
    /// assert_eq!(r.to_hiragana("kon'nichiha"), "こんにちは");
    /// ```
    pub fn to_hiragana(self, romaji: &str) -> String {
        let table = self.table();
        let chars: Vec<char> = romaji.to_lowercase().chars().collect();
        let mut out = String::with_capacity(romaji.len() * 2);
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let next = chars.get(i + 1).copied();

            match ch {
                '-' => {
                    out.push(CHOONPU);
                    i += 1;
                    continue;
                }
                '\'' => {
                    i += 1;
                    continue;
                }
                'n' => {
                    match next {
                        Some('\'') => {
                            out.push('ん');
                            i += 2;
                            continue;
                        }
                        Some('n') => {
                            out.push('ん');
                            // "nna" is ん + な, a bare "nn" is a single ん
                            let after = chars.get(i + 2).copied();
                            i += if after.is_some_and(|c| is_vowel(c) || c == 'y') {
                                1
                            } else {
                                2
                            };
                            continue;
                        }
                        Some(c) if is_vowel(c) || c == 'y' => {}
                        _ => {
                            out.push('ん');
                            i += 1;
                            continue;
                        }
                    }
                }
                c if is_consonant(c) && next == Some(c) => {
                    out.push('っ');
                    i += 1;
                    continue;
                }
                't' if next == Some('c') && chars.get(i + 2) == Some(&'h') => {
                    out.push('っ');
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let mut matched = false;
            for len in (1..=table.max_romaji_len).rev() {
                if i + len > chars.len() {
                    continue;
                }
                let key: String = chars[i..i + len].iter().collect();
                if let Some(kana) = table.to_kana.get(key.as_str()) {
                    out.push_str(kana);
                    i += len;
                    matched = true;
                    break;
                }
            }

            if !matched {
                out.push(ch);
                i += 1;
            }
        }

        out
    }

    /// Convert romaji to katakana
    ///
    /// # Examples
    /// ```
    /// # use edict_search::RomanizationEnum;
    /// assert_eq!(RomanizationEnum::Hepburn.to_katakana("ra-men"), "ラーメン");
    /// ```
    pub fn to_katakana(self, romaji: &str) -> String {
        hiragana_to_katakana(&self.to_hiragana(romaji))
    }

    /// Convert hiragana or katakana to romaji in this system
    ///
    /// # Examples
    /// ```
    /// # use edict_search::RomanizationEnum;
    /// assert_eq!(RomanizationEnum::Hepburn.to_romaji("しんぶん"), "shinbun");
    /// assert_eq!(RomanizationEnum::NihonShiki.to_romaji("しんぶん"), "sinbun");
    /// ```
    pub fn to_romaji(self, kana: &str) -> String {
        let table = self.table();
        let chars: Vec<char> = katakana_to_hiragana(kana).chars().collect();
        let mut out = String::with_capacity(kana.len());
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                'っ' => {
                    match self.syllable_at(table, &chars, i + 1) {
                        Some((romaji, _)) if romaji.starts_with(is_consonant) => {
                            if self == RomanizationEnum::Hepburn && romaji.starts_with("ch") {
                                out.push('t');
                            } else if let Some(first) = romaji.chars().next() {
                                out.push(first);
                            }
                        }
                        _ => out.push_str("xtsu"),
                    }
                    i += 1;
                }
                'ん' => {
                    out.push('n');
                    if let Some((romaji, _)) = self.syllable_at(table, &chars, i + 1) {
                        if romaji.starts_with(|c: char| is_vowel(c) || c == 'y') {
                            out.push('\'');
                        }
                    }
                    i += 1;
                }
                CHOONPU => {
                    out.push('-');
                    i += 1;
                }
                ch => match self.syllable_at(table, &chars, i) {
                    Some((romaji, len)) => {
                        out.push_str(romaji);
                        i += len;
                    }
                    None => {
                        out.push(ch);
                        i += 1;
                    }
                },
            }
        }

        out
    }

    /// Longest kana syllable starting at `pos`, with its length in chars
    fn syllable_at(
        self,
        table: &Table,
        chars: &[char],
        pos: usize,
    ) -> Option<(&'static str, usize)> {
        for len in (1..=table.max_kana_len).rev() {
            if pos + len > chars.len() {
                continue;
            }
            let key: String = chars[pos..pos + len].iter().collect();
            if let Some(romaji) = table.to_romaji.get(key.as_str()) {
                return Some((romaji, len));
            }
        }
        None
    }

    /// Stable lowercase name used in configuration files and on the CLI
    pub fn name(self) -> &'static str {
        match self {
            RomanizationEnum::Hepburn => "hepburn",
            RomanizationEnum::NihonShiki => "nihon-shiki",
            RomanizationEnum::Kunrei => "kunrei",
        }
    }
}

#[inline]
fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'i' | 'u' | 'e' | 'o')
}

#[inline]
fn is_consonant(ch: char) -> bool {
    ch.is_ascii_lowercase() && !is_vowel(ch)
}

impl std::fmt::Display for RomanizationEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RomanizationEnum {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "hepburn" => Ok(RomanizationEnum::Hepburn),
            "nihon-shiki" | "nihonshiki" | "nihon" => Ok(RomanizationEnum::NihonShiki),
            "kunrei" | "kunrei-shiki" => Ok(RomanizationEnum::Kunrei),
            _ => Err(ParseEnumError {
                kind: "romanization",
                value: s.to_string(),
            }),
        }
    }
}
