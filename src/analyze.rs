// EDICT-Search Text Analysis
// Breaks Japanese text into characters or dictionary words

use crate::entry::{EdictEntry, KanjidicEntry, SearchHit};
use crate::kana::{is_kana, is_kanji};
use crate::query::SearchQuery;
use crate::search::DictSearch;
use crate::types::{MatcherEnum, Result};
use rustc_hash::FxHashMap;

/// Longest word tried when splitting text into words
const MAX_WORD_LENGTH: usize = 10;

/// One character of analysed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterAnalysis {
    pub character: char,
    /// Romaji of a kana character
    pub romaji: Option<String>,
    /// KANJIDIC entry of a kanji
    pub kanji: Option<KanjidicEntry>,
}

/// One word of analysed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAnalysis {
    pub word: String,
    /// EDICT entries for the word; empty when nothing matched
    pub entries: Vec<EdictEntry>,
}

/// Describe every non-whitespace character of `text`
///
/// Kanji are looked up in KANJIDIC with a single query; kana get their
/// romaji in the configured romanization.
pub fn analyze_characters(text: &str, search: &DictSearch) -> Result<Vec<CharacterAnalysis>> {
    let query = SearchQuery::search_kanji(text);
    let mut kanji: FxHashMap<char, KanjidicEntry> = FxHashMap::default();
    if !query.is_empty() {
        for hit in search.search(&query)? {
            if let SearchHit::Kanjidic(entry) = hit {
                kanji.insert(entry.kanji_char(), entry);
            }
        }
    }

    let romanization = search.romanization();
    Ok(text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|character| CharacterAnalysis {
            character,
            romaji: is_kana(character).then(|| romanization.to_romaji(&character.to_string())),
            kanji: kanji.get(&character).cloned(),
        })
        .collect())
}

/// Split `text` into dictionary words
///
/// At each position the longest prefix (up to ten characters) with an exact
/// EDICT match is taken. Characters that start no known word become words
/// of their own with no entries.
pub fn analyze_words(text: &str, search: &DictSearch) -> Result<Vec<WordAnalysis>> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        if chars[start].is_whitespace() {
            start += 1;
            continue;
        }

        let longest = MAX_WORD_LENGTH.min(chars.len() - start);
        let mut matched = None;
        for length in (1..=longest).rev() {
            let candidate: String = chars[start..start + length].iter().collect();
            if !candidate.chars().any(|c| is_kana(c) || is_kanji(c)) {
                continue;
            }
            let entries = lookup_word(&candidate, search)?;
            if !entries.is_empty() {
                matched = Some((length, candidate, entries));
                break;
            }
        }

        let (length, word, entries) =
            matched.unwrap_or_else(|| (1, chars[start].to_string(), Vec::new()));
        words.push(WordAnalysis { word, entries });
        start += length;
    }

    Ok(words)
}

fn lookup_word(word: &str, search: &DictSearch) -> Result<Vec<EdictEntry>> {
    if word.chars().any(char::is_whitespace) {
        return Ok(Vec::new());
    }
    let query = SearchQuery::search_jp_romaji(word, search.romanization(), MatcherEnum::Exact);
    Ok(search
        .search(&query)?
        .into_iter()
        .filter_map(|hit| match hit {
            SearchHit::Edict(entry) => Some(entry),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryLoader;
    use crate::matcher::DictionaryIndex;
    use crate::romanization::RomanizationEnum;
    use crate::types::DictType;

    const EDICT: &str = "\
日本 [にほん] /(n) Japan/(P)/
日本語 [にほんご] /(n) Japanese (language)/(P)/
語 [ご] /(n) word/
を /(prt) indicates direct object of action/
話す [はなす] /(v5s,vt) to speak/(P)/
";

    const KANJIDIC: &str = "\
日 467C U65e5 B72 G1 S4 ニチ ジツ ひ {day} {sun}
本 4B5C U672c B75 G1 S5 ホン もと {book} {main}
";

    fn create_search() -> DictSearch {
        let loader = DictionaryLoader::new("/nonexistent", encoding_rs::UTF_8);
        let search = DictSearch::new(loader, RomanizationEnum::Hepburn);
        search.insert_index(DictionaryLoader::parse_text(DictType::Edict, EDICT).into());
        search.insert_index(DictionaryIndex::from(DictionaryLoader::parse_text(
            DictType::Kanjidic,
            KANJIDIC,
        )));
        search
    }

    #[test]
    fn test_analyze_characters() {
        let search = create_search();
        let result = analyze_characters("日本 が", &search).unwrap();
        assert_eq!(result.len(), 3);

        assert_eq!(result[0].character, '日');
        assert_eq!(result[0].kanji.as_ref().unwrap().english(), vec!["day", "sun"]);
        assert!(result[0].romaji.is_none());

        assert_eq!(result[1].kanji.as_ref().unwrap().strokes, 5);

        assert_eq!(result[2].romaji.as_deref(), Some("ga"));
        assert!(result[2].kanji.is_none());
    }

    #[test]
    fn test_analyze_characters_kana_only_needs_no_kanjidic() {
        let loader = DictionaryLoader::new("/nonexistent", encoding_rs::UTF_8);
        let search = DictSearch::new(loader, RomanizationEnum::Hepburn);
        let result = analyze_characters("ねこ", &search).unwrap();
        let romaji: Vec<_> = result.iter().filter_map(|c| c.romaji.as_deref()).collect();
        assert_eq!(romaji, vec!["ne", "ko"]);
    }

    #[test]
    fn test_analyze_words_longest_match() {
        let search = create_search();
        let words = analyze_words("日本語を話す", &search).unwrap();
        let split: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(split, vec!["日本語", "を", "話す"]);
        assert_eq!(words[0].entries[0].reading.as_deref(), Some("にほんご"));
    }

    #[test]
    fn test_analyze_words_unknown_characters() {
        let search = create_search();
        let words = analyze_words("日本の猫", &search).unwrap();
        let split: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(split, vec!["日本", "の", "猫"]);
        assert!(words[1].entries.is_empty());
        assert!(words[2].entries.is_empty());
    }
}
