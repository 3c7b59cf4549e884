// EDICT-Search Dictionary Index
// In-memory index with exact-key lookup and regex scanning

use crate::dictionary::LoadedDictionary;
use crate::entry::SearchHit;
use crate::query::{normalize_gloss, SearchQuery};
use crate::types::{DictError, DictType, MatcherEnum, Result};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Bumped whenever the serialized layout changes
const INDEX_VERSION: u32 = 2;

/// Entry and key counts of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub keys: usize,
}

/// Parsed entries of one dictionary with an exact-key lookup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryIndex {
    version: u32,
    dict_type: DictType,
    /// Encoding the source was decoded with, when built from a file
    encoding: Option<String>,
    entries: Vec<SearchHit>,
    /// Key → positions in `entries`: kanji, readings and lower-cased glosses
    keys: FxHashMap<String, Vec<usize>>,
}

impl DictionaryIndex {
    /// Build an index over `entries`
    pub fn new(dict_type: DictType, entries: Vec<SearchHit>) -> Self {
        let mut keys: FxHashMap<String, Vec<usize>> = FxHashMap::default();

        for (position, hit) in entries.iter().enumerate() {
            let entry = hit.entry();
            let mut entry_keys: Vec<String> = Vec::new();
            entry_keys.extend(entry.headwords().map(str::to_string));
            entry_keys.extend(entry.glosses().into_iter().map(normalize_gloss));

            entry_keys.sort();
            entry_keys.dedup();
            for key in entry_keys.into_iter().filter(|k| !k.is_empty()) {
                keys.entry(key).or_default().push(position);
            }
        }

        Self {
            version: INDEX_VERSION,
            dict_type,
            encoding: None,
            entries,
            keys,
        }
    }

    pub fn dict_type(&self) -> DictType {
        self.dict_type
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn entries(&self) -> &[SearchHit] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find all entries matching `query`, in index order
    ///
    /// Exact queries use the key table and then confirm each candidate;
    /// other matchers compile one regex per term and scan every entry.
    ///
    /// # Examples
    /// ```
    /// # use edict_search::{DictionaryIndex, DictType, EdictEntry, RomanizationEnum, SearchHit, SearchQuery};
    /// let cat = EdictEntry::parse("猫 [ねこ] /(n) cat/").unwrap().unwrap();
    /// let index = DictionaryIndex::new(DictType::Edict, vec![SearchHit::Edict(cat)]);
    /// let q = SearchQuery::search_for_romaji("neko", RomanizationEnum::Hepburn, true, false, false);
    /// assert_eq!(index.search(&q).unwrap().len(), 1);
    /// ```
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<&SearchHit>> {
        if query.is_empty() {
            return Err(DictError::EmptyQuery);
        }

        let positions = match query.matcher {
            MatcherEnum::Exact => self.lookup(query),
            _ => self.scan(query)?,
        };

        Ok(positions.into_iter().map(|p| &self.entries[p]).collect())
    }

    fn lookup(&self, query: &SearchQuery) -> Vec<usize> {
        let mut candidates: FxHashSet<usize> = FxHashSet::default();
        for term in &query.query {
            let key = if query.is_japanese {
                term.clone()
            } else {
                normalize_gloss(term)
            };
            if let Some(positions) = self.keys.get(&key) {
                candidates.extend(positions.iter().copied());
            }
        }

        let mut positions: Vec<usize> = candidates
            .into_iter()
            .filter(|&p| query.matches_entry(self.entries[p].entry()))
            .collect();
        positions.sort_unstable();
        positions
    }

    fn scan(&self, query: &SearchQuery) -> Result<Vec<usize>> {
        let case_insensitive = !query.is_japanese;
        let regexes: Vec<Regex> = query
            .query
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|term| query.matcher.compile(term, case_insensitive))
            .collect::<Result<_>>()?;

        let positions = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, hit)| {
                let entry = hit.entry();
                if query.is_japanese {
                    entry
                        .headwords()
                        .any(|text| regexes.iter().any(|re| re.is_match(text)))
                } else {
                    regexes.iter().any(|re| re.is_match(&entry.english))
                }
            })
            .map(|(position, _)| position)
            .collect();

        Ok(positions)
    }

    /// Write the index as a bincode file
    pub fn save(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)
            .map_err(|e| DictError::IndexCache(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Read an index written by [`DictionaryIndex::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let index: Self = bincode::deserialize_from(reader)
            .map_err(|e| DictError::IndexCache(format!("Failed to read {}: {}", path.display(), e)))?;

        if index.version != INDEX_VERSION {
            return Err(DictError::IndexCache(format!(
                "{} has version {}, expected {}",
                path.display(),
                index.version,
                INDEX_VERSION
            )));
        }
        Ok(index)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.entries.len(),
            keys: self.keys.len(),
        }
    }
}

impl From<LoadedDictionary> for DictionaryIndex {
    fn from(loaded: LoadedDictionary) -> Self {
        let mut index = Self::new(loaded.dict_type, loaded.entries);
        index.encoding = loaded.encoding.map(str::to_string);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryLoader;
    use crate::romanization::RomanizationEnum;
    use tempfile::TempDir;

    const EDICT: &str = "\
食べる [たべる] /(v1,vt) to eat/(P)/
猫 [ねこ] /(n) cat/(P)/
ねこ舌 [ねこじた] /(n) aversion to very hot food/
子猫 [こねこ] /(n) kitten/
ネコ /(n) (uk) cat (zoology)/
";

    fn index() -> DictionaryIndex {
        DictionaryLoader::parse_text(DictType::Edict, EDICT).into()
    }

    fn japanese(hits: &[&SearchHit]) -> Vec<String> {
        hits.iter().map(|h| h.entry().japanese().to_string()).collect()
    }

    #[test]
    fn test_index_creation() {
        let index = index();
        assert_eq!(index.len(), 5);
        assert!(index.stats().keys > 5);
        assert_eq!(index.dict_type(), DictType::Edict);
    }

    #[test]
    fn test_exact_japanese() {
        let index = index();
        let q = SearchQuery::search_for_romaji("neko", RomanizationEnum::Hepburn, true, false, false);
        let hits = index.search(&q).unwrap();
        assert_eq!(japanese(&hits), vec!["猫", "ネコ"]);
    }

    #[test]
    fn test_exact_not_found() {
        let index = index();
        let q = SearchQuery::search_for_romaji("inu", RomanizationEnum::Hepburn, true, false, false);
        assert!(index.search(&q).unwrap().is_empty());
    }

    #[test]
    fn test_exact_english() {
        let index = index();
        let q = SearchQuery::search_for_english("Cat", true, false);
        let hits = index.search(&q).unwrap();
        assert_eq!(japanese(&hits), vec!["猫", "ネコ"]);
    }

    #[test]
    fn test_substring_japanese() {
        let index = index();
        let q = SearchQuery::search_for_romaji("neko", RomanizationEnum::Hepburn, false, false, false);
        let hits = index.search(&q).unwrap();
        assert_eq!(japanese(&hits), vec!["猫", "ねこ舌", "子猫", "ネコ"]);
    }

    #[test]
    fn test_starts_and_ends_with() {
        let index = index();
        let q = SearchQuery::search_jp_romaji("neko", RomanizationEnum::Hepburn, MatcherEnum::StartsWith);
        assert_eq!(japanese(&index.search(&q).unwrap()), vec!["猫", "ねこ舌", "ネコ"]);

        let q = SearchQuery::search_jp_romaji("neko", RomanizationEnum::Hepburn, MatcherEnum::EndsWith);
        assert_eq!(japanese(&index.search(&q).unwrap()), vec!["猫", "子猫", "ネコ"]);
    }

    #[test]
    fn test_substring_english_case_insensitive() {
        let index = index();
        let q = SearchQuery::search_for_english("HOT FOOD", false, false);
        assert_eq!(japanese(&index.search(&q).unwrap()), vec!["ねこ舌"]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let index = index();
        let q = SearchQuery::search_for_english("(n", false, false);
        assert_eq!(index.search(&q).unwrap().len(), 4);
    }

    #[test]
    fn test_empty_query() {
        let index = index();
        let q = SearchQuery::new(DictType::Edict);
        assert!(matches!(index.search(&q), Err(DictError::EmptyQuery)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edict.idx");
        let index = index();
        index.save(&path).unwrap();

        let loaded = DictionaryIndex::load(&path).unwrap();
        assert_eq!(loaded.stats(), index.stats());
        assert_eq!(loaded.entries(), index.entries());
        assert_eq!(loaded.encoding(), None);
    }

    #[test]
    fn test_encoding_survives_cache() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("edict"), EDICT).unwrap();
        let loader = DictionaryLoader::new(dir.path(), encoding_rs::UTF_8);
        let index = DictionaryIndex::from(loader.load(DictType::Edict).unwrap());
        assert_eq!(index.encoding(), Some("UTF-8"));

        let path = dir.path().join("edict.idx");
        index.save(&path).unwrap();
        assert_eq!(DictionaryIndex::load(&path).unwrap().encoding(), Some("UTF-8"));
    }

    #[test]
    fn test_load_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edict.idx");
        std::fs::write(&path, b"not an index").unwrap();
        assert!(matches!(
            DictionaryIndex::load(&path),
            Err(DictError::IndexCache(_))
        ));
    }
}
