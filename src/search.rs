// EDICT-Search Search Engine
// Main API that loads dictionaries on demand and ranks results

use crate::config::Config;
use crate::dictionary::DictionaryLoader;
use crate::entry::SearchHit;
use crate::matcher::{DictionaryIndex, IndexStats};
use crate::query::{SearchOptions, SearchQuery};
use crate::romanization::RomanizationEnum;
use crate::types::{DictError, DictType, MatcherEnum, Result};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Main dictionary search engine
///
/// Each dictionary is indexed the first time it is queried. A cached
/// bincode index next to the source file is used when it is not older than
/// the source and was decoded with the configured encoding; otherwise the
/// source is parsed and the cache rewritten.
pub struct DictSearch {
    loader: DictionaryLoader,
    romanization: RomanizationEnum,
    indexes: Mutex<FxHashMap<DictType, Arc<DictionaryIndex>>>,
}

impl DictSearch {
    /// Create a search engine reading dictionaries through `loader`
    pub fn new(loader: DictionaryLoader, romanization: RomanizationEnum) -> Self {
        Self {
            loader,
            romanization,
            indexes: Mutex::new(FxHashMap::default()),
        }
    }

    /// Create a search engine from the resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DictionaryLoader::from_config(config),
            config.effective_romanization(),
        )
    }

    pub fn loader(&self) -> &DictionaryLoader {
        &self.loader
    }

    pub fn romanization(&self) -> RomanizationEnum {
        self.romanization
    }

    /// Check whether `dict_type` can be searched
    pub fn is_available(&self, dict_type: DictType) -> bool {
        self.indexes_guard().contains_key(&dict_type) || self.loader.check(dict_type)
    }

    /// Use an index built elsewhere instead of reading the dictionary directory
    pub fn insert_index(&self, index: DictionaryIndex) {
        self.indexes_guard().insert(index.dict_type(), Arc::new(index));
    }

    /// Execute a search query
    ///
    /// EDICT results put exact matches first, then common words, then
    /// shorter words. KANJIDIC results follow the order of the query terms.
    /// Example sentences keep corpus order.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let index = self.index(query.dict_type)?;
        let mut hits: Vec<SearchHit> = index.search(query)?.into_iter().cloned().collect();

        match query.dict_type {
            DictType::Edict => {
                let exact = SearchQuery {
                    matcher: MatcherEnum::Exact,
                    ..query.clone()
                };
                hits.sort_by_cached_key(|hit| {
                    let entry = hit.entry();
                    (
                        !exact.matches_entry(entry),
                        !entry.is_common,
                        entry.japanese().chars().count(),
                    )
                });
            }
            DictType::Kanjidic => {
                hits.sort_by_cached_key(|hit| {
                    let kanji = hit.entry().japanese();
                    query
                        .query
                        .iter()
                        .position(|term| term == kanji)
                        .unwrap_or(usize::MAX)
                });
            }
            DictType::Tanaka => {}
        }

        debug!("{} -> {} hits", query, hits.len());
        Ok(hits)
    }

    /// Search with a limit on the number of results
    pub fn search_limit(&self, query: &SearchQuery, limit: usize) -> Result<Vec<SearchHit>> {
        let mut hits = self.search(query)?;
        hits.truncate(limit);
        Ok(hits)
    }

    /// Build a query from free text and search form flags, then run it
    ///
    /// Blank input yields no results.
    pub fn search_text(&self, text: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        match options.resolve(text, self.romanization) {
            Some(query) => self.search(&query),
            None => Ok(Vec::new()),
        }
    }

    /// Parse the source file again and rewrite the index cache
    pub fn rebuild_index(&self, dict_type: DictType) -> Result<IndexStats> {
        let index = self.build_index(dict_type)?;
        let stats = index.stats();
        self.indexes_guard().insert(dict_type, Arc::new(index));
        Ok(stats)
    }

    /// Statistics of the dictionaries loaded so far
    pub fn stats(&self) -> Vec<(DictType, IndexStats)> {
        let indexes = self.indexes_guard();
        DictType::ALL
            .into_iter()
            .filter_map(|t| indexes.get(&t).map(|index| (t, index.stats())))
            .collect()
    }

    fn index(&self, dict_type: DictType) -> Result<Arc<DictionaryIndex>> {
        if let Some(index) = self.indexes_guard().get(&dict_type) {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(self.open_index(dict_type)?);
        self.indexes_guard().insert(dict_type, Arc::clone(&index));
        Ok(index)
    }

    fn open_index(&self, dict_type: DictType) -> Result<DictionaryIndex> {
        let source = self.loader.source_path(dict_type);
        let cache = self.loader.index_path(dict_type);

        if cache.is_file() && !is_newer(&source, &cache) {
            let encoding = self.loader.encoding().name();
            match DictionaryIndex::load(&cache) {
                Ok(index) if index.dict_type() != dict_type => {
                    warn!("{} belongs to another dictionary, rebuilding", cache.display())
                }
                Ok(index) if index.encoding().is_some_and(|e| e != encoding) => warn!(
                    "{} was decoded as {}, rebuilding as {}",
                    cache.display(),
                    index.encoding().unwrap_or_default(),
                    encoding
                ),
                Ok(index) => {
                    debug!("Using cached index {}", cache.display());
                    return Ok(index);
                }
                Err(e) => warn!("{}, rebuilding", e),
            }
        }

        if !source.is_file() {
            return Err(DictError::DictionaryMissing {
                dict_type,
                path: source,
            });
        }
        self.build_index(dict_type)
    }

    fn build_index(&self, dict_type: DictType) -> Result<DictionaryIndex> {
        let loaded = self.loader.load(dict_type)?;
        if loaded.skipped > 0 {
            warn!("{}: skipped {} malformed lines", dict_type, loaded.skipped);
        }
        let index = DictionaryIndex::from(loaded);

        let cache = self.loader.index_path(dict_type);
        match index.save(&cache) {
            Ok(()) => info!("Indexed {} entries of {} into {}", index.len(), dict_type, cache.display()),
            Err(e) => warn!("Could not cache index: {}", e),
        }
        Ok(index)
    }

    fn indexes_guard(&self) -> MutexGuard<'_, FxHashMap<DictType, Arc<DictionaryIndex>>> {
        self.indexes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `true` if `a` was modified after `b`
fn is_newer(a: &Path, b: &Path) -> bool {
    let modified = |p: &Path| std::fs::metadata(p).and_then(|m| m.modified()).ok();
    match (modified(a), modified(b)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

impl std::fmt::Debug for DictSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictSearch")
            .field("dict_dir", &self.loader.dict_dir())
            .field("romanization", &self.romanization)
            .field("loaded", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EDICT: &str = "\
猫舌 [ねこじた] /(n) aversion to very hot food/
ねこ /(n) cat/
猫 [ねこ] /(n) cat/(P)/
子猫 [こねこ] /(n) kitten/(P)/
食べる [たべる] /(v1,vt) to eat/(P)/
";

    const KANJIDIC: &str = "\
日 467C U65e5 B72 G1 S4 P3-3-1 ニチ ジツ ひ -び -か T1 あ あき {day} {sun} {Japan}
本 4B5C U672c B75 G1 S5 P4-5-3 ホン もと T1 まと {book} {present} {main}
";

    fn create_search() -> (TempDir, DictSearch) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("edict"), EDICT).unwrap();
        std::fs::write(dir.path().join("kanjidic"), KANJIDIC).unwrap();
        let loader = DictionaryLoader::new(dir.path(), encoding_rs::UTF_8);
        (dir, DictSearch::new(loader, RomanizationEnum::Hepburn))
    }

    fn japanese(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.entry().japanese()).collect()
    }

    #[test]
    fn test_edict_ordering() -> Result<()> {
        let (_dir, search) = create_search();
        let q = SearchQuery::search_for_romaji("neko", RomanizationEnum::Hepburn, false, false, false);
        let hits = search.search(&q)?;
        assert_eq!(japanese(&hits), vec!["猫", "ねこ", "子猫", "猫舌"]);
        Ok(())
    }

    #[test]
    fn test_kanjidic_query_order() -> Result<()> {
        let (_dir, search) = create_search();
        let hits = search.search(&SearchQuery::search_kanji("本日"))?;
        assert_eq!(japanese(&hits), vec!["本", "日"]);
        Ok(())
    }

    #[test]
    fn test_search_limit() -> Result<()> {
        let (_dir, search) = create_search();
        let q = SearchQuery::search_for_english("cat", false, false);
        assert_eq!(search.search_limit(&q, 1)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_search_text() -> Result<()> {
        let (_dir, search) = create_search();
        let options = SearchOptions {
            japanese: true,
            deinflect: true,
            ..Default::default()
        };
        let hits = search.search_text("tabemashita", &options)?;
        assert_eq!(japanese(&hits), vec!["食べる"]);
        assert!(search.search_text("  ", &options)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_cache_written_and_reused() -> Result<()> {
        let (dir, search) = create_search();
        search.search(&SearchQuery::search_for_english("cat", true, false))?;
        assert!(dir.path().join("edict.idx").is_file());

        std::fs::remove_file(dir.path().join("edict")).unwrap();
        let reopened = DictSearch::new(search.loader().clone(), RomanizationEnum::Hepburn);
        let hits = reopened.search(&SearchQuery::search_for_english("cat", true, false))?;
        assert_eq!(hits.len(), 2);
        Ok(())
    }

    #[test]
    fn test_cache_rebuilt_when_encoding_changes() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let (bytes, _, _) = encoding_rs::EUC_JP.encode(EDICT);
        std::fs::write(dir.path().join("edict"), &bytes).unwrap();
        let neko = SearchQuery::search_for_romaji("neko", RomanizationEnum::Hepburn, true, false, false);

        let utf8 = DictSearch::new(
            DictionaryLoader::new(dir.path(), encoding_rs::UTF_8),
            RomanizationEnum::Hepburn,
        );
        assert!(utf8.search(&neko)?.is_empty());
        assert!(dir.path().join("edict.idx").is_file());

        let euc_jp = DictSearch::new(
            DictionaryLoader::new(dir.path(), encoding_rs::EUC_JP),
            RomanizationEnum::Hepburn,
        );
        assert_eq!(japanese(&euc_jp.search(&neko)?), vec!["猫", "ねこ"]);
        Ok(())
    }

    #[test]
    fn test_missing_dictionary() {
        let (_dir, search) = create_search();
        assert!(!search.is_available(DictType::Tanaka));
        let q = SearchQuery::search_for_english("cat", false, true);
        assert!(matches!(
            search.search(&q),
            Err(DictError::DictionaryMissing { .. })
        ));
    }

    #[test]
    fn test_stats() -> Result<()> {
        let (_dir, search) = create_search();
        assert!(search.stats().is_empty());
        search.search(&SearchQuery::search_kanji("日"))?;
        let stats = search.stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].0, DictType::Kanjidic);
        assert_eq!(stats[0].1.entries, 2);
        Ok(())
    }

    #[test]
    fn test_rebuild_index() -> Result<()> {
        let (_dir, search) = create_search();
        let stats = search.rebuild_index(DictType::Edict)?;
        assert_eq!(stats.entries, 5);
        Ok(())
    }
}
