// EDICT-Search Dictionary Loader
// Reads and decodes dictionary source files from the dictionary directory

use crate::config::Config;
use crate::entry::SearchHit;
use crate::types::{DictError, DictType, Result};
use encoding_rs::Encoding;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Entries parsed from one dictionary file
#[derive(Debug, Clone)]
pub struct LoadedDictionary {
    pub dict_type: DictType,
    /// Parsed entries in file order
    pub entries: Vec<SearchHit>,
    /// Number of malformed lines that were skipped
    pub skipped: usize,
    /// Encoding the source file was decoded with; `None` for text parsed directly
    pub encoding: Option<&'static str>,
}

/// Locates and parses dictionary files
#[derive(Debug, Clone)]
pub struct DictionaryLoader {
    dict_dir: PathBuf,
    encoding: &'static Encoding,
}

impl DictionaryLoader {
    /// Create a loader for `dict_dir` reading files in `encoding`
    pub fn new(dict_dir: impl Into<PathBuf>, encoding: &'static Encoding) -> Self {
        Self {
            dict_dir: dict_dir.into(),
            encoding,
        }
    }

    /// Create a loader for an encoding given by its WHATWG label, e.g. `euc-jp`
    pub fn with_encoding_label(dict_dir: impl Into<PathBuf>, label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| DictError::Encoding(label.to_string()))?;
        Ok(Self::new(dict_dir, encoding))
    }

    /// Create a loader from the resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.effective_dict_dir(), config.effective_encoding())
    }

    pub fn dict_dir(&self) -> &Path {
        &self.dict_dir
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Path of the source file for `dict_type`
    pub fn source_path(&self, dict_type: DictType) -> PathBuf {
        self.dict_dir.join(dict_type.default_file_name())
    }

    /// Path of the cached index for `dict_type`
    pub fn index_path(&self, dict_type: DictType) -> PathBuf {
        self.dict_dir.join(dict_type.index_file_name())
    }

    /// Check whether the dictionary can be searched
    ///
    /// Either the source file or a previously built index must exist.
    pub fn check(&self, dict_type: DictType) -> bool {
        self.source_path(dict_type).is_file() || self.index_path(dict_type).is_file()
    }

    /// Read, decode and parse the source file of `dict_type`
    pub fn load(&self, dict_type: DictType) -> Result<LoadedDictionary> {
        let path = self.source_path(dict_type);
        if !path.is_file() {
            return Err(DictError::DictionaryMissing { dict_type, path });
        }

        let bytes = std::fs::read(&path)?;
        let (text, actual, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{} contains bytes that are not valid {}; they were replaced",
                path.display(),
                actual.name()
            );
        }

        let mut loaded = Self::parse_text(dict_type, &text);
        loaded.encoding = Some(self.encoding.name());
        debug!(
            "Loaded {} entries from {} ({} skipped)",
            loaded.entries.len(),
            path.display(),
            loaded.skipped
        );
        Ok(loaded)
    }

    /// Parse dictionary text already decoded to UTF-8
    ///
    /// Malformed lines are logged and counted rather than failing the load.
    pub fn parse_text(dict_type: DictType, text: &str) -> LoadedDictionary {
        let mut entries = Vec::new();
        let mut skipped = 0;

        for (index, line) in text.lines().enumerate() {
            match SearchHit::parse(dict_type, line) {
                Ok(Some(hit)) => entries.push(hit),
                Ok(None) => {}
                Err(e) => {
                    skipped += 1;
                    warn!("{}: {}", dict_type, e.at_line(index + 1));
                }
            }
        }

        LoadedDictionary {
            dict_type,
            entries,
            skipped,
            encoding: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EDICT: &str = "　？？？ /,EDICT, EDRDG/\n食べる [たべる] /(v1,vt) to eat/(P)/\nbroken line\nねこ /(n) cat/\n";

    #[test]
    fn test_parse_text_skips_bad_lines() {
        let loaded = DictionaryLoader::parse_text(DictType::Edict, EDICT);
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.skipped, 1);
        assert_eq!(loaded.entries[1].entry().japanese(), "ねこ");
    }

    #[test]
    fn test_load_utf8() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("edict"), EDICT).unwrap();

        let loader = DictionaryLoader::new(dir.path(), encoding_rs::UTF_8);
        assert!(loader.check(DictType::Edict));
        let loaded = loader.load(DictType::Edict).unwrap();
        assert_eq!(loaded.entries.len(), 2);
    }

    #[test]
    fn test_load_euc_jp() {
        let dir = TempDir::new().unwrap();
        let (bytes, _, _) = encoding_rs::EUC_JP.encode("猫 [ねこ] /(n) cat/(P)/\n");
        std::fs::write(dir.path().join("edict"), &bytes).unwrap();

        let loader = DictionaryLoader::new(dir.path(), encoding_rs::EUC_JP);
        let loaded = loader.load(DictType::Edict).unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.encoding, Some("EUC-JP"));
        assert_eq!(loaded.entries[0].entry().format_japanese(), "猫 [ねこ]");
    }

    #[test]
    fn test_missing_dictionary() {
        let dir = TempDir::new().unwrap();
        let loader = DictionaryLoader::new(dir.path(), encoding_rs::UTF_8);
        assert!(!loader.check(DictType::Kanjidic));
        let err = loader.load(DictType::Kanjidic).unwrap_err();
        assert!(matches!(
            err,
            DictError::DictionaryMissing {
                dict_type: DictType::Kanjidic,
                ..
            }
        ));
    }

    #[test]
    fn test_encoding_label() {
        let loader = DictionaryLoader::with_encoding_label("/data", "EUC-JP").unwrap();
        assert_eq!(loader.encoding(), encoding_rs::EUC_JP);
        assert!(matches!(
            DictionaryLoader::with_encoding_label("/data", "klingon"),
            Err(DictError::Encoding(_))
        ));
    }

    #[test]
    fn test_paths() {
        let loader = DictionaryLoader::new("/data", encoding_rs::UTF_8);
        assert_eq!(loader.source_path(DictType::Tanaka), PathBuf::from("/data/examples.utf"));
        assert_eq!(loader.index_path(DictType::Edict), PathBuf::from("/data/edict.idx"));
    }
}
