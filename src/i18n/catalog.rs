use rust_embed::RustEmbed;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::errors::{I18nError, Result};
use crate::fileio;
use super::Locale;

/// 嵌入 messages 目录下的语言包（en.json / zh.json）
#[derive(RustEmbed)]
#[folder = "messages/"]
#[include = "*.json"]
struct MessageAssets;

/// What a full dot-path points at inside a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// 字符串叶子节点
    Text(String),
    /// 中间节点（对象或数组）
    Branch,
    /// 非字符串的标量：数字、布尔、null
    Other,
}

impl Entry {
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::Text(_) => "text",
            Entry::Branch => "branch",
            Entry::Other => "other",
        }
    }
}

/// One locale's messages, precompiled from nested JSON into a flat
/// `full.dot.path -> Entry` map so a lookup is a single hash probe.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, Entry>,
}

impl Dictionary {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let mut entries = HashMap::new();
        // 根节点本身不可寻址，只展开其子节点
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if key.contains('.') {
                        log::debug!("Skipping unreachable dictionary key: {}", key);
                        continue;
                    }
                    flatten_into(child, key, &mut entries);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    flatten_into(child, &index.to_string(), &mut entries);
                }
            }
            _ => log::warn!("Dictionary root is not an object; no keys loaded"),
        }
        Self { entries }
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// 仅当路径指向字符串叶子时返回文本
    pub fn text(&self, path: &str) -> Option<&str> {
        match self.entries.get(path) {
            Some(Entry::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// All text leaf paths, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Text(_)))
            .map(|(path, _)| path.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(value: &Value, path: &str, entries: &mut HashMap<String, Entry>) {
    match value {
        Value::Object(map) => {
            entries.insert(path.to_string(), Entry::Branch);
            for (key, child) in map {
                // 含 '.' 的键无法通过点分路径访问
                if key.contains('.') {
                    log::debug!("Skipping unreachable dictionary key: {}.{}", path, key);
                    continue;
                }
                flatten_into(child, &format!("{}.{}", path, key), entries);
            }
        }
        Value::Array(items) => {
            entries.insert(path.to_string(), Entry::Branch);
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &format!("{}.{}", path, index), entries);
            }
        }
        Value::String(s) => {
            entries.insert(path.to_string(), Entry::Text(s.clone()));
        }
        _ => {
            entries.insert(path.to_string(), Entry::Other);
        }
    }
}

/// Every supported locale's dictionary, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    dictionaries: BTreeMap<Locale, Dictionary>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从编译期嵌入的语言包构建；解析失败的语言以空字典代替，查找会回退到 key
    pub fn embedded() -> Self {
        let mut catalog = Self::new();
        for locale in Locale::ALL {
            match Self::load_embedded(locale) {
                Ok(dictionary) => {
                    log::debug!("Loaded {} embedded messages for {}", dictionary.len(), locale);
                    catalog.insert(locale, dictionary);
                }
                Err(e) => {
                    log::error!("{}", e);
                    catalog.insert(locale, Dictionary::default());
                }
            }
        }
        catalog
    }

    fn load_embedded(locale: Locale) -> Result<Dictionary> {
        let file_name = format!("{}.json", locale.code());
        let asset = MessageAssets::get(&file_name).ok_or_else(|| I18nError::DictionaryError {
            locale: locale.code().to_string(),
            message: format!("embedded asset {} is missing", file_name),
        })?;
        let content = String::from_utf8_lossy(asset.data.as_ref());
        Dictionary::from_json_str(&content).map_err(|e| I18nError::DictionaryError {
            locale: locale.code().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads `<code>.json` for every supported locale from `dir`.
    /// A missing or malformed file is an error; nothing is partially loaded.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();
        for locale in Locale::ALL {
            let path = dir.join(format!("{}.json", locale.code()));
            let content = fileio::read(&path)?;
            let dictionary = Dictionary::from_json_str(&content).map_err(|e| I18nError::DictionaryError {
                locale: locale.code().to_string(),
                message: format!("{}: {}", path.display(), e),
            })?;
            log::info!("Loaded {} messages for {} from {}", dictionary.len(), locale, path.display());
            catalog.insert(locale, dictionary);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, locale: Locale, dictionary: Dictionary) {
        self.dictionaries.insert(locale, dictionary);
    }

    pub fn dictionary(&self, locale: Locale) -> Option<&Dictionary> {
        self.dictionaries.get(&locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        self.dictionaries.keys().copied()
    }
}
