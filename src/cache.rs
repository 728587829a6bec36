use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, RwLock}
};

/// Global rule-file text cache
static FILE_CACHE: LazyLock<RwLock<FileCache>> =
    LazyLock::new(|| RwLock::new(FileCache::new(64)));

/// Cache of ruleset file contents keyed by path
///
/// Line location re-reads the same ruleset once per missing feature;
/// caching keeps that a single filesystem read per file.
pub struct FileCache {
    cache:    HashMap<PathBuf, Arc<str>>,
    max_size: usize
}

impl FileCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size),
            max_size
        }
    }

    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.cache.get(path).cloned()
    }

    pub fn insert(&mut self, path: &Path, text: Arc<str>) {
        // Simple eviction: clear half when full
        if self.cache.len() >= self.max_size {
            let keys: Vec<_> = self.cache.keys().take(self.max_size / 2).cloned().collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }

        self.cache.insert(path.to_path_buf(), text);
    }
}

/// Get ruleset file text, reading and caching it on first use
///
/// Returns `None` when the file cannot be read; callers degrade to
/// "no line annotation available" rather than failing.
pub fn file_text(path: &Path) -> Option<Arc<str>> {
    if let Some(text) = FILE_CACHE.read().ok()?.get(path) {
        return Some(text);
    }
    let text: Arc<str> = std::fs::read_to_string(path).ok()?.into();
    if let Ok(mut cache) = FILE_CACHE.write() {
        cache.insert(path, Arc::clone(&text));
    }
    Some(text)
}
