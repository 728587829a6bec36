// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::{io::Write, path::Path, sync::Arc};

use tempfile::NamedTempFile;
use xpath_rule_coverage::cache::{FileCache, file_text};

#[test]
fn test_new_cache_is_empty() {
    let cache = FileCache::new(8);

    assert!(cache.get(Path::new("/never/inserted.xml")).is_none());
}

#[test]
fn test_insert_and_get() {
    let mut cache = FileCache::new(8);
    let text: Arc<str> = Arc::from("<ruleset/>");
    cache.insert(Path::new("/rules/a.xml"), Arc::clone(&text));

    let cached = cache.get(Path::new("/rules/a.xml")).unwrap();
    assert_eq!(&*cached, "<ruleset/>");
}

#[test]
fn test_get_miss_on_other_path() {
    let mut cache = FileCache::new(8);
    cache.insert(Path::new("/rules/a.xml"), Arc::from("a"));

    assert!(cache.get(Path::new("/rules/b.xml")).is_none());
}

#[test]
fn test_eviction_keeps_newest_entry() {
    let mut cache = FileCache::new(2);
    cache.insert(Path::new("/rules/a.xml"), Arc::from("a"));
    cache.insert(Path::new("/rules/b.xml"), Arc::from("b"));
    cache.insert(Path::new("/rules/c.xml"), Arc::from("c"));

    assert!(cache.get(Path::new("/rules/c.xml")).is_some());
}

#[test]
fn test_file_text_reads_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "<ruleset name=\"demo\"/>").unwrap();

    let text = file_text(file.path()).unwrap();
    assert_eq!(&*text, "<ruleset name=\"demo\"/>");
}

#[test]
fn test_file_text_serves_cached_copy() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "original").unwrap();

    let first = file_text(file.path()).unwrap();
    let second = file_text(file.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_file_text_missing_file() {
    assert!(file_text(Path::new("/nonexistent/rules.xml")).is_none());
}
