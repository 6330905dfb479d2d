#![allow(dead_code)]

use std::path::PathBuf;

use llmsh_db::CacheDb;
use tempfile::TempDir;

pub struct TestCache {
    pub _dir: TempDir,
    pub db: CacheDb,
    pub path: PathBuf,
}

pub fn setup_cache() -> TestCache {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cache.db");
    let db = CacheDb::open(&path).expect("open cache");
    TestCache {
        _dir: dir,
        db,
        path,
    }
}

pub fn insert_entries(db: &CacheDb, entries: &[(&str, &str, i64)]) {
    for (fingerprint, command, at) in entries {
        db.set_at(fingerprint, command, *at).expect("set entry");
    }
}

pub fn fingerprints(db: &CacheDb) -> Vec<String> {
    db.list_entries()
        .expect("list entries")
        .into_iter()
        .map(|entry| entry.fingerprint)
        .collect()
}
