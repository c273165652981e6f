//! A persistent memo table on disk.
//!
//! Every entry is a JSON file `{dir}/{prefix}_{hash}.json` holding the pair `(key, value)`. The
//! hash only names the file, and an entry is used only if the stored key equals the requested
//! one. Files can be copied between machines or written by hand.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};

pub struct PersistentCache<K, V> {
    dir: PathBuf,
    prefix: String,
    hash: fn(&K) -> String,
    _marker: PhantomData<fn() -> V>,
}

impl<K, V> PersistentCache<K, V>
where
    K: Serialize + DeserializeOwned + Eq + Ord,
    V: Serialize + DeserializeOwned,
{
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, hash: fn(&K) -> String) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            hash,
            _marker: PhantomData,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &K) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", self.prefix, (self.hash)(key)))
    }

    fn read(path: &Path) -> anyhow::Result<(K, V)> {
        let f = File::open(path).with_context(|| format!("Failed to open {path:?}"))?;
        tracing::info!("Reading file: {}", path.to_string_lossy());
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("Failed to parse {path:?}"))
    }

    /// The stored value of `key`, if any.
    pub fn get(&self, key: &K) -> anyhow::Result<Option<V>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let (stored, value) = Self::read(&path)?;
        if &stored != key {
            tracing::warn!("{} holds a different key", path.to_string_lossy());
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Stores `value` as the value of `key`, replacing any previous entry with the same hash.
    pub fn insert(&self, key: &K, value: &V) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {:?}", self.dir))?;
        let path = self.path(key);
        // Write to a temporary file first so that an interrupted write leaves no partial entry.
        let tmp = path.with_extension("json.tmp");
        {
            let f = File::create(&tmp).with_context(|| format!("Failed to create {tmp:?}"))?;
            let mut writer = BufWriter::new(f);
            serde_json::to_writer(&mut writer, &(key, value))
                .with_context(|| format!("Failed to write {tmp:?}"))?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path).with_context(|| format!("Failed to move {tmp:?} to {path:?}"))?;
        tracing::info!("Closing file: {}", path.to_string_lossy());
        Ok(())
    }

    /// The stored value of `key`, computing and storing it if there is none.
    pub fn get_or_insert_with(&self, key: &K, f: impl FnOnce() -> V) -> anyhow::Result<V> {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }
        let value = f();
        self.insert(key, &value)?;
        Ok(value)
    }

    /// Every stored entry. A missing directory is an empty cache.
    pub fn dict(&self) -> anyhow::Result<BTreeMap<K, V>> {
        let mut result = BTreeMap::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(result),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read directory {:?}", self.dir))
            }
        };
        let start = format!("{}_", self.prefix);
        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|x| x.to_str()) else {
                continue;
            };
            if !(name.starts_with(&start) && name.ends_with(".json")) {
                continue;
            }
            let (key, value) = Self::read(&path)?;
            result.insert(key, value);
        }
        Ok(result)
    }
}
