//! # Local Filesystem Backend
//!
//! One file per key under `<root>/<namespace>/`. File names are the key in
//! URL-safe unpadded base64 so arbitrary ids (URIs included) stay one path
//! component. Keys whose encoded name would pass `MAX_ENCODED_NAME` are
//! stored under `~<sha256 hex>` instead, with the key written ahead of the
//! value as `<len>\n<key>`. Each write lands in its own temp file and is
//! renamed into place. Scans return values ordered by key.

use std::borrow::Cow;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::backend::KeyValueStore;
use super::context::OpContext;
use super::errors::{KvError, KvResult};

const TEMP_SUFFIX: &str = ".tmp";

/// Longest base64 file name; leaves room for the temp suffix under NAME_MAX
const MAX_ENCODED_NAME: usize = 200;

/// Not in the URL-safe base64 alphabet
const HASHED_PREFIX: char = '~';

/// Local filesystem key-value store
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
    sync_writes: bool,
}

/// Where a key lives on disk
struct KeyFile {
    dir: PathBuf,
    name: String,
    hashed: bool,
}

impl KeyFile {
    fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(
            "{}.{}{}",
            self.name,
            Uuid::new_v4().simple(),
            TEMP_SUFFIX
        ))
    }
}

impl LocalStore {
    /// Create a new local store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sync_writes: true,
        }
    }

    /// Whether to fsync each value before it is renamed into place
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: &str) -> KvResult<PathBuf> {
        if namespace.is_empty() || namespace.contains(['/', '\\']) || namespace.starts_with('.') {
            return Err(KvError::InvalidKey(format!("namespace '{}'", namespace)));
        }
        Ok(self.root.join(namespace))
    }

    fn key_file(&self, namespace: &str, key: &str) -> KvResult<KeyFile> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("empty key".to_string()));
        }
        let dir = self.namespace_dir(namespace)?;
        let encoded = URL_SAFE_NO_PAD.encode(key);
        if encoded.len() <= MAX_ENCODED_NAME {
            return Ok(KeyFile {
                dir,
                name: encoded,
                hashed: false,
            });
        }
        Ok(KeyFile {
            dir,
            name: hashed_name(key),
            hashed: true,
        })
    }
}

fn hashed_name(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{}{:x}", HASHED_PREFIX, hasher.finalize())
}

fn decode_key(file_name: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(file_name).ok()?;
    String::from_utf8(bytes).ok()
}

/// Prefix a hashed file's value with the key it belongs to
fn with_key_header(key: &str, value: &[u8]) -> Vec<u8> {
    let mut data = format!("{}\n{}", key.len(), key).into_bytes();
    data.extend_from_slice(value);
    data
}

/// Split a hashed file into its key and value
fn split_key_header(data: &[u8]) -> Option<(String, &[u8])> {
    let newline = data.iter().position(|b| *b == b'\n')?;
    let len: usize = std::str::from_utf8(&data[..newline]).ok()?.parse().ok()?;
    let rest = &data[newline + 1..];
    if rest.len() < len {
        return None;
    }
    let key = String::from_utf8(rest[..len].to_vec()).ok()?;
    Some((key, &rest[len..]))
}

fn write_file(path: &Path, data: &[u8], sync: bool) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

impl KeyValueStore for LocalStore {
    fn write(&self, ctx: &OpContext, namespace: &str, key: &str, value: &[u8]) -> KvResult<()> {
        ctx.check()?;
        let file = self.key_file(namespace, key)?;
        fs::create_dir_all(&file.dir)?;

        let data: Cow<'_, [u8]> = if file.hashed {
            Cow::Owned(with_key_header(key, value))
        } else {
            Cow::Borrowed(value)
        };

        let temp_path = file.temp_path();
        let result = write_file(&temp_path, &data, self.sync_writes)
            .and_then(|()| fs::rename(&temp_path, file.path()));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;
        Ok(())
    }

    fn read(&self, ctx: &OpContext, namespace: &str, key: &str) -> KvResult<Vec<u8>> {
        ctx.check()?;
        let file = self.key_file(namespace, key)?;
        let data = match fs::read(file.path()) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if !file.hashed {
            return Ok(data);
        }
        match split_key_header(&data) {
            Some((stored, value)) if stored == key => Ok(value.to_vec()),
            // Digest collision: the file belongs to another key
            Some(_) => Ok(Vec::new()),
            // Damaged header; hand back the raw bytes for the caller to reject
            None => Ok(data),
        }
    }

    fn read_all(&self, ctx: &OpContext, namespace: &str) -> KvResult<Vec<Vec<u8>>> {
        ctx.check()?;
        let dir = self.namespace_dir(namespace)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            ctx.check()?;
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            // Anything else not written by this store fails to decode
            let key = if name.starts_with(HASHED_PREFIX) {
                None
            } else {
                match decode_key(name) {
                    Some(key) => Some(key),
                    None => continue,
                }
            };

            let data = match fs::read(entry.path()) {
                Ok(data) => data,
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            if let Some(key) = key {
                entries.push((key, data));
                continue;
            }
            let header = split_key_header(&data).map(|(key, value)| (key, value.to_vec()));
            match header {
                Some(entry) => entries.push(entry),
                // Damaged header; sorts by file name and fails to decode upstream
                None => entries.push((name.to_string(), data)),
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries.into_iter().map(|(_, value)| value).collect())
    }

    fn delete(&self, ctx: &OpContext, namespace: &str, key: &str) -> KvResult<()> {
        ctx.check()?;
        let file = self.key_file(namespace, key)?;
        fs::remove_file(file.path()).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                KvError::KeyNotFound {
                    namespace: namespace.to_string(),
                    key: key.to_string(),
                }
            } else {
                e.into()
            }
        })
    }
}
