use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{GuardError, Result, StoreErrorKind, StoreName};

use super::{BlacklistStore, MemoryBlacklist, MemoryWhitelist, WhitelistStore};

/// Maximum nesting depth for `file:` include directives.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Parse a list file: one entry per line.
///
/// Lines starting with `#` are comments, as is anything after a whitespace
/// followed by `#`. A bare `#` inside an entry is kept since URLs carry
/// fragments. `file: /path/to/list` includes another list.
pub fn parse_entries(text: &str) -> Result<Vec<String>> {
    parse_entries_inner(text, 0)
}

fn parse_entries_inner(text: &str, depth: usize) -> Result<Vec<String>> {
    let mut entries = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line
            .char_indices()
            .find(|(i, c)| c.is_whitespace() && line[*i..].trim_start().starts_with('#'))
            .map_or(line, |(i, _)| line[..i].trim_end());

        if let Some(path) = line.strip_prefix("file:") {
            if depth >= MAX_INCLUDE_DEPTH {
                return Err(GuardError::ListParse {
                    line: line_num,
                    message: format!(
                        "file include depth exceeds maximum ({MAX_INCLUDE_DEPTH}), possible circular include"
                    ),
                });
            }
            entries.extend(parse_entries_from_file_inner(path.trim(), depth + 1)?);
            continue;
        }

        entries.push(line.to_string());
    }

    Ok(entries)
}

/// Parse a list file from disk.
pub fn parse_entries_from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    parse_entries_from_file_inner(path, 0)
}

fn parse_entries_from_file_inner(path: impl AsRef<Path>, depth: usize) -> Result<Vec<String>> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_entries_inner(&text, depth)
}

/// Load a list once and keep it until `reload` is called.
fn load_cached<T>(
    cache: &RwLock<Option<Arc<T>>>,
    path: &Path,
    store: StoreName,
    build: fn(Vec<String>) -> T,
) -> Result<Arc<T>> {
    if let Some(loaded) = cache.read().as_ref() {
        return Ok(loaded.clone());
    }

    let mut guard = cache.write();
    // Another reader may have loaded it while we waited
    if let Some(loaded) = guard.as_ref() {
        return Ok(loaded.clone());
    }

    let entries = parse_entries_from_file(path).map_err(|e| match e {
        GuardError::Io(io) => GuardError::unavailable(
            store,
            format!("failed to read '{}': {}", path.display(), io),
        ),
        other => GuardError::Store {
            kind: StoreErrorKind::InvalidData,
            store,
            message: format!("failed to parse '{}': {}", path.display(), other),
        },
    })?;

    log::debug!(
        "Loaded {} {} entries from {}",
        entries.len(),
        store,
        path.display()
    );

    let loaded = Arc::new(build(entries));
    *guard = Some(loaded.clone());
    Ok(loaded)
}

/// Whitelist backed by a list file
pub struct FileWhitelist {
    path: PathBuf,
    cache: RwLock<Option<Arc<MemoryWhitelist>>>,
}

impl FileWhitelist {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached entries; the next lookup reads the file again.
    pub fn reload(&self) {
        *self.cache.write() = None;
    }

    fn loaded(&self) -> Result<Arc<MemoryWhitelist>> {
        load_cached(
            &self.cache,
            &self.path,
            StoreName::Whitelist,
            MemoryWhitelist::from_entries,
        )
    }
}

impl WhitelistStore for FileWhitelist {
    fn domains(&self) -> Result<HashSet<String>> {
        self.loaded()?.domains()
    }
}

/// Blacklist backed by a list file
pub struct FileBlacklist {
    path: PathBuf,
    cache: RwLock<Option<Arc<MemoryBlacklist>>>,
}

impl FileBlacklist {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached entries; the next lookup reads the file again.
    pub fn reload(&self) {
        *self.cache.write() = None;
    }

    fn loaded(&self) -> Result<Arc<MemoryBlacklist>> {
        load_cached(
            &self.cache,
            &self.path,
            StoreName::Blacklist,
            MemoryBlacklist::from_entries,
        )
    }
}

impl BlacklistStore for FileBlacklist {
    fn find_url(&self, url: &str) -> Result<Option<String>> {
        self.loaded()?.find_url(url)
    }

    fn find_domain(&self, domain: &str) -> Result<Option<String>> {
        self.loaded()?.find_domain(domain)
    }

    fn find_containing(&self, fragment: &str) -> Result<Option<String>> {
        self.loaded()?.find_containing(fragment)
    }
}
