//! Map-name catalog.
//!
//! The list of valid map names is fetched from the server as newline
//! delimited text. It has a single producer (the loader) and any number of
//! readers, so the whole list is swapped atomically on update.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tracing::debug;

/// Parse newline-delimited map names: trim, drop blank lines, keep the first
/// occurrence of each name, preserve order.
pub fn parse_map_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// Shared, replace-on-update store of map names.
///
/// `None` until the loader has produced a list. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    inner: Arc<RwLock<Option<Arc<[String]>>>>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list.
    pub fn replace(&self, maps: Vec<String>) {
        debug!(count = maps.len(), "map catalog replaced");
        let maps: Arc<[String]> = maps.into();
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(maps),
            Err(poisoned) => *poisoned.into_inner() = Some(maps),
        }
    }

    /// Current list, or `None` when no list has been loaded yet.
    pub fn snapshot(&self) -> Option<Arc<[String]>> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }
}
