//! Scoped string interning for a single parse.
//!
//! Adversarial type strings frequently repeat the same substrings (the same
//! generic argument name dozens of times, the same component name on every
//! leaf). A [`StringCache`] deduplicates those repeats so the resulting tree
//! shares one allocation per distinct string. The cache is a plain value with
//! an explicit lifetime: the parser creates one at the start of a top-level
//! parse, threads it through the descent, and drops it when the parse
//! returns. It is never shared across threads or across parses, and holds no
//! references once its scope closes.

use std::collections::HashSet;
use std::sync::Arc;

/// A short-lived intern table scoped to one logical operation.
#[derive(Debug, Default)]
pub(crate) struct StringCache {
    entries: HashSet<Arc<str>>,
}

impl StringCache {
    /// Opens an empty cache.
    pub(crate) fn new() -> Self {
        StringCache::default()
    }

    /// Returns a shared copy of `text`, allocating only on first sight.
    pub(crate) fn get_or_intern(&mut self, text: &str) -> Arc<str> {
        if let Some(existing) = self.entries.get(text) {
            return Arc::clone(existing);
        }

        let interned: Arc<str> = Arc::from(text);
        self.entries.insert(Arc::clone(&interned));
        interned
    }
}
