use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Storage backend for rendered pages.
pub trait PageCache: Send + Sync {
    /// Store `body` under `key` for `lifetime`.
    fn store(&self, key: &str, body: &[u8], lifetime: Duration);
    /// Fetch a page that has not expired yet.
    fn fetch(&self, key: &str) -> Option<Vec<u8>>;
}

/// Process-local page cache.
#[derive(Debug, Default)]
pub struct MemoryPageCache {
    entries: RwLock<HashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryPageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pages, including ones that expired since the last store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageCache for MemoryPageCache {
    /// Expired pages are purged on every store.
    fn store(&self, key: &str, body: &[u8], lifetime: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            let now = Instant::now();
            entries.retain(|_, (_, expires_at)| now < *expires_at);
            entries.insert(key.to_string(), (body.to_vec(), now + lifetime));
        }
    }

    fn fetch(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().ok()?;
        let (body, expires_at) = entries.get(key)?;
        (Instant::now() < *expires_at).then(|| body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_fetch() {
        let cache = MemoryPageCache::new();
        cache.store("Home/index", b"hello", Duration::from_secs(60));
        assert_eq!(cache.fetch("Home/index"), Some(b"hello".to_vec()));
        assert_eq!(cache.fetch("Home/other"), None);
    }

    #[test]
    fn test_expired_entry_not_served() {
        let cache = MemoryPageCache::new();
        cache.store("k", b"v", Duration::ZERO);
        assert_eq!(cache.fetch("k"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_purges_expired_pages() {
        let cache = MemoryPageCache::new();
        cache.store("Home/index?page=1", b"one", Duration::ZERO);
        cache.store("Home/index?page=2", b"two", Duration::ZERO);
        cache.store("Home/index?page=3", b"three", Duration::from_secs(60));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fetch("Home/index?page=3"), Some(b"three".to_vec()));
    }
}
