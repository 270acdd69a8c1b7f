use std::collections::HashMap;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

/// Keyed cache with per-entry expiry, checked lazily on read. No
/// background sweep: at the expected sizes (one entry per distinct editor
/// query) stale entries simply wait for their next lookup.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, Entry<V>>,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fetch a live entry. Expired entries are dropped and read as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(e) if e.expires_at > Instant::now() => Some(e.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("q", 7);
        assert_eq!(cache.get("q"), Some(7));
    }

    #[test]
    fn expired_entry_reads_as_miss() {
        let mut cache = TtlCache::new(Duration::from_millis(5));
        cache.insert("q", 7);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("q"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_drops_entry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("q", 7);
        cache.remove("q");
        assert_eq!(cache.get("q"), None);
    }
}
