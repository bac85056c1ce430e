//! Process-wide response cache for the resource query layer.
//!
//! Entries are keyed by user, resource kind and filter so two sessions
//! never see each other's data. Mutations invalidate every entry of the
//! affected resource kind for that user, synchronously, after the server
//! has acknowledged the change; the next read refetches.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user: i64,
    pub resource: &'static str,
    /// List filter (e.g. organization id for namespaces) or detail id.
    pub filter: Option<i64>,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    List,
    Detail,
}

impl CacheKey {
    pub fn list(user: i64, resource: &'static str, filter: Option<i64>) -> Self {
        Self {
            user,
            resource,
            filter,
            kind: EntryKind::List,
        }
    }

    pub fn detail(user: i64, resource: &'static str, id: i64) -> Self {
        Self {
            user,
            resource,
            filter: Some(id),
            kind: EntryKind::Detail,
        }
    }
}

struct Entry {
    value: serde_json::Value,
    fetched_at: Instant,
}

pub struct QueryCache {
    entries: DashMap<CacheKey, Entry>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn put<T: Serialize>(&self, key: CacheKey, value: &T) {
        if let Ok(value) = serde_json::to_value(value) {
            self.entries.insert(
                key,
                Entry {
                    value,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every list and detail entry of one resource kind for one
    /// user. Called after a mutation is acknowledged.
    pub fn invalidate_resource(&self, user: i64, resource: &'static str) {
        self.entries
            .retain(|key, _| !(key.user == user && key.resource == resource));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_and_miss() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = CacheKey::list(1, "organizations", None);
        assert_eq!(cache.get::<Vec<i64>>(&key), None);
        cache.put(key.clone(), &vec![1i64, 2]);
        assert_eq!(cache.get::<Vec<i64>>(&key), Some(vec![1, 2]));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = QueryCache::new(Duration::from_millis(0));
        let key = CacheKey::list(1, "urls", Some(7));
        cache.put(key.clone(), &vec![1i64]);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get::<Vec<i64>>(&key), None);
    }

    #[test]
    fn invalidation_is_scoped_to_user_and_resource() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put(CacheKey::list(1, "urls", None), &vec![1i64]);
        cache.put(CacheKey::detail(1, "urls", 9), &9i64);
        cache.put(CacheKey::list(1, "namespaces", None), &vec![2i64]);
        cache.put(CacheKey::list(2, "urls", None), &vec![3i64]);

        cache.invalidate_resource(1, "urls");

        assert_eq!(cache.get::<Vec<i64>>(&CacheKey::list(1, "urls", None)), None);
        assert_eq!(cache.get::<i64>(&CacheKey::detail(1, "urls", 9)), None);
        assert!(cache
            .get::<Vec<i64>>(&CacheKey::list(1, "namespaces", None))
            .is_some());
        assert!(cache.get::<Vec<i64>>(&CacheKey::list(2, "urls", None)).is_some());
    }

    #[test]
    fn users_do_not_share_entries() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put(CacheKey::list(1, "organizations", None), &vec![1i64]);
        assert_eq!(
            cache.get::<Vec<i64>>(&CacheKey::list(2, "organizations", None)),
            None
        );
        assert_eq!(cache.len(), 1);
    }
}
