use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::intervals::IntervalResult;

struct CachedEntry {
    value: IntervalResult,
    stored_at: Instant,
}

/// Time-boxed memoization of the computed interval result. Holds at most
/// one value; an insert into the store invalidates it, so a fresh entry
/// always reflects the current dataset.
pub struct IntervalCache {
    entry: RwLock<Option<CachedEntry>>,
    ttl: Duration,
}

impl IntervalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    pub fn get(&self) -> Result<Option<IntervalResult>, ApiError> {
        let entry = self
            .entry
            .read()
            .map_err(|_| ApiError::Internal("interval cache lock poisoned".to_string()))?;

        Ok(entry
            .as_ref()
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone()))
    }

    pub fn put(&self, value: IntervalResult) -> Result<(), ApiError> {
        let mut entry = self
            .entry
            .write()
            .map_err(|_| ApiError::Internal("interval cache lock poisoned".to_string()))?;

        *entry = Some(CachedEntry {
            value,
            stored_at: Instant::now(),
        });
        Ok(())
    }

    pub fn invalidate(&self) -> Result<(), ApiError> {
        let mut entry = self
            .entry
            .write()
            .map_err(|_| ApiError::Internal("interval cache lock poisoned".to_string()))?;

        *entry = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_returned() {
        let cache = IntervalCache::new(Duration::from_secs(600));
        cache.put(IntervalResult::default()).unwrap();

        assert_eq!(cache.get().unwrap(), Some(IntervalResult::default()));
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = IntervalCache::new(Duration::ZERO);
        cache.put(IntervalResult::default()).unwrap();

        assert_eq!(cache.get().unwrap(), None);
    }

    #[test]
    fn invalidate_clears_the_entry() {
        let cache = IntervalCache::new(Duration::from_secs(600));
        cache.put(IntervalResult::default()).unwrap();
        cache.invalidate().unwrap();

        assert_eq!(cache.get().unwrap(), None);
    }

    #[test]
    fn empty_cache_is_a_miss() {
        let cache = IntervalCache::new(Duration::from_secs(600));
        assert_eq!(cache.get().unwrap(), None);
    }
}
