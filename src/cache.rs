//! Response cache backed by an embedded fjall keyspace.
//!
//! Entries carry their own expiry; nothing sweeps the store. An expired entry
//! is removed the next time it is read. A cache that could not be opened
//! behaves as an always-miss cache.

use crate::models::{Coordinates, ParameterSelection, ReportKind};
use crate::{PogodaError, Result};
use fjall::{Database, Keyspace};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const KEY_DELIMITER: &str = ":";

fn store_error(e: fjall::Error) -> PogodaError {
    PogodaError::cache(format!("Cache store failure: {e}"))
}

fn now_secs() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| PogodaError::cache(format!("System clock before Unix epoch: {e}")))
}

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

struct Store {
    // Keeps the database open for the lifetime of the handle.
    _db: Database,
    items: Keyspace,
}

/// Handle to the response cache, injected into the weather client
pub struct ResponseCache {
    store: Option<Store>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl ResponseCache {
    /// Open (or create) the cache database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::builder(path.as_ref()).open().map_err(store_error)?;
        let items = db
            .keyspace("cache", fjall::KeyspaceCreateOptions::default)
            .map_err(store_error)?;
        Ok(Self {
            store: Some(Store { _db: db, items }),
        })
    }

    /// Open the cache, falling back to a disabled cache if the store is unavailable
    pub fn open_or_disabled(path: impl AsRef<Path>) -> Self {
        match Self::open(path.as_ref()) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(
                    "Cache unavailable at {}, continuing without it: {}",
                    path.as_ref().display(),
                    e
                );
                Self::disabled()
            }
        }
    }

    /// A cache that never stores anything
    #[must_use]
    pub fn disabled() -> Self {
        Self { store: None }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let expires_at = now_secs()?
            .checked_add(ttl.as_secs())
            .ok_or_else(|| PogodaError::cache("TTL overflow"))?;
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)
            .map_err(|e| PogodaError::cache(format!("Failed to encode entry: {e}")))?;

        store
            .items
            .insert(key.as_bytes().to_vec(), bytes)
            .map_err(store_error)?;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let Some(bytes) = store
            .items
            .get(key.as_bytes())
            .map_err(store_error)?
            .map(|v| v.to_vec())
        else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)
            .map_err(|e| PogodaError::cache(format!("Failed to decode entry: {e}")))?;
        let now = now_secs()?;

        if now < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key)?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub fn remove(&self, key: &str) -> Result<()> {
        if let Some(store) = &self.store {
            store
                .items
                .remove(key.as_bytes().to_vec())
                .map_err(store_error)?;
        }
        Ok(())
    }

    /// Release the underlying store
    pub fn close(self) {
        if self.store.is_some() {
            tracing::debug!("Closing response cache");
        }
    }
}

/// Derive the cache key for a weather request.
///
/// Parameters appear in vocabulary order, so selections that differ only in
/// the order the user picked them share a key.
#[must_use]
pub fn cache_key(
    kind: ReportKind,
    coordinates: Coordinates,
    parameters: &ParameterSelection,
    extra: &[String],
) -> String {
    let mut parts = vec![
        kind.cache_prefix().to_string(),
        coordinates.latitude.to_string(),
        coordinates.longitude.to_string(),
        parameters.joined(),
    ];
    parts.extend(extra.iter().cloned());
    parts.join(KEY_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherParameter;

    fn warsaw() -> Coordinates {
        Coordinates::new(52.2297, 21.0122).unwrap()
    }

    fn params(list: &[WeatherParameter]) -> ParameterSelection {
        list.iter().copied().collect()
    }

    #[test]
    fn test_cache_key_format() {
        let key = cache_key(
            ReportKind::Forecast,
            warsaw(),
            &params(&[WeatherParameter::Precipitation, WeatherParameter::Temperature]),
            &["2025-06-13".to_string(), "2025-06-20".to_string()],
        );
        assert_eq!(
            key,
            "forecast:52.2297:21.0122:temperature_2m,precipitation:2025-06-13:2025-06-20"
        );
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let selection = params(&[WeatherParameter::WindSpeed, WeatherParameter::Temperature]);
        let a = cache_key(ReportKind::Current, warsaw(), &selection, &[]);
        let b = cache_key(ReportKind::Current, warsaw(), &selection, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_ignores_selection_order() {
        let a = cache_key(
            ReportKind::Current,
            warsaw(),
            &params(&[WeatherParameter::WindSpeed, WeatherParameter::Temperature]),
            &[],
        );
        let b = cache_key(
            ReportKind::Current,
            warsaw(),
            &params(&[WeatherParameter::Temperature, WeatherParameter::WindSpeed]),
            &[],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_changes_with_range() {
        let selection = params(&[WeatherParameter::Temperature]);
        let forecast_a = cache_key(
            ReportKind::Forecast,
            warsaw(),
            &selection,
            &["2025-06-13".to_string(), "2025-06-20".to_string()],
        );
        let forecast_b = cache_key(
            ReportKind::Forecast,
            warsaw(),
            &selection,
            &["2025-06-13".to_string(), "2025-06-16".to_string()],
        );
        assert_ne!(forecast_a, forecast_b);

        let historical_3 = cache_key(ReportKind::Historical, warsaw(), &selection, &["3".to_string()]);
        let historical_5 = cache_key(ReportKind::Historical, warsaw(), &selection, &["5".to_string()]);
        assert_ne!(historical_3, historical_5);
    }

    #[test]
    fn test_cache_key_distinguishes_kind() {
        let selection = params(&[WeatherParameter::Temperature]);
        let current = cache_key(ReportKind::Current, warsaw(), &selection, &[]);
        let forecast = cache_key(ReportKind::Forecast, warsaw(), &selection, &[]);
        assert_ne!(current, forecast);
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();

        cache
            .put("k", &"value".to_string(), Duration::from_secs(60))
            .unwrap();
        let value: Option<String> = cache.get("k").unwrap();
        assert_eq!(value.as_deref(), Some("value"));
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();

        cache.put("k", &42_u32, Duration::ZERO).unwrap();
        let value: Option<u32> = cache.get("k").unwrap();
        assert_eq!(value, None);

        // A second read finds nothing at all.
        let value: Option<u32> = cache.get("k").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();
        let value: Option<String> = cache.get("absent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let cache = ResponseCache::disabled();
        assert!(!cache.is_enabled());
        cache
            .put("k", &"value".to_string(), Duration::from_secs(60))
            .unwrap();
        let value: Option<String> = cache.get("k").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_undecodable_entry_is_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();

        cache
            .put("k", &"not a number".to_string(), Duration::from_secs(60))
            .unwrap();
        // The length prefix of the stored string is not a valid bool.
        let err = cache.get::<bool>("k").unwrap_err();
        assert!(matches!(err, PogodaError::Cache { .. }));
    }

    #[test]
    fn test_open_failure_is_cache_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ResponseCache::open(file.path()).unwrap_err();
        assert!(matches!(err, PogodaError::Cache { .. }));
    }

    #[test]
    fn test_unavailable_store_degrades_to_disabled() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot host a database directory.
        let cache = ResponseCache::open_or_disabled(file.path());
        assert!(!cache.is_enabled());
    }
}
