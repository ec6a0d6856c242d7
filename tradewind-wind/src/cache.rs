//! Fill-once cache of decoded wind fields.
//!
//! Decoding a forecast step is expensive, so each [`FieldKey`] is loaded at
//! most once per cache and shared through [`Arc`] afterwards. A cache can be
//! shared between several [`ForecastWind`](crate::ForecastWind) models (and
//! therefore several concurrent routers) by cloning its `Arc`.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tradewind_core::WindError;

use crate::WindField;

/// Fill-once slot for one key; `None` records a field the source lacks.
type FieldCell = OnceCell<Option<Arc<WindField>>>;

/// Identifies one decoded wind field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKey {
    /// Forecast step, in hours after the model run.
    Forecast {
        /// Hours after the run time.
        hour: u32,
    },
    /// Long-term monthly mean.
    Climatology {
        /// Calendar month, 1 to 12.
        month: u32,
    },
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forecast { hour } => write!(f, "forecast +{hour:03}h"),
            Self::Climatology { month } => write!(f, "climatology month {month:02}"),
        }
    }
}

/// Process-lifetime map from [`FieldKey`] to a ready-to-query field.
///
/// Missing fields are remembered as `None` so a source is never asked twice
/// for the same key. Failed loads are not cached. Each key has its own cell,
/// so a slow load only holds up callers asking for that key.
///
/// # Examples
/// ```
/// use tradewind_wind::{FieldKey, WindField, WindFieldCache};
///
/// let cache = WindFieldCache::new();
/// let key = FieldKey::Forecast { hour: 6 };
/// let first = cache.get_or_load(key, || WindField::uniform(3.0, 4.0).map(Some))?;
/// let second = cache.get_or_load(key, || unreachable!("already cached"))?;
/// assert_eq!(first, second);
/// assert_eq!(cache.len(), 1);
/// # Ok::<(), tradewind_core::WindError>(())
/// ```
#[derive(Debug, Default)]
pub struct WindFieldCache {
    fields: DashMap<FieldKey, Arc<FieldCell>>,
}

impl WindFieldCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached field for `key`, running `load` on the first miss.
    ///
    /// Concurrent callers asking for the same key wait for the first load
    /// instead of repeating it; other keys stay readable meanwhile. `load`
    /// must not query this cache for the same key.
    ///
    /// # Errors
    /// Propagates the error from `load`; nothing is cached in that case.
    pub fn get_or_load<F>(&self, key: FieldKey, load: F) -> Result<Option<Arc<WindField>>, WindError>
    where
        F: FnOnce() -> Result<Option<WindField>, WindError>,
    {
        let cell = self.cell(key);
        cell.get_or_try_init(|| {
            log::debug!("loading wind field {key}");
            let loaded = load()
                .inspect_err(|error| log::warn!("loading wind field {key} failed: {error}"))?
                .map(Arc::new);
            if loaded.is_none() {
                log::debug!("wind field {key} is not available");
            }
            Ok(loaded)
        })
        .cloned()
    }

    /// The cell for `key`, created empty on first use. No map guard outlives
    /// this call.
    fn cell(&self, key: FieldKey) -> Arc<FieldCell> {
        if let Some(hit) = self.fields.get(&key) {
            return Arc::clone(hit.value());
        }
        Arc::clone(self.fields.entry(key).or_default().value())
    }

    /// Whether `key` has been resolved, available or not.
    #[must_use]
    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields
            .get(&key)
            .is_some_and(|cell| cell.value().get().is_some())
    }

    /// Number of resolved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields
            .iter()
            .filter(|cell| cell.value().get().is_some())
            .count()
    }

    /// Whether no key has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self
            .fields
            .iter()
            .any(|cell| cell.value().get().is_some())
    }

    /// Forget every field, e.g. after a new model run is published.
    pub fn clear(&self) {
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[rstest]
    fn absent_fields_are_remembered() {
        let cache = WindFieldCache::new();
        let calls = AtomicUsize::new(0);
        let key = FieldKey::Climatology { month: 3 };
        for _ in 0..3 {
            let field = cache
                .get_or_load(key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .expect("load succeeds");
            assert!(field.is_none());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(key));
    }

    #[rstest]
    fn failed_loads_are_retried() {
        let cache = WindFieldCache::new();
        let key = FieldKey::Forecast { hour: 0 };
        let err = cache
            .get_or_load(key, || {
                Err(WindError::Source {
                    key: key.to_string(),
                    message: "offline".into(),
                })
            })
            .expect_err("load fails");
        assert!(matches!(err, WindError::Source { .. }));
        assert!(cache.is_empty());
        let field = cache
            .get_or_load(key, || WindField::uniform(1.0, 0.0).map(Some))
            .expect("retry succeeds");
        assert!(field.is_some());
    }

    #[rstest]
    fn concurrent_callers_share_one_load() {
        let cache = Arc::new(WindFieldCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = FieldKey::Forecast { hour: 12 };
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    cache
                        .get_or_load(key, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            WindField::uniform(0.0, 7.0).map(Some)
                        })
                        .expect("load succeeds")
                })
            })
            .collect();
        for handle in handles {
            let field = handle.join().expect("thread completes");
            assert!(field.is_some());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn slow_load_leaves_other_keys_readable() {
        let cache = Arc::new(WindFieldCache::new());
        let ready = FieldKey::Forecast { hour: 0 };
        cache
            .get_or_load(ready, || WindField::uniform(1.0, 1.0).map(Some))
            .expect("warm load");

        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let slow = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                cache.get_or_load(FieldKey::Forecast { hour: 3 }, || {
                    started_tx.send(()).expect("signal start");
                    release_rx.recv().expect("wait for release");
                    WindField::uniform(0.0, 1.0).map(Some)
                })
            })
        };
        started_rx.recv().expect("slow load started");

        let (done_tx, done_rx) = mpsc::channel();
        let reader = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let hit = cache
                    .get_or_load(ready, || unreachable!("already cached"))
                    .map(|field| field.is_some());
                done_tx.send(hit).expect("report read");
            })
        };
        let hit = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("cached key is readable during a slow load");
        assert_eq!(hit, Ok(true));
        assert!(!cache.contains(FieldKey::Forecast { hour: 3 }));

        release_tx.send(()).expect("release slow load");
        reader.join().expect("reader completes");
        let slow_field = slow.join().expect("slow load completes").expect("load succeeds");
        assert!(slow_field.is_some());
        assert_eq!(cache.len(), 2);
    }

    #[rstest]
    fn clearing_forces_a_reload() {
        let cache = WindFieldCache::new();
        let calls = AtomicUsize::new(0);
        let key = FieldKey::Forecast { hour: 3 };
        let load = || {
            calls.fetch_add(1, Ordering::SeqCst);
            WindField::uniform(2.0, 2.0).map(Some)
        };
        cache.get_or_load(key, load).expect("first load");
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_load(key, load).expect("second load");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    #[case(FieldKey::Forecast { hour: 6 }, "forecast +006h")]
    #[case(FieldKey::Climatology { month: 11 }, "climatology month 11")]
    fn keys_display_readably(#[case] key: FieldKey, #[case] expected: &str) {
        assert_eq!(key.to_string(), expected);
    }
}
