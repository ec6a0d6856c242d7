//! Where decoded wind fields come from.
//!
//! Fetching GRIB files, decompressing and remapping them is the job of a
//! [`WindSource`] implementation outside this crate. Sources are only
//! consulted on cache misses, before or between searches.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tradewind_core::WindError;

use crate::{FieldKey, WindField};

/// Loads the wind field for a key.
pub trait WindSource {
    /// Load the field for `key`, or `Ok(None)` when the source does not
    /// carry it (e.g. a forecast step that was never published).
    ///
    /// # Errors
    /// Returns [`WindError::Source`] when the source exists but cannot be
    /// read.
    fn load(&self, key: FieldKey) -> Result<Option<WindField>, WindError>;
}

impl<S: WindSource + ?Sized> WindSource for &S {
    fn load(&self, key: FieldKey) -> Result<Option<WindField>, WindError> {
        (**self).load(key)
    }
}

impl<S: WindSource + ?Sized> WindSource for Arc<S> {
    fn load(&self, key: FieldKey) -> Result<Option<WindField>, WindError> {
        (**self).load(key)
    }
}

/// Source serving pre-decoded fields from memory.
///
/// Counts loads so callers can verify cache behaviour.
///
/// # Examples
/// ```
/// use tradewind_wind::{FieldKey, MemorySource, WindField, WindSource};
///
/// let source = MemorySource::new()
///     .with_field(FieldKey::Forecast { hour: 0 }, WindField::uniform(5.0, 0.0)?);
/// assert!(source.load(FieldKey::Forecast { hour: 0 })?.is_some());
/// assert!(source.load(FieldKey::Forecast { hour: 3 })?.is_none());
/// assert_eq!(source.loads(), 2);
/// # Ok::<(), tradewind_core::WindError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    fields: HashMap<FieldKey, WindField>,
    loads: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the field for `key`.
    #[must_use]
    pub fn with_field(mut self, key: FieldKey, field: WindField) -> Self {
        self.fields.insert(key, field);
        self
    }

    /// Number of `load` calls served so far.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl WindSource for MemorySource {
    fn load(&self, key: FieldKey) -> Result<Option<WindField>, WindError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.fields.get(&key).cloned())
    }
}
