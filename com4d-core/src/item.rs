//! Data items and source identities.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CacheSource;
use crate::calibration::{Calibration, DataDescriptor};
use crate::error::Result;
use crate::xdata::DataAndMetadata;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Identity token of one version of a data item's data.
///
/// Two arrays with the same identity are guaranteed to hold the same
/// values; replacing the data of an item always yields a new identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceIdentity(u64);

impl SourceIdentity {
    /// Returns a process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed))
    }

    /// Identity with a fixed token.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn from_raw(token: u64) -> Self {
        Self(token)
    }

    /// Returns the raw token.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Host-assigned data item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    #[inline]
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// A titled data item owned by the host document.
#[derive(Debug, Clone)]
pub struct DataItem {
    id: ItemId,
    title: String,
    xdata: DataAndMetadata,
    identity: SourceIdentity,
}

#[derive(Serialize)]
struct DataItemRecord<'a> {
    id: ItemId,
    title: &'a str,
    identity: SourceIdentity,
    shape: &'a [usize],
    data_descriptor: DataDescriptor,
    dimensional_calibrations: &'a [Calibration],
    intensity_calibration: &'a Calibration,
}

impl DataItem {
    /// Creates a data item with a fresh identity.
    pub fn new(id: ItemId, title: impl Into<String>, xdata: DataAndMetadata) -> Self {
        Self {
            id,
            title: title.into(),
            xdata,
            identity: SourceIdentity::next(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn xdata(&self) -> &DataAndMetadata {
        &self.xdata
    }

    /// Identity of the current data.
    #[must_use]
    pub fn identity(&self) -> SourceIdentity {
        self.identity
    }

    /// Replaces the data, assigning a new identity.
    pub fn set_xdata(&mut self, xdata: DataAndMetadata) {
        self.xdata = xdata;
        self.identity = SourceIdentity::next();
    }

    /// Serializes the item description (not the array values).
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_record(&self) -> Result<Value> {
        let record = DataItemRecord {
            id: self.id,
            title: &self.title,
            identity: self.identity,
            shape: self.xdata.data_shape(),
            data_descriptor: self.xdata.data_descriptor(),
            dimensional_calibrations: self.xdata.dimensional_calibrations(),
            intensity_calibration: self.xdata.intensity_calibration(),
        };
        Ok(serde_json::to_value(record)?)
    }
}

impl CacheSource for DataItem {
    fn identity(&self) -> SourceIdentity {
        self.identity
    }

    fn array(&self) -> &ArrayD<f32> {
        self.xdata.data()
    }
}
