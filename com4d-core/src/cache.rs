//! Identity-keyed cache of a transformed source array.
//!
//! Reshaping a large 4D acquisition on every recomputation is wasteful
//! when only the mask regions changed. `DataCache` keeps the transformed
//! array of the last seen source and recomputes it only when the source
//! identity changes.

use log::debug;
use ndarray::{Array3, ArrayD};

use crate::error::{Error, Result};
use crate::item::SourceIdentity;

/// A source the cache can key on.
pub trait CacheSource {
    /// Identity of the current data.
    fn identity(&self) -> SourceIdentity;

    /// The data array.
    fn array(&self) -> &ArrayD<f32>;
}

type TransformFn<T> = Box<dyn Fn(&ArrayD<f32>) -> Result<T> + Send + Sync>;

/// Memoizes `transform(source.array())` per source identity.
///
/// The cached value is valid if and only if the identity of the requested
/// source equals the identity it was computed from.
pub struct DataCache<T> {
    transform: TransformFn<T>,
    last_identity: Option<SourceIdentity>,
    cached: Option<T>,
    transform_count: usize,
}

impl<T> DataCache<T> {
    /// Creates an empty cache with the given transform.
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&ArrayD<f32>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            transform: Box::new(transform),
            last_identity: None,
            cached: None,
            transform_count: 0,
        }
    }

    /// Returns the transformed data of `source`, applying the transform
    /// only if the source identity differs from the cached one.
    ///
    /// # Errors
    /// Propagates errors of the transform. A failed transform leaves the
    /// previous cache state untouched.
    pub fn get_cached_data<S>(&mut self, source: &S) -> Result<&T>
    where
        S: CacheSource + ?Sized,
    {
        let identity = source.identity();
        if self.cached.is_none() || self.last_identity != Some(identity) {
            debug!("data cache miss for source {}", identity.as_u64());
            let transformed = (self.transform)(source.array())?;
            self.cached = Some(transformed);
            self.last_identity = Some(identity);
            self.transform_count += 1;
        } else {
            debug!("data cache hit for source {}", identity.as_u64());
        }
        self.cached
            .as_ref()
            .ok_or_else(|| Error::Transform("data cache is empty".to_string()))
    }

    /// Drops the cached data.
    pub fn invalidate(&mut self) {
        self.last_identity = None;
        self.cached = None;
    }

    /// Identity of the source the cached data belongs to.
    #[must_use]
    pub fn last_identity(&self) -> Option<SourceIdentity> {
        self.last_identity
    }

    /// Returns true if data is cached.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.cached.is_some()
    }

    /// Number of times the transform has been applied.
    #[must_use]
    pub fn transform_count(&self) -> usize {
        self.transform_count
    }
}

impl DataCache<Array3<f32>> {
    /// Cache reshaping `(scan y, scan x, det y, det x)` to
    /// `(scan y, scan x, det y * det x)`.
    #[must_use]
    pub fn detector_flattening() -> Self {
        Self::new(flatten_detector_axes)
    }
}

impl<T> std::fmt::Debug for DataCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCache")
            .field("last_identity", &self.last_identity)
            .field("populated", &self.cached.is_some())
            .field("transform_count", &self.transform_count)
            .finish_non_exhaustive()
    }
}

/// Flattens the two detector axes of 4D data, keeping the scan axes.
///
/// # Errors
/// Returns an error if `data` is not 4D.
pub fn flatten_detector_axes(data: &ArrayD<f32>) -> Result<Array3<f32>> {
    let &[scan_y, scan_x, det_y, det_x] = data.shape() else {
        return Err(Error::NotFourDimensional(data.ndim()));
    };
    Ok(data
        .to_shape((scan_y, scan_x, det_y * det_x))?
        .into_owned())
}
