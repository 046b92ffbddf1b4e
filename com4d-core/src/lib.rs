//! com4d-core: Core types for 4D center-of-mass processing.
//!
//! This crate provides the data model shared by the center-of-mass
//! algorithms and the host integration layer: data items with identities,
//! calibrations, data descriptors, mask regions and the data cache.
//!

pub mod cache;
pub mod calibration;
pub mod converter;
pub mod error;
pub mod item;
pub mod region;
pub mod util;
pub mod xdata;

pub use cache::{CacheSource, DataCache};
pub use calibration::{Calibration, DataDescriptor};
pub use converter::FloatTupleToIntTupleConverter;
pub use error::{Error, Result};
pub use item::{DataItem, ItemId, SourceIdentity};
pub use region::{Graphic, GraphicShape, MaskRegion, RingMode};
pub use xdata::{DataAndMetadata, Metadata};
