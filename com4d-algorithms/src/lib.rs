//! com4d-algorithms: Center-of-mass extraction for 4D scan data.
//!
//! Given scan data with flattened detector axes and a set of mask regions,
//! computes an intensity-weighted `(y, x)` detector position per scan
//! position:
//! - **Masked** - only detector pixels inside the union of the regions
//! - **Full frame** - every detector pixel, used when no pixel is selected
//!
#![warn(missing_docs)]

mod center_of_mass;
mod selection;

pub use center_of_mass::{
    center_of_mass, CenterOfMass, CenterOfMassConfig, NonFinitePolicy, COM_PLANES,
};
pub use selection::{combined_mask, index_grids, PixelSelection};
