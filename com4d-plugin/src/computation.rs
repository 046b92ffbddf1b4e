//! Computations and the 4D center-of-mass computation.
//!
//! The host drives a computation in two steps: `execute` computes a result
//! from the bound inputs and keeps it pending, `commit` publishes the
//! pending result to the output slot. `execute` never fails loudly; errors
//! are logged and leave no pending result.

use com4d_algorithms::{CenterOfMass, CenterOfMassConfig};
use com4d_core::region::MaskRegion;
use com4d_core::{
    Calibration, DataAndMetadata, DataCache, DataDescriptor, DataItem, Error as CoreError,
    Metadata,
};
use log::{debug, error};
use ndarray::Array3;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::host::{OutputSlots, RegionRef};
use crate::panel::{select_map_regions_panel, Widget};

/// Processing id of the center-of-mass computation.
pub const PROCESSING_ID: &str = "com4d.center_of_mass_4d";

/// Metadata key of the parameters record on the result.
pub const PARAMETERS_KEY: &str = "com4d.center_of_mass_4d.parameters";

/// Input name of the 4D source.
pub const SRC: &str = "src";

/// Input name of the mask region list.
pub const MAP_REGIONS: &str = "map_regions";

/// Output name of the result.
pub const TARGET: &str = "target";

/// Inputs bound to a computation, by name.
#[derive(Default)]
pub struct ComputationInputs<'a> {
    items: Vec<(&'a str, &'a DataItem)>,
    regions: Vec<(&'a str, &'a [RegionRef])>,
}

impl<'a> ComputationInputs<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a data item input.
    #[must_use]
    pub fn with_item(mut self, name: &'a str, item: &'a DataItem) -> Self {
        self.items.push((name, item));
        self
    }

    /// Bind a region list input.
    #[must_use]
    pub fn with_regions(mut self, name: &'a str, regions: &'a [RegionRef]) -> Self {
        self.regions.push((name, regions));
        self
    }

    #[must_use]
    pub fn item(&self, name: &str) -> Option<&'a DataItem> {
        self.items
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, item)| *item)
    }

    /// Region list bound to `name`; empty if unbound.
    #[must_use]
    pub fn regions(&self, name: &str) -> &'a [RegionRef] {
        self.regions
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, regions)| *regions)
            .unwrap_or_default()
    }
}

/// A computation type the host can instantiate by processing id.
pub trait Computation: Send {
    /// Processing id this computation is registered under.
    fn processing_id(&self) -> &'static str;

    /// Computes a result from `inputs` and keeps it pending.
    ///
    /// Failures are logged and leave no pending result.
    fn execute(&mut self, inputs: &ComputationInputs<'_>);

    /// Publishes the pending result.
    ///
    /// # Errors
    /// Returns [`Error::NothingToCommit`] if the last `execute` produced no
    /// result, or the output error of the host.
    fn commit(&mut self, outputs: &mut dyn OutputSlots) -> Result<()>;

    /// Panel shown for this computation, if it has one.
    ///
    /// # Errors
    /// Returns an error if the panel cannot be built.
    fn create_panel_widget(&self) -> Result<Option<Widget>> {
        Ok(None)
    }
}

/// Where a computation is in its execute/commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Configured,
    Executing,
    /// A result is pending.
    Executed,
    /// The last execute failed.
    Failed,
    Committed,
}

/// Center-of-mass map of 4D data over the union of the map regions.
pub struct CenterOfMass4D {
    algorithm: CenterOfMass,
    data_cache: DataCache<Array3<f32>>,
    pending: Option<DataAndMetadata>,
    state: ExecutionState,
}

impl Default for CenterOfMass4D {
    fn default() -> Self {
        Self::new()
    }
}

impl CenterOfMass4D {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CenterOfMassConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CenterOfMassConfig) -> Self {
        Self {
            algorithm: CenterOfMass::with_config(config),
            data_cache: DataCache::detector_flattening(),
            pending: None,
            state: ExecutionState::Configured,
        }
    }

    #[must_use]
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// The pending result, if the last execute succeeded.
    #[must_use]
    pub fn pending(&self) -> Option<&DataAndMetadata> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn data_cache(&self) -> &DataCache<Array3<f32>> {
        &self.data_cache
    }

    /// Computes the map of `src` over `map_regions`.
    ///
    /// Returns true if a result is pending afterwards.
    pub fn execute_with(&mut self, src: &DataItem, map_regions: &[RegionRef]) -> bool {
        self.state = ExecutionState::Executing;
        self.pending = None;
        match self.compute(src, map_regions) {
            Ok(xdata) => {
                debug!(
                    "center of mass of '{}' over {} region(s) computed",
                    src.title(),
                    map_regions.len()
                );
                self.pending = Some(xdata);
                self.state = ExecutionState::Executed;
                true
            }
            Err(err) => {
                error!("center of mass of '{}' failed: {err}", src.title());
                self.state = ExecutionState::Failed;
                false
            }
        }
    }

    fn compute(&mut self, src: &DataItem, map_regions: &[RegionRef]) -> Result<DataAndMetadata> {
        let &[_, _, det_y, det_x] = src.xdata().data_shape() else {
            return Err(CoreError::NotFourDimensional(src.xdata().data_shape().len()).into());
        };
        let data = self.data_cache.get_cached_data(src)?;
        let regions: Vec<&dyn MaskRegion> = map_regions
            .iter()
            .map(|region| &**region as &dyn MaskRegion)
            .collect();
        let com = self.algorithm.compute(data.view(), (det_y, det_x), regions)?;
        result_xdata(src, map_regions, com)
    }
}

/// Wraps a center-of-mass map with calibrations and the parameters record.
fn result_xdata(
    src: &DataItem,
    map_regions: &[RegionRef],
    com: Array3<f32>,
) -> Result<DataAndMetadata> {
    let mut dimensional_calibrations = vec![Calibration::new()];
    dimensional_calibrations.extend(
        src.xdata()
            .dimensional_calibrations()
            .iter()
            .take(2)
            .cloned(),
    );
    let xdata = DataAndMetadata::new(
        com.into_dyn(),
        dimensional_calibrations,
        Calibration::with_units("px"),
        DataDescriptor::new(true, 0, 2),
    )?;

    let region_records = map_regions
        .iter()
        .map(|region| region.to_record())
        .collect::<std::result::Result<Vec<Value>, _>>()?;
    let mut parameters = Metadata::new();
    parameters.insert(SRC.to_string(), src.to_record()?);
    parameters.insert(MAP_REGIONS.to_string(), Value::Array(region_records));

    let mut metadata = src.xdata().metadata().clone();
    metadata.insert(PARAMETERS_KEY.to_string(), Value::Object(parameters));
    Ok(xdata.with_metadata(metadata))
}

impl Computation for CenterOfMass4D {
    fn processing_id(&self) -> &'static str {
        PROCESSING_ID
    }

    fn execute(&mut self, inputs: &ComputationInputs<'_>) {
        let Some(src) = inputs.item(SRC) else {
            error!("{PROCESSING_ID}: {}", Error::MissingInput(SRC.to_string()));
            self.pending = None;
            self.state = ExecutionState::Failed;
            return;
        };
        self.execute_with(src, inputs.regions(MAP_REGIONS));
    }

    fn commit(&mut self, outputs: &mut dyn OutputSlots) -> Result<()> {
        let xdata = self.pending.take().ok_or(Error::NothingToCommit)?;
        outputs.set_referenced_xdata(TARGET, xdata)?;
        self.state = ExecutionState::Committed;
        Ok(())
    }

    fn create_panel_widget(&self) -> Result<Option<Widget>> {
        Ok(Some(select_map_regions_panel()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, clippy::cast_precision_loss)]
    use super::*;
    use com4d_core::region::Graphic;
    use com4d_core::ItemId;
    use ndarray::{ArrayD, IxDyn};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Default)]
    struct Outputs {
        target: Option<DataAndMetadata>,
        writes: usize,
    }

    impl OutputSlots for Outputs {
        fn set_referenced_xdata(&mut self, name: &str, xdata: DataAndMetadata) -> Result<()> {
            if name != TARGET {
                return Err(Error::UnknownOutput(name.to_string()));
            }
            self.target = Some(xdata);
            self.writes += 1;
            Ok(())
        }
    }

    fn source() -> DataItem {
        let data = ArrayD::from_shape_fn(IxDyn(&[2, 3, 4, 4]), |index| {
            1.0 + (index[2] * 4 + index[3]) as f32
        });
        let xdata = DataAndMetadata::new(
            data,
            vec![
                Calibration::with_units("nm").with_scale(0.5),
                Calibration::with_units("nm").with_scale(0.25),
                Calibration::with_units("1/nm"),
                Calibration::with_units("1/nm"),
            ],
            Calibration::with_units("counts"),
            DataDescriptor::scan_4d(),
        )
        .unwrap();
        let mut metadata = Metadata::new();
        metadata.insert("instrument".to_string(), json!("stem"));
        DataItem::new(ItemId::new(3), "Scan", xdata.with_metadata(metadata))
    }

    #[test]
    fn test_execute_builds_calibrated_result() {
        let src = source();
        let regions: Vec<RegionRef> = vec![Arc::new(Graphic::rectangle(((0.5, 0.25), (0.25, 0.25))))];
        let mut computation = CenterOfMass4D::new();

        assert!(computation.execute_with(&src, &regions));
        assert_eq!(computation.state(), ExecutionState::Executed);

        let result = computation.pending().unwrap();
        assert_eq!(result.data_shape(), &[2, 2, 3]);
        assert_eq!(result.data()[[0, 1, 2].as_slice()], 2.0);
        assert_eq!(result.data()[[1, 1, 2].as_slice()], 1.0);
        assert_eq!(result.data_descriptor(), DataDescriptor::new(true, 0, 2));
        assert!(result.dimensional_calibrations()[0].is_empty());
        assert_eq!(result.dimensional_calibrations()[1].units, "nm");
        assert!((result.dimensional_calibrations()[2].scale - 0.25).abs() < f64::EPSILON);
        assert_eq!(result.intensity_calibration().units, "px");
    }

    #[test]
    fn test_result_metadata_records_parameters() {
        let src = source();
        let regions: Vec<RegionRef> = vec![Arc::new(Graphic::point(0.5, 0.5).with_label("Spot"))];
        let mut computation = CenterOfMass4D::new();
        computation.execute_with(&src, &regions);

        let metadata = computation.pending().unwrap().metadata();
        assert_eq!(metadata["instrument"], "stem");
        let parameters = &metadata[PARAMETERS_KEY];
        assert_eq!(parameters[SRC]["id"], 3);
        assert_eq!(parameters[SRC]["identity"], src.identity().as_u64());
        assert_eq!(parameters[MAP_REGIONS][0]["type"], "point");
        assert_eq!(parameters[MAP_REGIONS][0]["label"], "Spot");
    }

    #[test]
    fn test_commit_publishes_once() {
        let src = source();
        let mut computation = CenterOfMass4D::new();
        let mut outputs = Outputs::default();

        let inputs = ComputationInputs::new().with_item(SRC, &src);
        computation.execute(&inputs);
        computation.commit(&mut outputs).unwrap();
        assert_eq!(computation.state(), ExecutionState::Committed);
        assert_eq!(outputs.writes, 1);

        let second = computation.commit(&mut outputs);
        assert!(matches!(second, Err(Error::NothingToCommit)));
        assert_eq!(outputs.writes, 1);
    }

    #[test]
    fn test_commit_before_execute_fails() {
        let mut computation = CenterOfMass4D::new();
        let mut outputs = Outputs::default();
        assert!(matches!(
            computation.commit(&mut outputs),
            Err(Error::NothingToCommit)
        ));
        assert!(outputs.target.is_none());
    }

    #[test]
    fn test_failed_execute_clears_previous_result() {
        let src = source();
        let mut computation = CenterOfMass4D::new();
        assert!(computation.execute_with(&src, &[]));

        let flat = DataItem::new(
            ItemId::new(4),
            "Image",
            DataAndMetadata::from_data(ArrayD::ones(IxDyn(&[4, 4]))),
        );
        assert!(!computation.execute_with(&flat, &[]));
        assert_eq!(computation.state(), ExecutionState::Failed);
        assert!(computation.pending().is_none());
    }

    #[test]
    fn test_missing_source_input_soft_fails() {
        let mut computation = CenterOfMass4D::new();
        computation.execute(&ComputationInputs::new());
        assert_eq!(computation.state(), ExecutionState::Failed);
        assert!(computation.pending().is_none());
    }

    #[test]
    fn test_cache_reused_across_region_changes() {
        let src = source();
        let mut computation = CenterOfMass4D::new();
        let a: Vec<RegionRef> = vec![Arc::new(Graphic::point(0.0, 0.0))];
        let b: Vec<RegionRef> = vec![Arc::new(Graphic::point(0.75, 0.75))];

        computation.execute_with(&src, &a);
        computation.execute_with(&src, &b);
        computation.execute_with(&src, &[]);

        assert_eq!(computation.data_cache().transform_count(), 1);
        assert_eq!(
            computation.data_cache().last_identity(),
            Some(src.identity())
        );
    }

    #[test]
    fn test_panel_widget() {
        let computation = CenterOfMass4D::new();
        let panel = computation.create_panel_widget().unwrap().unwrap();
        assert_eq!(panel.buttons().len(), 1);
        assert_eq!(computation.processing_id(), PROCESSING_ID);
    }
}
