//! Binding between the "Pick" graphic on a result map and the scan
//! position shown by the source display.

use com4d_core::util::{f64_to_index, usize_to_f64};
use com4d_core::{DataItem, Error as CoreError, FloatTupleToIntTupleConverter, ItemId};
use log::debug;

use crate::error::Result;
use crate::host::{CollectionIndex, ComputationId, DocumentHost, GraphicId};

/// Label of the pick graphic on a result map.
pub const PICK_LABEL: &str = "Pick";

/// Keeps a pick graphic and a source collection index in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickBinding {
    computation: ComputationId,
    source: ItemId,
    pick_graphic: GraphicId,
    y: FloatTupleToIntTupleConverter,
    x: FloatTupleToIntTupleConverter,
}

impl PickBinding {
    /// Binds `pick_graphic` to the scan axes of `source`.
    ///
    /// # Errors
    /// Returns an error if `source` is not 4D.
    pub fn connect(
        computation: ComputationId,
        source: &DataItem,
        pick_graphic: GraphicId,
    ) -> Result<Self> {
        let shape = source.xdata().data_shape();
        let &[scan_y, scan_x, _, _] = shape else {
            return Err(CoreError::NotFourDimensional(shape.len()).into());
        };
        debug!(
            "pick graphic {} bound to {} ({scan_y}x{scan_x} scan)",
            pick_graphic.0,
            source.id()
        );
        Ok(Self {
            computation,
            source: source.id(),
            pick_graphic,
            y: FloatTupleToIntTupleConverter::new(scan_y, 0),
            x: FloatTupleToIntTupleConverter::new(scan_x, 1),
        })
    }

    #[must_use]
    pub fn computation(&self) -> ComputationId {
        self.computation
    }

    #[must_use]
    pub fn source(&self) -> ItemId {
        self.source
    }

    #[must_use]
    pub fn pick_graphic(&self) -> GraphicId {
        self.pick_graphic
    }

    /// Collection index for a pick position, if it differs from `current`.
    #[must_use]
    pub fn index_for_position(
        &self,
        (y, x): (f64, f64),
        current: CollectionIndex,
    ) -> Option<CollectionIndex> {
        let index = [
            self.y.convert(y).unwrap_or(current[0]),
            self.x.convert(x).unwrap_or(current[1]),
        ];
        (index != current).then_some(index)
    }

    /// Pick position for a collection index, if it differs from `current`.
    ///
    /// Each axis moves to the center of the indexed pixel only when the
    /// current position falls on another pixel.
    #[must_use]
    pub fn position_for_index(
        &self,
        index: CollectionIndex,
        current: (f64, f64),
    ) -> Option<(f64, f64)> {
        let y = axis_position(&self.y, index, current.0);
        let x = axis_position(&self.x, index, current.1);
        let position = (y.unwrap_or(current.0), x.unwrap_or(current.1));
        (y.is_some() || x.is_some()).then_some(position)
    }

    /// Pushes the pick position to the source display.
    pub fn pick_moved(&self, host: &mut dyn DocumentHost) {
        let Some(position) = host.graphic_position(self.pick_graphic) else {
            return;
        };
        let current = host.collection_index(self.source).unwrap_or_default();
        if let Some(index) = self.index_for_position(position, current) {
            host.set_collection_index(self.source, index);
        }
    }

    /// Pushes the source collection index to the pick graphic.
    pub fn collection_index_changed(&self, host: &mut dyn DocumentHost) {
        let (Some(index), Some(position)) = (
            host.collection_index(self.source),
            host.graphic_position(self.pick_graphic),
        ) else {
            return;
        };
        if let Some(position) = self.position_for_index(index, position) {
            host.set_graphic_position(self.pick_graphic, position);
        }
    }
}

/// New position along one axis, or `None` if `current` already lies on
/// the indexed pixel.
fn axis_position(
    converter: &FloatTupleToIntTupleConverter,
    index: CollectionIndex,
    current: f64,
) -> Option<f64> {
    let shown = f64_to_index(current * usize_to_f64(converter.axis_size()));
    if shown == Some(index[converter.axis_index()]) {
        return None;
    }
    converter.convert_back(&index)
}
