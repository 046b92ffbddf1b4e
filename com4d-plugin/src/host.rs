//! Interfaces of the host application consumed by the plugin.
//!
//! The host owns documents, data items, graphics, displays and the
//! scheduling of computations. The plugin only sees it through these
//! traits.

use std::sync::Arc;
use std::time::Duration;

use com4d_core::region::{Graphic, MaskRegion};
use com4d_core::{DataAndMetadata, DataItem, ItemId};

use crate::error::Result;

/// Shared reference to a mask region owned by the host.
pub type RegionRef = Arc<dyn MaskRegion>;

/// Host-assigned computation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComputationId(pub u64);

/// Host-assigned graphic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphicId(pub u64);

/// Host-assigned tool tip handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolTipId(pub u64);

/// Scan position shown by a display of 4D data: `(scan y, scan x)`.
pub type CollectionIndex = [usize; 2];

/// Output slots a computation commits into.
pub trait OutputSlots {
    /// Stores `xdata` into the output named `name`.
    ///
    /// # Errors
    /// Returns an error if there is no such output.
    fn set_referenced_xdata(&mut self, name: &str, xdata: DataAndMetadata) -> Result<()>;
}

/// Computation bookkeeping the host exposes to panel actions.
pub trait ComputationHost {
    /// Graphics currently selected on the focused display.
    fn selected_graphics(&self) -> Vec<RegionRef>;

    /// Replaces the region list input `name` of `computation`.
    fn replace_regions(&mut self, computation: ComputationId, name: &str, regions: Vec<RegionRef>);

    /// Schedules `computation` to execute and commit again.
    fn mark_needs_update(&mut self, computation: ComputationId);
}

/// Summary of a computation in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputationRecord {
    pub id: ComputationId,
    pub processing_id: String,
    pub source: Option<ItemId>,
    pub target: Option<ItemId>,
}

/// Document-level operations used by the menu item and startup code.
pub trait DocumentHost {
    /// True once the host has a document window to work with.
    fn is_ready(&self) -> bool;

    /// Data item of the selected display, if any.
    fn selected_data_item(&self) -> Option<ItemId>;

    fn data_item(&self, id: ItemId) -> Option<&DataItem>;

    /// Creates an empty data item.
    fn create_data_item(&mut self, title: &str) -> ItemId;

    /// Creates a computation of type `processing_id` reading `source` and
    /// `map_regions` and writing `target`.
    ///
    /// # Errors
    /// Returns an error if the type is unknown or an item is missing.
    fn create_computation(
        &mut self,
        processing_id: &str,
        source: ItemId,
        map_regions: Vec<RegionRef>,
        target: ItemId,
    ) -> Result<ComputationId>;

    /// All computations of the document.
    fn computations(&self) -> Vec<ComputationRecord>;

    /// Brings the display of `item` to front.
    fn show_data_item(&mut self, item: ItemId);

    /// Adds a graphic to the display of `item`.
    fn add_graphic(&mut self, item: ItemId, graphic: Graphic) -> GraphicId;

    /// Graphics on the display of `item`.
    fn graphics(&self, item: ItemId) -> Vec<(GraphicId, Graphic)>;

    fn graphic_position(&self, graphic: GraphicId) -> Option<(f64, f64)>;

    fn set_graphic_position(&mut self, graphic: GraphicId, position: (f64, f64));

    fn collection_index(&self, item: ItemId) -> Option<CollectionIndex>;

    fn set_collection_index(&mut self, item: ItemId, index: CollectionIndex);

    /// Shows a tool tip box for `timeout`.
    fn pose_tool_tip(&mut self, text: &str, timeout: Duration) -> ToolTipId;

    fn remove_tool_tip(&mut self, tool_tip: ToolTipId);
}
