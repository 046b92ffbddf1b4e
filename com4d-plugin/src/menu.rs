//! The "Center of Mass 4D" menu item.

use com4d_core::{Graphic, ItemId};
use log::{debug, info, warn};

use crate::computation::PROCESSING_ID;
use crate::error::{Error, Result};
use crate::host::{ComputationId, DocumentHost, GraphicId};
use crate::pick::{PickBinding, PICK_LABEL};
use crate::tooltip::{ToolTip, ToolTipBoard};

/// Id of the menu the item goes into.
pub const MENU_ID: &str = "4d_tools_menu";

/// Display name of the menu.
pub const MENU_NAME: &str = "4D Tools";

/// The menu is placed before this one.
pub const MENU_BEFORE_ID: &str = "window_menu";

/// Display name of the item.
pub const MENU_ITEM_NAME: &str = "Center of Mass 4D";

/// Title of the result item for a source titled `title`.
#[must_use]
pub fn result_title(title: &str) -> String {
    format!("Center of Mass Map of {title}")
}

/// Creates center-of-mass computations from the selected item and keeps
/// their pick graphics and tool tips working.
#[derive(Debug, Default)]
pub struct CenterOfMass4DMenuItem {
    bindings: Vec<PickBinding>,
    tool_tips: ToolTipBoard,
}

impl CenterOfMass4DMenuItem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bindings(&self) -> &[PickBinding] {
        &self.bindings
    }

    #[must_use]
    pub fn tool_tips(&self) -> &ToolTipBoard {
        &self.tool_tips
    }

    /// Runs the menu action on the selected data item.
    ///
    /// Returns the new computation, or `None` if nothing is selected or the
    /// selection is not 4D.
    ///
    /// # Errors
    /// Returns an error if the host fails to create the computation.
    pub fn menu_item_execute(&mut self, host: &mut dyn DocumentHost) -> Result<Option<ComputationId>> {
        let Some(src) = host.selected_data_item() else {
            debug!("no data item selected");
            return Ok(None);
        };
        let source = host.data_item(src).ok_or(Error::MissingItem(src))?;
        if !source.xdata().is_data_4d() {
            warn!(
                "'{}' has shape {:?}; center of mass needs 4D data",
                source.title(),
                source.xdata().data_shape()
            );
            self.tool_tips.show(host, ToolTip::WrongShape);
            return Ok(None);
        }
        let title = result_title(source.title());

        let target = host.create_data_item(&title);
        let computation = host.create_computation(PROCESSING_ID, src, Vec::new(), target)?;
        host.show_data_item(target);
        let pick_graphic = host.add_graphic(target, Graphic::point(0.5, 0.5).with_label(PICK_LABEL));
        self.connect(host, computation, src, pick_graphic)?;
        info!("created '{title}' (computation {})", computation.0);

        self.tool_tips.assign(src, ToolTip::Source);
        self.tool_tips.assign(target, ToolTip::CenterOfMass);
        self.tool_tips.show(host, ToolTip::Source);
        Ok(Some(computation))
    }

    /// Reconnects the pick graphics of existing center-of-mass
    /// computations. Returns how many were connected.
    pub fn init(&mut self, host: &mut dyn DocumentHost) -> usize {
        let mut connected = 0;
        for record in host.computations() {
            if record.processing_id != PROCESSING_ID {
                continue;
            }
            let (Some(src), Some(target)) = (record.source, record.target) else {
                continue;
            };
            let pick_graphic = host
                .graphics(target)
                .into_iter()
                .find(|(_, graphic)| graphic.label.as_deref() == Some(PICK_LABEL))
                .map(|(id, _)| id);
            let Some(pick_graphic) = pick_graphic else {
                continue;
            };
            match self.connect(host, record.id, src, pick_graphic) {
                Ok(()) => connected += 1,
                Err(err) => warn!("pick graphic of computation {} not reconnected: {err}", record.id.0),
            }
        }
        info!("reconnected {connected} pick graphic(s)");
        connected
    }

    fn connect(
        &mut self,
        host: &dyn DocumentHost,
        computation: ComputationId,
        src: ItemId,
        pick_graphic: GraphicId,
    ) -> Result<()> {
        let source = host.data_item(src).ok_or(Error::MissingItem(src))?;
        let binding = PickBinding::connect(computation, source, pick_graphic)?;
        self.bindings
            .retain(|existing| existing.computation() != computation);
        self.bindings.push(binding);
        Ok(())
    }

    /// Shows the tool tip of the newly focused item.
    pub fn focused_item_changed(&mut self, host: &mut dyn DocumentHost, item: Option<ItemId>) {
        self.tool_tips.focus_changed(host, item);
    }

    /// Forwards a moved pick graphic to its source display.
    pub fn pick_moved(&self, host: &mut dyn DocumentHost, graphic: GraphicId) {
        for binding in self.bindings.iter().filter(|b| b.pick_graphic() == graphic) {
            binding.pick_moved(host);
        }
    }

    /// Forwards a changed collection index to the bound pick graphics.
    pub fn collection_index_changed(&self, host: &mut dyn DocumentHost, item: ItemId) {
        for binding in self.bindings.iter().filter(|b| b.source() == item) {
            binding.collection_index_changed(host);
        }
    }
}
