//! Generic computation panel.
//!
//! Shows the panel widget of the computation that produced the focused
//! data item, and rebuilds it whenever that computation is updated.

use com4d_core::ItemId;
use log::{debug, error};

use crate::error::Result;
use crate::host::ComputationId;
use crate::panel::Widget;

/// Id of the panel.
pub const PANEL_ID: &str = "ComputationUI-Panel";

/// Display name of the panel.
pub const PANEL_NAME: &str = "Computation";

/// Lookup of computations and their panels.
pub trait ComputationDirectory {
    /// The computation whose output is `item`, if any.
    fn computation_producing(&self, item: ItemId) -> Option<ComputationId>;

    /// Builds the panel widget of `computation`.
    ///
    /// # Errors
    /// Returns an error if the computation is gone or its panel fails.
    fn panel_widget(&self, computation: ComputationId) -> Result<Option<Widget>>;
}

/// Panel content following the focused data item.
#[derive(Debug, Default)]
pub struct ComputationUiPanel {
    content: Option<Widget>,
    watched: Option<ComputationId>,
}

impl ComputationUiPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current panel content; `None` means empty.
    #[must_use]
    pub fn content(&self) -> Option<&Widget> {
        self.content.as_ref()
    }

    /// Computation whose updates rebuild the panel.
    #[must_use]
    pub fn watched(&self) -> Option<ComputationId> {
        self.watched
    }

    /// Switches the panel to the computation producing `item`.
    ///
    /// Focusing nothing leaves the panel as it is.
    pub fn focused_item_changed(&mut self, directory: &dyn ComputationDirectory, item: Option<ItemId>) {
        let Some(item) = item else {
            return;
        };
        self.watched = directory.computation_producing(item);
        match self.watched {
            Some(computation) => self.rebuild(directory, computation),
            None => {
                debug!("{item} is not a computation output");
                self.content = None;
            }
        }
    }

    /// Rebuilds the panel if `computation` is the watched one.
    pub fn computation_updated(&mut self, directory: &dyn ComputationDirectory, computation: ComputationId) {
        if self.watched == Some(computation) {
            self.rebuild(directory, computation);
        }
    }

    fn rebuild(&mut self, directory: &dyn ComputationDirectory, computation: ComputationId) {
        self.content = match directory.panel_widget(computation) {
            Ok(widget) => widget,
            Err(err) => {
                error!("panel of computation {} failed: {err}", computation.0);
                None
            }
        };
    }
}
