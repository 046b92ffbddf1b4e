//! Tool tips guiding the user through the center-of-mass workflow.

use std::collections::HashMap;
use std::time::Duration;

use com4d_core::ItemId;
use log::debug;

use crate::host::{DocumentHost, ToolTipId};

/// How long a tool tip stays up.
pub const TOOL_TIP_TIMEOUT: Duration = Duration::from_secs(30);

/// The tool tips of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolTip {
    /// Shown on the source item: how to select map regions.
    Source,
    /// Shown on the result map: how to use the pick graphic.
    CenterOfMass,
    /// The selected item is not 4D.
    WrongShape,
}

impl ToolTip {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            ToolTip::Source => {
                "Select one or multiple graphic(s) on the source data item and click \"Select\" in \
                 the computation panel (Window -> Computation).\nWithout a selected graphic, the \
                 center-of-mass will be calculated for the full frames."
            }
            ToolTip::CenterOfMass => {
                "Move the \"Pick\" graphic to change the data slice in the source data item.\n\
                 X- and y-coordinates of the COM are in the two slices of the result (order: y, x)."
            }
            ToolTip::WrongShape => "This computation only works for 4D-data.",
        }
    }
}

/// Tracks which tip belongs to which item and which tips are showing.
///
/// At most one tip is up at a time: showing a tip removes the previous one.
#[derive(Debug, Default)]
pub struct ToolTipBoard {
    assigned: HashMap<ItemId, ToolTip>,
    showing: Vec<ToolTipId>,
}

impl ToolTipBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `tip` with `item`; focusing the item shows it.
    pub fn assign(&mut self, item: ItemId, tip: ToolTip) {
        self.assigned.insert(item, tip);
    }

    #[must_use]
    pub fn assigned(&self, item: ItemId) -> Option<ToolTip> {
        self.assigned.get(&item).copied()
    }

    /// Tips currently posed by this board.
    #[must_use]
    pub fn showing(&self) -> &[ToolTipId] {
        &self.showing
    }

    /// Removes the showing tips and poses `tip`.
    pub fn show(&mut self, host: &mut dyn DocumentHost, tip: ToolTip) {
        for id in self.showing.drain(..) {
            host.remove_tool_tip(id);
        }
        debug!("showing tool tip {tip:?}");
        let id = host.pose_tool_tip(tip.text(), TOOL_TIP_TIMEOUT);
        self.showing.push(id);
    }

    /// Shows the tip assigned to the newly focused item, if any.
    pub fn focus_changed(&mut self, host: &mut dyn DocumentHost, item: Option<ItemId>) {
        if let Some(tip) = item.and_then(|item| self.assigned(item)) {
            self.show(host, tip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts() {
        assert!(ToolTip::Source.text().contains("full frames"));
        assert!(ToolTip::CenterOfMass.text().contains("\"Pick\""));
        assert_eq!(
            ToolTip::WrongShape.text(),
            "This computation only works for 4D-data."
        );
    }

    #[test]
    fn test_assignment() {
        let mut board = ToolTipBoard::new();
        board.assign(ItemId::new(1), ToolTip::Source);
        board.assign(ItemId::new(2), ToolTip::CenterOfMass);
        assert_eq!(board.assigned(ItemId::new(1)), Some(ToolTip::Source));
        assert_eq!(board.assigned(ItemId::new(3)), None);
        assert!(board.showing().is_empty());
    }
}
