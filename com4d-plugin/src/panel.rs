//! Toolkit-independent panel widgets.
//!
//! Computations describe their panels as a widget tree; the host renders
//! it and reports button clicks back as [`PanelAction`]s.

use log::{debug, info};

use crate::computation::MAP_REGIONS;
use crate::host::{ComputationHost, ComputationId};

/// Spacing around panel content, in pixels.
pub const PANEL_SPACING: u32 = 10;

/// Text of the button that selects the map regions.
pub const SELECT_MAP_GRAPHIC: &str = "Select map graphic";

/// Actions a panel button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// Replace the computation's map regions with the selected graphics.
    SelectMapRegions,
}

/// A push button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushButton {
    pub text: String,
    pub action: PanelAction,
}

/// Panel widget tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Column(Vec<Widget>),
    Row(Vec<Widget>),
    /// Fixed gap.
    Spacing(u32),
    /// Flexible gap.
    Stretch,
    Label(String),
    PushButton(PushButton),
}

impl Widget {
    /// All buttons in the tree, depth first.
    #[must_use]
    pub fn buttons(&self) -> Vec<&PushButton> {
        let mut buttons = Vec::new();
        self.collect_buttons(&mut buttons);
        buttons
    }

    /// First button with the given text.
    #[must_use]
    pub fn find_button(&self, text: &str) -> Option<&PushButton> {
        self.buttons().into_iter().find(|button| button.text == text)
    }

    fn collect_buttons<'a>(&'a self, buttons: &mut Vec<&'a PushButton>) {
        match self {
            Widget::Column(children) | Widget::Row(children) => {
                for child in children {
                    child.collect_buttons(buttons);
                }
            }
            Widget::PushButton(button) => buttons.push(button),
            Widget::Spacing(_) | Widget::Stretch | Widget::Label(_) => {}
        }
    }
}

/// Panel of the center-of-mass computation: one button to pick the map
/// regions from the current graphic selection.
#[must_use]
pub fn select_map_regions_panel() -> Widget {
    let row = Widget::Row(vec![
        Widget::Spacing(PANEL_SPACING),
        Widget::PushButton(PushButton {
            text: SELECT_MAP_GRAPHIC.to_string(),
            action: PanelAction::SelectMapRegions,
        }),
        Widget::Stretch,
        Widget::Spacing(PANEL_SPACING),
    ]);
    Widget::Column(vec![
        Widget::Spacing(PANEL_SPACING),
        row,
        Widget::Spacing(PANEL_SPACING),
        Widget::Stretch,
    ])
}

/// Runs a panel action for `computation`.
///
/// Returns true if the computation was changed and scheduled for update.
pub fn handle_action(
    action: PanelAction,
    computation: ComputationId,
    host: &mut dyn ComputationHost,
) -> bool {
    match action {
        PanelAction::SelectMapRegions => {
            let selected = host.selected_graphics();
            if selected.is_empty() {
                debug!("no graphics selected; map regions unchanged");
                return false;
            }
            info!(
                "computation {} now uses {} map region(s)",
                computation.0,
                selected.len()
            );
            // Regions must be in place before the update is scheduled.
            host.replace_regions(computation, MAP_REGIONS, selected);
            host.mark_needs_update(computation);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RegionRef;
    use com4d_core::region::Graphic;
    use std::sync::Arc;

    #[derive(Default)]
    struct Host {
        selected: Vec<RegionRef>,
        regions: Vec<RegionRef>,
        events: Vec<&'static str>,
    }

    impl ComputationHost for Host {
        fn selected_graphics(&self) -> Vec<RegionRef> {
            self.selected.clone()
        }

        fn replace_regions(&mut self, _: ComputationId, name: &str, regions: Vec<RegionRef>) {
            assert_eq!(name, MAP_REGIONS);
            self.regions = regions;
            self.events.push("replace");
        }

        fn mark_needs_update(&mut self, _: ComputationId) {
            self.events.push("update");
        }
    }

    #[test]
    fn test_panel_has_select_button() {
        let panel = select_map_regions_panel();
        let buttons = panel.buttons();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].action, PanelAction::SelectMapRegions);
        assert!(panel.find_button(SELECT_MAP_GRAPHIC).is_some());
        assert!(panel.find_button("Other").is_none());
    }

    #[test]
    fn test_select_replaces_then_schedules() {
        let mut host = Host {
            regions: vec![Arc::new(Graphic::point(0.1, 0.1))],
            selected: vec![
                Arc::new(Graphic::point(0.5, 0.5)),
                Arc::new(Graphic::point(0.2, 0.7)),
            ],
            ..Host::default()
        };
        assert!(handle_action(
            PanelAction::SelectMapRegions,
            ComputationId(1),
            &mut host
        ));
        assert_eq!(host.regions.len(), 2);
        assert_eq!(host.events, vec!["replace", "update"]);
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut host = Host {
            regions: vec![Arc::new(Graphic::point(0.1, 0.1))],
            ..Host::default()
        };
        assert!(!handle_action(
            PanelAction::SelectMapRegions,
            ComputationId(1),
            &mut host
        ));
        assert_eq!(host.regions.len(), 1);
        assert!(host.events.is_empty());
    }
}
