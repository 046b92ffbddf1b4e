//! com4d-plugin: Host integration of the 4D center-of-mass computation.
//!
//! The host application owns documents, data items and displays; this
//! crate talks to it through the traits in [`host`]. It provides:
//!
//! - [`CenterOfMass4D`], the computation (execute, then commit)
//! - the computation registry
//! - the "Center of Mass 4D" menu item with its tool tips and pick binding
//! - the panel with the "Select map graphic" button
//! - a generic panel showing the widget of the focused computation
//!
//! # Example
//!
//! ```
//! use com4d_plugin::{registry, Computation, PROCESSING_ID};
//!
//! let registry = registry::init();
//! let computation = registry.read().create(PROCESSING_ID).unwrap();
//! assert_eq!(computation.processing_id(), PROCESSING_ID);
//! ```

pub mod computation;
pub mod computation_panel;
pub mod error;
pub mod host;
pub mod menu;
pub mod panel;
pub mod pick;
pub mod registry;
pub mod startup;
pub mod tooltip;

pub use computation::{
    CenterOfMass4D, Computation, ComputationInputs, ExecutionState, MAP_REGIONS, PARAMETERS_KEY,
    PROCESSING_ID, SRC, TARGET,
};
pub use computation_panel::{ComputationDirectory, ComputationUiPanel};
pub use error::{Error, Result};
pub use host::{
    CollectionIndex, ComputationHost, ComputationId, ComputationRecord, DocumentHost, GraphicId,
    OutputSlots, RegionRef, ToolTipId,
};
pub use menu::CenterOfMass4DMenuItem;
pub use panel::{handle_action, select_map_regions_panel, PanelAction, PushButton, Widget};
pub use pick::PickBinding;
pub use registry::{ComputationFactory, ComputationRegistry};
pub use startup::{CenterOfMass4DExtension, Readiness, ReadinessGate, RetryPolicy};
pub use tooltip::{ToolTip, ToolTipBoard, TOOL_TIP_TIMEOUT};
