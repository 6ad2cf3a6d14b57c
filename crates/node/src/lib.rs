//! Floor-plan item model.
//!
//! Items form a flat list owned by the host scene; this crate holds the
//! item type itself plus the pure derivations the editor needs: grid
//! snapping, compartment grids, color normalization and display labels.

pub mod color;
pub mod compartment;
pub mod coords;
pub mod grid;
mod item;
mod item_id;
pub mod label;
mod update;

pub use color::{normalize_hex_color, HexColor, FALLBACK_COLOR};
pub use compartment::{
    CompartmentContent, CompartmentEdit, CompartmentGrid, CompartmentId, CompartmentIdError,
    CompartmentMap, CompartmentSummary, LevelMapping, MultiLocation, SingleLocation,
    DEFAULT_STATUS,
};
pub use coords::{Axis, CanvasDelta, CanvasPoint, CanvasSize};
pub use grid::{
    effective_grid_step, snap_position, snap_size, step_position, step_size, GridSettings,
    StepDirection,
};
pub use item::{ItemKind, SceneItem, SizeLimits, Stack, StackLayer};
pub use item_id::ItemId;
pub use label::{contextual_label, storage_unit_label_info, StorageUnitLabelInfo};
pub use update::ItemUpdate;
