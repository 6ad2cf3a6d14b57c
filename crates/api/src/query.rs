//! Floorplan queries - read-only access to the open layout.
//!
//! Queries let scripts inspect the layout before issuing commands.

use crate::AssignmentState;
use glam::Vec2;
use node::{
    CompartmentContent, CompartmentId, CompartmentSummary, ItemId, ItemKind, StorageUnitLabelInfo,
};
use serde::{Deserialize, Serialize};

/// A query for layout state (read-only).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Get the selected item id.
    GetSelection,

    /// Get all items.
    GetAllItems,

    /// Get a specific item by ID.
    GetItem { id: ItemId },

    /// Get an item's compartment grid and contents.
    GetCompartments { id: ItemId },

    /// Storage-unit header info for an item.
    GetLabelInfo { id: ItemId },

    /// Every location id in use, sorted.
    GetLocationIds,

    /// Whether a location id is free to assign.
    CheckLocationId { location_id: String },

    /// The pending compartment assignment.
    GetAssignment,

    /// Get item count.
    GetItemCount,
}

/// Response to a query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Selection { id: Option<ItemId> },

    Items { items: Vec<ItemInfo> },

    Item { item: Option<ItemInfo> },

    Compartments {
        rows: u32,
        cols: u32,
        summary: CompartmentSummary,
        entries: Vec<CompartmentInfo>,
        /// Occupied compartments outside the current grid.
        stranded: Vec<CompartmentId>,
    },

    LabelInfo { info: Option<StorageUnitLabelInfo> },

    LocationIds { ids: Vec<String> },

    Availability { available: bool },

    Assignment { state: AssignmentState },

    Count { count: usize },

    /// Error result.
    Error { message: String },
}

/// Serializable item information.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Label shown in the panel header.
    pub label: String,
    pub position: Vec2,
    pub size: Vec2,
    /// Grid step edits on this item snap to.
    pub grid_step: f32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub position_locked: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub size_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartments: Option<CompartmentSummary>,
}

/// One occupied compartment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompartmentInfo {
    pub id: CompartmentId,
    pub content: CompartmentContent,
}
