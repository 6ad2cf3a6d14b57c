use crate::compartment::{deserialize_contents, CompartmentGrid, CompartmentId, CompartmentMap};
use crate::coords::{Axis, CanvasPoint, CanvasSize};
use crate::grid::GridSettings;
use crate::ItemId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// The kind of item placed on a floor plan.
///
/// Serialized as its snake_case tag. Tags this build does not know are
/// kept verbatim in `Other` so a layout survives a load/save round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    StorageUnit,
    SpareUnit,
    SolidBoundary,
    DottedBoundary,
    SquareBoundary,
    Zone,
    Aisle,
    Door,
    Text,
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::StorageUnit => "storage_unit",
            Self::SpareUnit => "spare_unit",
            Self::SolidBoundary => "solid_boundary",
            Self::DottedBoundary => "dotted_boundary",
            Self::SquareBoundary => "square_boundary",
            Self::Zone => "zone",
            Self::Aisle => "aisle",
            Self::Door => "door",
            Self::Text => "text",
            Self::Other(tag) => tag,
        }
    }

    /// Human-readable name used when an item has no name of its own.
    pub fn display_name(&self) -> String {
        match self {
            Self::StorageUnit => "Storage Unit".to_string(),
            Self::SpareUnit => "Spare Unit".to_string(),
            Self::SolidBoundary => "Solid Boundary".to_string(),
            Self::DottedBoundary => "Dotted Boundary".to_string(),
            Self::SquareBoundary => "Square Boundary".to_string(),
            Self::Zone => "Zone".to_string(),
            Self::Aisle => "Aisle".to_string(),
            Self::Door => "Door".to_string(),
            Self::Text => "Text".to_string(),
            Self::Other(tag) => tag
                .split('_')
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Self::SolidBoundary | Self::DottedBoundary | Self::SquareBoundary
        )
    }
}

impl From<String> for ItemKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "storage_unit" => Self::StorageUnit,
            "spare_unit" => Self::SpareUnit,
            "solid_boundary" => Self::SolidBoundary,
            "dotted_boundary" => Self::DottedBoundary,
            "square_boundary" => Self::SquareBoundary,
            "zone" => Self::Zone,
            "aisle" => Self::Aisle,
            "door" => Self::Door,
            "text" => Self::Text,
            _ => Self::Other(tag),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-axis size limit. `Some(0.0)` is a real limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl SizeLimits {
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    pub fn get(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}

/// One shelf level of a stacked unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub skus: SmallVec<[String; 4]>,
}

/// Vertical stacking of a storage item; display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    #[serde(default)]
    pub layers: Vec<StackLayer>,
}

impl Stack {
    pub fn sku_count(&self) -> usize {
        self.layers.iter().map(|l| l.skus.len()).sum()
    }
}

/// An item on the floor plan.
///
/// Field names serialize in camelCase, matching layouts written by the
/// web host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,

    // Geometry, in canvas pixels.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// The item's own resize quantum, overriding the placement grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_step: Option<f32>,
    /// Snap to the coarse grid when no `grid_step` is set.
    #[serde(default)]
    pub grid_aligned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<SizeLimits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<SizeLimits>,

    #[serde(default)]
    pub is_position_locked: bool,
    #[serde(default)]
    pub is_size_locked: bool,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,

    /// Whether the item exposes a compartment grid. Absent means
    /// "storage units do, everything else doesn't".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_grid: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "CompartmentMap::is_empty",
        deserialize_with = "deserialize_contents"
    )]
    pub compartment_contents: CompartmentMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Stack>,
}

impl SceneItem {
    pub fn new(kind: ItemKind, position: CanvasPoint, size: CanvasSize) -> Self {
        let name = kind.display_name();
        Self {
            id: ItemId::new(),
            kind,
            x: position.x(),
            y: position.y(),
            width: size.width(),
            height: size.height(),
            grid_step: None,
            grid_aligned: false,
            min_size: None,
            max_size: None,
            is_position_locked: false,
            is_size_locked: false,
            name,
            label: String::new(),
            color: None,
            custom_color: None,
            sku_grid: None,
            compartment_contents: CompartmentMap::new(),
            stack: None,
        }
    }

    pub fn storage_unit(position: CanvasPoint, size: CanvasSize) -> Self {
        Self::new(ItemKind::StorageUnit, position, size)
    }

    pub fn spare_unit(position: CanvasPoint, size: CanvasSize) -> Self {
        Self::new(ItemKind::SpareUnit, position, size)
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_grid_step(mut self, step: f32) -> Self {
        self.grid_step = Some(step);
        self
    }

    pub fn with_grid_aligned(mut self, aligned: bool) -> Self {
        self.grid_aligned = aligned;
        self
    }

    pub fn with_min_size(mut self, limits: SizeLimits) -> Self {
        self.min_size = Some(limits);
        self
    }

    pub fn with_max_size(mut self, limits: SizeLimits) -> Self {
        self.max_size = Some(limits);
        self
    }

    pub fn with_locks(mut self, position: bool, size: bool) -> Self {
        self.is_position_locked = position;
        self.is_size_locked = size;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_sku_grid(mut self, enabled: bool) -> Self {
        self.sku_grid = Some(enabled);
        self
    }

    pub fn position(&self) -> CanvasPoint {
        CanvasPoint::new(self.x, self.y)
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn position_on(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn size_on(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn min_size_on(&self, axis: Axis) -> Option<f32> {
        self.min_size.and_then(|l| l.get(axis))
    }

    pub fn max_size_on(&self, axis: Axis) -> Option<f32> {
        self.max_size.and_then(|l| l.get(axis))
    }

    /// Returns the bounding box as (min, max) corners.
    pub fn bounds(&self) -> (CanvasPoint, CanvasPoint) {
        let pos = self.position();
        (pos, CanvasPoint(pos.0 + self.size().0))
    }

    /// Check if a point is inside this item's bounding box.
    pub fn contains_point(&self, point: CanvasPoint) -> bool {
        let (min, max) = self.bounds();
        point.x() >= min.x() && point.x() <= max.x() && point.y() >= min.y() && point.y() <= max.y()
    }

    /// Only spare units take a user-chosen name and color.
    pub fn is_customizable(&self) -> bool {
        self.kind == ItemKind::SpareUnit
    }

    pub fn has_sku_grid(&self) -> bool {
        self.sku_grid.unwrap_or(self.kind == ItemKind::StorageUnit)
    }

    /// Compartment grid for the item's current size.
    pub fn compartment_grid(&self, settings: &GridSettings) -> CompartmentGrid {
        CompartmentGrid::for_size(self.size(), settings.compartment_cell)
    }

    /// Every non-empty location id stored on this item, with the
    /// compartment holding it.
    pub fn location_ids(&self) -> impl Iterator<Item = (CompartmentId, &str)> + '_ {
        self.compartment_contents
            .iter()
            .flat_map(|(id, content)| content.location_ids().into_iter().map(move |loc| (*id, loc)))
    }
}
