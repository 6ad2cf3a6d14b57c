use node::{CanvasPoint, CanvasSize, ItemKind, SceneItem};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ShapeCategory {
    /// Plain rectangles and labels.
    Basic,
    /// Racks, shelving and spare units.
    Storage,
    /// Walls, zones, aisles and doors.
    Boundaries,
    /// Shapes added by the user.
    Custom,
}

/// A placeable shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeTemplate {
    pub id: String,
    pub name: String,
    pub category: ShapeCategory,
    /// Outline as SVG path data, in a box of `default_size`.
    pub path: String,
    pub default_size: CanvasSize,
    pub icon: String,
    #[serde(default)]
    pub description: String,
    /// Kind of item created when the shape is placed.
    pub item_kind: ItemKind,
}

impl ShapeTemplate {
    /// A new item of this shape with its top-left corner at `position`.
    pub fn instantiate(&self, position: CanvasPoint) -> SceneItem {
        SceneItem::new(self.item_kind.clone(), position, self.default_size).with_name(self.name.clone())
    }

    pub fn is_custom(&self) -> bool {
        self.category == ShapeCategory::Custom
    }
}

fn rect_path(width: f32, height: f32) -> String {
    format!("M 0 0 L {width} 0 L {width} {height} L 0 {height} Z")
}

fn builtin(
    id: &str,
    name: &str,
    category: ShapeCategory,
    size: (f32, f32),
    icon: &str,
    description: &str,
    item_kind: ItemKind,
) -> ShapeTemplate {
    ShapeTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category,
        path: rect_path(size.0, size.1),
        default_size: CanvasSize::new(size.0, size.1),
        icon: icon.to_string(),
        description: description.to_string(),
        item_kind,
    }
}

/// The shapes every library starts with.
pub fn builtin_templates() -> Vec<ShapeTemplate> {
    use ShapeCategory::*;
    vec![
        builtin(
            "rectangle",
            "Rectangle",
            Basic,
            (120.0, 60.0),
            "svg/square.svg",
            "Free-form area",
            ItemKind::Zone,
        ),
        builtin(
            "text",
            "Text Label",
            Basic,
            (120.0, 30.0),
            "svg/text.svg",
            "Floor marking or note",
            ItemKind::Text,
        ),
        builtin(
            "storage-unit",
            "Storage Unit",
            Storage,
            (120.0, 60.0),
            "svg/rack.svg",
            "Rack with addressable SKU compartments",
            ItemKind::StorageUnit,
        ),
        builtin(
            "pallet-rack",
            "Pallet Rack",
            Storage,
            (180.0, 120.0),
            "svg/rack.svg",
            "Two-level pallet rack, three bays wide",
            ItemKind::StorageUnit,
        ),
        builtin(
            "spare-unit",
            "Spare Unit",
            Storage,
            (60.0, 60.0),
            "svg/box.svg",
            "Named, colored placeholder",
            ItemKind::SpareUnit,
        ),
        builtin(
            "solid-boundary",
            "Wall",
            Boundaries,
            (300.0, 15.0),
            "svg/line_tool.svg",
            "Solid boundary line",
            ItemKind::SolidBoundary,
        ),
        builtin(
            "dotted-boundary",
            "Dotted Boundary",
            Boundaries,
            (300.0, 15.0),
            "svg/line_tool.svg",
            "Marked but open boundary",
            ItemKind::DottedBoundary,
        ),
        builtin(
            "square-boundary",
            "Square Boundary",
            Boundaries,
            (240.0, 240.0),
            "svg/frame.svg",
            "Enclosed area on the coarse grid",
            ItemKind::SquareBoundary,
        ),
        builtin(
            "zone",
            "Zone",
            Boundaries,
            (300.0, 300.0),
            "svg/frame.svg",
            "Receiving, staging or dispatch zone",
            ItemKind::Zone,
        ),
        builtin(
            "aisle",
            "Aisle",
            Boundaries,
            (60.0, 300.0),
            "svg/aisle.svg",
            "Walkway between racks",
            ItemKind::Aisle,
        ),
        builtin(
            "door",
            "Door",
            Boundaries,
            (60.0, 15.0),
            "svg/door.svg",
            "Dock or personnel door",
            ItemKind::Door,
        ),
    ]
}
