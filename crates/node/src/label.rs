//! Display strings derived from items.
//!
//! These are read-only helpers for the informational header of the
//! properties panel; nothing here mutates an item.

use crate::grid::GridSettings;
use crate::{CompartmentSummary, ItemKind, SceneItem};
use serde::{Deserialize, Serialize};

/// The best human label for an item: its label, else its name, else the
/// kind's display name.
pub fn contextual_label(item: &SceneItem) -> String {
    [item.label.trim(), item.name.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| item.kind.display_name())
}

/// Header information shown for storage units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUnitLabelInfo {
    pub title: String,
    /// e.g. `"2 × 3 compartments"`.
    pub grid_description: String,
    /// e.g. `"180 × 120 px"`.
    pub footprint: String,
    pub summary: CompartmentSummary,
    /// SKU references across all stack layers.
    pub stacked_skus: usize,
}

/// Label info for a storage unit; `None` for every other kind.
pub fn storage_unit_label_info(item: &SceneItem, settings: &GridSettings) -> Option<StorageUnitLabelInfo> {
    if item.kind != ItemKind::StorageUnit {
        return None;
    }
    let grid = item.compartment_grid(settings);
    let plural = if grid.total() == 1 { "" } else { "s" };
    Some(StorageUnitLabelInfo {
        title: contextual_label(item),
        grid_description: format!("{} × {} compartment{}", grid.rows, grid.cols, plural),
        footprint: format!("{:.0} × {:.0} px", item.width, item.height),
        summary: grid.summary(&item.compartment_contents),
        stacked_skus: item.stack.as_ref().map(|s| s.sku_count()).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CanvasPoint, CanvasSize};

    #[test]
    fn label_then_name_then_kind() {
        let item = SceneItem::storage_unit(CanvasPoint::default(), CanvasSize::new(60.0, 60.0));
        assert_eq!(contextual_label(&item), "Storage Unit");
        let item = item.with_name("Rack 4");
        assert_eq!(contextual_label(&item), "Rack 4");
        let item = item.with_label("  A-01 ");
        assert_eq!(contextual_label(&item), "A-01");

        let blank = SceneItem::spare_unit(CanvasPoint::default(), CanvasSize::new(60.0, 60.0)).with_name(" ");
        assert_eq!(contextual_label(&blank), "Spare Unit");
    }

    #[test]
    fn storage_unit_info_describes_grid() {
        let item = SceneItem::storage_unit(CanvasPoint::default(), CanvasSize::new(180.0, 120.0))
            .with_label("Bay 2");
        let info = storage_unit_label_info(&item, &GridSettings::default()).unwrap();
        assert_eq!(info.title, "Bay 2");
        assert_eq!(info.grid_description, "2 × 3 compartments");
        assert_eq!(info.footprint, "180 × 120 px");
        assert_eq!(info.summary.total, 6);
        assert_eq!(info.summary.available, 6);
    }

    #[test]
    fn other_kinds_have_no_storage_info() {
        let item = SceneItem::spare_unit(CanvasPoint::default(), CanvasSize::new(60.0, 60.0));
        assert!(storage_unit_label_info(&item, &GridSettings::default()).is_none());
    }
}
