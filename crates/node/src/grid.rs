//! Grid snapping for item placement and resizing.
//!
//! Two grids exist on a floor plan: the fine placement grid (15px) that
//! most items move on, and the coarse grid (60px) used by grid-aligned
//! items. An item may also declare its own `grid_step`, which then wins,
//! except for line boundaries which always stay on the fine grid so they
//! can hug other items.
//!
//! All edits go through [`snap_position`] / [`snap_size`]. Stepping by one
//! grid unit re-snaps as well, so a value that drifted off-grid (e.g. set
//! by an import) is pulled back onto it instead of staying offset.

use crate::{Axis, ItemKind, SceneItem};
use serde::{Deserialize, Serialize};

pub const FINE_GRID_STEP: f32 = 15.0;
pub const COARSE_GRID_STEP: f32 = 60.0;
pub const COMPARTMENT_CELL_SIZE: f32 = 60.0;

/// Grid dimensions used by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettings {
    /// Default placement step.
    pub fine_step: f32,
    /// Step for grid-aligned items and square boundaries.
    pub coarse_step: f32,
    /// Edge length of one SKU compartment.
    pub compartment_cell: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            fine_step: FINE_GRID_STEP,
            coarse_step: COARSE_GRID_STEP,
            compartment_cell: COMPARTMENT_CELL_SIZE,
        }
    }
}

impl GridSettings {
    /// Step that positions and sizes of `item` snap to along `axis`.
    ///
    /// Both axes currently share one step; the axis is part of the
    /// signature so per-axis steps don't change callers.
    pub fn effective_step(&self, item: &SceneItem, _axis: Axis) -> f32 {
        if matches!(item.kind, ItemKind::SolidBoundary | ItemKind::DottedBoundary) {
            return self.fine_step;
        }
        if let Some(step) = item.grid_step.filter(|s| is_valid_step(*s)) {
            return step;
        }
        if item.grid_aligned || item.kind == ItemKind::SquareBoundary {
            return self.coarse_step;
        }
        self.fine_step
    }
}

/// Direction of a one-step nudge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Increment,
    Decrement,
}

impl StepDirection {
    pub fn sign(self) -> f32 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }
}

fn is_valid_step(step: f32) -> bool {
    step.is_finite() && step > 0.0
}

fn round_to_step(raw: f32, step: f32) -> f32 {
    if !is_valid_step(step) {
        return raw;
    }
    (raw / step).round() * step
}

/// [`GridSettings::effective_step`] with the default grid.
pub fn effective_grid_step(item: &SceneItem, axis: Axis) -> f32 {
    GridSettings::default().effective_step(item, axis)
}

/// Snap a position coordinate to `step`, never below zero.
pub fn snap_position(raw: f32, step: f32) -> f32 {
    let snapped = round_to_step(raw, step);
    // Also folds -0.0 and NaN to 0.0.
    if snapped > 0.0 {
        snapped
    } else {
        0.0
    }
}

/// Snap a dimension to `step`, then clamp into
/// `[max(step, min_size ?? step), max_size]`.
///
/// `Some(0.0)` limits are honored as real values.
pub fn snap_size(raw: f32, step: f32, min_size: Option<f32>, max_size: Option<f32>) -> f32 {
    let mut snapped = round_to_step(raw, step);
    let floor = match min_size.filter(|m| m.is_finite()) {
        Some(min) => step.max(min),
        None => step,
    };
    if !(snapped >= floor) {
        snapped = floor;
    }
    if let Some(max) = max_size.filter(|m| m.is_finite()) {
        snapped = snapped.min(max);
    }
    snapped
}

/// Move a position one grid step and re-snap.
pub fn step_position(current: f32, step: f32, direction: StepDirection) -> f32 {
    snap_position(current + direction.sign() * step, step)
}

/// Grow or shrink a dimension one grid step and re-snap within limits.
pub fn step_size(
    current: f32,
    step: f32,
    direction: StepDirection,
    min_size: Option<f32>,
    max_size: Option<f32>,
) -> f32 {
    snap_size(current + direction.sign() * step, step, min_size, max_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CanvasPoint, CanvasSize};
    use proptest::prelude::*;

    fn item(kind: ItemKind) -> SceneItem {
        SceneItem::new(kind, CanvasPoint::new(0.0, 0.0), CanvasSize::new(60.0, 60.0))
    }

    #[test]
    fn line_boundaries_always_use_fine_grid() {
        let solid = item(ItemKind::SolidBoundary).with_grid_step(45.0).with_grid_aligned(true);
        let dotted = item(ItemKind::DottedBoundary).with_grid_aligned(true);
        assert_eq!(effective_grid_step(&solid, Axis::X), 15.0);
        assert_eq!(effective_grid_step(&dotted, Axis::Y), 15.0);
    }

    #[test]
    fn explicit_grid_step_wins_over_alignment() {
        let unit = item(ItemKind::StorageUnit).with_grid_step(30.0).with_grid_aligned(true);
        assert_eq!(effective_grid_step(&unit, Axis::X), 30.0);
    }

    #[test]
    fn aligned_and_square_boundaries_use_coarse_grid() {
        let aligned = item(ItemKind::StorageUnit).with_grid_aligned(true);
        let square = item(ItemKind::SquareBoundary);
        assert_eq!(effective_grid_step(&aligned, Axis::X), 60.0);
        assert_eq!(effective_grid_step(&square, Axis::X), 60.0);
        assert_eq!(effective_grid_step(&item(ItemKind::SpareUnit), Axis::X), 15.0);
    }

    #[test]
    fn zero_grid_step_is_ignored() {
        let unit = item(ItemKind::StorageUnit).with_grid_step(0.0);
        assert_eq!(effective_grid_step(&unit, Axis::X), 15.0);
    }

    #[test]
    fn custom_settings_change_steps() {
        let settings = GridSettings {
            fine_step: 10.0,
            coarse_step: 40.0,
            compartment_cell: 40.0,
        };
        assert_eq!(settings.effective_step(&item(ItemKind::Zone), Axis::X), 10.0);
        assert_eq!(settings.effective_step(&item(ItemKind::SquareBoundary), Axis::X), 40.0);
    }

    #[test]
    fn snap_position_rounds_and_clamps() {
        assert_eq!(snap_position(22.0, 15.0), 15.0);
        assert_eq!(snap_position(23.0, 15.0), 30.0);
        assert_eq!(snap_position(-40.0, 15.0), 0.0);
        assert_eq!(snap_position(-0.1, 15.0).to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn snap_size_respects_limits() {
        assert_eq!(snap_size(10.0, 60.0, None, None), 60.0);
        assert_eq!(snap_size(100.0, 60.0, None, None), 120.0);
        assert_eq!(snap_size(60.0, 60.0, Some(120.0), None), 120.0);
        assert_eq!(snap_size(400.0, 60.0, None, Some(300.0)), 300.0);
    }

    #[test]
    fn zero_min_size_is_a_real_limit() {
        // Floor is still the step itself.
        assert_eq!(snap_size(0.0, 15.0, Some(0.0), None), 15.0);
        assert_eq!(snap_size(0.0, 15.0, Some(0.0), Some(0.0)), 0.0);
    }

    #[test]
    fn stepping_resnaps_off_grid_values() {
        assert_eq!(step_size(100.0, 60.0, StepDirection::Increment, None, None), 180.0);
        assert_eq!(step_size(100.0, 60.0, StepDirection::Decrement, None, None), 60.0);
        assert_eq!(step_position(7.0, 15.0, StepDirection::Increment), 15.0);
        assert_eq!(step_position(0.0, 15.0, StepDirection::Decrement), 0.0);
    }

    fn steps() -> impl Strategy<Value = f32> {
        prop::sample::select(vec![7.5f32, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0, 120.0])
    }

    proptest! {
        #[test]
        fn snap_position_is_idempotent(v in -100_000.0f32..100_000.0, step in steps()) {
            let once = snap_position(v, step);
            prop_assert_eq!(snap_position(once, step), once);
        }

        #[test]
        fn snap_position_is_never_negative(v in proptest::num::f32::ANY, step in steps()) {
            prop_assert!(snap_position(v, step) >= 0.0);
        }

        #[test]
        fn snap_size_is_idempotent(v in -100_000.0f32..100_000.0, step in steps()) {
            let once = snap_size(v, step, None, None);
            prop_assert_eq!(snap_size(once, step, None, None), once);
        }

        #[test]
        fn snap_size_lands_within_limits(
            v in -100_000.0f32..100_000.0,
            step in steps(),
            min in prop::option::of(0.0f32..500.0),
            extra in prop::option::of(0.0f32..5_000.0),
        ) {
            let floor = step.max(min.unwrap_or(step));
            let max = extra.map(|e| floor + e);
            let out = snap_size(v, step, min, max);
            prop_assert!(out >= floor);
            if let Some(max) = max {
                prop_assert!(out <= max);
            }
        }
    }
}
