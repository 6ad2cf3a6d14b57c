//! Partial item updates proposed by the properties editor.

use crate::compartment::CompartmentMap;
use crate::SceneItem;
use serde::{Deserialize, Serialize};

/// A set of field changes for one item. `None` leaves a field alone.
///
/// The editor builds these; the host applies them with
/// [`ItemUpdate::apply_to`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_position_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_size_locked: Option<bool>,
    /// Replacement for the whole compartment map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment_contents: Option<CompartmentMap>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self {
            name: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn label(value: impl Into<String>) -> Self {
        Self {
            label: Some(value.into()),
            ..Default::default()
        }
    }

    /// Sets `color` and `custom_color` together.
    pub fn color(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            color: Some(value.clone()),
            custom_color: Some(value),
            ..Default::default()
        }
    }

    pub fn compartments(contents: CompartmentMap) -> Self {
        Self {
            compartment_contents: Some(contents),
            ..Default::default()
        }
    }

    /// Write every present field into `item`.
    pub fn apply_to(self, item: &mut SceneItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(label) = self.label {
            item.label = label;
        }
        if let Some(color) = self.color {
            item.color = Some(color);
        }
        if let Some(color) = self.custom_color {
            item.custom_color = Some(color);
        }
        if let Some(x) = self.x {
            item.x = x;
        }
        if let Some(y) = self.y {
            item.y = y;
        }
        if let Some(width) = self.width {
            item.width = width;
        }
        if let Some(height) = self.height {
            item.height = height;
        }
        if let Some(locked) = self.is_position_locked {
            item.is_position_locked = locked;
        }
        if let Some(locked) = self.is_size_locked {
            item.is_size_locked = locked;
        }
        if let Some(contents) = self.compartment_contents {
            item.compartment_contents = contents;
        }
    }
}
