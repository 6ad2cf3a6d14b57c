//! Floorplan commands - every operation that changes the open layout.
//!
//! Commands describe what the user did in the properties panel, not how
//! the scene changes. They serialize as JSON so edits can be recorded,
//! scripted through the CLI and replayed.

use crate::{IdSelection, PromptResult};
use glam::Vec2;
use node::{Axis, CompartmentEdit, CompartmentId, ItemId, StepDirection};
use serde::{Deserialize, Serialize};

/// A command that modifies the open layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Selection ===
    /// Select an item by id, or clear the selection.
    Select {
        #[serde(default)]
        id: Option<ItemId>,
    },

    /// Select the topmost item under a canvas point.
    SelectAt { point: Vec2 },

    // === Text fields ===
    SetName { value: String },
    SetLabel { value: String },
    SetColor { value: String },

    // === Geometry ===
    /// Set x or y; the value is snapped to the item's grid.
    SetPosition { axis: Axis, value: FieldValue },

    /// Set width or height; the value is snapped and clamped.
    SetSize { axis: Axis, value: FieldValue },

    /// Move one grid step.
    StepPosition { axis: Axis, direction: StepDirection },

    /// Grow or shrink one grid step.
    StepSize { axis: Axis, direction: StepDirection },

    SetPositionLocked { locked: bool },
    SetSizeLocked { locked: bool },

    /// Delete the selected item.
    DeleteItem,

    // === Compartments ===
    /// Click a compartment cell; empty cells open the id selector.
    ClickCompartment { compartment: CompartmentId },

    /// Save the selector's choice into the pending compartment.
    CompleteAssignment { selection: IdSelection },

    /// Close the selector without saving.
    CancelAssignment,

    /// Answer the rename dialog for an occupied compartment.
    RenameLocation {
        compartment: CompartmentId,
        result: PromptResult,
    },

    /// Change stock details of an occupied compartment.
    EditCompartment {
        compartment: CompartmentId,
        #[serde(flatten)]
        edit: CompartmentEdit,
    },

    /// Clear a compartment and free its ids.
    RemoveCompartment { compartment: CompartmentId },

    /// Clear every compartment outside the current grid.
    PurgeStranded,

    // === Batch ===
    /// Execute multiple commands in sequence.
    Batch { commands: Vec<Command> },
}

/// A numeric field value, either typed in or already parsed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f32),
    /// Raw text from an input box; ignored unless it parses as a number.
    Text(String),
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command changed the layout.
    Success {
        /// IDs of items modified, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ItemId>,
        /// IDs of items deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ItemId>,
    },
    /// Command was valid but had nothing to do.
    Unchanged,
    /// Input was refused (collision, empty id); nothing was written.
    Rejected { message: String },
    /// An empty compartment was clicked and the id selector is open.
    SelectorOpened {
        item: ItemId,
        compartment: CompartmentId,
        existing_ids: Vec<String>,
    },
    /// Results of a batch, in order.
    Batch { results: Vec<CommandResult> },
    /// Command could not run.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<ItemId>) -> Self {
        Self::Success {
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<ItemId>) -> Self {
        Self::Success {
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::SelectorOpened { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_position_serializes_with_type_field() {
        let cmd = Command::SetPosition {
            axis: Axis::X,
            value: FieldValue::Number(45.0),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "set_position");
        assert_eq!(json["axis"], "x");
        assert_eq!(json["value"], 45.0);
    }

    #[test]
    fn field_value_accepts_numbers_and_text() {
        let cmd: Command = serde_json::from_str(r#"{"type": "set_size", "axis": "y", "value": "120"}"#).unwrap();
        match cmd {
            Command::SetSize { axis, value } => {
                assert_eq!(axis, Axis::Y);
                assert_eq!(value, FieldValue::Text("120".to_string()));
            }
            _ => panic!("Expected SetSize command"),
        }
    }

    #[test]
    fn compartment_commands_deserialize_from_script_json() {
        let json = r#"[
            {"type": "click_compartment", "compartment": "0-1"},
            {"type": "complete_assignment", "selection": "STG-A01-001"},
            {"type": "rename_location", "compartment": "0-1", "result": {"confirmed": true, "value": "STG-A01-002"}},
            {"type": "edit_compartment", "compartment": "0-1", "sku": "SKU-9", "quantity": 4},
            {"type": "purge_stranded"}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 5);
        assert!(matches!(
            &commands[0],
            Command::ClickCompartment { compartment } if *compartment == CompartmentId::new(0, 1)
        ));
        match &commands[3] {
            Command::EditCompartment { edit, .. } => {
                assert_eq!(edit.sku.as_deref(), Some("SKU-9"));
                assert_eq!(edit.quantity, Some(4));
            }
            _ => panic!("Expected EditCompartment command"),
        }
    }

    #[test]
    fn select_at_takes_a_point_array() {
        let cmd: Command = serde_json::from_str(r#"{"type": "select_at", "point": [90, 30]}"#).unwrap();
        assert!(matches!(cmd, Command::SelectAt { point } if point == Vec2::new(90.0, 30.0)));
    }

    #[test]
    fn batch_command_contains_nested_commands() {
        let cmd = Command::Batch {
            commands: vec![Command::CancelAssignment, Command::DeleteItem],
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "batch");
        let commands = json["commands"].as_array().unwrap();
        assert_eq!(commands[0]["type"], "cancel_assignment");
        assert_eq!(commands[1]["type"], "delete_item");
    }

    #[test]
    fn result_omits_empty_id_lists() {
        let json = serde_json::to_value(CommandResult::success()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success"}));
        let json = serde_json::to_value(CommandResult::Unchanged).unwrap();
        assert_eq!(json, serde_json::json!({"status": "unchanged"}));
    }
}
