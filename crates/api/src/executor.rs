//! Command and query execution against a Scene.
//!
//! This module connects the abstract Command/Query types to the
//! properties editor and the reference scene, returning serializable
//! results.

use crate::{
    AssignmentState, Command, CommandResult, CompartmentClick, CompartmentInfo, EditorContext, FieldValue,
    ItemInfo, Notifier, Outcome, PropertiesEditor, Query, QueryResult,
};
use node::{storage_unit_label_info, Axis, GridSettings, ItemId, SceneItem};
use scene::{Scene, SceneHost};

/// Execute a command against the scene through the editor.
pub fn execute_command(
    scene: &mut Scene,
    editor: &mut PropertiesEditor,
    notifier: &mut dyn Notifier,
    command: Command,
) -> CommandResult {
    // Keep the pending assignment in step with selection changes made
    // outside the editor.
    editor.sync_selection(&*scene);

    match command {
        Command::Select { id } => {
            if let Some(id) = id {
                if scene.get_item(id).is_none() {
                    return CommandResult::error(format!("no item with id {}", id.to_uuid_string()));
                }
            }
            scene.select(id);
            editor.sync_selection(&*scene);
            CommandResult::success()
        }

        Command::SelectAt { point } => {
            let id = scene.item_at_point(point.into());
            scene.select(id);
            editor.sync_selection(&*scene);
            match id {
                Some(_) => CommandResult::success(),
                None => CommandResult::Unchanged,
            }
        }

        Command::DeleteItem => {
            let Some(id) = scene.selected() else {
                return CommandResult::Unchanged;
            };
            let mut cx = EditorContext::new(scene, notifier);
            match editor.delete_item(&mut cx) {
                Outcome::Applied => CommandResult::deleted(vec![id]),
                other => outcome_result(other, id),
            }
        }

        Command::ClickCompartment { compartment } => {
            let Some(id) = scene.selected() else {
                return CommandResult::Unchanged;
            };
            let mut cx = EditorContext::new(scene, notifier);
            match editor.click_compartment(&mut cx, compartment) {
                CompartmentClick::SelectorOpened { existing_ids } => CommandResult::SelectorOpened {
                    item: id,
                    compartment,
                    existing_ids,
                },
                CompartmentClick::Occupied(_) | CompartmentClick::Ignored => CommandResult::Unchanged,
            }
        }

        Command::CompleteAssignment { selection } => {
            let AssignmentState::Selecting { item, .. } = editor.assignment() else {
                return CommandResult::Unchanged;
            };
            let mut cx = EditorContext::new(scene, notifier);
            let outcome = editor.complete_assignment(&mut cx, selection);
            outcome_result(outcome, item)
        }

        Command::CancelAssignment => match editor.cancel_assignment() {
            Outcome::Applied => CommandResult::success(),
            _ => CommandResult::Unchanged,
        },

        Command::Batch { commands } => {
            let mut results = Vec::with_capacity(commands.len());
            for command in commands {
                results.push(execute_command(scene, editor, notifier, command));
            }
            CommandResult::Batch { results }
        }

        command => {
            let Some(id) = scene.selected() else {
                return CommandResult::Unchanged;
            };
            let mut cx = EditorContext::new(scene, notifier);
            let outcome = edit_selected(editor, &mut cx, command);
            outcome_result(outcome, id)
        }
    }
}

/// Commands that edit the selected item and report a plain [`Outcome`].
fn edit_selected(editor: &mut PropertiesEditor, cx: &mut EditorContext, command: Command) -> Outcome {
    match command {
        Command::SetName { value } => editor.set_name(cx, &value),
        Command::SetLabel { value } => editor.set_label(cx, &value),
        Command::SetColor { value } => editor.set_color(cx, &value),
        Command::SetPosition { axis, value } => match value {
            FieldValue::Number(raw) => editor.set_position(cx, axis, raw),
            FieldValue::Text(text) => editor.set_position_text(cx, axis, &text),
        },
        Command::SetSize { axis, value } => match value {
            FieldValue::Number(raw) => editor.set_size(cx, axis, raw),
            FieldValue::Text(text) => editor.set_size_text(cx, axis, &text),
        },
        Command::StepPosition { axis, direction } => editor.step_position(cx, axis, direction),
        Command::StepSize { axis, direction } => editor.step_size(cx, axis, direction),
        Command::SetPositionLocked { locked } => editor.set_position_locked(cx, locked),
        Command::SetSizeLocked { locked } => editor.set_size_locked(cx, locked),
        Command::RenameLocation { compartment, result } => editor.rename_location(cx, compartment, result),
        Command::EditCompartment { compartment, edit } => editor.edit_compartment(cx, compartment, &edit),
        Command::RemoveCompartment { compartment } => editor.remove_compartment(cx, compartment),
        Command::PurgeStranded => editor.purge_stranded(cx),
        other => {
            log::warn!("command not handled as an item edit: {other:?}");
            Outcome::Unchanged
        }
    }
}

fn outcome_result(outcome: Outcome, id: ItemId) -> CommandResult {
    match outcome {
        Outcome::Applied => CommandResult::modified(vec![id]),
        Outcome::Unchanged => CommandResult::Unchanged,
        Outcome::Rejected(message) => CommandResult::Rejected { message },
    }
}

/// Execute a query against the scene (read-only).
pub fn execute_query(scene: &Scene, editor: &PropertiesEditor, query: Query) -> QueryResult {
    let grid = &editor.config().grid;
    match query {
        Query::GetSelection => QueryResult::Selection { id: scene.selected() },

        Query::GetAllItems => QueryResult::Items {
            items: scene.items().iter().map(|item| item_to_info(item, grid)).collect(),
        },

        Query::GetItem { id } => QueryResult::Item {
            item: scene.get_item(id).map(|item| item_to_info(item, grid)),
        },

        Query::GetCompartments { id } => {
            let Some(item) = scene.get_item(id) else {
                return QueryResult::Error {
                    message: format!("no item with id {}", id.to_uuid_string()),
                };
            };
            let compartments = item.compartment_grid(grid);
            QueryResult::Compartments {
                rows: compartments.rows,
                cols: compartments.cols,
                summary: compartments.summary(&item.compartment_contents),
                entries: item
                    .compartment_contents
                    .iter()
                    .map(|(id, content)| CompartmentInfo {
                        id: *id,
                        content: content.clone(),
                    })
                    .collect(),
                stranded: compartments.stranded(&item.compartment_contents),
            }
        }

        Query::GetLabelInfo { id } => QueryResult::LabelInfo {
            info: scene.get_item(id).and_then(|item| storage_unit_label_info(item, grid)),
        },

        Query::GetLocationIds => QueryResult::LocationIds {
            ids: scene.existing_location_ids(),
        },

        Query::CheckLocationId { location_id } => QueryResult::Availability {
            available: scene.locations().check_available(&location_id).is_ok(),
        },

        Query::GetAssignment => QueryResult::Assignment {
            state: editor.assignment(),
        },

        Query::GetItemCount => QueryResult::Count { count: scene.len() },
    }
}

/// Convert a SceneItem to ItemInfo for query results.
fn item_to_info(item: &SceneItem, grid: &GridSettings) -> ItemInfo {
    ItemInfo {
        id: item.id,
        kind: item.kind.clone(),
        label: node::contextual_label(item),
        position: item.position().0,
        size: item.size().0,
        grid_step: grid.effective_step(item, Axis::X),
        position_locked: item.is_position_locked,
        size_locked: item.is_size_locked,
        color: item.custom_color.clone().or_else(|| item.color.clone()),
        compartments: item
            .has_sku_grid()
            .then(|| item.compartment_grid(grid).summary(&item.compartment_contents)),
    }
}
