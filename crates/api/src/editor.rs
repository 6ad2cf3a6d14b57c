//! The properties editor for the selected item.
//!
//! The editor owns no item data. Every operation reads the host's
//! selected item, validates the input (locks, kind gating, grid snapping,
//! location-id uniqueness) and writes back a single [`ItemUpdate`]. The
//! only state it keeps is the pending compartment assignment while the
//! location-id selector is open.

use crate::{EditorConfig, Notifier};
use chrono::{DateTime, Utc};
use node::{
    contextual_label, normalize_hex_color, snap_position, snap_size, step_position, step_size, Axis,
    CompartmentContent, CompartmentEdit, CompartmentId, ItemId, ItemUpdate, LevelMapping,
    SceneItem, StepDirection,
};
use scene::SceneHost;
use serde::{Deserialize, Serialize};

/// What an editor operation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// An update was written to the host.
    Applied,
    /// Nothing to do: no selection, locked axis, gated field, bad number,
    /// or the value was already current.
    Unchanged,
    /// The input was refused and the user was told why.
    Rejected(String),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of clicking a compartment cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CompartmentClick {
    /// The cell is empty; the location-id selector should open with these
    /// ids marked as taken.
    SelectorOpened { existing_ids: Vec<String> },
    /// The cell already holds content.
    Occupied(CompartmentContent),
    /// No selection, no compartment grid, or the cell is off the grid.
    Ignored,
}

/// The pending compartment assignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AssignmentState {
    #[default]
    Idle,
    Selecting { item: ItemId, compartment: CompartmentId },
}

/// What the location-id selector hands back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdSelection {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Categorized {
        location_id: String,
        #[serde(default)]
        category: Option<String>,
    },
    /// One location per level of a multi-level compartment.
    Levels(Vec<LevelMapping>),
}

/// Answer from the rename dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PromptReply", into = "PromptReply")]
pub enum PromptResult {
    Confirmed(String),
    Cancelled,
}

/// Wire form: `{"confirmed": true, "value": "..."}` or `{"confirmed": false}`.
#[derive(Serialize, Deserialize)]
struct PromptReply {
    confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl From<PromptReply> for PromptResult {
    fn from(reply: PromptReply) -> Self {
        if reply.confirmed {
            Self::Confirmed(reply.value.unwrap_or_default())
        } else {
            Self::Cancelled
        }
    }
}

impl From<PromptResult> for PromptReply {
    fn from(result: PromptResult) -> Self {
        match result {
            PromptResult::Confirmed(value) => Self {
                confirmed: true,
                value: Some(value),
            },
            PromptResult::Cancelled => Self {
                confirmed: false,
                value: None,
            },
        }
    }
}

/// The host and notifier an editor operation runs against.
pub struct EditorContext<'a> {
    pub host: &'a mut dyn SceneHost,
    pub notifier: &'a mut dyn Notifier,
}

impl<'a> EditorContext<'a> {
    pub fn new(host: &'a mut dyn SceneHost, notifier: &'a mut dyn Notifier) -> Self {
        Self { host, notifier }
    }
}

pub struct PropertiesEditor {
    config: EditorConfig,
    assignment: AssignmentState,
    clock: fn() -> DateTime<Utc>,
}

impl Default for PropertiesEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl PropertiesEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            assignment: AssignmentState::Idle,
            clock: Utc::now,
        }
    }

    /// Use a fixed time source for `lastModified` stamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn assignment(&self) -> AssignmentState {
        self.assignment
    }

    /// Drop a pending assignment whose item is no longer selected.
    pub fn sync_selection(&mut self, host: &dyn SceneHost) {
        if let AssignmentState::Selecting { item, .. } = self.assignment {
            if host.selected() != Some(item) {
                log::debug!("selection changed, cancelling assignment on {item}");
                self.assignment = AssignmentState::Idle;
            }
        }
    }

    // === Text fields ===

    /// Rename a spare unit. Other kinds keep their type name.
    pub fn set_name(&mut self, cx: &mut EditorContext, value: &str) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if !item.is_customizable() {
            log::debug!("name is not editable on {}", item.kind);
            return Outcome::Unchanged;
        }
        if item.name == value {
            return Outcome::Unchanged;
        }
        let id = item.id;
        apply(cx, id, ItemUpdate::name(value))
    }

    pub fn set_label(&mut self, cx: &mut EditorContext, value: &str) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.label == value {
            return Outcome::Unchanged;
        }
        let id = item.id;
        apply(cx, id, ItemUpdate::label(value))
    }

    /// Normalize and store a spare unit's color in both color fields.
    pub fn set_color(&mut self, cx: &mut EditorContext, value: &str) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if !item.is_customizable() {
            log::debug!("color is not editable on {}", item.kind);
            return Outcome::Unchanged;
        }
        let color = normalize_hex_color(value);
        if item.color.as_deref() == Some(color.as_str()) && item.custom_color.as_deref() == Some(color.as_str()) {
            return Outcome::Unchanged;
        }
        let id = item.id;
        apply(cx, id, ItemUpdate::color(color))
    }

    // === Geometry ===

    pub fn set_position(&mut self, cx: &mut EditorContext, axis: Axis, raw: f32) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.is_position_locked || !raw.is_finite() {
            return Outcome::Unchanged;
        }
        let step = self.config.grid.effective_step(item, axis);
        let (id, current) = (item.id, item.position_on(axis));
        write_position(cx, id, axis, current, snap_position(raw, step))
    }

    pub fn set_size(&mut self, cx: &mut EditorContext, axis: Axis, raw: f32) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.is_size_locked || !raw.is_finite() {
            return Outcome::Unchanged;
        }
        let step = self.config.grid.effective_step(item, axis);
        let (id, current) = (item.id, item.size_on(axis));
        let value = snap_size(raw, step, item.min_size_on(axis), item.max_size_on(axis));
        let outcome = write_size(cx, id, axis, current, value);
        self.warn_if_stranded(cx, id, &outcome);
        outcome
    }

    /// [`set_position`](Self::set_position) from a text field. Input that
    /// isn't a number is ignored.
    pub fn set_position_text(&mut self, cx: &mut EditorContext, axis: Axis, text: &str) -> Outcome {
        match parse_number(text) {
            Some(raw) => self.set_position(cx, axis, raw),
            None => Outcome::Unchanged,
        }
    }

    pub fn set_size_text(&mut self, cx: &mut EditorContext, axis: Axis, text: &str) -> Outcome {
        match parse_number(text) {
            Some(raw) => self.set_size(cx, axis, raw),
            None => Outcome::Unchanged,
        }
    }

    /// Nudge the position by one grid step.
    pub fn step_position(&mut self, cx: &mut EditorContext, axis: Axis, direction: StepDirection) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.is_position_locked {
            return Outcome::Unchanged;
        }
        let step = self.config.grid.effective_step(item, axis);
        let (id, current) = (item.id, item.position_on(axis));
        let value = step_position(current, step, direction);
        write_position(cx, id, axis, current, value)
    }

    /// Grow or shrink by one grid step.
    pub fn step_size(&mut self, cx: &mut EditorContext, axis: Axis, direction: StepDirection) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.is_size_locked {
            return Outcome::Unchanged;
        }
        let step = self.config.grid.effective_step(item, axis);
        let (id, current) = (item.id, item.size_on(axis));
        let value = step_size(current, step, direction, item.min_size_on(axis), item.max_size_on(axis));
        let outcome = write_size(cx, id, axis, current, value);
        self.warn_if_stranded(cx, id, &outcome);
        outcome
    }

    /// Resizing keeps compartments that fall off the grid; tell the user.
    fn warn_if_stranded(&self, cx: &mut EditorContext, id: ItemId, outcome: &Outcome) {
        if !outcome.is_applied() {
            return;
        }
        let Some(item) = cx.host.item(id) else {
            return;
        };
        let stranded = item.compartment_grid(&self.config.grid).stranded(&item.compartment_contents).len();
        if stranded > 0 {
            cx.notifier
                .warning(&format!("{stranded} compartment(s) now lie outside the grid"));
        }
    }

    pub fn set_position_locked(&mut self, cx: &mut EditorContext, locked: bool) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.is_position_locked == locked {
            return Outcome::Unchanged;
        }
        let id = item.id;
        apply(
            cx,
            id,
            ItemUpdate {
                is_position_locked: Some(locked),
                ..Default::default()
            },
        )
    }

    pub fn set_size_locked(&mut self, cx: &mut EditorContext, locked: bool) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if item.is_size_locked == locked {
            return Outcome::Unchanged;
        }
        let id = item.id;
        apply(
            cx,
            id,
            ItemUpdate {
                is_size_locked: Some(locked),
                ..Default::default()
            },
        )
    }

    /// Ask the host to delete the selected item.
    pub fn delete_item(&mut self, cx: &mut EditorContext) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        let id = item.id;
        let label = contextual_label(item);
        cx.host.delete_item(id);
        self.assignment = AssignmentState::Idle;
        log::debug!("deleted {id}");
        cx.notifier.success(&format!("{label} deleted"));
        Outcome::Applied
    }

    // === Compartments ===

    /// Every location id in the scene, for the selector's "taken" list.
    pub fn existing_location_ids(&self, host: &dyn SceneHost) -> Vec<String> {
        host.existing_location_ids()
    }

    /// Handle a click on a compartment cell of the selected item.
    ///
    /// An empty cell opens the selector; an occupied one reports its
    /// content so the host can offer rename, edit and remove.
    pub fn click_compartment(&mut self, cx: &mut EditorContext, compartment: CompartmentId) -> CompartmentClick {
        let Some(item) = self.selected(cx) else {
            return CompartmentClick::Ignored;
        };
        if !item.has_sku_grid() || !item.compartment_grid(&self.config.grid).contains(compartment) {
            return CompartmentClick::Ignored;
        }
        if let Some(content) = item.compartment_contents.get(&compartment) {
            return CompartmentClick::Occupied(content.clone());
        }
        self.assignment = AssignmentState::Selecting {
            item: item.id,
            compartment,
        };
        CompartmentClick::SelectorOpened {
            existing_ids: cx.host.existing_location_ids(),
        }
    }

    /// Close the selector without assigning anything.
    pub fn cancel_assignment(&mut self) -> Outcome {
        match std::mem::take(&mut self.assignment) {
            AssignmentState::Idle => Outcome::Unchanged,
            AssignmentState::Selecting { .. } => Outcome::Applied,
        }
    }

    /// Save the selector's choice into the pending compartment.
    ///
    /// A collision or blank id is rejected with nothing written, and the
    /// selector stays open so the user can pick again.
    pub fn complete_assignment(&mut self, cx: &mut EditorContext, selection: IdSelection) -> Outcome {
        self.sync_selection(&*cx.host);
        let AssignmentState::Selecting { item: id, compartment } = self.assignment else {
            return Outcome::Unchanged;
        };
        let Some(item) = cx.host.item(id) else {
            self.assignment = AssignmentState::Idle;
            return Outcome::Unchanged;
        };
        if !item.has_sku_grid() || !item.compartment_grid(&self.config.grid).contains(compartment) {
            self.assignment = AssignmentState::Idle;
            return reject(cx, format!("Compartment {compartment} is no longer on the grid"));
        }
        if item.compartment_contents.contains_key(&compartment) {
            self.assignment = AssignmentState::Idle;
            return reject(cx, format!("Compartment {compartment} is already assigned"));
        }
        let mut contents = item.compartment_contents.clone();

        let now = (self.clock)();
        let content = match selection {
            IdSelection::Plain(location_id) => CompartmentContent::single(location_id.trim(), now),
            IdSelection::Categorized { location_id, category } => {
                CompartmentContent::single(location_id.trim(), now).with_category(category)
            }
            IdSelection::Levels(mappings) => {
                let mappings = mappings
                    .into_iter()
                    .map(|m| LevelMapping {
                        location_id: m.location_id.trim().to_string(),
                        ..m
                    })
                    .collect();
                CompartmentContent::multi(mappings, now)
            }
        }
        .with_status(self.config.default_status.as_str());

        let ids = content.location_ids();
        let blank_level = matches!(&content, CompartmentContent::Multi(m) if m.mappings.len() != ids.len());
        if ids.is_empty() || blank_level {
            return reject(cx, "Location ID cannot be empty".to_string());
        }
        if let Err(err) = cx.host.locations_mut().reserve_all(&ids) {
            return reject(cx, format!("Cannot assign location: {err}"));
        }

        let assigned = ids.join(", ");
        contents.insert(compartment, content);
        cx.host.update_item(id, ItemUpdate::compartments(contents));
        self.assignment = AssignmentState::Idle;
        log::debug!("assigned {assigned} to {id}/{compartment}");
        cx.notifier.success(&format!("Assigned {assigned} to compartment {compartment}"));
        Outcome::Applied
    }

    /// Change the location id of an occupied compartment.
    ///
    /// The old id is freed and the new one reserved in one step; choosing
    /// the id the compartment already holds is not a collision.
    pub fn rename_location(
        &mut self,
        cx: &mut EditorContext,
        compartment: CompartmentId,
        result: PromptResult,
    ) -> Outcome {
        let PromptResult::Confirmed(value) = result else {
            return Outcome::Unchanged;
        };
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        let Some(content) = item.compartment_contents.get(&compartment) else {
            return Outcome::Unchanged;
        };
        let new_id = value.trim();
        if new_id.is_empty() {
            return reject(cx, "Location ID cannot be empty".to_string());
        }
        let old_id = content.primary_location_id().map(str::to_string);
        if old_id.as_deref() == Some(new_id) {
            return Outcome::Unchanged;
        }
        let id = item.id;
        let mut contents = item.compartment_contents.clone();
        if let Err(err) = cx.host.locations_mut().replace(old_id.as_deref(), new_id) {
            return reject(cx, format!("Cannot rename location: {err}"));
        }

        if let Some(content) = contents.get_mut(&compartment) {
            content.set_primary_location_id(new_id.to_string(), (self.clock)());
        }
        log::debug!("renamed {id}/{compartment} from {old_id:?} to {new_id}");
        cx.host.update_item(id, ItemUpdate::compartments(contents));
        Outcome::Applied
    }

    /// Change SKU, quantity, status or category of an occupied compartment.
    pub fn edit_compartment(
        &mut self,
        cx: &mut EditorContext,
        compartment: CompartmentId,
        edit: &CompartmentEdit,
    ) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        if *edit == CompartmentEdit::default() || !item.compartment_contents.contains_key(&compartment) {
            return Outcome::Unchanged;
        }
        let id = item.id;
        let mut contents = item.compartment_contents.clone();
        if let Some(content) = contents.get_mut(&compartment) {
            content.apply_edit(edit, (self.clock)());
        }
        apply(cx, id, ItemUpdate::compartments(contents))
    }

    /// Clear a compartment and free its location ids.
    pub fn remove_compartment(&mut self, cx: &mut EditorContext, compartment: CompartmentId) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        let mut contents = item.compartment_contents.clone();
        let Some(removed) = contents.remove(&compartment) else {
            return Outcome::Unchanged;
        };
        let id = item.id;
        cx.host.locations_mut().release_all(removed.location_ids());
        apply(cx, id, ItemUpdate::compartments(contents))
    }

    /// Drop compartments left outside the grid by a resize, freeing
    /// their ids. Resizing alone never does this.
    pub fn purge_stranded(&mut self, cx: &mut EditorContext) -> Outcome {
        let Some(item) = self.selected(cx) else {
            return Outcome::Unchanged;
        };
        let stranded = item.compartment_grid(&self.config.grid).stranded(&item.compartment_contents);
        if stranded.is_empty() {
            return Outcome::Unchanged;
        }
        let id = item.id;
        let mut contents = item.compartment_contents.clone();
        for compartment in &stranded {
            if let Some(removed) = contents.remove(compartment) {
                cx.host.locations_mut().release_all(removed.location_ids());
            }
        }
        cx.notifier
            .success(&format!("Removed {} compartment(s) outside the grid", stranded.len()));
        apply(cx, id, ItemUpdate::compartments(contents))
    }

    fn selected<'h>(&mut self, cx: &'h EditorContext) -> Option<&'h SceneItem> {
        self.sync_selection(&*cx.host);
        cx.host.selected_item()
    }
}

fn apply(cx: &mut EditorContext, id: ItemId, update: ItemUpdate) -> Outcome {
    cx.host.update_item(id, update);
    Outcome::Applied
}

fn reject(cx: &mut EditorContext, message: String) -> Outcome {
    log::warn!("{message}");
    cx.notifier.error(&message);
    Outcome::Rejected(message)
}

fn write_position(cx: &mut EditorContext, id: ItemId, axis: Axis, current: f32, value: f32) -> Outcome {
    if value == current {
        return Outcome::Unchanged;
    }
    let update = match axis {
        Axis::X => ItemUpdate {
            x: Some(value),
            ..Default::default()
        },
        Axis::Y => ItemUpdate {
            y: Some(value),
            ..Default::default()
        },
    };
    apply(cx, id, update)
}

fn write_size(cx: &mut EditorContext, id: ItemId, axis: Axis, current: f32, value: f32) -> Outcome {
    if value == current {
        return Outcome::Unchanged;
    }
    let update = match axis {
        Axis::X => ItemUpdate {
            width: Some(value),
            ..Default::default()
        },
        Axis::Y => ItemUpdate {
            height: Some(value),
            ..Default::default()
        },
    };
    apply(cx, id, update)
}

fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
