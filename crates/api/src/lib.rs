//! Floorplan API - the properties editor and its command interface.
//!
//! [`PropertiesEditor`] turns panel input into validated item updates.
//! On top of it sits a typed command language, so every edit is:
//! - Serializable (for recording, scripting and replay)
//! - Intent-based (what the user did, not how the scene changes)
//!
//! # Example
//! ```ignore
//! use api::{execute_command, Command, LogNotifier, PropertiesEditor};
//!
//! let mut editor = PropertiesEditor::default();
//! let cmd = Command::SetLabel { value: "Bay 4".into() };
//! let result = execute_command(&mut scene, &mut editor, &mut LogNotifier, cmd);
//! ```

mod command;
mod config;
mod editor;
mod executor;
mod notify;
mod query;

pub use command::*;
pub use config::EditorConfig;
pub use editor::{
    AssignmentState, CompartmentClick, EditorContext, IdSelection, Outcome, PromptResult, PropertiesEditor,
};
pub use executor::{execute_command, execute_query};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier};
pub use query::*;
