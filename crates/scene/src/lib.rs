//! The in-memory floor plan the editor operates on.
//!
//! [`Scene`] is the reference host: it owns the items, the selection and
//! the [`LocationRegistry`](locations::LocationRegistry), and implements
//! [`SceneHost`], the seam the properties editor talks through.

mod document;
mod host;
mod scene;

pub use document::LayoutDocument;
pub use host::SceneHost;
pub use scene::{Scene, SceneEvent};

use locations::LocationError;
use node::ItemId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("item {0} is already in the scene")]
    DuplicateItem(ItemId),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("invalid layout: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout file: {0}")]
    Io(#[from] std::io::Error),
}
