//! Catalog of shapes that can be placed on a floor plan.
//!
//! Built-in templates cover the common warehouse fixtures. Users can add
//! their own shapes from typed SVG path text or a freehand point list;
//! those are kept in a [`CustomShapeStore`].

mod library;
mod path;
mod store;
mod template;

pub use library::{CustomShapeDraft, ShapeLibrary};
pub use path::points_to_path;
pub use store::{CustomShapeStore, JsonShapeStore, MemoryShapeStore};
pub use template::{builtin_templates, ShapeCategory, ShapeTemplate};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("shape name is empty")]
    EmptyName,
    #[error("shape needs a path: type one or draw at least one point")]
    EmptyPath,
    #[error("default size must be positive, got {width} × {height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("no custom shape with id {0}")]
    NotFound(String),
    #[error("shape store: {0}")]
    Io(#[from] std::io::Error),
    #[error("shape store: {0}")]
    Json(#[from] serde_json::Error),
}
