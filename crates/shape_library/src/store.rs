use crate::{ShapeError, ShapeTemplate};
use std::path::PathBuf;

/// Where custom shapes live between sessions.
pub trait CustomShapeStore {
    fn load(&self) -> Result<Vec<ShapeTemplate>, ShapeError>;

    /// Replace the stored set with `shapes`.
    fn save(&mut self, shapes: &[ShapeTemplate]) -> Result<(), ShapeError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryShapeStore {
    shapes: Vec<ShapeTemplate>,
}

impl MemoryShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[ShapeTemplate] {
        &self.shapes
    }
}

impl CustomShapeStore for MemoryShapeStore {
    fn load(&self) -> Result<Vec<ShapeTemplate>, ShapeError> {
        Ok(self.shapes.clone())
    }

    fn save(&mut self, shapes: &[ShapeTemplate]) -> Result<(), ShapeError> {
        self.shapes = shapes.to_vec();
        Ok(())
    }
}

/// Custom shapes kept as a JSON array in one file. A missing file is an
/// empty store.
#[derive(Clone, Debug)]
pub struct JsonShapeStore {
    path: PathBuf,
}

impl JsonShapeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CustomShapeStore for JsonShapeStore {
    fn load(&self) -> Result<Vec<ShapeTemplate>, ShapeError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, shapes: &[ShapeTemplate]) -> Result<(), ShapeError> {
        std::fs::write(&self.path, serde_json::to_string_pretty(shapes)?)?;
        log::debug!("saved {} custom shapes to {}", shapes.len(), self.path.display());
        Ok(())
    }
}
