use crate::{builtin_templates, points_to_path, CustomShapeStore, ShapeCategory, ShapeError, ShapeTemplate};
use node::{CanvasPoint, CanvasSize, ItemKind};
use serde::{Deserialize, Serialize};

/// Input for a user-authored shape.
///
/// A typed `path` wins over drawn `points`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomShapeDraft {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub points: Vec<CanvasPoint>,
    pub default_size: CanvasSize,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_custom_kind")]
    pub item_kind: ItemKind,
}

fn default_custom_kind() -> ItemKind {
    ItemKind::SpareUnit
}

impl CustomShapeDraft {
    pub fn new(name: impl Into<String>, default_size: CanvasSize) -> Self {
        Self {
            name: name.into(),
            path: None,
            points: Vec::new(),
            default_size,
            description: String::new(),
            icon: None,
            item_kind: default_custom_kind(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_points(mut self, points: Vec<CanvasPoint>) -> Self {
        self.points = points;
        self
    }

    /// The outline to save, typed text first, then the drawing.
    fn resolved_path(&self) -> Option<String> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| points_to_path(&self.points))
    }
}

/// Built-in templates plus the user's custom shapes.
#[derive(Clone, Debug, Default)]
pub struct ShapeLibrary {
    builtins: Vec<ShapeTemplate>,
    custom: Vec<ShapeTemplate>,
}

impl ShapeLibrary {
    pub fn with_builtins() -> Self {
        Self {
            builtins: builtin_templates(),
            custom: Vec::new(),
        }
    }

    /// Built-ins plus whatever `store` holds.
    pub fn load(store: &dyn CustomShapeStore) -> Result<Self, ShapeError> {
        let mut library = Self::with_builtins();
        library.custom = store.load()?;
        log::debug!("loaded {} custom shapes", library.custom.len());
        Ok(library)
    }

    /// Every template, built-ins first.
    pub fn all(&self) -> impl Iterator<Item = &ShapeTemplate> {
        self.builtins.iter().chain(&self.custom)
    }

    pub fn custom(&self) -> &[ShapeTemplate] {
        &self.custom
    }

    pub fn get(&self, id: &str) -> Option<&ShapeTemplate> {
        self.all().find(|t| t.id == id)
    }

    pub fn by_category(&self, category: ShapeCategory) -> Vec<&ShapeTemplate> {
        self.all().filter(|t| t.category == category).collect()
    }

    /// Templates whose name contains `query`, ignoring case, optionally
    /// within one category. A blank query matches everything.
    pub fn search(&self, query: &str, category: Option<ShapeCategory>) -> Vec<&ShapeTemplate> {
        let needle = query.trim().to_lowercase();
        self.all()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Validate `draft`, add it to the custom set and persist the set.
    pub fn add_custom(
        &mut self,
        draft: CustomShapeDraft,
        store: &mut dyn CustomShapeStore,
    ) -> Result<&ShapeTemplate, ShapeError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ShapeError::EmptyName);
        }
        let path = draft.resolved_path().ok_or(ShapeError::EmptyPath)?;
        let size = draft.default_size;
        if !size.is_positive() {
            return Err(ShapeError::InvalidSize {
                width: size.width(),
                height: size.height(),
            });
        }

        let template = ShapeTemplate {
            id: format!("custom-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            category: ShapeCategory::Custom,
            path,
            default_size: size,
            icon: draft.icon.unwrap_or_else(|| "svg/shapes.svg".to_string()),
            description: draft.description,
            item_kind: draft.item_kind,
        };

        let mut custom = self.custom.clone();
        custom.push(template);
        store.save(&custom)?;
        self.custom = custom;
        log::debug!("added custom shape {name}");
        Ok(&self.custom[self.custom.len() - 1])
    }

    /// Remove a custom shape by id and persist the set.
    pub fn remove_custom(&mut self, id: &str, store: &mut dyn CustomShapeStore) -> Result<ShapeTemplate, ShapeError> {
        let index = self
            .custom
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ShapeError::NotFound(id.to_string()))?;
        let mut custom = self.custom.clone();
        let removed = custom.remove(index);
        store.save(&custom)?;
        self.custom = custom;
        Ok(removed)
    }
}
