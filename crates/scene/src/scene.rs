use crate::{LayoutDocument, SceneError, SceneHost};
use locations::LocationRegistry;
use node::{CanvasPoint, ItemId, ItemUpdate, SceneItem};
use std::collections::HashSet;

/// Changes recorded by the scene, drained by whoever renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    ItemAdded(ItemId),
    ItemUpdated(ItemId),
    ItemRemoved(ItemId),
    SelectionChanged,
}

/// In-memory floor plan: the item list, the selection and the location
/// registry for the open layout.
#[derive(Debug, Default)]
pub struct Scene {
    /// All items, in z-order (back to front).
    items: Vec<SceneItem>,

    /// The item shown in the properties panel.
    selection: Option<ItemId>,

    locations: LocationRegistry,

    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a layout: take ownership of its items and index their ids.
    pub fn open(items: Vec<SceneItem>) -> Result<Self, SceneError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(SceneError::DuplicateItem(item.id));
            }
        }
        let locations = LocationRegistry::from_items(&items)?;
        log::info!(
            "opened scene with {} items and {} location ids",
            items.len(),
            locations.len()
        );
        Ok(Self {
            items,
            selection: None,
            locations,
            events: Vec::new(),
        })
    }

    pub fn from_document(document: LayoutDocument) -> Result<Self, SceneError> {
        Self::open(document.items)
    }

    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument::new(self.items.clone())
    }

    /// Close the layout, dropping items, selection and registry contents.
    pub fn close(&mut self) {
        self.items.clear();
        self.locations.clear();
        if self.selection.take().is_some() {
            self.events.push(SceneEvent::SelectionChanged);
        }
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item on top, reserving its location ids.
    pub fn add_item(&mut self, item: SceneItem) -> Result<ItemId, SceneError> {
        if self.get_item(item.id).is_some() {
            return Err(SceneError::DuplicateItem(item.id));
        }
        let ids: Vec<&str> = item.location_ids().map(|(_, id)| id).collect();
        self.locations.reserve_all(&ids)?;

        let id = item.id;
        self.items.push(item);
        self.events.push(SceneEvent::ItemAdded(id));
        Ok(id)
    }

    /// Remove an item and release its location ids.
    pub fn remove_item(&mut self, id: ItemId) -> Option<SceneItem> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        let item = self.items.remove(pos);
        self.locations.release_all(item.location_ids().map(|(_, loc)| loc));
        if self.selection == Some(id) {
            self.selection = None;
            self.events.push(SceneEvent::SelectionChanged);
        }
        self.events.push(SceneEvent::ItemRemoved(id));
        Some(item)
    }

    pub fn get_item(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Topmost item under a canvas point.
    pub fn item_at_point(&self, point: CanvasPoint) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|item| item.contains_point(point))
            .map(|item| item.id)
    }

    /// Select an item (or nothing). Unknown ids clear the selection.
    pub fn select(&mut self, id: Option<ItemId>) {
        let id = id.filter(|id| self.get_item(*id).is_some());
        if self.selection != id {
            self.selection = id;
            self.events.push(SceneEvent::SelectionChanged);
        }
    }

    pub fn selected_item(&self) -> Option<&SceneItem> {
        self.selection.and_then(|id| self.get_item(id))
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SceneHost for Scene {
    fn item(&self, id: ItemId) -> Option<&SceneItem> {
        self.get_item(id)
    }

    fn items(&self) -> Box<dyn Iterator<Item = &SceneItem> + '_> {
        Box::new(self.items.iter())
    }

    fn selected(&self) -> Option<ItemId> {
        self.selection
    }

    fn update_item(&mut self, id: ItemId, update: ItemUpdate) {
        if update.is_empty() {
            return;
        }
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                log::debug!("update {}: {:?}", id, update);
                update.apply_to(item);
                self.events.push(SceneEvent::ItemUpdated(id));
            }
            None => log::warn!("update for unknown item {}", id),
        }
    }

    fn delete_item(&mut self, id: ItemId) {
        if self.remove_item(id).is_none() {
            log::warn!("delete for unknown item {}", id);
        }
    }

    fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    fn locations_mut(&mut self) -> &mut LocationRegistry {
        &mut self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasSize, CompartmentContent, CompartmentId};

    fn unit(x: f32, location: Option<&str>) -> SceneItem {
        let mut item = SceneItem::storage_unit(CanvasPoint::new(x, 0.0), CanvasSize::new(120.0, 60.0));
        if let Some(location) = location {
            item.compartment_contents.insert(
                CompartmentId::new(0, 0),
                CompartmentContent::single(location, Default::default()),
            );
        }
        item
    }

    #[test]
    fn open_indexes_location_ids() {
        let scene = Scene::open(vec![unit(0.0, Some("A")), unit(120.0, Some("B"))]).unwrap();
        assert!(scene.locations().is_in_use("a"));
        assert!(scene.locations().is_in_use("B"));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn open_rejects_duplicate_locations_and_items() {
        let err = Scene::open(vec![unit(0.0, Some("A")), unit(120.0, Some(" a"))]).unwrap_err();
        assert!(matches!(err, SceneError::Location(_)));

        let item = unit(0.0, None);
        let err = Scene::open(vec![item.clone(), item]).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateItem(_)));
    }

    #[test]
    fn add_item_reserves_and_rejects_collisions() {
        let mut scene = Scene::open(vec![unit(0.0, Some("A"))]).unwrap();
        assert!(scene.add_item(unit(120.0, Some("A"))).is_err());
        assert_eq!(scene.len(), 1);

        let id = scene.add_item(unit(120.0, Some("B"))).unwrap();
        assert!(scene.locations().is_in_use("b"));
        assert_eq!(scene.take_events(), vec![SceneEvent::ItemAdded(id)]);
    }

    #[test]
    fn removing_item_releases_its_ids_and_selection() {
        let keep = unit(0.0, Some("A"));
        let drop = unit(120.0, Some("B"));
        let drop_id = drop.id;
        let mut scene = Scene::open(vec![keep, drop]).unwrap();
        scene.select(Some(drop_id));

        scene.delete_item(drop_id);
        assert!(!scene.locations().is_in_use("B"));
        assert!(scene.locations().is_in_use("A"));
        assert!(scene.selected_item().is_none());
    }

    #[test]
    fn select_ignores_unknown_ids() {
        let item = unit(0.0, None);
        let id = item.id;
        let mut scene = Scene::open(vec![item]).unwrap();
        scene.select(Some(id));
        assert_eq!(scene.selected(), Some(id));
        scene.select(Some(ItemId::from_u128(99)));
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn item_at_point_prefers_topmost() {
        let bottom = unit(0.0, None);
        let top = unit(60.0, None);
        let top_id = top.id;
        let scene = Scene::open(vec![bottom, top]).unwrap();
        assert_eq!(scene.item_at_point(CanvasPoint::new(90.0, 30.0)), Some(top_id));
        assert_eq!(scene.item_at_point(CanvasPoint::new(500.0, 30.0)), None);
    }

    #[test]
    fn update_applies_partial_fields() {
        let item = unit(0.0, None);
        let id = item.id;
        let mut scene = Scene::open(vec![item]).unwrap();
        scene.update_item(id, ItemUpdate::label("Bay 1"));
        assert_eq!(scene.get_item(id).unwrap().label, "Bay 1");
        assert_eq!(scene.take_events(), vec![SceneEvent::ItemUpdated(id)]);

        scene.update_item(id, ItemUpdate::default());
        assert!(scene.take_events().is_empty());
    }

    #[test]
    fn close_clears_everything() {
        let item = unit(0.0, Some("A"));
        let id = item.id;
        let mut scene = Scene::open(vec![item]).unwrap();
        scene.select(Some(id));
        scene.close();
        assert!(scene.is_empty());
        assert!(scene.locations().is_empty());
        assert_eq!(scene.selected(), None);
    }
}
