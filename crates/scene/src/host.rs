use locations::LocationRegistry;
use node::{ItemId, ItemUpdate, SceneItem};

/// What the properties editor needs from whoever owns the scene.
///
/// The host owns the item list, the selection and the location registry.
/// The editor only proposes changes; applying them (and re-rendering) is
/// the host's business.
pub trait SceneHost {
    fn item(&self, id: ItemId) -> Option<&SceneItem>;

    /// Every item in the scene, in z-order.
    fn items(&self) -> Box<dyn Iterator<Item = &SceneItem> + '_>;

    fn selected(&self) -> Option<ItemId>;

    fn selected_item(&self) -> Option<&SceneItem> {
        self.selected().and_then(|id| self.item(id))
    }

    /// Merge `update` into the item. Unknown ids are ignored.
    fn update_item(&mut self, id: ItemId, update: ItemUpdate);

    /// Remove the item, releasing every location id it held.
    fn delete_item(&mut self, id: ItemId);

    fn locations(&self) -> &LocationRegistry;

    fn locations_mut(&mut self) -> &mut LocationRegistry;

    /// Every location id currently stored anywhere in the scene, sorted.
    fn existing_location_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .items()
            .flat_map(|item| item.location_ids().map(|(_, id)| id.trim().to_string()))
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
