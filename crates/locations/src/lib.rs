//! Scene-wide registry of assigned location ids.
//!
//! Location ids are typed by people ("STG-A01-001") and must be unique
//! across every compartment of every item in a scene. The registry is an
//! index over those ids, nothing more: the compartment maps on the items
//! are the source of truth and the registry mirrors them.
//!
//! Ids compare after trimming and ASCII-lowercasing, so `" stg-a01 "` and
//! `"STG-A01"` collide. Empty ids are never stored.
//!
//! A registry belongs to one open scene: build it with
//! [`LocationRegistry::init`] when the scene opens and [`clear`] it when
//! the scene closes.
//!
//! [`clear`]: LocationRegistry::clear

use node::SceneItem;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A normalized location id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LocationKey(String);

impl LocationKey {
    /// Normalize `raw`; `None` if nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location id is empty")]
    Empty,
    #[error("location id \"{0}\" is already in use")]
    InUse(String),
    #[error("location id \"{0}\" is used more than once")]
    Duplicate(String),
}

/// Set of location ids currently assigned somewhere in the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationRegistry {
    ids: HashSet<LocationKey>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry for a freshly opened scene.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a SceneItem>) -> Result<Self, LocationError> {
        let mut registry = Self::new();
        registry.init(items)?;
        Ok(registry)
    }

    /// Replace the contents with every id stored on `items`.
    ///
    /// Fails without touching the registry if two compartments share an id.
    pub fn init<'a>(&mut self, items: impl IntoIterator<Item = &'a SceneItem>) -> Result<(), LocationError> {
        let mut ids = HashSet::new();
        for item in items {
            for (_, raw) in item.location_ids() {
                if let Some(key) = LocationKey::new(raw) {
                    if !ids.insert(key) {
                        return Err(LocationError::Duplicate(raw.trim().to_string()));
                    }
                }
            }
        }
        log::debug!("location registry holds {} ids", ids.len());
        self.ids = ids;
        Ok(())
    }

    /// Forget every id (scene closed).
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_in_use(&self, id: &str) -> bool {
        LocationKey::new(id).is_some_and(|key| self.ids.contains(&key))
    }

    /// Insert without checking. Callers must have ruled out a collision
    /// (see [`reserve`](Self::reserve)). Returns whether the id was new.
    pub fn add(&mut self, id: &str) -> bool {
        match LocationKey::new(id) {
            Some(key) => self.ids.insert(key),
            None => false,
        }
    }

    /// Remove an id if present.
    pub fn remove(&mut self, id: &str) -> bool {
        match LocationKey::new(id) {
            Some(key) => self.ids.remove(&key),
            None => false,
        }
    }

    /// Check that `id` is non-empty and free.
    pub fn check_available(&self, id: &str) -> Result<LocationKey, LocationError> {
        let key = LocationKey::new(id).ok_or(LocationError::Empty)?;
        if self.ids.contains(&key) {
            return Err(LocationError::InUse(id.trim().to_string()));
        }
        Ok(key)
    }

    /// Check and insert one id.
    pub fn reserve(&mut self, id: &str) -> Result<(), LocationError> {
        self.replace_all(&[], &[id])
    }

    /// Check and insert several ids; all or nothing.
    pub fn reserve_all(&mut self, ids: &[&str]) -> Result<(), LocationError> {
        self.replace_all(&[], ids)
    }

    /// Free `old` and reserve `new` as one step.
    ///
    /// Re-assigning an id to the slot that already holds it (same
    /// normalized key) succeeds and changes nothing.
    pub fn replace(&mut self, old: Option<&str>, new: &str) -> Result<(), LocationError> {
        match old {
            Some(old) => self.replace_all(&[old], &[new]),
            None => self.replace_all(&[], &[new]),
        }
    }

    /// Free every id in `old` and reserve every id in `new`, atomically.
    ///
    /// Ids in `new` may reuse ids from `old`. On error the registry is
    /// unchanged.
    pub fn replace_all(&mut self, old: &[&str], new: &[&str]) -> Result<(), LocationError> {
        let old_keys: HashSet<LocationKey> = old.iter().filter_map(|id| LocationKey::new(id)).collect();

        let mut new_keys = Vec::with_capacity(new.len());
        let mut seen = HashSet::new();
        for raw in new {
            let key = LocationKey::new(raw).ok_or(LocationError::Empty)?;
            if !seen.insert(key.clone()) {
                return Err(LocationError::Duplicate(raw.trim().to_string()));
            }
            if self.ids.contains(&key) && !old_keys.contains(&key) {
                return Err(LocationError::InUse(raw.trim().to_string()));
            }
            new_keys.push(key);
        }

        for key in &old_keys {
            self.ids.remove(key);
        }
        self.ids.extend(new_keys);
        Ok(())
    }

    /// Remove every id in `ids`.
    pub fn release_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.remove(id);
        }
    }

    /// Registered ids in sorted order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(LocationKey::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasPoint, CanvasSize, CompartmentContent, CompartmentId};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn unit_with(ids: &[(u32, &str)]) -> SceneItem {
        let mut item = SceneItem::storage_unit(CanvasPoint::default(), CanvasSize::new(240.0, 60.0));
        for (col, id) in ids {
            item.compartment_contents.insert(
                CompartmentId::new(0, *col),
                CompartmentContent::single(*id, Default::default()),
            );
        }
        item
    }

    #[test]
    fn ids_compare_trimmed_and_case_insensitive() {
        let mut registry = LocationRegistry::new();
        assert!(registry.add("  STG-A01-001 "));
        assert!(registry.is_in_use("stg-a01-001"));
        assert!(!registry.add("Stg-A01-001"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_ids_are_never_stored() {
        let mut registry = LocationRegistry::new();
        assert!(!registry.add("   "));
        assert!(!registry.is_in_use(""));
        assert_eq!(registry.reserve(" "), Err(LocationError::Empty));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut registry = LocationRegistry::new();
        assert!(!registry.remove("missing"));
        registry.add("A");
        assert!(registry.remove("a"));
        assert!(registry.is_empty());
    }

    #[test]
    fn reserve_rejects_collision_without_change() {
        let mut registry = LocationRegistry::new();
        registry.reserve("A").unwrap();
        let before = registry.clone();
        assert_eq!(registry.reserve("a"), Err(LocationError::InUse("a".into())));
        assert_eq!(registry, before);
    }

    #[test]
    fn replace_frees_old_and_reserves_new() {
        let mut registry = LocationRegistry::new();
        registry.reserve("STG-A01-001").unwrap();
        registry.replace(Some("STG-A01-001"), "STG-A01-002").unwrap();
        assert!(!registry.is_in_use("STG-A01-001"));
        assert!(registry.is_in_use("STG-A01-002"));
    }

    #[test]
    fn replace_with_same_id_is_not_a_collision() {
        let mut registry = LocationRegistry::new();
        registry.reserve("A-1").unwrap();
        registry.replace(Some("A-1"), " a-1 ").unwrap();
        assert_eq!(registry.sorted(), vec!["a-1"]);
    }

    #[test]
    fn replace_into_someone_elses_id_fails() {
        let mut registry = LocationRegistry::new();
        registry.reserve_all(&["A", "B"]).unwrap();
        let before = registry.clone();
        assert!(matches!(registry.replace(Some("A"), "B"), Err(LocationError::InUse(_))));
        assert_eq!(registry, before);
    }

    #[test]
    fn reserve_all_is_all_or_nothing() {
        let mut registry = LocationRegistry::new();
        registry.reserve("C").unwrap();
        assert!(registry.reserve_all(&["A", "B", "c"]).is_err());
        assert_eq!(registry.sorted(), vec!["c"]);
        assert_eq!(
            registry.reserve_all(&["X", "x"]),
            Err(LocationError::Duplicate("x".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn init_rebuilds_from_items_and_detects_duplicates() {
        let items = vec![unit_with(&[(0, "A"), (1, "B")]), unit_with(&[(0, "C")])];
        let mut registry = LocationRegistry::from_items(&items).unwrap();
        assert_eq!(registry.sorted(), vec!["a", "b", "c"]);

        let clashing = vec![unit_with(&[(0, "A")]), unit_with(&[(2, " a ")])];
        assert_eq!(registry.init(&clashing), Err(LocationError::Duplicate("a".into())));
        assert_eq!(registry.len(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Assign(u8, u8),
        Rename(u8, u8),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6, 0u8..8).prop_map(|(slot, id)| Op::Assign(slot, id)),
            (0u8..6, 0u8..8).prop_map(|(slot, id)| Op::Rename(slot, id)),
            (0u8..6).prop_map(Op::Remove),
        ]
    }

    fn id_name(id: u8, upper: bool) -> String {
        let s = format!("loc-{id}");
        if upper { s.to_uppercase() } else { s }
    }

    proptest! {
        #[test]
        fn slots_never_share_an_id(ops in prop::collection::vec((op(), any::<bool>()), 1..64)) {
            let mut registry = LocationRegistry::new();
            let mut slots: HashMap<u8, String> = HashMap::new();

            for (op, upper) in ops {
                match op {
                    Op::Assign(slot, id) => {
                        if slots.contains_key(&slot) {
                            continue;
                        }
                        let id = id_name(id, upper);
                        if registry.reserve(&id).is_ok() {
                            slots.insert(slot, id);
                        }
                    }
                    Op::Rename(slot, id) => {
                        let Some(old) = slots.get(&slot).cloned() else { continue };
                        let id = id_name(id, upper);
                        let before = registry.clone();
                        match registry.replace(Some(&old), &id) {
                            Ok(()) => { slots.insert(slot, id); }
                            Err(_) => prop_assert_eq!(&registry, &before),
                        }
                    }
                    Op::Remove(slot) => {
                        if let Some(old) = slots.remove(&slot) {
                            registry.remove(&old);
                        }
                    }
                }

                let keys: Vec<LocationKey> = slots.values().filter_map(|s| LocationKey::new(s)).collect();
                let unique: HashSet<&LocationKey> = keys.iter().collect();
                prop_assert_eq!(unique.len(), keys.len());
                prop_assert_eq!(registry.len(), keys.len());
                for key in &keys {
                    prop_assert!(registry.is_in_use(key.as_str()));
                }
            }
        }
    }
}
