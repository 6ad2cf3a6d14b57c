//! SKU compartments inside storage items.
//!
//! An item that exposes a SKU grid is divided into fixed 60px cells,
//! independent of its placement grid. Each cell is addressed as
//! `"{row}-{col}"` and may hold a [`CompartmentContent`] record.
//!
//! Contents are keyed by id, not by position in the grid, so shrinking an
//! item leaves entries outside the new bounds in place ("stranded"). They
//! keep their location ids reserved until removed explicitly; see
//! [`CompartmentGrid::stranded`].

use crate::CanvasSize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Status given to freshly assigned compartments.
pub const DEFAULT_STATUS: &str = "planned";

/// Address of one compartment, ordered row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompartmentId {
    pub row: u32,
    pub col: u32,
}

impl CompartmentId {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CompartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid compartment id {0:?}, expected \"{{row}}-{{col}}\"")]
pub struct CompartmentIdError(pub String);

impl FromStr for CompartmentId {
    type Err = CompartmentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CompartmentIdError(s.to_string());
        let (row, col) = s.trim().split_once('-').ok_or_else(err)?;
        Ok(Self {
            row: row.parse().map_err(|_| err())?,
            col: col.parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for CompartmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompartmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Rows × columns of compartments derived from an item's size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentGrid {
    pub rows: u32,
    pub cols: u32,
}

impl CompartmentGrid {
    /// `rows = max(1, floor(height / cell))`, `cols = max(1, floor(width / cell))`.
    pub fn for_size(size: CanvasSize, cell: f32) -> Self {
        if !(cell.is_finite() && cell > 0.0) {
            return Self { rows: 1, cols: 1 };
        }
        Self {
            rows: cells_along(size.height(), cell),
            cols: cells_along(size.width(), cell),
        }
    }

    /// Saturates at `u32::MAX` for very large items.
    pub fn total(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    pub fn contains(&self, id: CompartmentId) -> bool {
        id.row < self.rows && id.col < self.cols
    }

    /// All addressable compartments in row-major order.
    pub fn ids(&self) -> impl Iterator<Item = CompartmentId> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| CompartmentId { row, col }))
    }

    /// Entries that lie outside the current bounds.
    pub fn stranded(&self, contents: &CompartmentMap) -> Vec<CompartmentId> {
        contents.keys().copied().filter(|id| !self.contains(*id)).collect()
    }

    pub fn summary(&self, contents: &CompartmentMap) -> CompartmentSummary {
        let total = self.total();
        let occupied = u32::try_from(contents.len()).unwrap_or(u32::MAX);
        CompartmentSummary {
            rows: self.rows,
            cols: self.cols,
            total,
            occupied,
            available: total.saturating_sub(occupied),
            stranded: u32::try_from(self.stranded(contents).len()).unwrap_or(u32::MAX),
        }
    }
}

fn cells_along(length: f32, cell: f32) -> u32 {
    let count = (length / cell).floor();
    if count >= 1.0 {
        // Saturating float-to-int cast.
        count as u32
    } else {
        1
    }
}

/// Occupancy counts for an item's compartment grid.
///
/// `occupied` counts every stored entry, stranded ones included;
/// `available` saturates at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentSummary {
    pub rows: u32,
    pub cols: u32,
    pub total: u32,
    pub occupied: u32,
    pub available: u32,
    pub stranded: u32,
}

pub type CompartmentMap = BTreeMap<CompartmentId, CompartmentContent>;

/// One physical level of a multi-level compartment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelMapping {
    pub level_id: String,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A compartment holding one location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleLocation {
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// A compartment spanning several levels, each with its own location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiLocation {
    pub mappings: Vec<LevelMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// What a compartment stores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompartmentContent {
    Single(SingleLocation),
    Multi(MultiLocation),
}

impl CompartmentContent {
    /// A single-location record stamped with `now`.
    pub fn single(location_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::Single(SingleLocation {
            location_id: location_id.into(),
            sku: None,
            quantity: 0,
            status: DEFAULT_STATUS.to_string(),
            category: None,
            last_modified: now,
        })
    }

    pub fn multi(mappings: Vec<LevelMapping>, now: DateTime<Utc>) -> Self {
        Self::Multi(MultiLocation {
            mappings,
            sku: None,
            quantity: 0,
            status: DEFAULT_STATUS.to_string(),
            category: None,
            last_modified: now,
        })
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        match &mut self {
            Self::Single(c) => c.category = category,
            Self::Multi(c) => c.category = category,
        }
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        match &mut self {
            Self::Single(c) => c.status = status,
            Self::Multi(c) => c.status = status,
        }
        self
    }

    /// Non-empty location ids held by this compartment.
    pub fn location_ids(&self) -> Vec<&str> {
        let ids: Vec<&str> = match self {
            Self::Single(c) => vec![c.location_id.as_str()],
            Self::Multi(c) => c.mappings.iter().map(|m| m.location_id.as_str()).collect(),
        };
        ids.into_iter().filter(|id| !id.trim().is_empty()).collect()
    }

    /// The id shown for the compartment (first level for multi-level).
    pub fn primary_location_id(&self) -> Option<&str> {
        self.location_ids().into_iter().next()
    }

    pub fn is_multi_location(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    pub fn sku(&self) -> Option<&str> {
        match self {
            Self::Single(c) => c.sku.as_deref(),
            Self::Multi(c) => c.sku.as_deref(),
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            Self::Single(c) => c.quantity,
            Self::Multi(c) => c.quantity,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            Self::Single(c) => &c.status,
            Self::Multi(c) => &c.status,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Single(c) => c.category.as_deref(),
            Self::Multi(c) => c.category.as_deref(),
        }
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        match self {
            Self::Single(c) => c.last_modified,
            Self::Multi(c) => c.last_modified,
        }
    }

    /// Apply a detail edit and restamp.
    pub fn apply_edit(&mut self, edit: &CompartmentEdit, now: DateTime<Utc>) {
        let (sku, quantity, status, category, last_modified) = match self {
            Self::Single(c) => (
                &mut c.sku,
                &mut c.quantity,
                &mut c.status,
                &mut c.category,
                &mut c.last_modified,
            ),
            Self::Multi(c) => (
                &mut c.sku,
                &mut c.quantity,
                &mut c.status,
                &mut c.category,
                &mut c.last_modified,
            ),
        };
        if let Some(value) = &edit.sku {
            *sku = non_blank(value);
        }
        if let Some(value) = edit.quantity {
            *quantity = value;
        }
        if let Some(value) = &edit.status {
            if let Some(value) = non_blank(value) {
                *status = value;
            }
        }
        if let Some(value) = &edit.category {
            *category = non_blank(value);
        }
        *last_modified = now;
    }

    /// Replace the (single) location id and restamp.
    ///
    /// Multi-level compartments rename the level holding
    /// [`primary_location_id`](Self::primary_location_id), or the first
    /// level when every level is blank.
    pub fn set_primary_location_id(&mut self, location_id: String, now: DateTime<Utc>) {
        match self {
            Self::Single(c) => {
                c.location_id = location_id;
                c.last_modified = now;
            }
            Self::Multi(c) => {
                let primary = c
                    .mappings
                    .iter()
                    .position(|m| !m.location_id.trim().is_empty())
                    .unwrap_or(0);
                match c.mappings.get_mut(primary) {
                    Some(level) => level.location_id = location_id,
                    None => c.mappings.push(LevelMapping {
                        level_id: "L1".to_string(),
                        location_id,
                        tag: None,
                    }),
                }
                c.last_modified = now;
            }
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Partial edit of a compartment's stock details.
///
/// `Some("")` clears an optional text field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// === Loading older layouts ===

/// Records as written by older hosts: `uniqueId` aliases `locationId`,
/// and multi-level data comes either as `levelLocationMappings` or as
/// parallel `locationIds` / `levelIds` / `tags` arrays.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyContent {
    #[serde(default)]
    location_id: Option<String>,
    #[serde(default)]
    unique_id: Option<String>,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    last_modified: Option<String>,
    #[serde(default)]
    is_multi_location: bool,
    #[serde(default)]
    level_location_mappings: Vec<LegacyLevelMapping>,
    #[serde(default)]
    location_ids: Vec<String>,
    #[serde(default)]
    level_ids: Vec<String>,
    #[serde(default)]
    tags: Vec<Option<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLevelMapping {
    #[serde(default)]
    level_id: Option<String>,
    #[serde(default)]
    location_id: String,
    #[serde(default)]
    tag: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredContent {
    Current(CompartmentContent),
    Legacy(LegacyContent),
}

impl From<LegacyContent> for CompartmentContent {
    fn from(legacy: LegacyContent) -> Self {
        let last_modified = legacy
            .last_modified
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let quantity = legacy
            .quantity
            .filter(|q| q.is_finite() && *q >= 0.0)
            .map(|q| q.round() as u32)
            .unwrap_or(0);
        let status = legacy
            .status
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        if legacy.is_multi_location {
            let mappings = if !legacy.level_location_mappings.is_empty() {
                legacy
                    .level_location_mappings
                    .into_iter()
                    .enumerate()
                    .map(|(i, m)| LevelMapping {
                        level_id: m.level_id.unwrap_or_else(|| level_name(i)),
                        location_id: m.location_id,
                        tag: m.tag,
                    })
                    .collect()
            } else {
                legacy
                    .location_ids
                    .into_iter()
                    .enumerate()
                    .map(|(i, location_id)| LevelMapping {
                        level_id: legacy.level_ids.get(i).cloned().unwrap_or_else(|| level_name(i)),
                        location_id,
                        tag: legacy.tags.get(i).cloned().flatten(),
                    })
                    .collect()
            };
            return Self::Multi(MultiLocation {
                mappings,
                sku: legacy.sku,
                quantity,
                status,
                category: legacy.category,
                last_modified,
            });
        }

        Self::Single(SingleLocation {
            location_id: legacy
                .location_id
                .filter(|id| !id.trim().is_empty())
                .or(legacy.unique_id)
                .unwrap_or_default(),
            sku: legacy.sku,
            quantity,
            status,
            category: legacy.category,
            last_modified,
        })
    }
}

fn level_name(index: usize) -> String {
    format!("L{}", index + 1)
}

/// Deserialize a compartment map, converting legacy records.
pub fn deserialize_contents<'de, D>(deserializer: D) -> Result<CompartmentMap, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = BTreeMap::<CompartmentId, StoredContent>::deserialize(deserializer)?;
    Ok(stored
        .into_iter()
        .map(|(id, content)| {
            let content = match content {
                StoredContent::Current(content) => content,
                StoredContent::Legacy(legacy) => legacy.into(),
            };
            (id, content)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "deserialize_contents")]
        contents: CompartmentMap,
    }

    #[test]
    fn compartment_id_parses_and_prints() {
        let id: CompartmentId = "2-5".parse().unwrap();
        assert_eq!(id, CompartmentId::new(2, 5));
        assert_eq!(id.to_string(), "2-5");
        assert!("2".parse::<CompartmentId>().is_err());
        assert!("a-b".parse::<CompartmentId>().is_err());
        assert!("-1-2".parse::<CompartmentId>().is_err());
    }

    #[test]
    fn compartment_ids_order_row_major() {
        let mut ids = vec![CompartmentId::new(1, 0), CompartmentId::new(0, 2), CompartmentId::new(0, 1)];
        ids.sort();
        assert_eq!(ids, vec![CompartmentId::new(0, 1), CompartmentId::new(0, 2), CompartmentId::new(1, 0)]);
    }

    #[test]
    fn grid_derives_from_size() {
        let grid = CompartmentGrid::for_size(CanvasSize::new(180.0, 120.0), 60.0);
        assert_eq!((grid.rows, grid.cols, grid.total()), (2, 3, 6));

        let grid = CompartmentGrid::for_size(CanvasSize::new(120.0, 60.0), 60.0);
        assert_eq!((grid.rows, grid.cols, grid.total()), (1, 2, 2));
    }

    #[test]
    fn grid_never_smaller_than_one_cell() {
        let grid = CompartmentGrid::for_size(CanvasSize::new(15.0, 0.0), 60.0);
        assert_eq!((grid.rows, grid.cols), (1, 1));
        let grid = CompartmentGrid::for_size(CanvasSize::new(f32::NAN, 119.0), 60.0);
        assert_eq!((grid.rows, grid.cols), (1, 1));
    }

    #[test]
    fn grid_ids_enumerate_row_major() {
        let grid = CompartmentGrid { rows: 2, cols: 2 };
        let ids: Vec<String> = grid.ids().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["0-0", "0-1", "1-0", "1-1"]);
    }

    #[test]
    fn shrinking_strands_entries_without_dropping_them() {
        let mut contents = CompartmentMap::new();
        contents.insert(CompartmentId::new(0, 0), CompartmentContent::single("A", epoch()));
        contents.insert(CompartmentId::new(1, 2), CompartmentContent::single("B", epoch()));

        let small = CompartmentGrid::for_size(CanvasSize::new(120.0, 60.0), 60.0);
        assert_eq!(small.stranded(&contents), vec![CompartmentId::new(1, 2)]);

        let summary = small.summary(&contents);
        assert_eq!(summary.occupied, 2);
        assert_eq!(summary.available, 0);
        assert_eq!(summary.stranded, 1);
        assert_eq!(contents.len(), 2);
    }

    #[test]
    fn available_saturates_when_stranded_exceed_grid() {
        let mut contents = CompartmentMap::new();
        for col in 0..3 {
            contents.insert(CompartmentId::new(0, col), CompartmentContent::single(format!("X{col}"), epoch()));
        }
        let grid = CompartmentGrid { rows: 1, cols: 1 };
        assert_eq!(grid.summary(&contents).available, 0);
    }

    #[test]
    fn content_serializes_tagged() {
        let content = CompartmentContent::single("STG-A01-001", epoch());
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["locationId"], "STG-A01-001");
        assert_eq!(json["status"], "planned");
        assert!(json.get("sku").is_none());
    }

    #[test]
    fn legacy_unique_id_becomes_location_id() {
        let wrapper: Wrapper = serde_json::from_value(json!({
            "contents": {
                "0-1": { "uniqueId": "OLD-7", "sku": "SKU-1", "quantity": 4, "status": "stocked" }
            }
        }))
        .unwrap();
        let content = &wrapper.contents[&CompartmentId::new(0, 1)];
        assert_eq!(content.location_ids(), vec!["OLD-7"]);
        assert_eq!(content.sku(), Some("SKU-1"));
        assert_eq!(content.quantity(), 4);
        assert_eq!(content.status(), "stocked");
        assert_eq!(content.last_modified(), epoch());
    }

    #[test]
    fn legacy_parallel_arrays_become_mappings() {
        let wrapper: Wrapper = serde_json::from_value(json!({
            "contents": {
                "0-0": {
                    "isMultiLocation": true,
                    "locationIds": ["A-1", "A-2"],
                    "levelIds": ["floor"],
                    "tags": [null, "top"],
                    "lastModified": "2024-03-01T10:00:00Z"
                }
            }
        }))
        .unwrap();
        let CompartmentContent::Multi(multi) = &wrapper.contents[&CompartmentId::new(0, 0)] else {
            panic!("expected multi-location content");
        };
        assert_eq!(multi.mappings.len(), 2);
        assert_eq!(multi.mappings[0].level_id, "floor");
        assert_eq!(multi.mappings[1].level_id, "L2");
        assert_eq!(multi.mappings[1].tag.as_deref(), Some("top"));
        assert_eq!(multi.last_modified.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn legacy_level_location_mappings_are_kept() {
        let wrapper: Wrapper = serde_json::from_value(json!({
            "contents": {
                "0-0": {
                    "isMultiLocation": true,
                    "levelLocationMappings": [
                        { "levelId": "B", "locationId": "LOC-B" },
                        { "locationId": "LOC-C", "tag": "cold" }
                    ]
                }
            }
        }))
        .unwrap();
        let content = &wrapper.contents[&CompartmentId::new(0, 0)];
        assert!(content.is_multi_location());
        assert_eq!(content.location_ids(), vec!["LOC-B", "LOC-C"]);
    }

    #[test]
    fn current_records_load_unchanged() {
        let original = CompartmentContent::single("Z-9", epoch()).with_category(Some("bulk".into()));
        let wrapper: Wrapper =
            serde_json::from_value(json!({ "contents": { "3-4": original.clone() } })).unwrap();
        assert_eq!(wrapper.contents[&CompartmentId::new(3, 4)], original);
    }

    #[test]
    fn edit_clears_and_sets_fields() {
        let mut content = CompartmentContent::single("A", epoch()).with_category(Some("bulk".into()));
        let later = epoch() + chrono::Duration::seconds(5);
        content.apply_edit(
            &CompartmentEdit {
                sku: Some(" SKU-9 ".into()),
                quantity: Some(12),
                status: Some("   ".into()),
                category: Some(String::new()),
            },
            later,
        );
        assert_eq!(content.sku(), Some("SKU-9"));
        assert_eq!(content.quantity(), 12);
        assert_eq!(content.status(), "planned");
        assert_eq!(content.category(), None);
        assert_eq!(content.last_modified(), later);
    }

    #[test]
    fn huge_items_saturate_instead_of_overflowing() {
        let grid = CompartmentGrid::for_size(CanvasSize::new(1.0e7, 1.0e7), 60.0);
        assert_eq!(grid.total(), u32::MAX);

        let mut contents = CompartmentMap::new();
        contents.insert(CompartmentId::new(0, 0), CompartmentContent::single("A", epoch()));
        let summary = grid.summary(&contents);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.available, u32::MAX - 1);
        assert_eq!(summary.stranded, 0);
    }

    #[test]
    fn renaming_multi_level_targets_the_primary_level() {
        let mappings = vec![
            LevelMapping { level_id: "L1".into(), location_id: String::new(), tag: None },
            LevelMapping { level_id: "L2".into(), location_id: "LEG-2".into(), tag: None },
        ];
        let mut content = CompartmentContent::multi(mappings, epoch());
        assert_eq!(content.primary_location_id(), Some("LEG-2"));

        content.set_primary_location_id("NEW-1".into(), epoch());
        assert_eq!(content.location_ids(), vec!["NEW-1"]);
        assert_eq!(content.primary_location_id(), Some("NEW-1"));
    }

    #[test]
    fn blank_location_ids_are_not_reported() {
        let content = CompartmentContent::single("  ", epoch());
        assert!(content.location_ids().is_empty());
        assert_eq!(content.primary_location_id(), None);
    }
}
