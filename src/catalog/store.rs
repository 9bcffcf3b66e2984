//! Catalog Storage
//!
//! An ordered, validated list of [`Item`]s. One catalog file exists per
//! supported locale; all of them share the same ids in the same numeric
//! order, so index-based daily selection lands on the same logical item
//! regardless of locale.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::item::{Item, ItemId};

/// Catalog build/load errors. These occur at build or load time only;
/// the running game never sees a malformed catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog contains no items after filtering.
    #[error("catalog is empty")]
    Empty,

    /// Two items share an id.
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),

    /// Two items share a display name.
    #[error("duplicate item name: {0}")]
    DuplicateName(String),

    /// File read/write failure.
    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("catalog json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A validated, ordered item catalog.
///
/// Invariants (checked by [`Catalog::from_items`]):
/// - non-empty
/// - unique by id and by name
/// - sorted by numeric id ascending
#[derive(Clone, Debug)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog from raw items, enforcing the invariants.
    ///
    /// Items are sorted by numeric id; duplicates (by id or name) are
    /// rejected rather than silently dropped, since the offline feed
    /// pipeline is supposed to have deduplicated already.
    pub fn from_items(mut items: Vec<Item>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        // Numeric sort keeps FR/EN catalogs in identical order
        items.sort_by_key(|i| i.id.numeric());

        for pair in items.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(CatalogError::DuplicateId(pair[0].id.clone()));
            }
        }

        let mut names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        for pair in names.windows(2) {
            if pair[0] == pair[1] {
                return Err(CatalogError::DuplicateName(pair[0].to_string()));
            }
        }

        debug!(count = items.len(), "catalog validated");
        Ok(Self { items })
    }

    /// Load a catalog from a JSON file (an array of items).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a catalog from a JSON string (an array of items).
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(raw)?;
        Self::from_items(items)
    }

    /// Write the catalog as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// All items in numeric-id order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty. Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn by_id(&self, id: &ItemId) -> Option<&Item> {
        // Numeric-sorted, so binary search works
        self.items
            .binary_search_by_key(&id.numeric(), |i| i.id.numeric())
            .ok()
            .map(|idx| &self.items[idx])
    }

    /// Look up an item by exact display name.
    pub fn by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Candidates for attribute mode: items with at least one vocabulary tag.
    pub fn taggable(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.has_valid_tag()).collect()
    }

    /// Candidates for price mode: items with a positive price.
    pub fn priced(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.gold > 0).collect()
    }

    /// Candidates for recipe mode: items with a non-empty component list.
    pub fn craftable(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| !i.from.is_empty()).collect()
    }

    /// The daily-challenge pool: same eligibility as attribute mode.
    ///
    /// Pool ordering follows catalog ordering, which is what makes the
    /// index-based daily selection locale-stable.
    pub fn daily_pool(&self) -> Vec<&Item> {
        self.taggable()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, gold: u32, tags: &[&str], from: &[&str]) -> Item {
        Item {
            id: ItemId::from(id),
            name: name.to_string(),
            gold,
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image: format!("{id}.png"),
            from: from.iter().map(|f| ItemId::from(*f)).collect(),
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::from_items(vec![
            item("3006", "Berserker's Greaves", 1100, &["AttackSpeed", "MovementSpeed"], &["1001", "1042"]),
            item("1001", "Boots", 300, &["MovementSpeed"], &[]),
            item("1042", "Dagger", 250, &["AttackSpeed"], &[]),
            item("2003", "Health Potion", 50, &["Consumable"], &[]),
            item("1028", "Ruby Crystal", 400, &["Health"], &[]),
            item("3871", "Zephyr Emblem", 0, &["MovementSpeed"], &[]),
        ])
        .unwrap()
    }

    #[test]
    fn test_sorted_by_numeric_id() {
        let cat = small_catalog();
        let ids: Vec<&str> = cat.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1028", "1042", "2003", "3006", "3871"]);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Catalog::from_items(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let result = Catalog::from_items(vec![
            item("1001", "Boots", 300, &["MovementSpeed"], &[]),
            item("1001", "Other Boots", 300, &["MovementSpeed"], &[]),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let result = Catalog::from_items(vec![
            item("1001", "Boots", 300, &["MovementSpeed"], &[]),
            item("1002", "Boots", 300, &["MovementSpeed"], &[]),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateName(_))));
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let cat = small_catalog();
        assert_eq!(cat.by_id(&ItemId::from("1042")).unwrap().name, "Dagger");
        assert_eq!(cat.by_name("Ruby Crystal").unwrap().id, ItemId::from("1028"));
        assert!(cat.by_id(&ItemId::from("9999")).is_none());
        assert!(cat.by_name("Nonexistent").is_none());
    }

    #[test]
    fn test_mode_filters() {
        let cat = small_catalog();

        // "Health Potion" has only a vendor-extra tag -> not taggable
        let taggable: Vec<&str> = cat.taggable().iter().map(|i| i.name.as_str()).collect();
        assert!(!taggable.contains(&"Health Potion"));
        assert!(taggable.contains(&"Boots"));

        // Zephyr Emblem costs 0 -> not priced
        let priced: Vec<&str> = cat.priced().iter().map(|i| i.name.as_str()).collect();
        assert!(!priced.contains(&"Zephyr Emblem"));
        assert!(priced.contains(&"Health Potion"));

        // Only the Greaves have a recipe
        let craftable: Vec<&str> = cat.craftable().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(craftable, vec!["Berserker's Greaves"]);
    }

    #[test]
    fn test_daily_pool_matches_taggable() {
        let cat = small_catalog();
        let pool: Vec<&str> = cat.daily_pool().iter().map(|i| i.id.as_str()).collect();
        let taggable: Vec<&str> = cat.taggable().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(pool, taggable);
    }

    #[test]
    fn test_json_roundtrip() {
        let cat = small_catalog();
        let json = serde_json::to_string(cat.items()).unwrap();
        let back = Catalog::from_json(&json).unwrap();
        assert_eq!(back.len(), cat.len());
        assert_eq!(back.items(), cat.items());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items_en.json");

        let cat = small_catalog();
        cat.save(&path).unwrap();

        let back = Catalog::load(&path).unwrap();
        assert_eq!(back.items(), cat.items());
    }
}
