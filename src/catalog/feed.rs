//! Vendor Feed (Data Dragon)
//!
//! Raw types for the versioned vendor item catalog, plus the offline
//! filter/normalize pipeline that turns a feed snapshot into a playable
//! [`Catalog`]. The runtime core never touches the feed; only the
//! `fetch-items` binary does, on a refresh schedule.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::item::{canonicalize_tags, Item, ItemId};
use super::store::{Catalog, CatalogError};

/// Version-list endpoint: the first entry is the latest patch.
pub const VERSIONS_URL: &str = "https://ddragon.leagueoflegends.com/api/versions.json";

/// Item catalog endpoint for a given patch and locale.
pub fn items_url(patch: &str, locale: &str) -> String {
    format!("https://ddragon.leagueoflegends.com/cdn/{patch}/data/{locale}/item.json")
}

/// Summoner's Rift map id in the feed's `maps` table.
const RIFT_MAP_ID: &str = "11";

/// Ids the feed lists twice under cosmetic variants; skipped up front.
const SEEDED_DUPLICATE_IDS: &[&str] = &["3867", "3869", "3870", "3871", "3876", "3877"];

/// The one `inStore`-flagged item we keep anyway (Synchronized Souls boots).
const IN_STORE_EXEMPT_ID: &str = "3013";

/// Feed pipeline errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP transport failure.
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The version-list endpoint returned an empty list.
    #[error("vendor version list is empty")]
    EmptyVersionList,

    /// The filtered catalog failed validation.
    #[error("catalog build failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// Top-level feed document: `{ "data": { "<id>": {...}, ... } }`.
#[derive(Debug, Deserialize)]
pub struct FeedDocument {
    /// Item records keyed by id.
    pub data: BTreeMap<String, FeedItem>,
}

/// One raw item record as the vendor ships it. Only the fields the
/// pipeline inspects are modeled; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct FeedItem {
    /// Display name. Items without one are dropped.
    pub name: Option<String>,

    /// Rich-text description with vendor markup.
    pub description: Option<String>,

    /// Price block. Items without one are dropped.
    pub gold: Option<FeedGold>,

    /// Vendor tags (pre-canonicalization).
    #[serde(default)]
    pub tags: Vec<String>,

    /// Image descriptor.
    pub image: Option<FeedImage>,

    /// Component ids.
    #[serde(default)]
    pub from: Vec<String>,

    /// Map availability table (map id -> available).
    #[serde(default)]
    pub maps: BTreeMap<String, bool>,

    /// Presence of this key (any value) marks temporary/test items.
    #[serde(rename = "inStore")]
    pub in_store: Option<bool>,

    /// Ornn masterwork items require an ally; excluded.
    #[serde(rename = "requiredAlly")]
    pub required_ally: Option<String>,

    /// Champion-specific items; excluded.
    #[serde(rename = "requiredChampion")]
    pub required_champion: Option<String>,
}

/// Price block: the quiz always uses the combined total.
#[derive(Debug, Deserialize)]
pub struct FeedGold {
    /// Total price including components.
    pub total: u32,
}

/// Image descriptor: only the sprite filename matters.
#[derive(Debug, Deserialize)]
pub struct FeedImage {
    /// Filename on the vendor CDN, e.g. `1001.png`.
    pub full: String,
}

/// Collapse doubled line breaks and non-breaking spaces left over from
/// vendor templating.
pub fn sanitize_description(raw: &str) -> String {
    raw.replace("<br><br>", "<br>").replace('\u{00A0}', " ")
}

/// Filter and normalize a feed snapshot into a playable catalog.
///
/// Exclusion rules, applied in order:
/// - ids with 5+ digits (temporary/test items)
/// - records carrying the `inStore` key (except id 3013)
/// - records missing a name or price
/// - items not available on Summoner's Rift (`maps["11"] == false`)
/// - ally- or champion-restricted items
/// - the seeded duplicate-id set, plus any id or name seen before
pub fn build_catalog(doc: &FeedDocument) -> Result<Catalog, FeedError> {
    let mut seen_ids: Vec<&str> = SEEDED_DUPLICATE_IDS.to_vec();
    let mut seen_names: Vec<&str> = Vec::new();
    let mut items: Vec<Item> = Vec::new();
    let mut skipped = 0usize;

    for (id, raw) in &doc.data {
        if id.len() >= 5 {
            skipped += 1;
            continue;
        }

        if raw.in_store.is_some() && id != IN_STORE_EXEMPT_ID {
            skipped += 1;
            continue;
        }

        let (name, gold) = match (&raw.name, &raw.gold) {
            (Some(n), Some(g)) if !n.is_empty() => (n, g),
            _ => {
                skipped += 1;
                continue;
            }
        };

        if raw.maps.get(RIFT_MAP_ID) == Some(&false) {
            skipped += 1;
            continue;
        }

        if raw.required_ally.is_some() || raw.required_champion.is_some() {
            skipped += 1;
            continue;
        }

        if seen_ids.contains(&id.as_str()) || seen_names.contains(&name.as_str()) {
            skipped += 1;
            continue;
        }

        let description = raw
            .description
            .as_deref()
            .map(sanitize_description)
            .unwrap_or_default();

        let image = raw
            .image
            .as_ref()
            .map(|i| i.full.clone())
            .unwrap_or_else(|| format!("{id}.png"));

        items.push(Item {
            id: ItemId::new(id.clone()),
            name: name.clone(),
            gold: gold.total,
            description,
            tags: canonicalize_tags(&raw.tags),
            image,
            from: raw.from.iter().map(|f| ItemId::new(f.clone())).collect(),
        });

        seen_ids.push(id);
        seen_names.push(name);
    }

    debug!(kept = items.len(), skipped, "feed filtered");
    Ok(Catalog::from_items(items)?)
}

/// Fetch the vendor version list and return the latest patch.
pub async fn fetch_latest_patch(client: &reqwest::Client) -> Result<String, FeedError> {
    let versions: Vec<String> = client
        .get(VERSIONS_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    versions.into_iter().next().ok_or(FeedError::EmptyVersionList)
}

/// Fetch the raw item catalog for one patch and locale.
pub async fn fetch_feed(
    client: &reqwest::Client,
    patch: &str,
    locale: &str,
) -> Result<FeedDocument, FeedError> {
    let url = items_url(patch, locale);
    info!(%url, "downloading item feed");
    let doc = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(doc)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_item(name: &str, gold: u32, tags: &[&str]) -> FeedItem {
        FeedItem {
            name: Some(name.to_string()),
            description: None,
            gold: Some(FeedGold { total: gold }),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image: None,
            from: vec![],
            maps: BTreeMap::new(),
            in_store: None,
            required_ally: None,
            required_champion: None,
        }
    }

    fn doc(entries: Vec<(&str, FeedItem)>) -> FeedDocument {
        FeedDocument {
            data: entries
                .into_iter()
                .map(|(id, it)| (id.to_string(), it))
                .collect(),
        }
    }

    #[test]
    fn test_drops_five_digit_ids() {
        let d = doc(vec![
            ("1001", feed_item("Boots", 300, &["Boots"])),
            ("22100", feed_item("Arena Thing", 1000, &["Damage"])),
        ]);
        let cat = build_catalog(&d).unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.items()[0].name, "Boots");
    }

    #[test]
    fn test_drops_in_store_flagged_except_exempt() {
        let mut flagged = feed_item("Test Item", 500, &["Damage"]);
        flagged.in_store = Some(false);
        let mut exempt = feed_item("Synchronized Souls", 900, &["Boots"]);
        exempt.in_store = Some(false);

        let d = doc(vec![
            ("1036", feed_item("Long Sword", 350, &["Damage"])),
            ("2420", flagged),
            ("3013", exempt),
        ]);
        let cat = build_catalog(&d).unwrap();
        let names: Vec<&str> = cat.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Long Sword", "Synchronized Souls"]);
    }

    #[test]
    fn test_drops_off_rift_items() {
        let mut aram_only = feed_item("ARAM Trinket", 100, &["Vision"]);
        aram_only.maps.insert("11".to_string(), false);
        aram_only.maps.insert("12".to_string(), true);

        let d = doc(vec![
            ("1001", feed_item("Boots", 300, &["Boots"])),
            ("3599", aram_only),
        ]);
        let cat = build_catalog(&d).unwrap();
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn test_drops_champion_and_ally_restricted() {
        let mut ornn = feed_item("Masterwork Blade", 1000, &["Damage"]);
        ornn.required_ally = Some("Ornn".to_string());
        let mut kalista = feed_item("Black Spear", 0, &[]);
        kalista.required_champion = Some("Kalista".to_string());

        let d = doc(vec![
            ("1036", feed_item("Long Sword", 350, &["Damage"])),
            ("7001", ornn),
            ("3599", kalista),
        ]);
        let cat = build_catalog(&d).unwrap();
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn test_drops_seeded_duplicates_and_name_collisions() {
        let d = doc(vec![
            ("1036", feed_item("Long Sword", 350, &["Damage"])),
            // Seeded duplicate id
            ("3867", feed_item("Zephyr Emblem", 0, &["Boots"])),
            // Name collision with 1036
            ("1099", feed_item("Long Sword", 350, &["Damage"])),
        ]);
        let cat = build_catalog(&d).unwrap();
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn test_tags_canonicalized_and_description_sanitized() {
        let mut raw = feed_item("Cosmic Drive", 3000, &["CooldownReduction", "SpellDamage", "NonbootsMovement"]);
        raw.description = Some("Speed.<br><br>More\u{00A0}speed.".to_string());

        let d = doc(vec![("4629", raw)]);
        let cat = build_catalog(&d).unwrap();
        let it = &cat.items()[0];
        assert_eq!(it.tags, vec!["AbilityHaste", "SpellDamage", "MovementSpeed"]);
        assert_eq!(it.description, "Speed.<br>More speed.");
    }

    #[test]
    fn test_missing_name_or_gold_dropped() {
        let mut nameless = feed_item("", 100, &[]);
        nameless.name = None;
        let mut goldless = feed_item("Mystery", 0, &[]);
        goldless.gold = None;

        let d = doc(vec![
            ("1001", feed_item("Boots", 300, &["Boots"])),
            ("1002", nameless),
            ("1003", goldless),
        ]);
        let cat = build_catalog(&d).unwrap();
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn test_image_falls_back_to_id() {
        let d = doc(vec![("1001", feed_item("Boots", 300, &["Boots"]))]);
        let cat = build_catalog(&d).unwrap();
        assert_eq!(cat.items()[0].image, "1001.png");
    }

    #[test]
    fn test_parses_real_feed_shape() {
        let raw = r#"{
            "data": {
                "1001": {
                    "name": "Boots",
                    "description": "<mainText>Movement.</mainText>",
                    "gold": { "base": 300, "total": 300, "sell": 210, "purchasable": true },
                    "tags": ["Boots"],
                    "image": { "full": "1001.png", "sprite": "item0.png" },
                    "maps": { "11": true, "12": true }
                }
            }
        }"#;
        let doc: FeedDocument = serde_json::from_str(raw).unwrap();
        let cat = build_catalog(&doc).unwrap();
        assert_eq!(cat.items()[0].tags, vec!["MovementSpeed"]);
        assert_eq!(cat.items()[0].gold, 300);
        assert_eq!(cat.items()[0].image, "1001.png");
    }
}
