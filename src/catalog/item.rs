//! Item Records and Tag Vocabulary
//!
//! An [`Item`] is one purchasable in-game object from the vendor catalog.
//! The tag vocabulary is the fixed set of attributes the quiz asks about;
//! legacy vendor aliases are collapsed to canonical tags once at
//! catalog-build time, never at query time.

use std::fmt;

use serde::{Serialize, Deserialize};

/// Controlled tag vocabulary.
///
/// Attribute-mode answers and distractors are drawn from this set. Items may
/// carry additional vendor tags outside the vocabulary; those never appear
/// as options but still count for evaluation (any tag on the item is a
/// correct attribute guess).
pub const VALID_TAGS: &[&str] = &[
    "AbilityHaste",
    "Armor",
    "ArmorPenetration",
    "AttackSpeed",
    "Aura",
    "CriticalStrike",
    "Damage",
    "Health",
    "HealthRegen",
    "LifeSteal",
    "MagicPenetration",
    "MagicResist",
    "Mana",
    "ManaRegen",
    "MovementSpeed",
    "OnHit",
    "Slow",
    "SpellDamage",
    "Tenacity",
    "Vision",
];

/// Check membership in the controlled vocabulary.
pub fn is_valid_tag(tag: &str) -> bool {
    VALID_TAGS.contains(&tag)
}

/// Collapse legacy vendor tag aliases into canonical tags.
///
/// Applied once when a catalog is built from the vendor feed:
/// - `CooldownReduction` -> `AbilityHaste`
/// - `Boots`, `NonbootsMovement` -> `MovementSpeed`
/// - `SpellBlock` -> `MagicResist`
///
/// Duplicates introduced by merging are dropped, keeping first-seen order.
pub fn canonicalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let canonical = match tag.as_str() {
            "CooldownReduction" => "AbilityHaste",
            "Boots" | "NonbootsMovement" => "MovementSpeed",
            "SpellBlock" => "MagicResist",
            other => other,
        };
        if !out.iter().any(|t| t == canonical) {
            out.push(canonical.to_string());
        }
    }
    out
}

/// Item identifier: the vendor's numeric-string id.
///
/// Stable across catalog refreshes while the vendor patch is unchanged.
/// Sorting is numeric (see [`ItemId::numeric`]) so catalog order is
/// locale-independent.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create from any string-ish id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Numeric value for sorting. Non-numeric ids sort last.
    pub fn numeric(&self) -> u64 {
        self.0.parse().unwrap_or(u64::MAX)
    }

    /// Borrow the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One purchasable in-game object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Vendor id, unique within a catalog.
    pub id: ItemId,

    /// Display name, unique within a catalog (enforced at build time).
    pub name: String,

    /// Total price in gold.
    pub gold: u32,

    /// Sanitized rich-text description. Optional in the feed.
    #[serde(default)]
    pub description: String,

    /// Attribute tags, canonicalized at build time.
    pub tags: Vec<String>,

    /// Image filename on the vendor CDN.
    pub image: String,

    /// Ordered component ids consumed to build this item. Empty for base items.
    #[serde(default)]
    pub from: Vec<ItemId>,
}

impl Item {
    /// Tags of this item that belong to the controlled vocabulary.
    pub fn valid_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| is_valid_tag(t))
            .collect()
    }

    /// Does the item carry at least one vocabulary tag?
    pub fn has_valid_tag(&self) -> bool {
        self.tags.iter().any(|t| is_valid_tag(t))
    }

    /// Does the item carry this exact tag (vocabulary or vendor extra)?
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Do two items share at least one tag?
    pub fn shares_tag_with(&self, other: &Item) -> bool {
        self.tags.iter().any(|t| other.has_tag(t))
    }

    /// Base items have no recipe.
    pub fn is_base(&self) -> bool {
        self.from.is_empty()
    }

    /// Description with every occurrence of the item's own name masked,
    /// for mystery modes where the name would give the answer away.
    pub fn masked_description(&self) -> String {
        if self.name.is_empty() {
            return self.description.clone();
        }
        self.description.replace(&self.name, "???")
    }
}

// =============================================================================
// TESTS
// =============================================================================
