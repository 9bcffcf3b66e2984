//! Round Engine
//!
//! Produces a [`Round`] for a requested mode from a catalog: picks the
//! subject item and builds the option list (one correct answer plus
//! distractors). Pure with respect to external state; the only mutable
//! input is the injected RNG, and daily mode doesn't even use that.

use std::fmt;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, Item, VALID_TAGS};
use crate::core::daily::daily_index;
use crate::core::rng::DeterministicRng;

/// Quiz mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Guess one of the item's attribute tags.
    Attribute,
    /// Guess the item's exact total price.
    Price,
    /// Guess a component of the item's recipe.
    Recipe,
    /// Free-text guess of today's item, same for every player.
    Daily,
}

impl GameMode {
    /// All modes, in menu order.
    pub const ALL: [GameMode; 4] = [
        GameMode::Attribute,
        GameMode::Price,
        GameMode::Recipe,
        GameMode::Daily,
    ];

    /// Stable string form, used for store keys and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Attribute => "attribute",
            GameMode::Price => "price",
            GameMode::Recipe => "recipe",
            GameMode::Daily => "daily",
        }
    }

    /// Daily mode runs untimed; the rest race a countdown.
    pub fn is_timed(self) -> bool {
        !matches!(self, GameMode::Daily)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A correct answer or distractor, depending on mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    /// Attribute mode: a tag string.
    Tag(String),
    /// Price mode: a gold total.
    Gold(u32),
    /// Recipe mode: a full component item (not just its id, so the
    /// presentation layer can render name and image directly).
    Component(Item),
    /// Daily mode: the target item's name.
    ItemName(String),
}

/// Ephemeral per-question state, created fresh each round and discarded
/// when the next round starts or the session ends.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    /// The mode this round was generated for.
    pub mode: GameMode,
    /// The subject item.
    pub item: Item,
    /// The correct answer.
    pub answer: Answer,
    /// Shuffled options: exactly one equals `answer`. Empty in daily mode,
    /// which uses free-text/search selection instead.
    pub options: Vec<Answer>,
}

/// Round generation failures. All recoverable: the caller surfaces them
/// as a "try another mode" condition, never a crash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RoundError {
    /// No item in the catalog satisfies this mode's filter.
    #[error("no playable item for this mode")]
    EmptyCandidateSet,

    /// Bounded retry budget exceeded while synthesizing distractors.
    #[error("distractor generation budget exhausted")]
    DistractorsExhausted,
}

/// Tunable knobs for option generation.
#[derive(Clone, Debug)]
pub struct RoundConfig {
    /// Options per round (one correct + distractors).
    pub option_count: usize,
    /// Candidate price offsets applied to the correct price.
    pub price_deltas: Vec<i64>,
    /// Attempts before price distractor generation gives up.
    pub price_retry_budget: u32,
    /// Max gold difference for a recipe "smart fake".
    pub recipe_gold_tolerance: u32,
    /// Price ceiling for the loosened recipe fallback pool.
    pub recipe_fallback_ceiling: u32,
    /// Re-roll attempts when a sampled item turns out degenerate.
    pub degenerate_retries: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            option_count: 4,
            price_deltas: vec![
                -400, -300, -200, -150, -100, -50, 50, 100, 150, 200, 300, 400,
            ],
            price_retry_budget: 100,
            recipe_gold_tolerance: 400,
            recipe_fallback_ceiling: 3000,
            degenerate_retries: 16,
        }
    }
}

/// Generate a round for `mode`.
///
/// `date` (ISO `YYYY-MM-DD`) is consulted only by daily mode; the other
/// modes draw from `rng`.
pub fn generate_round(
    catalog: &Catalog,
    mode: GameMode,
    date: &str,
    rng: &mut DeterministicRng,
    cfg: &RoundConfig,
) -> Result<Round, RoundError> {
    let round = match mode {
        GameMode::Attribute => attribute_round(catalog, rng, cfg)?,
        GameMode::Price => price_round(catalog, rng, cfg)?,
        GameMode::Recipe => recipe_round(catalog, rng, cfg)?,
        GameMode::Daily => daily_round(catalog, date)?,
    };
    debug!(mode = %mode, item = %round.item.id, options = round.options.len(), "round generated");
    Ok(round)
}

/// The daily item for a given date, or `None` when the pool is empty.
///
/// Also used with yesterday's date for the informational reveal.
pub fn daily_item<'a>(catalog: &'a Catalog, date: &str) -> Option<&'a Item> {
    let pool = catalog.daily_pool();
    let idx = daily_index(date, pool.len())?;
    Some(pool[idx])
}

fn attribute_round(
    catalog: &Catalog,
    rng: &mut DeterministicRng,
    cfg: &RoundConfig,
) -> Result<Round, RoundError> {
    let pool = catalog.taggable();

    // Bounded re-roll instead of recursing on a degenerate item.
    for _ in 0..cfg.degenerate_retries {
        let Some(item) = rng.choose(&pool).copied() else {
            return Err(RoundError::EmptyCandidateSet);
        };

        let valid = item.valid_tags();
        let Some(&correct) = rng.choose(&valid) else {
            continue;
        };

        // Distractors: vocabulary tags NOT on the item's full tag set,
        // so no offered wrong answer is secretly right.
        let wrong_pool: Vec<&str> = VALID_TAGS
            .iter()
            .copied()
            .filter(|t| !item.has_tag(t))
            .collect();
        let distractors = rng.sample(&wrong_pool, cfg.option_count - 1);

        let mut options: Vec<Answer> = Vec::with_capacity(cfg.option_count);
        options.push(Answer::Tag(correct.to_string()));
        options.extend(distractors.iter().map(|t| Answer::Tag((**t).to_string())));
        rng.shuffle(&mut options);

        return Ok(Round {
            mode: GameMode::Attribute,
            answer: Answer::Tag(correct.to_string()),
            options,
            item: item.clone(),
        });
    }

    Err(RoundError::EmptyCandidateSet)
}

fn price_round(
    catalog: &Catalog,
    rng: &mut DeterministicRng,
    cfg: &RoundConfig,
) -> Result<Round, RoundError> {
    let pool = catalog.priced();
    let Some(item) = rng.choose(&pool).copied() else {
        return Err(RoundError::EmptyCandidateSet);
    };
    let correct = item.gold;

    // Re-draw offsets until we have distinct, positive fakes that differ
    // from the real price. The budget keeps a hostile delta set from
    // looping forever.
    let mut fakes: Vec<u32> = Vec::with_capacity(cfg.option_count - 1);
    let mut attempts = 0u32;
    while fakes.len() < cfg.option_count - 1 {
        attempts += 1;
        if attempts > cfg.price_retry_budget {
            return Err(RoundError::DistractorsExhausted);
        }

        let Some(&delta) = rng.choose(&cfg.price_deltas) else {
            return Err(RoundError::DistractorsExhausted);
        };
        let candidate = correct as i64 + delta;
        if candidate <= 0 {
            continue;
        }
        let candidate = candidate as u32;
        if candidate == correct || fakes.contains(&candidate) {
            continue;
        }
        fakes.push(candidate);
    }

    let mut options: Vec<Answer> = Vec::with_capacity(cfg.option_count);
    options.push(Answer::Gold(correct));
    options.extend(fakes.into_iter().map(Answer::Gold));
    rng.shuffle(&mut options);

    Ok(Round {
        mode: GameMode::Price,
        answer: Answer::Gold(correct),
        options,
        item: item.clone(),
    })
}

fn recipe_round(
    catalog: &Catalog,
    rng: &mut DeterministicRng,
    cfg: &RoundConfig,
) -> Result<Round, RoundError> {
    let pool = catalog.craftable();
    if pool.is_empty() {
        return Err(RoundError::EmptyCandidateSet);
    }

    for _ in 0..cfg.degenerate_retries {
        let Some(item) = rng.choose(&pool).copied() else {
            return Err(RoundError::EmptyCandidateSet);
        };

        // A recipe can reference ids the feed pipeline filtered out;
        // such an item is unplayable, so re-roll.
        let components: Vec<&Item> = item
            .from
            .iter()
            .filter_map(|id| catalog.by_id(id))
            .collect();
        let Some(&correct) = rng.choose(&components) else {
            continue;
        };

        let fakes = recipe_distractors(catalog, item, correct, rng, cfg);

        // Fewer than option_count options is the defined minimum-catalog
        // boundary, not a failure.
        let mut options: Vec<Answer> = Vec::with_capacity(1 + fakes.len());
        options.push(Answer::Component(correct.clone()));
        options.extend(fakes.into_iter().map(|i| Answer::Component(i.clone())));
        rng.shuffle(&mut options);

        return Ok(Round {
            mode: GameMode::Recipe,
            answer: Answer::Component(correct.clone()),
            options,
            item: item.clone(),
        });
    }

    Err(RoundError::EmptyCandidateSet)
}

/// Pick recipe distractors: smart fakes first (price proximity + shared
/// tag), then the loosened fallback pool (anything under the price
/// ceiling) to top up. Excluded throughout: the subject itself, the
/// correct component, and every item already in the recipe.
fn recipe_distractors<'a>(
    catalog: &'a Catalog,
    subject: &Item,
    correct: &Item,
    rng: &mut DeterministicRng,
    cfg: &RoundConfig,
) -> Vec<&'a Item> {
    let needed = cfg.option_count - 1;
    let excluded = |c: &Item| {
        c.id == subject.id || c.id == correct.id || subject.from.contains(&c.id)
    };

    let smart: Vec<&Item> = catalog
        .items()
        .iter()
        .filter(|c| {
            !excluded(c)
                && c.gold.abs_diff(subject.gold) <= cfg.recipe_gold_tolerance
                && c.shares_tag_with(subject)
        })
        .collect();

    let mut picked: Vec<&Item> = rng.sample(&smart, needed).into_iter().copied().collect();

    if picked.len() < needed {
        let loose: Vec<&Item> = catalog
            .items()
            .iter()
            .filter(|c| {
                !excluded(c)
                    && c.gold < cfg.recipe_fallback_ceiling
                    && !picked.iter().any(|p| p.id == c.id)
            })
            .collect();
        let fill = rng.sample(&loose, needed - picked.len());
        picked.extend(fill.into_iter().copied());
    }

    picked
}

fn daily_round(catalog: &Catalog, date: &str) -> Result<Round, RoundError> {
    let item = daily_item(catalog, date)
        .ok_or(RoundError::EmptyCandidateSet)?
        .clone();

    Ok(Round {
        mode: GameMode::Daily,
        answer: Answer::ItemName(item.name.clone()),
        options: Vec::new(),
        item,
    })
}

// =============================================================================
// TESTS
// =============================================================================
