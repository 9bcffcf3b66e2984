//! Answer Evaluator
//!
//! A single total function from (round, guess) to correct/incorrect.
//! Never panics, never errors: a guess whose kind doesn't match the
//! round's mode is simply wrong.

use serde::{Serialize, Deserialize};

use crate::catalog::ItemId;

use super::round::{Answer, GameMode, Round};

/// A player's submission. `None` models a timer expiry, which is judged
/// through the same path as any other wrong answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guess {
    /// Attribute mode: the chosen tag.
    Tag(String),
    /// Price mode: the chosen gold total.
    Gold(u32),
    /// Recipe mode: the chosen component's id.
    Component(ItemId),
    /// Daily mode: the typed/selected item name (exact match).
    Item(String),
    /// No answer before the timer ran out.
    None,
}

/// Judge a guess against a round.
///
/// Attribute mode checks the item's full tag set, not just the displayed
/// options, so any tag genuinely on the item counts as correct.
pub fn evaluate(round: &Round, guess: &Guess) -> bool {
    match (round.mode, guess) {
        (GameMode::Attribute, Guess::Tag(tag)) => round.item.has_tag(tag),
        (GameMode::Price, Guess::Gold(gold)) => *gold == round.item.gold,
        (GameMode::Recipe, Guess::Component(id)) => {
            matches!(&round.answer, Answer::Component(c) if &c.id == id)
        }
        (GameMode::Daily, Guess::Item(name)) => *name == round.item.name,
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
