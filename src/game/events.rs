//! Session events, queued by the state machine for the presentation
//! layer to drain after each transition.

use serde::{Serialize, Deserialize};

use super::round::GameMode;

/// Something observable that happened inside a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum SessionEvent {
    /// A new round became active.
    RoundStarted {
        /// The round's mode.
        mode: GameMode,
    },

    /// A guess (or timeout) was judged.
    AnswerJudged {
        /// The round's mode.
        mode: GameMode,
        /// Whether the guess was correct.
        correct: bool,
        /// Score after the judgment.
        score: u32,
        /// Lives remaining after the judgment.
        lives: u32,
        /// Streak after the judgment.
        streak: u32,
    },

    /// The running score passed the stored high score for this mode.
    NewHighScore {
        /// The mode whose record was beaten.
        mode: GameMode,
        /// The new record.
        value: u32,
    },

    /// Lives reached zero.
    GameOver {
        /// Score at the moment of the final wrong answer.
        final_score: u32,
        /// Best streak achieved during the run.
        best_streak: u32,
    },
}
