//! Game logic: round generation, answer evaluation, session state,
//! rank ladder, and the per-round countdown.
//!
//! Everything here is deterministic given a catalog, a seed, and a
//! date, which is what makes runs replayable in tests.

pub mod evaluate;
pub mod events;
pub mod rank;
pub mod round;
pub mod session;
pub mod timer;

pub use evaluate::{evaluate, Guess};
pub use events::SessionEvent;
pub use rank::{rank_for, Rank, RANKS};
pub use round::{daily_item, generate_round, Answer, GameMode, Round, RoundConfig, RoundError};
pub use session::{Session, SessionError, SessionPhase, STARTING_LIVES};
pub use timer::{RoundTimer, TickOutcome, TimerGeneration};
