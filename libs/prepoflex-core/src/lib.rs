//! Core library for the à/de preposition quiz.
//!
//! Provides:
//! - Flashcard and preposition types with validation
//! - The static fallback deck
//! - Card supply state machine (initial load, wrap-around cursor, replenishment guard)
//! - Quiz session scoring and per-card answer state

pub mod error;
pub mod fallback;
pub mod session;
pub mod supply;
pub mod types;

pub use error::{CardError, SessionError, SupplyError};
pub use fallback::fallback_cards;
pub use session::{AnswerState, Feedback, QuizSession, BASE_POINTS, STREAK_BONUS};
pub use supply::{
    BatchRequest, CardSupply, DegradedReason, LoadPhase, Replenishment, DEFAULT_BATCH_SIZE,
    PREFETCH_MARGIN,
};
pub use types::{Flashcard, GameState, Preposition, RawFlashcard, GAP_MARKER};
