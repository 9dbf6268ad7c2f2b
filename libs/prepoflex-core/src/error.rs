//! Error types for prepoflex-core.

use thiserror::Error;

/// Errors raised when building a flashcard from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("empty field: {field}")]
    EmptyField { field: &'static str },

    #[error("sentence has no gap marker: {sentence}")]
    MissingGap { sentence: String },

    #[error("sentence has {count} gap markers, expected one: {sentence}")]
    MultipleGaps { sentence: String, count: usize },

    #[error("unknown preposition: {value}")]
    UnknownPreposition { value: String },
}

/// Errors raised by the card supply state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplyError {
    #[error("initial load already started")]
    AlreadyLoaded,

    #[error("no initial load in progress")]
    NotLoading,

    #[error("batch request belongs to session {session_id}")]
    StaleRequest { session_id: uuid::Uuid },
}

/// Errors raised by the quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no card available")]
    NoCurrentCard,
}
