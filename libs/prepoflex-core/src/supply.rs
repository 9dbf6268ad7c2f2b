//! Card supply: the ordered deck, its cursor and background replenishment.
//!
//! The supply never talks to a generator itself. It hands out
//! [`BatchRequest`]s and expects the caller to run them and report the
//! outcome back, so the whole state machine can be driven synchronously.

use std::fmt::Display;

use serde::Serialize;
use uuid::Uuid;

use crate::error::SupplyError;
use crate::fallback::fallback_cards;
use crate::types::Flashcard;

/// Cards requested per generator call.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Replenish once the cursor is this close to the end of the deck.
pub const PREFETCH_MARGIN: usize = 2;

/// Progress of the one-time initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Pending,
    Loading,
    Ready,
}

/// Why the supply fell back to the static deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradedReason {
    /// The generator answered with no cards.
    EmptyBatch,
    /// The generator call failed outright.
    GeneratorFailed { message: String },
}

impl DegradedReason {
    /// Banner text shown while running on the static deck.
    pub fn banner(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "AI Generation failed. Using offline mode.",
            Self::GeneratorFailed { .. } => "Network error. Using offline mode.",
        }
    }
}

/// A generator call the caller must perform on behalf of the supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub session_id: Uuid,
    pub count: usize,
}

/// Result of feeding a replenishment outcome back into the supply.
#[derive(Debug, PartialEq, Eq)]
pub enum Replenishment<E> {
    /// Cards were appended to the deck.
    Appended(usize),
    /// The generator succeeded but returned nothing.
    Empty,
    /// The generator failed; the deck is unchanged.
    Failed(E),
    /// The request was issued by a different session and was dropped.
    Stale,
}

/// Ordered, append-only deck with a wrapping cursor.
#[derive(Debug, Clone)]
pub struct CardSupply {
    session_id: Uuid,
    batch_size: usize,
    cards: Vec<Flashcard>,
    position: usize,
    phase: LoadPhase,
    replenishing: bool,
    degraded: Option<DegradedReason>,
}

impl Default for CardSupply {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl CardSupply {
    pub fn new(batch_size: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            batch_size: batch_size.max(1),
            cards: Vec::new(),
            position: 0,
            phase: LoadPhase::Pending,
            replenishing: false,
            degraded: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_replenishing(&self) -> bool {
        self.replenishing
    }

    pub fn degraded(&self) -> Option<&DegradedReason> {
        self.degraded.as_ref()
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.position)
    }

    /// Start the initial load. Only valid once per supply.
    pub fn begin_initial_load(&mut self) -> Result<BatchRequest, SupplyError> {
        if self.phase != LoadPhase::Pending {
            return Err(SupplyError::AlreadyLoaded);
        }
        self.phase = LoadPhase::Loading;
        Ok(self.request())
    }

    /// Install the initial batch, or the static deck if the generator let us
    /// down. Returns the degraded reason when falling back.
    pub fn finish_initial_load<E: Display>(
        &mut self,
        request: &BatchRequest,
        outcome: Result<Vec<Flashcard>, E>,
    ) -> Result<Option<DegradedReason>, SupplyError> {
        if request.session_id != self.session_id {
            return Err(SupplyError::StaleRequest {
                session_id: request.session_id,
            });
        }
        if self.phase != LoadPhase::Loading {
            return Err(SupplyError::NotLoading);
        }

        let reason = match outcome {
            Ok(cards) if !cards.is_empty() => {
                self.cards = cards;
                None
            }
            Ok(_) => Some(DegradedReason::EmptyBatch),
            Err(e) => Some(DegradedReason::GeneratorFailed {
                message: e.to_string(),
            }),
        };

        if reason.is_some() {
            self.cards = fallback_cards();
        }
        self.position = 0;
        self.degraded = reason.clone();
        self.phase = LoadPhase::Ready;
        Ok(reason)
    }

    /// Claim a replenishment slot when the cursor is near the end of the deck.
    ///
    /// Returns `None` when not close enough, when the deck is empty or not yet
    /// loaded, or when a replenishment is already outstanding.
    pub fn ensure_ahead(&mut self) -> Option<BatchRequest> {
        if self.phase != LoadPhase::Ready || self.replenishing || self.cards.is_empty() {
            return None;
        }
        if self.position + PREFETCH_MARGIN < self.cards.len() {
            return None;
        }
        self.replenishing = true;
        Some(self.request())
    }

    /// Feed a replenishment outcome back. Releases the in-flight slot.
    pub fn finish_replenishment<E>(
        &mut self,
        request: &BatchRequest,
        outcome: Result<Vec<Flashcard>, E>,
    ) -> Replenishment<E> {
        if request.session_id != self.session_id {
            return Replenishment::Stale;
        }
        self.replenishing = false;

        match outcome {
            Ok(cards) if cards.is_empty() => Replenishment::Empty,
            Ok(cards) => {
                let count = cards.len();
                self.cards.extend(cards);
                Replenishment::Appended(count)
            }
            Err(e) => Replenishment::Failed(e),
        }
    }

    /// Move the cursor forward, wrapping at the end of the deck.
    pub fn advance(&mut self) {
        if !self.cards.is_empty() {
            self.position = (self.position + 1) % self.cards.len();
        }
    }

    fn request(&self) -> BatchRequest {
        BatchRequest {
            session_id: self.session_id,
            count: self.batch_size,
        }
    }
}
