//! API request and response types

use serde::{Deserialize, Serialize};

pub use prepoflex_core::{Feedback, Flashcard, GameState, Preposition};
use prepoflex_core::{LoadPhase, QuizSession};

/// Coarse state of the session, as the UI needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Initial load still running.
    Loading,
    /// A card is ready to be shown.
    Ready,
    /// Loaded but no card is available; the UI offers a reload.
    Empty,
}

/// The card as shown to the player. The answer is only revealed once given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub id: String,
    pub verb: String,
    pub sentence_before: String,
    pub sentence_after: String,
    pub choices: Vec<Preposition>,
    pub revealed: Option<Preposition>,
}

impl CardView {
    pub fn new(card: &Flashcard, answered: bool) -> Self {
        let (before, after) = card.sentence_parts();
        Self {
            id: card.id().to_string(),
            verb: card.verb().to_string(),
            sentence_before: before.to_string(),
            sentence_after: after.to_string(),
            choices: Preposition::ALL.to_vec(),
            revealed: answered.then(|| card.correct_preposition()),
        }
    }
}

/// GET /api/quiz response, also returned by every mutating endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSnapshot {
    pub status: SessionStatus,
    pub offline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_reason: Option<String>,
    pub card: Option<CardView>,
    pub answer: Option<Feedback>,
    pub game: GameState,
    pub position: usize,
    pub card_count: usize,
    pub fetching_more: bool,
}

impl QuizSnapshot {
    pub fn from_session(session: &QuizSession) -> Self {
        let supply = session.supply();
        let status = match (supply.phase(), supply.current()) {
            (LoadPhase::Pending | LoadPhase::Loading, _) => SessionStatus::Loading,
            (LoadPhase::Ready, Some(_)) => SessionStatus::Ready,
            (LoadPhase::Ready, None) => SessionStatus::Empty,
        };
        let answered = session.answer().is_answered();

        Self {
            status,
            offline: supply.degraded().is_some(),
            offline_reason: supply.degraded().map(|r| r.banner().to_string()),
            card: session.current_card().map(|c| CardView::new(c, answered)),
            answer: session.feedback(),
            game: session.game(),
            position: supply.position(),
            card_count: supply.len(),
            fetching_more: supply.is_replenishing(),
        }
    }
}

/// POST /api/quiz/answer request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub preposition: Preposition,
}
