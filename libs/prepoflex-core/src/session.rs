//! Quiz session: scoring and the per-card answer state.

use serde::Serialize;

use crate::error::SessionError;
use crate::supply::CardSupply;
use crate::types::{Flashcard, GameState, Preposition};

/// Points for any correct answer.
pub const BASE_POINTS: u32 = 10;

/// Extra points per step of the streak reached by a correct answer.
pub const STREAK_BONUS: u32 = 2;

/// Answer state of the current card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnswerState {
    #[default]
    Unanswered,
    Answered {
        selected: Preposition,
        correct: bool,
    },
}

impl AnswerState {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }
}

/// What the player sees after a scored answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub selected: Preposition,
    pub correct: bool,
    pub correct_preposition: Preposition,
    pub points_awarded: u32,
    pub headline: &'static str,
    pub explanation: String,
    pub translation: String,
    /// The sentence with the correct preposition filled in.
    pub completed_sentence: String,
    pub continue_label: &'static str,
}

impl Feedback {
    pub fn new(
        card: &Flashcard,
        selected: Preposition,
        correct: bool,
        points_awarded: u32,
    ) -> Self {
        Self {
            selected,
            correct,
            correct_preposition: card.correct_preposition(),
            points_awarded,
            headline: if correct { "Excellent!" } else { "Not quite..." },
            explanation: card.explanation().to_string(),
            translation: card.translation_english().to_string(),
            completed_sentence: card.completed_sentence(),
            continue_label: if correct { "Continue" } else { "Try Next" },
        }
    }
}

impl GameState {
    /// Apply one answer and return the points awarded.
    pub fn record(&mut self, correct: bool) -> u32 {
        let points = if correct {
            self.streak += 1;
            BASE_POINTS + STREAK_BONUS * self.streak
        } else {
            self.streak = 0;
            0
        };
        self.score += points;
        self.high_score = self.high_score.max(self.score);
        points
    }
}

/// One player's run through the deck.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    supply: CardSupply,
    game: GameState,
    answer: AnswerState,
}

impl QuizSession {
    pub fn new(supply: CardSupply) -> Self {
        Self {
            supply,
            game: GameState::default(),
            answer: AnswerState::Unanswered,
        }
    }

    pub fn supply(&self) -> &CardSupply {
        &self.supply
    }

    pub fn supply_mut(&mut self) -> &mut CardSupply {
        &mut self.supply
    }

    pub fn game(&self) -> GameState {
        self.game
    }

    pub fn answer(&self) -> AnswerState {
        self.answer
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.supply.current()
    }

    /// Record an answer for the current card.
    ///
    /// Returns `Ok(None)` if the card was already answered; the game state is
    /// left untouched in that case.
    pub fn submit_answer(
        &mut self,
        selected: Preposition,
    ) -> Result<Option<Feedback>, SessionError> {
        if self.answer.is_answered() {
            return Ok(None);
        }
        let card = self.supply.current().ok_or(SessionError::NoCurrentCard)?;
        let correct = card.correct_preposition() == selected;

        self.answer = AnswerState::Answered { selected, correct };
        let points = self.game.record(correct);

        Ok(Some(Feedback::new(card, selected, correct, points)))
    }

    /// Feedback for the current card, if it has been answered.
    pub fn feedback(&self) -> Option<Feedback> {
        match (self.answer, self.supply.current()) {
            (AnswerState::Answered { selected, correct }, Some(card)) => {
                let points = if correct {
                    BASE_POINTS + STREAK_BONUS * self.game.streak
                } else {
                    0
                };
                Some(Feedback::new(card, selected, correct, points))
            }
            _ => None,
        }
    }

    /// Clear the answer and move to the next card.
    pub fn advance_card(&mut self) {
        self.answer = AnswerState::Unanswered;
        self.supply.advance();
    }
}
