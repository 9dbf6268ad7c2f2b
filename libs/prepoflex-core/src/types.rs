//! Core types for the preposition quiz.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardError;

/// Placeholder standing in for the missing preposition in a sentence.
pub const GAP_MARKER: &str = "___";

/// The two prepositions a card can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preposition {
    #[serde(rename = "à")]
    A,
    #[serde(rename = "de")]
    De,
}

impl Preposition {
    /// Both choices, in the order they are offered.
    pub const ALL: [Preposition; 2] = [Preposition::A, Preposition::De];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "à",
            Self::De => "de",
        }
    }
}

impl fmt::Display for Preposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preposition {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "à" => Ok(Self::A),
            "de" => Ok(Self::De),
            _ => Err(CardError::UnknownPreposition {
                value: s.to_string(),
            }),
        }
    }
}

/// Card content as produced by a generator, before an id is assigned.
///
/// Field names follow the generator's JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlashcard {
    pub verb: String,
    pub sentence_french: String,
    pub correct_preposition: String,
    pub translation_english: String,
    pub explanation: String,
}

/// A validated quiz item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    id: String,
    verb: String,
    sentence_french: String,
    correct_preposition: Preposition,
    translation_english: String,
    explanation: String,
}

impl Flashcard {
    /// Build a card, checking that the sentence holds exactly one gap.
    pub fn new(id: impl Into<String>, raw: RawFlashcard) -> Result<Self, CardError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CardError::EmptyField { field: "id" });
        }
        if raw.verb.trim().is_empty() {
            return Err(CardError::EmptyField { field: "verb" });
        }
        if raw.sentence_french.trim().is_empty() {
            return Err(CardError::EmptyField {
                field: "sentence_french",
            });
        }

        match raw.sentence_french.matches(GAP_MARKER).count() {
            1 => {}
            0 => {
                return Err(CardError::MissingGap {
                    sentence: raw.sentence_french,
                })
            }
            count => {
                return Err(CardError::MultipleGaps {
                    sentence: raw.sentence_french,
                    count,
                })
            }
        }

        let correct_preposition = raw.correct_preposition.parse()?;

        Ok(Self {
            id,
            verb: raw.verb,
            sentence_french: raw.sentence_french,
            correct_preposition,
            translation_english: raw.translation_english,
            explanation: raw.explanation,
        })
    }

    /// Build a card from trusted parts without validation.
    pub(crate) fn from_parts(
        id: String,
        verb: &str,
        sentence_french: String,
        correct_preposition: Preposition,
        translation_english: &str,
        explanation: &str,
    ) -> Self {
        Self {
            id,
            verb: verb.to_string(),
            sentence_french,
            correct_preposition,
            translation_english: translation_english.to_string(),
            explanation: explanation.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn sentence_french(&self) -> &str {
        &self.sentence_french
    }

    pub fn correct_preposition(&self) -> Preposition {
        self.correct_preposition
    }

    pub fn translation_english(&self) -> &str {
        &self.translation_english
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Text before and after the gap.
    pub fn sentence_parts(&self) -> (&str, &str) {
        // Construction guarantees exactly one marker.
        self.sentence_french
            .split_once(GAP_MARKER)
            .unwrap_or((self.sentence_french.as_str(), ""))
    }

    /// The sentence with the correct preposition filled in.
    pub fn completed_sentence(&self) -> String {
        let (before, after) = self.sentence_parts();
        format!("{}{}{}", before, self.correct_preposition, after)
    }
}

/// Score, streak and best score for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    pub streak: u32,
    pub high_score: u32,
}
