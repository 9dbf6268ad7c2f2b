//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use prepoflex_backend::models::Flashcard;
use prepoflex_core::RawFlashcard;

/// Build one card whose answer is `preposition`.
pub fn card(id: &str, preposition: &str) -> Flashcard {
    Flashcard::new(
        id,
        RawFlashcard {
            verb: "Commencer".to_string(),
            sentence_french: "Il commence ___ pleuvoir.".to_string(),
            correct_preposition: preposition.to_string(),
            translation_english: "It is starting to rain.".to_string(),
            explanation: "'Commencer à' is followed by an infinitive.".to_string(),
        },
    )
    .expect("fixture card is valid")
}

/// Generate a batch of cards answered by "à", ids `<prefix>-0` onwards.
pub fn batch(prefix: &str, n: usize) -> Vec<Flashcard> {
    (0..n).map(|i| card(&format!("{}-{}", prefix, i), "à")).collect()
}

/// Create an answer request body.
pub fn answer_request(preposition: &str) -> serde_json::Value {
    json!({ "preposition": preposition })
}
