//! Static deck used when the generator is unavailable.

use crate::types::{Flashcard, Preposition, GAP_MARKER};

struct FallbackEntry {
    verb: &'static str,
    before: &'static str,
    after: &'static str,
    preposition: Preposition,
    translation: &'static str,
    explanation: &'static str,
}

const FALLBACK_DECK: [FallbackEntry; 5] = [
    FallbackEntry {
        verb: "Essayer",
        before: "J'essaie ",
        after: " comprendre la situation.",
        preposition: Preposition::De,
        translation: "I am trying to understand the situation.",
        explanation: "'Essayer de' is the standard construction when followed by an infinitive.",
    },
    FallbackEntry {
        verb: "Aider",
        before: "Elle aide son frère ",
        after: " faire ses devoirs.",
        preposition: Preposition::A,
        translation: "She helps her brother do his homework.",
        explanation: "'Aider qqn à faire qqch' (To help someone do something) always uses 'à'.",
    },
    FallbackEntry {
        verb: "Décider",
        before: "Il a décidé ",
        after: " partir tôt.",
        preposition: Preposition::De,
        translation: "He decided to leave early.",
        explanation: "'Décider de' is used when making a decision to do something.",
    },
    FallbackEntry {
        verb: "Réussir",
        before: "Tu as réussi ",
        after: " finir le projet.",
        preposition: Preposition::A,
        translation: "You succeeded in finishing the project.",
        explanation: "'Réussir à' means to succeed in doing something.",
    },
    FallbackEntry {
        verb: "Refuser",
        before: "Ils refusent ",
        after: " manger des légumes.",
        preposition: Preposition::De,
        translation: "They refuse to eat vegetables.",
        explanation: "'Refuser de' is used to express refusal to perform an action.",
    },
];

/// The five hard-coded cards, ids `fallback-1` to `fallback-5`.
pub fn fallback_cards() -> Vec<Flashcard> {
    FALLBACK_DECK
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Flashcard::from_parts(
                format!("fallback-{}", i + 1),
                entry.verb,
                format!("{}{}{}", entry.before, GAP_MARKER, entry.after),
                entry.preposition,
                entry.translation,
                entry.explanation,
            )
        })
        .collect()
}
