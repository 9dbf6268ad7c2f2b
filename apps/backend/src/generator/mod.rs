//! Card generators: the capability the quiz uses to obtain new cards.

pub mod gemini;

use async_trait::async_trait;
use prepoflex_core::Flashcard;
use thiserror::Error;

pub use gemini::GeminiGenerator;

/// Generator errors.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Generator API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generator error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Generator returned no content")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Produces batches of flashcards.
///
/// An empty batch is a valid answer; callers decide what it means.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    async fn generate(&self, count: usize) -> Result<Vec<Flashcard>, GeneratorError>;
}
