//! Gemini-backed card generator.

use async_trait::async_trait;
use chrono::Utc;
use prepoflex_core::{Flashcard, RawFlashcard};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{CardGenerator, GeneratorError};
use crate::config::Config;

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Generator that asks Gemini for cards as structured JSON.
pub struct GeminiGenerator {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(config: &Config) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(config.generator_timeout)
            .build()
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl CardGenerator for GeminiGenerator {
    async fn generate(&self, count: usize) -> Result<Vec<Flashcard>, GeneratorError> {
        let api_key = self.api_key.as_deref().ok_or(GeneratorError::MissingApiKey)?;

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_request(count))
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GeneratorError::Backend { status, message });
        }

        let response: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GeneratorError::Parse(e.to_string()))?;

        let text = response_text(response).ok_or(GeneratorError::EmptyResponse)?;
        let cards = parse_cards(&text, Utc::now().timestamp_millis())?;

        tracing::debug!("Gemini returned {} of {} requested cards", cards.len(), count);
        Ok(cards)
    }
}

fn prompt(count: usize) -> String {
    format!(
        "Generate {count} distinct French flashcards for verbs that take either the preposition \"à\" or \"de\" before an infinitive.\n\
         Do not include the preposition in the sentence; replace it with \"___\".\n\
         Ensure a mix of common and intermediate verbs.\n\
         The output must be a JSON array."
    )
}

fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "verb": {
                    "type": "STRING",
                    "description": "The french verb in its infinitive form (e.g. 'Aider')"
                },
                "sentenceFrench": {
                    "type": "STRING",
                    "description": "A sentence using the verb with the preposition missing, marked by '___'."
                },
                "correctPreposition": {
                    "type": "STRING",
                    "enum": ["à", "de"],
                    "description": "The correct preposition."
                },
                "translationEnglish": {
                    "type": "STRING",
                    "description": "English translation of the full sentence."
                },
                "explanation": {
                    "type": "STRING",
                    "description": "A brief grammatical explanation of why this preposition is used."
                }
            },
            "required": ["verb", "sentenceFrench", "correctPreposition", "translationEnglish", "explanation"]
        }
    })
}

fn build_request(count: usize) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt(count)),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

/// Concatenated text of the first candidate, if it has any.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the JSON array of generated cards, assigning `gen-<stamp>-<index>` ids.
///
/// Items that fail validation are skipped.
fn parse_cards(text: &str, stamp: i64) -> Result<Vec<Flashcard>, GeneratorError> {
    let raw: Vec<RawFlashcard> =
        serde_json::from_str(text).map_err(|e| GeneratorError::Parse(e.to_string()))?;

    let cards = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            match Flashcard::new(format!("gen-{}-{}", stamp, index), item) {
                Ok(card) => Some(card),
                Err(e) => {
                    tracing::warn!("Skipping generated card {}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    Ok(cards)
}
