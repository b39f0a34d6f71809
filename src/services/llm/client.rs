use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::oracle::{Guess, WordOracle};
use crate::gestures::GESTURE_MAP;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20)) // Hard timeout at the network level
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("generator error: {}", response.status()));
        }

        let resp_json: GenerateResponse = response.json().await?;
        let text = resp_json
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        Ok(text.trim().to_string())
    }
}

/// Strip a markdown code fence the model sometimes wraps JSON in.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let inner = trimmed.trim_matches('`').trim();
    inner.strip_prefix("json").map(str::trim).unwrap_or(inner)
}

/// Recover a guess from whatever the model returned. JSON first; otherwise
/// the first line of raw text with zero confidence, so a round can always
/// proceed with some guess.
pub fn parse_guess(raw: &str) -> Guess {
    let candidate = strip_fences(raw);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(candidate) {
        let word = value
            .get("guess")
            .and_then(|g| g.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();
        let confidence = match value.get("confidence") {
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        };
        if !word.is_empty() {
            return Guess {
                word,
                confidence: (confidence as f32).clamp(0.0, 1.0),
            };
        }
    }
    Guess {
        word: raw.lines().next().unwrap_or_default().trim().to_string(),
        confidence: 0.0,
    }
}

fn gesture_tag_list() -> String {
    GESTURE_MAP
        .iter()
        .map(|(key, _)| format!("[{key}]"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl WordOracle for GeminiClient {
    async fn describe(&self, word: &str, prior_hints: &[String]) -> Result<String> {
        let mut prompt = format!(
            "You are a social robot playing a guessing game.\n\
             Target word: \"{word}\".\n\
             1. Describe it without saying the word.\n\
             2. Use gesture tags like {}.\n\
             3. Keep it very short.\n",
            gesture_tag_list()
        );
        if !prior_hints.is_empty() {
            prompt.push_str("Do not repeat these earlier descriptions:\n");
            for hint in prior_hints {
                prompt.push_str(&format!("- {hint}\n"));
            }
        }
        let text = self.generate(prompt).await?;
        Ok(text.replace('\n', " "))
    }

    async fn guess(&self, hints: &[String]) -> Result<Guess> {
        let described = hints
            .iter()
            .map(|hint| format!("- {hint}"))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "You are the matcher in a guessing game.\n\
             Guess the single word that best matches these descriptions, given in order:\n\
             {described}\n\
             Respond in JSON with keys: guess (string), confidence (0 to 1)."
        );
        let raw = self.generate(prompt).await?;
        let guess = parse_guess(&raw);
        debug!(word = %guess.word, confidence = guess.confidence, "parsed guess");
        Ok(guess)
    }
}
