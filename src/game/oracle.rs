use async_trait::async_trait;

/// A guess and how sure the generator is about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Guess {
    pub word: String,
    /// 0.0 - 1.0. Drives the ask-for-another-hint vs commit decision.
    pub confidence: f32,
}

/// The language-model edge of the game: describing a secret word and
/// guessing one from accumulated hints. Implementations recover from
/// malformed model output themselves; only transport failures surface.
#[async_trait]
pub trait WordOracle: Send + Sync {
    /// A short gesture-tagged description of `word` that avoids saying it
    /// and avoids repeating any of `prior_hints`.
    async fn describe(&self, word: &str, prior_hints: &[String]) -> anyhow::Result<String>;

    /// The single word best matching the full ordered hint list.
    async fn guess(&self, hints: &[String]) -> anyhow::Result<Guess>;
}
