use rand::seq::SliceRandom;
use rand::Rng;

/// The fixed vocabulary for matcher rounds.
pub const TARGET_WORDS: &[&str] = &["football", "bicycle", "pizza", "piano", "rainbow"];

/// Uniform pick, excluding the immediately previous word so two consecutive
/// matcher rounds never repeat. A single-entry list has no alternative and
/// is used as-is.
pub fn pick_target_word<R: Rng + ?Sized>(
    rng: &mut R,
    words: &[String],
    last_word: Option<&str>,
) -> Option<String> {
    let choices: Vec<&String> = words
        .iter()
        .filter(|word| Some(word.as_str()) != last_word)
        .collect();
    if choices.is_empty() {
        return words.choose(rng).cloned();
    }
    choices.choose(rng).map(|word| (*word).clone())
}
