//! Keyword-level intent parsing. Deliberately not NLU: role names match as
//! substrings (long and unambiguous), while the short yes/no/stop keyword
//! sets match whole words only, so "nonetheless" never reads as "no".

use crate::intent::types::{ReplayChoice, RoleChoice};

const YES_WORDS: &[&str] = &[
    "yes", "yeah", "yep", "sure", "ok", "okay", "more", "hint", "another",
];
const NO_WORDS: &[&str] = &["no", "nope", "nah", "stop", "quit", "enough", "exit"];
const STOP_WORDS: &[&str] = &["stop", "quit", "exit", "leave", "end"];

fn contains_whole_word(text: &str, words: &[&str]) -> bool {
    let normalized = text.to_lowercase();
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| words.contains(&token))
}

/// Director cues are checked before matcher cues, so an utterance containing
/// both ("I'd rather direct than guess") resolves to director.
pub fn parse_role_choice(text: &str) -> Option<RoleChoice> {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();
    if normalized.contains("director")
        || normalized.contains("direct")
        || normalized.contains("leader")
    {
        return Some(RoleChoice::Director);
    }
    if normalized.contains("matcher")
        || normalized.contains("match")
        || normalized.contains("guesser")
        || normalized.contains("guess")
    {
        return Some(RoleChoice::Matcher);
    }
    None
}

pub fn wants_more_hint(text: &str) -> bool {
    contains_whole_word(text, YES_WORDS)
}

pub fn wants_no_hint(text: &str) -> bool {
    contains_whole_word(text, NO_WORDS)
}

/// Checked first at every listen point, so the human can abort the session
/// from any prompt.
pub fn wants_to_stop(text: &str) -> bool {
    contains_whole_word(text, STOP_WORDS)
}

pub fn parse_replay_choice(text: &str) -> Option<ReplayChoice> {
    let normalized = text.trim();
    if normalized.is_empty() {
        return None;
    }
    if wants_no_hint(normalized) {
        return Some(ReplayChoice::Stop);
    }
    parse_role_choice(normalized).map(ReplayChoice::Role)
}
