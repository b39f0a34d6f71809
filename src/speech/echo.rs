use std::collections::VecDeque;

use crate::config::EchoTuning;

/// True if `heard` is likely the robot's own synthesized voice leaking back
/// through the microphone, judged against the phrases the robot most
/// recently spoke.
///
/// Comparison is case-insensitive and trimmed. Three rules:
/// 1. exact match with a recent phrase;
/// 2. a recent phrase is embedded in the capture and the capture is not much
///    longer (the prompt plus a little noise);
/// 3. the capture is embedded in a recent phrase, not much shorter, and long
///    enough that it cannot be a short valid answer ("yes", "no") that
///    merely appears inside the prompt text.
///
/// An empty capture or an empty phrase set is never echo; that is the
/// no-input case and is handled upstream as a timeout.
pub fn is_self_echo(heard: &str, recent_phrases: &[String], tuning: &EchoTuning) -> bool {
    let h = heard.trim().to_lowercase();
    if h.is_empty() || recent_phrases.is_empty() {
        return false;
    }
    for phrase in recent_phrases {
        let p = phrase.trim().to_lowercase();
        if p.is_empty() {
            continue;
        }
        if h == p {
            return true;
        }
        if h.contains(&p) && h.len() - p.len() < tuning.max_len_delta {
            return true;
        }
        if p.contains(&h) && p.len() - h.len() < tuning.max_len_delta && h.len() >= tuning.min_echo_len
        {
            return true;
        }
    }
    false
}

/// Bounded log of what the robot most recently said: the active prompt and
/// recent error lines. The controller pushes into this on every spoken line,
/// and every listen call reads it, so the echo filter always sees the phrase
/// spoken immediately before the listen began.
#[derive(Debug, Default)]
pub struct PhraseLog {
    entries: VecDeque<String>,
    cap: usize,
}

impl PhraseLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, phrase: impl Into<String>) {
        let phrase = phrase.into();
        if phrase.trim().is_empty() {
            return;
        }
        self.entries.push_back(phrase);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub fn recent(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
