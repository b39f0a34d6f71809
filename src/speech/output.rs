//! Spoken delivery. Lines are sanitized before synthesis, synthesis failures
//! degrade to a skipped line, and gesture-tagged scripts interleave motion
//! with speech without hard synchronization.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use rand::Rng;
use regex::Regex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::gestures::GestureEngine;
use crate::robot::SpeechSynth;
use crate::speech::echo::PhraseLog;

/// Pause after each plain spoken line.
const LINE_PAUSE: Duration = Duration::from_millis(300);
/// Settle time after an inline gesture tag fires.
const TAG_SETTLE: Duration = Duration::from_millis(500);
/// Chance of an idle motion after a spoken script segment.
const IDLE_CHANCE: f64 = 0.4;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"\[[A-Z_]+\]").expect("gesture tag pattern"))
}

fn tag_remnant_regex() -> &'static Regex {
    static REMNANT: OnceLock<Regex> = OnceLock::new();
    REMNANT.get_or_init(|| Regex::new(r"\[[^\]]*\]").expect("tag remnant pattern"))
}

/// Strip characters the synthesizer stumbles on and collapse whitespace.
pub fn sanitize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, PartialEq)]
enum ScriptPart {
    Speech(String),
    Tag(String),
}

fn split_script(script: &str) -> Vec<ScriptPart> {
    let normalized = script.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut parts = Vec::new();
    let mut cursor = 0;
    for m in tag_regex().find_iter(&normalized) {
        if m.start() > cursor {
            parts.push(ScriptPart::Speech(normalized[cursor..m.start()].to_string()));
        }
        // Inside the brackets is already [A-Z_]+ by construction.
        let tag = normalized[m.start() + 1..m.end() - 1].to_string();
        parts.push(ScriptPart::Tag(tag));
        cursor = m.end();
    }
    if cursor < normalized.len() {
        parts.push(ScriptPart::Speech(normalized[cursor..].to_string()));
    }
    parts
}

/// The robot's voice. Every line spoken through here lands in the phrase log
/// so the listener can reject echoes of it on the next turn.
pub struct Voice {
    synth: Arc<dyn SpeechSynth>,
    gestures: GestureEngine,
    log: PhraseLog,
}

impl Voice {
    pub fn new(synth: Arc<dyn SpeechSynth>, gestures: GestureEngine, log_cap: usize) -> Self {
        Self {
            synth,
            gestures,
            log: PhraseLog::new(log_cap),
        }
    }

    pub fn gestures(&self) -> &GestureEngine {
        &self.gestures
    }

    /// What the robot said most recently, for echo rejection.
    pub fn recent_phrases(&self) -> Vec<String> {
        self.log.recent()
    }

    async fn deliver(&mut self, text: &str) {
        info!("[TTS] {text}");
        self.log.push(text);
        if let Err(err) = self.synth.say(text).await {
            warn!("failed to speak: {err:#}");
        }
    }

    /// Speak one sanitized line. Too-short lines are dropped rather than
    /// handed to the synthesizer.
    pub async fn say(&mut self, text: &str) {
        let text = sanitize(text);
        if text.len() < 2 {
            debug!(%text, "skipped invalid line");
            return;
        }
        self.deliver(&text).await;
        sleep(LINE_PAUSE).await;
    }

    /// Speak with a gesture fired alongside; the gesture does not suspend
    /// the flow.
    pub async fn say_with_gesture(&mut self, text: &str, gesture: &str, fallback_key: Option<&str>) {
        self.gestures.play_detached(gesture, fallback_key);
        self.say(text).await;
    }

    /// An idle motion runs to completion first so the prompt is not cut off
    /// mid-gesture, then the line is spoken.
    pub async fn say_prompt(&mut self, text: &str) {
        self.gestures.play_idle().await;
        self.say(text).await;
    }

    /// Deliver a generator script containing inline `[TAG]` gesture marks.
    /// Recognized tags play with a short settle; unrecognized tags are
    /// dropped. Spoken segments pace by length instead of waiting on any
    /// motion still in flight.
    pub async fn speak_with_gestures(&mut self, script: &str) {
        for part in split_script(script) {
            match part {
                ScriptPart::Tag(tag) => {
                    if self.gestures.play_tag_detached(&tag) {
                        sleep(TAG_SETTLE).await;
                    }
                }
                ScriptPart::Speech(segment) => {
                    let raw_len = segment.len();
                    let clean = sanitize(&tag_remnant_regex().replace_all(&segment, " "));
                    if clean.len() < 2 {
                        continue;
                    }
                    self.deliver(&clean).await;
                    if rand::thread_rng().gen_bool(IDLE_CHANCE) {
                        self.gestures.play_idle().await;
                    }
                    let pause = (raw_len as f64 * 0.04).clamp(0.2, 1.2);
                    sleep(Duration::from_secs_f64(pause)).await;
                }
            }
        }
    }
}
