use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use wow::gestures::GestureEngine;
use wow::robot::{BehaviorBackend, SpeechSynth};
use wow::speech::output::{sanitize, Voice};

struct RecordingSynth {
    lines: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSynth {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynth for RecordingSynth {
    async fn say(&self, text: &str) -> anyhow::Result<()> {
        self.lines.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(anyhow!("synthesizer offline"));
        }
        Ok(())
    }
}

struct RecordingBehaviors {
    played: Mutex<Vec<String>>,
}

impl RecordingBehaviors {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
        })
    }

    fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl BehaviorBackend for RecordingBehaviors {
    async fn play(&self, behavior: &str) -> anyhow::Result<()> {
        self.played.lock().unwrap().push(behavior.to_string());
        Ok(())
    }

    async fn list_behaviors(&self) -> anyhow::Result<Vec<String>> {
        Ok(vec!["BlocklyWaveRightArm".to_string()])
    }
}

fn voice_with(synth: Arc<RecordingSynth>, behaviors: Arc<RecordingBehaviors>) -> Voice {
    let engine = GestureEngine::with_capabilities(behaviors, &["BlocklyWaveRightArm"]);
    Voice::new(synth, engine, 8)
}

#[test]
fn sanitize_strips_quotes_and_collapses_whitespace() {
    assert_eq!(
        sanitize("  \"hello\"   there `friend'  "),
        "hello there friend"
    );
    assert_eq!(sanitize("line\none"), "line one");
}

#[tokio::test(start_paused = true)]
async fn say_delivers_sanitized_text() {
    let synth = RecordingSynth::new();
    let mut voice = voice_with(synth.clone(), RecordingBehaviors::new());
    voice.say("  \"My guess  is pizza.\"  ").await;
    assert_eq!(synth.lines(), vec!["My guess is pizza.".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn too_short_lines_are_dropped() {
    let synth = RecordingSynth::new();
    let mut voice = voice_with(synth.clone(), RecordingBehaviors::new());
    voice.say("a").await;
    voice.say("  '  ").await;
    assert!(synth.lines().is_empty());
    assert!(voice.recent_phrases().is_empty());
}

#[tokio::test(start_paused = true)]
async fn spoken_lines_land_in_the_phrase_log() {
    let synth = RecordingSynth::new();
    let mut voice = voice_with(synth.clone(), RecordingBehaviors::new());
    voice.say("Do you want another hint?").await;
    assert_eq!(
        voice.recent_phrases(),
        vec!["Do you want another hint?".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn synthesis_failure_is_swallowed() {
    let synth = RecordingSynth::failing();
    let mut voice = voice_with(synth.clone(), RecordingBehaviors::new());
    voice.say("Good game!").await;
    // The line was attempted and still logged for echo rejection.
    assert_eq!(synth.lines(), vec!["Good game!".to_string()]);
    assert_eq!(voice.recent_phrases(), vec!["Good game!".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn gesture_scripts_speak_segments_and_fire_known_tags() {
    let synth = RecordingSynth::new();
    let behaviors = RecordingBehaviors::new();
    let mut voice = voice_with(synth.clone(), behaviors.clone());
    voice
        .speak_with_gestures("You kick it [WAVE] across a field [JUMP] with your feet")
        .await;
    assert_eq!(
        synth.lines(),
        vec![
            "You kick it".to_string(),
            "across a field".to_string(),
            "with your feet".to_string(),
        ]
    );
    // WAVE resolved and played, JUMP skipped. Idle beats may add extra
    // plays, so only the wave is asserted.
    assert!(behaviors
        .played()
        .contains(&"BlocklyWaveRightArm".to_string()));
    assert!(voice
        .recent_phrases()
        .contains(&"across a field".to_string()));
}

#[tokio::test(start_paused = true)]
async fn prompt_lines_play_an_idle_gesture_first() {
    let synth = RecordingSynth::new();
    let behaviors = RecordingBehaviors::new();
    let mut voice = voice_with(synth.clone(), behaviors.clone());
    voice.say_prompt("Please describe the word.").await;
    assert_eq!(synth.lines(), vec!["Please describe the word.".to_string()]);
    assert_eq!(behaviors.played().len(), 1, "one idle motion before the line");
}
