use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wow::config::ListenTuning;
use wow::robot::HearingStream;
use wow::speech::listener::{SpeechListener, UtteranceSource};
use wow::speech::normalize::{normalize, RawField, RawUtterance};

/// Each `drain` call pops the next scripted batch; an exhausted script
/// behaves like a silent room.
struct ScriptedHearing {
    batches: Mutex<VecDeque<Vec<RawUtterance>>>,
    drains: Mutex<usize>,
}

impl ScriptedHearing {
    fn new(batches: Vec<Vec<RawUtterance>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            drains: Mutex::new(0),
        })
    }

    fn drain_count(&self) -> usize {
        *self.drains.lock().unwrap()
    }
}

#[async_trait]
impl HearingStream for ScriptedHearing {
    async fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn drain(&self) -> Vec<RawUtterance> {
        *self.drains.lock().unwrap() += 1;
        self.batches.lock().unwrap().pop_front().unwrap_or_default()
    }
}

fn fast_tuning() -> ListenTuning {
    ListenTuning {
        grace_period: Duration::from_millis(10),
        poll_interval: Duration::from_millis(10),
        ..ListenTuning::default()
    }
}

fn text(s: &str) -> RawUtterance {
    RawUtterance::Text(s.to_string())
}

#[tokio::test(start_paused = true)]
async fn silent_stream_times_out_with_empty_string() {
    let hearing = ScriptedHearing::new(vec![]);
    let listener = SpeechListener::new(hearing.clone(), fast_tuning());
    let heard = listener.listen(Duration::from_millis(50), &[]).await;
    assert_eq!(heard, "");
    assert!(
        hearing.drain_count() >= 3,
        "entry clear, post-grace clear, and at least one poll"
    );
}

#[tokio::test(start_paused = true)]
async fn stale_words_before_the_call_never_surface() {
    // First two drains are the entry and post-grace clears; the stale
    // capture lands in the first, the real one arrives during polling.
    let hearing = ScriptedHearing::new(vec![
        vec![text("stale from last turn")],
        vec![],
        vec![text("pizza")],
    ]);
    let listener = SpeechListener::new(hearing, fast_tuning());
    let heard = listener.listen(Duration::from_millis(100), &[]).await;
    assert_eq!(heard, "pizza");
}

#[tokio::test(start_paused = true)]
async fn echo_of_the_prompt_is_rejected_and_polling_continues() {
    let hearing = ScriptedHearing::new(vec![
        vec![],
        vec![],
        vec![text("Do you want another hint?")],
        // The post-echo clear lands here.
        vec![],
        vec![text("yes please")],
    ]);
    let listener = SpeechListener::new(hearing, fast_tuning());
    let ignore = vec!["Do you want another hint?".to_string()];
    let heard = listener.listen(Duration::from_millis(200), &ignore).await;
    assert_eq!(heard, "yes please", "echo must not end the listen");
}

#[tokio::test(start_paused = true)]
async fn most_recent_capture_wins() {
    let hearing = ScriptedHearing::new(vec![
        vec![],
        vec![],
        vec![text("first half"), text("second half")],
    ]);
    let listener = SpeechListener::new(hearing, fast_tuning());
    let heard = listener.listen(Duration::from_millis(100), &[]).await;
    assert_eq!(heard, "second half");
}

#[tokio::test(start_paused = true)]
async fn blank_capture_resolves_to_nothing_heard() {
    let hearing = ScriptedHearing::new(vec![vec![], vec![], vec![text("   ")]]);
    let listener = SpeechListener::new(hearing, fast_tuning());
    let heard = listener.listen(Duration::from_millis(100), &[]).await;
    assert_eq!(heard, "");
}

#[tokio::test(start_paused = true)]
async fn scored_sequences_normalize_to_their_transcript() {
    let hearing = ScriptedHearing::new(vec![
        vec![],
        vec![],
        vec![RawUtterance::Sequence(vec![
            RawField::Confidence(0.92),
            RawField::Text("piano".to_string()),
        ])],
    ]);
    let listener = SpeechListener::new(hearing, fast_tuning());
    let heard = listener.listen(Duration::from_millis(100), &[]).await;
    assert_eq!(heard, "piano");
}

#[test]
fn normalize_handles_all_recognizer_shapes() {
    assert_eq!(normalize(None), "");
    assert_eq!(normalize(Some(RawUtterance::text("hello"))), "hello");
    // Bare text passes through unmodified.
    assert_eq!(normalize(Some(RawUtterance::text("  padded  "))), "  padded  ");
    // First non-empty text fragment wins.
    assert_eq!(
        normalize(Some(RawUtterance::Sequence(vec![
            RawField::Text("  ".to_string()),
            RawField::Text("bicycle".to_string()),
            RawField::Text("noise".to_string()),
        ]))),
        "bicycle"
    );
    // No usable text: the first field is stringified.
    assert_eq!(
        normalize(Some(RawUtterance::Sequence(vec![RawField::Confidence(0.5)]))),
        "0.5"
    );
    assert_eq!(normalize(Some(RawUtterance::Sequence(vec![]))), "");
}
