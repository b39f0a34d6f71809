use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::config::ListenTuning;
use crate::robot::HearingStream;
use crate::speech::echo::is_self_echo;
use crate::speech::normalize::normalize;

/// One settled utterance per call. Empty string means "nothing usable heard"
/// (timeout or an empty capture); that is an outcome, not an error.
#[async_trait]
pub trait UtteranceSource: Send + Sync {
    async fn listen(&self, timeout: Duration, ignore_phrases: &[String]) -> String;
}

/// Wraps the continuous hearing stream into discrete turn-taking captures.
///
/// Per call: drain whatever accumulated before the call, wait out the grace
/// period (so the robot's own speech finishes draining), drain again to shed
/// trailing echo, then poll. Echo-flagged captures clear the buffer and
/// polling continues; the timeout is measured from call start, so echo
/// rejections never stretch the budget. Never blocks longer than
/// timeout + grace.
pub struct SpeechListener {
    stream: Arc<dyn HearingStream>,
    tuning: ListenTuning,
}

impl SpeechListener {
    pub fn new(stream: Arc<dyn HearingStream>, tuning: ListenTuning) -> Self {
        Self { stream, tuning }
    }
}

#[async_trait]
impl UtteranceSource for SpeechListener {
    async fn listen(&self, timeout: Duration, ignore_phrases: &[String]) -> String {
        // Shed anything heard before this turn, including our own voice.
        let _ = self.stream.drain();

        sleep(self.tuning.grace_period).await;
        let _ = self.stream.drain();

        let started = Instant::now();
        loop {
            let captures = self.stream.drain();
            if captures.is_empty() {
                if started.elapsed() >= timeout {
                    info!("heard: (timeout)");
                    return String::new();
                }
                sleep(self.tuning.poll_interval).await;
                continue;
            }

            // The most recent capture is the settled one.
            let raw = captures.into_iter().last();
            let text = normalize(raw).trim().to_string();
            if is_self_echo(&text, ignore_phrases, &self.tuning.echo) {
                debug!(%text, "ignoring robot's own voice");
                let _ = self.stream.drain();
                if started.elapsed() >= timeout {
                    info!("heard: (timeout)");
                    return String::new();
                }
                sleep(self.tuning.poll_interval).await;
                continue;
            }

            info!(%text, "heard");
            return text;
        }
    }
}
