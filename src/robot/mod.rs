//! Contracts for the robot's I/O edges. The game core only ever talks to
//! these traits; the physical transport behind them is interchangeable.

pub mod local;

use async_trait::async_trait;

use crate::speech::normalize::RawUtterance;

/// Speech synthesis edge. One spoken line per call; the caller decides what
/// to do with failures (the game logs and moves on).
#[async_trait]
pub trait SpeechSynth: Send + Sync {
    async fn say(&self, text: &str) -> anyhow::Result<()>;
}

/// Behavior/motor playback edge.
#[async_trait]
pub trait BehaviorBackend: Send + Sync {
    /// Best-effort playback of a concrete behavior name.
    async fn play(&self, behavior: &str) -> anyhow::Result<()>;

    /// Capability query. Called once at session start.
    async fn list_behaviors(&self) -> anyhow::Result<Vec<String>>;
}

/// Continuous hearing edge. The recognizer accumulates words into an
/// internal buffer; the listener polls and drains it. The buffer is owned by
/// exactly one listener for the session, so no locking discipline beyond
/// drain-on-entry is required.
#[async_trait]
pub trait HearingStream: Send + Sync {
    async fn start(&self) -> anyhow::Result<()>;
    async fn stop(&self) -> anyhow::Result<()>;

    /// Take everything heard since the last drain, clearing the buffer.
    fn drain(&self) -> Vec<RawUtterance>;
}

/// Line entry at the terminal. The director round asks the human to type the
/// secret word so the robot cannot overhear it.
#[async_trait]
pub trait TerminalInput: Send + Sync {
    async fn read_line(&self) -> anyhow::Result<String>;
}
