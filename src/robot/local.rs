//! Console-grade stand-ins for the robot's edges, for playing the game
//! without hardware: TTS through the system `say` command, hearing and
//! target-word entry through stdin lines, gestures as log output.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::robot::{BehaviorBackend, HearingStream, SpeechSynth, TerminalInput};
use crate::speech::normalize::RawUtterance;

/// Speaks through a local TTS command (`say` on macOS). Waits for the
/// process so lines do not talk over each other.
pub struct SayCommandSpeech {
    command: String,
}

impl SayCommandSpeech {
    pub fn new() -> Self {
        Self {
            command: "say".to_string(),
        }
    }

    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for SayCommandSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynth for SayCommandSpeech {
    async fn say(&self, text: &str) -> Result<()> {
        let status = tokio::process::Command::new(&self.command)
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await
            .with_context(|| format!("failed to spawn '{}'", self.command))?;
        if !status.success() {
            return Err(anyhow!("'{}' exited with {status}", self.command));
        }
        Ok(())
    }
}

/// Gestures on a console have no motors; playback is a log line and the
/// capability set is the stock Blockly catalogue, so resolution behaves as
/// it would on the robot.
pub struct ConsoleBehaviors;

#[async_trait]
impl BehaviorBackend for ConsoleBehaviors {
    async fn play(&self, behavior: &str) -> Result<()> {
        info!("[GESTURE] {behavior}");
        Ok(())
    }

    async fn list_behaviors(&self) -> Result<Vec<String>> {
        Ok([
            "BlocklyWaveRightArm",
            "BlocklyStand",
            "BlocklyBow",
            "BlocklyLookAtChild",
            "BlocklyLookingUp",
            "BlocklyShrug",
            "BlocklyTouchHead",
            "BlocklyApplause",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect())
    }
}

/// One stdin pump serving both the "microphone" (typed utterances) and the
/// director round's target-word entry. The session is strictly sequential,
/// so the two consumers never race for lines.
pub struct ConsoleInput {
    buffer: Arc<Mutex<Vec<RawUtterance>>>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
            cancel: Mutex::new(None),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HearingStream for ConsoleInput {
    async fn start(&self) -> Result<()> {
        let token = CancellationToken::new();
        let child = token.child_token();
        let buffer = Arc::clone(&self.buffer);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    line = lines.next_line() => {
                        match line {
                            Ok(Some(line)) => {
                                if let Ok(mut buf) = buffer.lock() {
                                    buf.push(RawUtterance::Text(line));
                                }
                            }
                            _ => break, // stdin closed
                        }
                    }
                }
            }
        });
        if let Ok(mut slot) = self.cancel.lock() {
            *slot = Some(token);
        }
        info!("console hearing started (type instead of talking)");
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        if let Ok(mut slot) = self.cancel.lock() {
            if let Some(token) = slot.take() {
                token.cancel();
            }
        }
        Ok(())
    }

    fn drain(&self) -> Vec<RawUtterance> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }
}

#[async_trait]
impl TerminalInput for ConsoleInput {
    async fn read_line(&self) -> Result<String> {
        loop {
            let mut captured = self.drain();
            if let Some(RawUtterance::Text(line)) = captured.pop() {
                return Ok(line);
            }
            sleep(Duration::from_millis(100)).await;
        }
    }
}
