use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing GOOGLE_API_KEY. Set it as an environment variable or add it to secrets.json."
    )]
    MissingApiKey,
    #[error("failed to read {path}: {source}")]
    SecretsUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    SecretsInvalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GOOGLE_API_KEY")]
    google_api_key: Option<String>,
}

/// Credentials for the external generators. Resolved once at startup; a
/// missing key is fatal before the interactive loop ever starts.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub google_api_key: String,
}

impl Credentials {
    /// Environment variable first, then a local `secrets.json`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("secrets.json")
    }

    pub fn load_from(secrets_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            if !key.is_empty() {
                return Ok(Self {
                    google_api_key: key,
                });
            }
        }

        let path = secrets_path.as_ref();
        if path.exists() {
            let display = path.display().to_string();
            let raw = std::fs::read_to_string(path).map_err(|source| {
                ConfigError::SecretsUnreadable {
                    path: display.clone(),
                    source,
                }
            })?;
            let secrets: SecretsFile =
                serde_json::from_str(&raw).map_err(|source| ConfigError::SecretsInvalid {
                    path: display,
                    source,
                })?;
            if let Some(key) = secrets.google_api_key {
                if !key.is_empty() {
                    return Ok(Self {
                        google_api_key: key,
                    });
                }
            }
        }

        Err(ConfigError::MissingApiKey)
    }
}

/// Echo-rejection thresholds. Tuned against a real robot in a real room;
/// do not change the defaults without re-testing in that environment.
#[derive(Debug, Clone, Copy)]
pub struct EchoTuning {
    /// Max length difference for a substring relation to still count as echo.
    pub max_len_delta: usize,
    /// Minimum heard length for the heard-inside-prompt rule, so short valid
    /// answers like "yes" or "no" are never suppressed.
    pub min_echo_len: usize,
}

impl Default for EchoTuning {
    fn default() -> Self {
        Self {
            max_len_delta: 20,
            min_echo_len: 12,
        }
    }
}

/// Listen-loop timing. Tests inject millisecond values. The inactivity
/// timeout itself is passed per listen call (see `GameTuning`).
#[derive(Debug, Clone, Copy)]
pub struct ListenTuning {
    /// Wait after a listen begins before accepting input, so trailing TTS
    /// audio drains instead of being captured.
    pub grace_period: Duration,
    pub poll_interval: Duration,
    pub echo: EchoTuning,
}

impl Default for ListenTuning {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(2),
            poll_interval: Duration::from_millis(500),
            echo: EchoTuning::default(),
        }
    }
}

/// Game-level budgets and thresholds.
#[derive(Debug, Clone, Copy)]
pub struct GameTuning {
    /// Inactivity budget for each listen, measured from call start.
    pub listen_timeout: Duration,
    /// Below this guess confidence the robot asks for another hint instead
    /// of committing an attempt.
    pub confidence_floor: f32,
    pub max_attempts: u8,
    pub max_hints: u8,
    /// How many recent robot lines the echo filter compares against.
    pub phrase_log_cap: usize,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(12),
            confidence_floor: 0.55,
            max_attempts: 3,
            max_hints: 3,
            phrase_log_cap: 8,
        }
    }
}
