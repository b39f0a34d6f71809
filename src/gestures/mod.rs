//! Symbolic gestures and their resolution onto whatever behaviors the
//! connected robot actually ships. The game core only speaks in symbolic
//! keys; playback is best-effort and never fails the game.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::robot::BehaviorBackend;

/// Script-taggable gestures the description generator may emit inline.
pub const GESTURE_MAP: &[(&str, &str)] = &[
    ("WAVE", "BlocklyWaveRightArm"),
    ("STAND", "BlocklyStand"),
    ("NOD", "BlocklyBow"),
    ("LOOK_DOWN", "BlocklyLookAtChild"),
];

pub const IDLE_GESTURES: &[&str] = &[
    "BlocklyLookAtChild",
    "BlocklyLookingUp",
    "BlocklyShrug",
    "BlocklyWaveRightArm",
];

pub const HEAD_SCRATCH: &str = "BlocklyTouchHead";
pub const SHAKE_HEAD: &str = "BlocklyShrug";
pub const CELEBRATE: &str = "BlocklyApplause";
pub const WAVE: &str = "BlocklyWaveRightArm";
pub const STAND: &str = "BlocklyStand";

/// Keyword fallbacks when the exact behavior name is not installed.
const FALLBACK_KEYWORDS: &[(&str, &[&str])] = &[
    ("HEAD_SCRATCH", &["touch", "head"]),
    ("SHAKE_HEAD", &["shrug"]),
    ("CELEBRATE", &["applause", "clap", "cheer", "dance"]),
    ("WAVE", &["wave"]),
    ("NOD", &["bow"]),
    ("LOOK_DOWN", &["look", "child", "down"]),
    ("STAND", &["stand", "standup", "stand_up"]),
];

pub fn behavior_for_tag(tag: &str) -> Option<&'static str> {
    GESTURE_MAP
        .iter()
        .find(|(key, _)| *key == tag)
        .map(|(_, behavior)| *behavior)
}

/// How a symbolic request mapped onto the robot's capability set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The requested behavior is installed as-is.
    Exact(String),
    /// A keyword-similar installed behavior stands in.
    Keyword(String),
    /// No capability information, or nothing similar; the request goes out
    /// untouched and the backend decides.
    PassThrough(String),
}

impl Resolution {
    pub fn into_name(self) -> String {
        match self {
            Resolution::Exact(name) | Resolution::Keyword(name) | Resolution::PassThrough(name) => {
                name
            }
        }
    }
}

#[derive(Clone)]
pub struct GestureEngine {
    backend: Arc<dyn BehaviorBackend>,
    /// Capability set queried once at session start. `None` when the query
    /// failed, in which case every request passes through.
    available: Option<Arc<HashSet<String>>>,
}

impl GestureEngine {
    /// Queries the backend's behavior list once. A failed query degrades to
    /// pass-through resolution rather than blocking the session.
    pub async fn init(backend: Arc<dyn BehaviorBackend>) -> Self {
        let available = match backend.list_behaviors().await {
            Ok(behaviors) => Some(Arc::new(behaviors.into_iter().collect())),
            Err(err) => {
                warn!("behavior capability query failed: {err:#}");
                None
            }
        };
        Self { backend, available }
    }

    /// Build with a known capability set, skipping the query.
    pub fn with_capabilities(backend: Arc<dyn BehaviorBackend>, behaviors: &[&str]) -> Self {
        Self {
            backend,
            available: Some(Arc::new(
                behaviors.iter().map(|b| b.to_string()).collect(),
            )),
        }
    }

    pub fn resolve(&self, name: &str, fallback_key: Option<&str>) -> Resolution {
        let Some(available) = &self.available else {
            return Resolution::PassThrough(name.to_string());
        };
        if available.contains(name) {
            return Resolution::Exact(name.to_string());
        }
        if let Some(key) = fallback_key {
            if let Some(keywords) = FALLBACK_KEYWORDS
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, words)| *words)
            {
                if let Some(found) = resolve_by_keywords(available, keywords) {
                    return Resolution::Keyword(found);
                }
            }
        }
        Resolution::PassThrough(name.to_string())
    }

    /// Best-effort playback. Failure is logged and swallowed; the robot just
    /// does not move for that beat.
    pub async fn play(&self, name: &str, fallback_key: Option<&str>) {
        let resolved = self.resolve(name, fallback_key).into_name();
        info!(gesture = %resolved, "playing");
        if let Err(err) = self.backend.play(&resolved).await {
            warn!(gesture = %resolved, "failed to play: {err:#}");
        }
    }

    /// Fire-and-forget playback so motion can overlap speech. The task handle
    /// is dropped on purpose; the caller paces itself with a sleep instead of
    /// waiting on gesture completion.
    pub fn play_detached(&self, name: &str, fallback_key: Option<&str>) {
        let engine = self.clone();
        let name = name.to_string();
        let fallback_key = fallback_key.map(str::to_string);
        tokio::spawn(async move {
            engine.play(&name, fallback_key.as_deref()).await;
        });
    }

    /// Fire a script tag's gesture without suspending the caller. Returns
    /// false for unrecognized tags, which are simply skipped.
    pub fn play_tag_detached(&self, tag: &str) -> bool {
        match behavior_for_tag(tag) {
            Some(behavior) => {
                self.play_detached(behavior, Some(tag));
                true
            }
            None => false,
        }
    }

    pub async fn play_idle(&self) {
        let choice = IDLE_GESTURES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(WAVE);
        self.play(choice, Some("WAVE")).await;
    }

    pub async fn play_no_hear(&self) {
        self.play(HEAD_SCRATCH, Some("HEAD_SCRATCH")).await;
    }

    pub async fn play_wrong_guess(&self) {
        self.play(SHAKE_HEAD, Some("SHAKE_HEAD")).await;
    }

    pub async fn play_correct_guess(&self) {
        self.play(CELEBRATE, Some("CELEBRATE")).await;
    }

    pub async fn wave(&self) {
        self.play(WAVE, Some("WAVE")).await;
    }

    pub async fn stand(&self) {
        self.play(STAND, Some("STAND")).await;
    }
}

fn resolve_by_keywords(available: &HashSet<String>, keywords: &[&str]) -> Option<String> {
    if available.is_empty() {
        return None;
    }
    for name in available {
        let lower = name.to_lowercase();
        if keywords.iter().all(|key| lower.contains(key)) {
            return Some(name.clone());
        }
    }
    for name in available {
        let lower = name.to_lowercase();
        if keywords.iter().any(|key| lower.contains(key)) {
            return Some(name.clone());
        }
    }
    None
}
