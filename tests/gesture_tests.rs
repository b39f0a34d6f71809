use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use wow::gestures::{behavior_for_tag, GestureEngine, Resolution, CELEBRATE, HEAD_SCRATCH};
use wow::robot::BehaviorBackend;

struct RecordingBehaviors {
    played: Mutex<Vec<String>>,
    listing: anyhow::Result<Vec<String>>,
    fail_play: bool,
}

impl RecordingBehaviors {
    fn new(listing: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
            listing: Ok(listing.iter().map(|s| s.to_string()).collect()),
            fail_play: false,
        })
    }

    fn broken() -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
            listing: Err(anyhow!("behavior info unavailable")),
            fail_play: true,
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
        if self.fail_play {
            return Err(anyhow!("motor fault"));
        }
        Ok(())
    }

    async fn list_behaviors(&self) -> anyhow::Result<Vec<String>> {
        match &self.listing {
            Ok(names) => Ok(names.clone()),
            Err(err) => Err(anyhow!("{err}")),
        }
    }
}

#[tokio::test]
async fn installed_behavior_resolves_exactly() {
    let backend = RecordingBehaviors::new(&["BlocklyTouchHead", "BlocklyStand"]);
    let engine = GestureEngine::init(backend).await;
    assert_eq!(
        engine.resolve(HEAD_SCRATCH, Some("HEAD_SCRATCH")),
        Resolution::Exact("BlocklyTouchHead".to_string())
    );
}

#[tokio::test]
async fn missing_behavior_falls_back_by_keywords() {
    let backend = RecordingBehaviors::new(&["RobotTouchHeadV2", "BlocklyStand"]);
    let engine = GestureEngine::init(backend).await;
    assert_eq!(
        engine.resolve(HEAD_SCRATCH, Some("HEAD_SCRATCH")),
        Resolution::Keyword("RobotTouchHeadV2".to_string())
    );
}

#[tokio::test]
async fn keyword_fallback_accepts_partial_matches() {
    // Nothing contains both "touch" and "head"; any-keyword still finds it.
    let backend = RecordingBehaviors::new(&["ArmTouchSequence"]);
    let engine = GestureEngine::init(backend).await;
    assert_eq!(
        engine.resolve(HEAD_SCRATCH, Some("HEAD_SCRATCH")),
        Resolution::Keyword("ArmTouchSequence".to_string())
    );
}

#[tokio::test]
async fn unresolvable_requests_pass_through() {
    let backend = RecordingBehaviors::new(&["BlocklyStand"]);
    let engine = GestureEngine::init(backend).await;
    assert_eq!(
        engine.resolve("BlocklyDance", None),
        Resolution::PassThrough("BlocklyDance".to_string())
    );
}

#[tokio::test]
async fn failed_capability_query_degrades_to_pass_through() {
    let backend = RecordingBehaviors::broken();
    let engine = GestureEngine::init(backend.clone()).await;
    assert_eq!(
        engine.resolve(CELEBRATE, Some("CELEBRATE")),
        Resolution::PassThrough(CELEBRATE.to_string())
    );
}

#[tokio::test]
async fn playback_failure_is_swallowed() {
    let backend = RecordingBehaviors::broken();
    let engine = GestureEngine::init(backend.clone()).await;
    // Completes without propagating the motor fault.
    engine.play_correct_guess().await;
    assert_eq!(backend.played(), vec![CELEBRATE.to_string()]);
}

#[test]
fn script_tags_map_to_behaviors_and_unknown_tags_do_not() {
    assert_eq!(behavior_for_tag("WAVE"), Some("BlocklyWaveRightArm"));
    assert_eq!(behavior_for_tag("NOD"), Some("BlocklyBow"));
    assert_eq!(behavior_for_tag("JUMP"), None, "unknown tag must be skipped");
}
