use std::sync::Arc;

use wow::config::{Credentials, GameTuning, ListenTuning};
use wow::game::controller::GameController;
use wow::gestures::GestureEngine;
use wow::robot::local::{ConsoleBehaviors, ConsoleInput, SayCommandSpeech};
use wow::services::llm::GeminiClient;
use wow::speech::listener::SpeechListener;
use wow::speech::output::Voice;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging/tracing
    tracing_subscriber::fmt::init();
    tracing::info!("Alpha booting for WOW...");

    // Missing credentials abort here, before anything is spoken.
    let credentials = Credentials::load()?;
    let oracle = Arc::new(GeminiClient::new(credentials.google_api_key));

    // Console drivers: typed lines stand in for the microphone, the local
    // `say` command stands in for the robot's voice.
    let console = Arc::new(ConsoleInput::new());
    let speech = Arc::new(SayCommandSpeech::new());
    let behaviors = Arc::new(ConsoleBehaviors);

    let tuning = GameTuning::default();
    let gestures = GestureEngine::init(behaviors).await;
    let voice = Voice::new(speech, gestures, tuning.phrase_log_cap);
    let listener = Arc::new(SpeechListener::new(
        console.clone(),
        ListenTuning::default(),
    ));

    let mut controller = GameController::new(
        voice,
        listener,
        console.clone(),
        console,
        oracle,
        tuning,
    );
    controller.run().await
}
