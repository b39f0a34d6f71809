//! The turn-taking state machine. One sequential session: choose a role,
//! play a round, offer a replay, loop. Every listen point honors a stop
//! intent, no-input never costs an attempt, and every spoken line is fed to
//! the echo filter through the voice's phrase log.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::GameTuning;
use crate::game::oracle::WordOracle;
use crate::game::round::{RoundExit, RoundState};
use crate::game::words::{pick_target_word, TARGET_WORDS};
use crate::intent::{
    parse_replay_choice, parse_role_choice, wants_more_hint, wants_no_hint, wants_to_stop,
    ReplayChoice, RoleChoice,
};
use crate::robot::{HearingStream, TerminalInput};
use crate::speech::listener::UtteranceSource;
use crate::speech::output::Voice;

/// What a listen point produced once stop intent and silence are peeled off.
enum Heard {
    Nothing,
    Stop,
    Text(String),
}

pub struct GameController {
    voice: Voice,
    listener: Arc<dyn UtteranceSource>,
    hearing: Arc<dyn HearingStream>,
    terminal: Arc<dyn TerminalInput>,
    oracle: Arc<dyn WordOracle>,
    tuning: GameTuning,
    words: Vec<String>,
    /// Session-scoped: the previous matcher-round word, to avoid an
    /// immediate repeat. Dies with the session.
    last_word: Option<String>,
}

impl GameController {
    pub fn new(
        voice: Voice,
        listener: Arc<dyn UtteranceSource>,
        hearing: Arc<dyn HearingStream>,
        terminal: Arc<dyn TerminalInput>,
        oracle: Arc<dyn WordOracle>,
        tuning: GameTuning,
    ) -> Self {
        Self {
            voice,
            listener,
            hearing,
            terminal,
            oracle,
            tuning,
            words: TARGET_WORDS.iter().map(|w| w.to_string()).collect(),
            last_word: None,
        }
    }

    /// Replace the matcher-round vocabulary.
    pub fn with_words(mut self, words: Vec<String>) -> Self {
        self.words = words;
        self
    }

    /// Run one full session: greeting through farewell. The hearing stream
    /// is started on entry and stopped on every exit path.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.hearing.start().await?;
        self.session().await;
        if let Err(err) = self.hearing.stop().await {
            warn!("failed to stop hearing stream: {err:#}");
        }
        Ok(())
    }

    async fn session(&mut self) {
        self.voice
            .say_with_gesture(
                "Hi! My name is Alpha. Let's play WOW.",
                crate::gestures::WAVE,
                Some("WAVE"),
            )
            .await;

        let Some(mut role) = self.choose_role().await else {
            return;
        };

        loop {
            let exit = match role {
                RoleChoice::Director => self.director_round().await,
                RoleChoice::Matcher => self.matcher_round().await,
            };
            if exit == RoundExit::Stopped {
                return;
            }
            match self.replay_prompt().await {
                Some(next_role) => role = next_role,
                None => return,
            }
        }
    }

    async fn listen(&mut self) -> Heard {
        let ignore = self.voice.recent_phrases();
        let text = self
            .listener
            .listen(self.tuning.listen_timeout, &ignore)
            .await;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Heard::Nothing
        } else if wants_to_stop(trimmed) {
            Heard::Stop
        } else {
            Heard::Text(trimmed.to_string())
        }
    }

    async fn farewell(&mut self) {
        self.voice.say("Okay, thanks for playing.").await;
    }

    /// Role selection. Returns `None` when the human declined or asked to
    /// stop. Retries are unbounded: a stuck voice loop must never silently
    /// abandon the human.
    async fn choose_role(&mut self) -> Option<RoleChoice> {
        loop {
            self.voice
                .say_prompt("Do you want to play as a director or a guesser?")
                .await;
            match self.listen().await {
                Heard::Stop => {
                    self.farewell().await;
                    return None;
                }
                Heard::Nothing => {
                    self.voice.say_prompt("Please say director or guesser.").await;
                }
                Heard::Text(reply) => {
                    if wants_no_hint(&reply) {
                        self.farewell().await;
                        return None;
                    }
                    match parse_role_choice(&reply) {
                        Some(role) => return Some(role),
                        None => {
                            self.voice
                                .say_prompt("Please say director or guesser.")
                                .await;
                        }
                    }
                }
            }
        }
    }

    /// Human directs, robot guesses. The guess oracle always sees the whole
    /// accumulated hint list, so guesses sharpen as hints accrue.
    async fn director_round(&mut self) -> RoundExit {
        self.voice.gestures().stand().await;
        self.voice
            .say("Okay, you are the director. I am the matcher.")
            .await;
        self.voice
            .say_prompt("Type the target word in the terminal.")
            .await;

        let target = match self.terminal.read_line().await {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    "football".to_string()
                } else {
                    line
                }
            }
            Err(err) => {
                warn!("target word entry failed: {err:#}");
                "football".to_string()
            }
        };

        let mut round = RoundState::new(RoleChoice::Director, target);
        while !round.guessed && round.attempts < self.tuning.max_attempts {
            self.voice.say_prompt("Please describe the word.").await;
            let description = match self.listen().await {
                Heard::Stop => {
                    self.farewell().await;
                    return RoundExit::Stopped;
                }
                Heard::Nothing => {
                    self.voice
                        .say_prompt("I did not hear you. Please try again.")
                        .await;
                    self.voice.gestures().play_no_hear().await;
                    continue;
                }
                Heard::Text(text) => text,
            };

            round.push_hint(description);
            let guess = match self.oracle.guess(&round.hints).await {
                Ok(guess) => guess,
                Err(err) => {
                    warn!("guess generator failed: {err:#}");
                    self.voice
                        .say_prompt("I am having trouble thinking. Please try again.")
                        .await;
                    continue;
                }
            };

            if guess.confidence < self.tuning.confidence_floor
                && round.hint_requests < self.tuning.max_hints
            {
                round.hint_requests += 1;
                self.voice
                    .say_prompt("I am not sure. Can you give another hint?")
                    .await;
                continue;
            }

            self.voice.say(&format!("My guess is {}.", guess.word)).await;
            if round.target_word.to_lowercase() == guess.word.trim().to_lowercase() {
                round.guessed = true;
                self.voice.say("Yes! I guessed it!").await;
                self.voice.gestures().play_correct_guess().await;
            } else {
                round.attempts += 1;
                if round.attempts < self.tuning.max_attempts {
                    self.voice.gestures().play_wrong_guess().await;
                    self.voice
                        .say_prompt("I will try again. Give me another hint.")
                        .await;
                }
            }
        }

        if !round.guessed {
            self.voice.say("Good game! I will get it next time.").await;
        }
        RoundExit::Finished
    }

    /// Robot directs, human guesses. Guessing is a substring match because
    /// the human's answer is usually a whole sentence containing the word.
    async fn matcher_round(&mut self) -> RoundExit {
        let Some(target) =
            pick_target_word(&mut rand::thread_rng(), &self.words, self.last_word.as_deref())
        else {
            warn!("empty word list; nothing to describe");
            return RoundExit::Finished;
        };
        self.last_word = Some(target.clone());
        info!("target word: {target}");

        let script = match self.oracle.describe(&target, &[]).await {
            Ok(script) => script,
            Err(err) => {
                warn!("description generator failed: {err:#}");
                self.voice
                    .say("I cannot think of a good word right now. Let's try again later.")
                    .await;
                return RoundExit::Finished;
            }
        };

        let mut round = RoundState::new(RoleChoice::Matcher, target);
        self.voice.gestures().stand().await;
        self.voice
            .say("Let's play WOW. I will describe a word with other words. Try to guess it.")
            .await;
        self.voice.speak_with_gestures(&script).await;
        round.push_hint(script);

        while round.hints_given < self.tuning.max_hints {
            self.voice.say_prompt("Do you want another hint?").await;
            let reply = match self.listen().await {
                Heard::Stop => {
                    self.farewell().await;
                    return RoundExit::Stopped;
                }
                Heard::Nothing => {
                    self.voice.say_prompt("Please say yes or no.").await;
                    self.voice.gestures().play_no_hear().await;
                    continue;
                }
                Heard::Text(text) => text,
            };
            if wants_no_hint(&reply) {
                break;
            }
            if !wants_more_hint(&reply) {
                self.voice.say_prompt("Please say yes or no.").await;
                continue;
            }
            match self.oracle.describe(&round.target_word, &round.hints).await {
                Ok(fresh) => {
                    round.hints_given += 1;
                    self.voice.speak_with_gestures(&fresh).await;
                    round.push_hint(fresh);
                }
                Err(err) => {
                    warn!("description generator failed: {err:#}");
                    self.voice
                        .say_prompt("I cannot think of another hint right now.")
                        .await;
                    break;
                }
            }
        }

        self.voice.say_prompt("What word am I describing?").await;
        while !round.guessed && round.attempts < self.tuning.max_attempts {
            let guess = match self.listen().await {
                Heard::Stop => {
                    self.farewell().await;
                    return RoundExit::Stopped;
                }
                Heard::Nothing => {
                    self.voice
                        .say_prompt("I did not hear you. Please say it again.")
                        .await;
                    self.voice.gestures().play_no_hear().await;
                    continue;
                }
                Heard::Text(text) => text,
            };
            if guess.to_lowercase().contains(&round.target_word.to_lowercase()) {
                round.guessed = true;
                self.voice.say("Correct! Woohoo!").await;
                self.voice.gestures().play_correct_guess().await;
            } else {
                round.attempts += 1;
                if round.attempts < self.tuning.max_attempts {
                    self.voice.gestures().play_wrong_guess().await;
                    self.voice.say("Nope, try again.").await;
                }
            }
        }

        if !round.guessed {
            self.voice
                .say(&format!("Good try. The word was {}.", round.target_word))
                .await;
        }
        RoundExit::Finished
    }

    /// After any round: director, matcher, or stop. Unrecognized answers
    /// re-prompt without bound.
    async fn replay_prompt(&mut self) -> Option<RoleChoice> {
        loop {
            self.voice
                .say_prompt("Play again as director, matcher, or stop?")
                .await;
            match self.listen().await {
                Heard::Stop => {
                    self.voice.say("Thanks for playing!").await;
                    return None;
                }
                Heard::Nothing => {
                    self.voice
                        .say_prompt("Please say director, matcher, or stop.")
                        .await;
                    self.voice.gestures().play_no_hear().await;
                }
                Heard::Text(reply) => match parse_replay_choice(&reply) {
                    Some(ReplayChoice::Stop) => {
                        self.voice.say("Thanks for playing!").await;
                        return None;
                    }
                    Some(ReplayChoice::Role(role)) => return Some(role),
                    None => {
                        self.voice
                            .say_prompt("Please say director, matcher, or stop.")
                            .await;
                        self.voice.gestures().play_no_hear().await;
                    }
                },
            }
        }
    }
}
