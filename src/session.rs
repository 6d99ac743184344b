use hark_audio::DeviceNegotiator;
use hark_command::{ActionExecutor, ActionKind, Announce, CommandRouter};
use hark_core::{AudioBuffer, AudioError};
use hark_speech::{Speaker, Transcriber};
use hark_trigger::{TriggerEvent, TriggerSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Produces one command window per trigger. A seam over the microphone so
/// the loop can be driven without hardware in tests.
pub trait AudioSource {
    fn capture_turn(&mut self, stop: &AtomicBool) -> Result<AudioBuffer, AudioError>;
}

/// Microphone-backed source. Negotiation runs fresh for every turn, so a
/// device that disappears mid-session degrades to a per-turn message
/// instead of a stale handle.
pub struct MicSource {
    negotiator: DeviceNegotiator,
    preferred_rate: Option<u32>,
    capture_seconds: f32,
    block_frames: u32,
}

impl MicSource {
    pub fn new(preferred_rate: Option<u32>, capture_seconds: f32, block_frames: u32) -> Self {
        Self {
            negotiator: DeviceNegotiator::new(),
            preferred_rate,
            capture_seconds,
            block_frames,
        }
    }
}

impl AudioSource for MicSource {
    fn capture_turn(&mut self, stop: &AtomicBool) -> Result<AudioBuffer, AudioError> {
        let config = self.negotiator.negotiate(
            self.preferred_rate,
            self.capture_seconds,
            self.block_frames,
        )?;
        hark_audio::capture(&self.negotiator, &config, stop)
    }
}

/// Lets the executor speak through the session's speaker (the timer
/// announces before and after its sleep).
struct SpeakerAnnounce<'a>(&'a Speaker);

impl Announce for SpeakerAnnounce<'_> {
    fn say(&self, text: &str) {
        self.0.say(text);
    }
}

/// One synchronous pipeline: trigger → capture → transcribe → route →
/// execute. Per-turn failures are spoken and the trigger re-arms; only a
/// terminating command or the stop flag ends the loop.
pub struct Session<T, A> {
    trigger: T,
    audio: A,
    transcriber: Transcriber,
    router: CommandRouter,
    executor: ActionExecutor,
    speaker: Speaker,
    stop: Arc<AtomicBool>,
}

impl<T: TriggerSource, A: AudioSource> Session<T, A> {
    pub fn new(
        trigger: T,
        audio: A,
        transcriber: Transcriber,
        router: CommandRouter,
        executor: ActionExecutor,
        speaker: Speaker,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            trigger,
            audio,
            transcriber,
            router,
            executor,
            speaker,
            stop,
        }
    }

    pub fn run(&mut self, ready_line: &str) {
        self.speaker.say(ready_line);

        loop {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            let event = match self.trigger.wait_for_trigger() {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("trigger failed: {e}");
                    self.speaker
                        .say("Something went wrong with the microphone. Trying again.");
                    // A dead stream errors immediately; don't spin on it
                    std::thread::sleep(Duration::from_millis(500));
                    continue;
                }
            };
            if event == TriggerEvent::Stop {
                break;
            }

            self.speaker.say("Yes?");

            let buffer = match self.audio.capture_turn(&self.stop) {
                Ok(buffer) => buffer,
                Err(AudioError::Cancelled) => break,
                Err(e @ AudioError::NegotiationExhausted { .. }) => {
                    tracing::error!("negotiation failed: {e}");
                    self.speaker.say(
                        "I couldn't find a working microphone setup. Check permissions \
                         and exclusive mode, or try a different device.",
                    );
                    continue;
                }
                Err(e) => {
                    tracing::error!("capture failed: {e}");
                    self.speaker.say("I couldn't record that. Let's try again.");
                    continue;
                }
            };

            let utterance = match self.transcriber.transcribe(buffer) {
                Ok(utterance) => utterance,
                Err(e) => {
                    tracing::error!("transcription failed: {e}");
                    self.speaker.say("Something went wrong while transcribing.");
                    continue;
                }
            };

            if utterance.is_empty() {
                self.speaker.say("I didn't catch that.");
                continue;
            }

            println!("YOU: {utterance}");
            tracing::info!(command = %utterance, "routing utterance");

            let request = self.router.route(&utterance);
            let outcome = self
                .executor
                .execute(&request, &SpeakerAnnounce(&self.speaker));

            if let Some(ref detail) = outcome.detail {
                match outcome.kind {
                    ActionKind::Help => println!("[apps] {detail}"),
                    ActionKind::SaveNote if outcome.success => println!("[notes] {detail}"),
                    _ if !outcome.success => tracing::warn!(detail = %detail, "action failed"),
                    _ => tracing::debug!(detail = %detail, "action detail"),
                }
            }

            self.speaker.say(&outcome.message);

            if outcome.kind == ActionKind::Terminate {
                break;
            }
        }

        self.speaker.say("Shutting down.");
    }
}
