//! Speech synthesis and audio playback for assistant replies

pub mod audio;
pub mod error;
pub mod tts;

pub use audio::{AudioOutput, AudioPlayer, Platform, SystemPlayer};
pub use error::SpeechError;
pub use tts::poller::SpeechSynthesizer;

/// Result of voicing one assistant reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    Played,
    /// Synthesis failed, timed out or returned no output; nothing was played
    Unavailable,
}

/// Synthesis followed by retrieval and playback of the resulting audio
pub struct Speaker {
    synthesizer: SpeechSynthesizer,
    output: AudioOutput,
}

impl Speaker {
    pub fn new(synthesizer: SpeechSynthesizer, output: AudioOutput) -> Self {
        Self {
            synthesizer,
            output,
        }
    }

    pub async fn speak(&self, text: &str) -> Result<SpeechOutcome, SpeechError> {
        match self.synthesizer.synthesize(text).await? {
            Some(location) => {
                self.output.fetch_and_play(&location).await?;
                Ok(SpeechOutcome::Played)
            }
            None => Ok(SpeechOutcome::Unavailable),
        }
    }
}
