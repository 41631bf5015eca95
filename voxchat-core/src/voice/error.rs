use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),

    #[error("Speech API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to stage audio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Playback failed: {0}")]
    Playback(anyhow::Error),

    #[error("Your OS ({0}) is not supported for audio playback")]
    UnsupportedPlatform(String),
}
