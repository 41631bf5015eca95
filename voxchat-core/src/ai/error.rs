use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    /// The request never produced an HTTP response (DNS, connect, timeout...)
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),

    #[error("Chat API error {status}: {body}")]
    Status { status: u16, body: String },

    /// A response arrived but did not carry `choices[0].message.content`
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl AiError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, AiError::MalformedResponse(_))
    }
}

impl From<serde_json::Error> for AiError {
    fn from(source: serde_json::Error) -> Self {
        Self::MalformedResponse(source.to_string())
    }
}
