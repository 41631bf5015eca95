use crate::ai::{error::AiError, types::*};

#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Issue exactly one completion request carrying the full ordered history
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, AiError>;
}
