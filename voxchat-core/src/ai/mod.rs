pub mod error;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod types;

pub use error::AiError;
pub use openai::OpenAiCompatibleProvider;
pub use provider::ChatProvider;
pub use types::*;
