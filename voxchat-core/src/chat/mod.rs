pub mod conversation;
pub mod history;
pub mod session;

#[cfg(test)]
mod tests;

pub use conversation::{AudioOutcome, Conversation, TurnOutcome, EMPTY_INPUT_NUDGE, NO_RESPONSE_FALLBACK};
pub use history::ConversationHistory;
pub use session::Session;
