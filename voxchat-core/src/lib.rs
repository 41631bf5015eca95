pub mod ai;
pub mod chat;
pub mod formatter;
pub mod settings;
pub mod voice;

pub use ai::provider::ChatProvider;
pub use chat::{Conversation, Session, TurnOutcome};
pub use settings::{Settings, SettingsManager};
