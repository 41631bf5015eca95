use crate::ai::types::{ChatMessage, MessageRole};

/// Ordered messages of one session. The only system message is the optional
/// first one; after that messages are appended a whole turn at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new(system_prompt: Option<String>) -> Self {
        let messages = system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .map(ChatMessage::system)
            .into_iter()
            .collect();
        Self { messages }
    }

    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
    }

    /// History followed by a not yet answered user message
    pub fn with_pending(&self, user: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(ChatMessage::user(user));
        messages
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_first_and_only_once() {
        let mut history = ConversationHistory::new(Some("Be grumpy.".to_string()));
        history.push_turn("Hello", "What?");
        history.push_turn("Dinner?", "No.");

        let roles: Vec<_> = history.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );
        assert_eq!(history.system_prompt(), Some("Be grumpy."));
    }

    #[test]
    fn blank_system_prompt_is_dropped() {
        assert!(ConversationHistory::new(Some("  \n".to_string())).is_empty());
        assert!(ConversationHistory::new(None).is_empty());
        assert_eq!(ConversationHistory::new(None).system_prompt(), None);
    }

    #[test]
    fn pending_message_does_not_touch_history() {
        let history = ConversationHistory::new(Some("sys".to_string()));
        let request = history.with_pending("Hello");

        assert_eq!(request.len(), 2);
        assert_eq!(request[1], ChatMessage::user("Hello"));
        assert_eq!(history.len(), 1);
    }
}
