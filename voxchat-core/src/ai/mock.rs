use crate::ai::{error::AiError, provider::ChatProvider, types::*};
use std::sync::{Arc, Mutex};

/// Mock behavior for the mock provider
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Echo the last user message back as "Echo: <text>"
    #[default]
    Echo,
    /// Always reply with the given text
    Reply(String),
    /// Behave as if the response body was missing `choices[0].message.content`
    Malformed,
    /// Fail before any response arrives
    TransportError,
    /// Respond with a non-2xx status
    StatusError { status: u16 },
    /// Enables multi-turn testing by playing predetermined behaviors in order
    BehaviorQueue { behaviors: Vec<MockBehavior> },
}

/// Mock chat provider for testing
#[derive(Clone, Default)]
pub struct MockProvider {
    behavior: Arc<Mutex<MockBehavior>>,
    captured_requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn pop_behavior_from_queue(behavior: &mut MockBehavior) -> MockBehavior {
        if let MockBehavior::BehaviorQueue { behaviors } = behavior {
            if behaviors.is_empty() {
                return MockBehavior::Echo;
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn get_captured_requests(&self) -> Vec<Vec<ChatMessage>> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn get_last_captured_request(&self) -> Option<Vec<ChatMessage>> {
        self.captured_requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, AiError> {
        self.captured_requests
            .lock()
            .unwrap()
            .push(messages.to_vec());

        let behavior = {
            let mut guard = self.behavior.lock().unwrap();
            Self::pop_behavior_from_queue(&mut guard)
        };

        match behavior {
            MockBehavior::Echo => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                Ok(ChatCompletion {
                    content: format!("Echo: {last_user}"),
                })
            }
            MockBehavior::Reply(content) => Ok(ChatCompletion { content }),
            MockBehavior::Malformed => Err(AiError::MalformedResponse(
                "No choices[0].message.content in response".to_string(),
            )),
            MockBehavior::TransportError => Err(AiError::Transport(anyhow::anyhow!(
                "Network error: connection refused"
            ))),
            MockBehavior::StatusError { status } => Err(AiError::Status {
                status,
                body: "mock error".to_string(),
            }),
            MockBehavior::BehaviorQueue { .. } => Err(AiError::MalformedResponse(
                "nested behavior queues are not supported".to_string(),
            )),
        }
    }
}
