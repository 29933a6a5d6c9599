use super::message::{ChatMessage, ChatRole, IdGenerator, MessageId};
use crate::constants::messages;
use crate::error::{Result, SentinelError};

/// Whether an analysis request is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
}

/// A submission accepted by [`Conversation::begin_turn`].
#[derive(Debug, Clone)]
pub struct PendingTurn {
    /// Raw text the user typed.
    pub input: String,
    /// Everything that preceded the new user message.
    pub history: Vec<ChatMessage>,
}

/// Ordered, append-only message log for one session.
///
/// The first element is always the welcome message.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    state: RequestState,
    ids: IdGenerator,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_welcome(messages::WELCOME)
    }

    pub fn with_welcome(text: impl Into<String>) -> Self {
        let welcome = ChatMessage::new(
            MessageId::new(messages::WELCOME_ID),
            ChatRole::Model,
            text,
        );
        Self {
            messages: vec![welcome],
            state: RequestState::Idle,
            ids: IdGenerator::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn request_state(&self) -> RequestState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == RequestState::InFlight
    }

    /// Would a submission with this input be accepted right now?
    pub fn can_submit(&self, input: &str, has_files: bool) -> bool {
        self.state == RequestState::Idle && (!input.trim().is_empty() || has_files)
    }

    /// Accept a submission: snapshot history, append the user message and
    /// move to [`RequestState::InFlight`].
    pub fn begin_turn(&mut self, input: impl Into<String>, has_files: bool) -> Result<PendingTurn> {
        let input = input.into();
        if self.state == RequestState::InFlight {
            tracing::warn!("submission rejected: request already in flight");
            return Err(SentinelError::RequestInFlight);
        }
        if input.trim().is_empty() && !has_files {
            return Err(SentinelError::EmptySubmission);
        }

        let history = self.messages.clone();
        let id = self.ids.next_id();
        self.messages.push(ChatMessage::new(id, ChatRole::User, input.clone()));
        self.state = RequestState::InFlight;

        Ok(PendingTurn { input, history })
    }

    /// Record the analysis result as a model message and return to idle.
    pub fn complete_turn(&mut self, text: impl Into<String>) -> &ChatMessage {
        let id = self.ids.next_id();
        self.messages.push(ChatMessage::new(id, ChatRole::Model, text));
        self.state = RequestState::Idle;
        &self.messages[self.messages.len() - 1]
    }

    /// Append a local notice. Does not touch the request state.
    pub fn push_notice(&mut self, text: impl Into<String>) -> &ChatMessage {
        let id = self.ids.next_id();
        self.messages.push(ChatMessage::new(id, ChatRole::System, text));
        &self.messages[self.messages.len() - 1]
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
