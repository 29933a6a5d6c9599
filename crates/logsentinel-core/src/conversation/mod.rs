mod message;
mod state;

pub use message::{ChatMessage, ChatRole, IdGenerator, MessageId};
pub use state::{Conversation, PendingTurn, RequestState};
