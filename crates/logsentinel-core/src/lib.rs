pub mod analysis;
pub mod config;
pub mod constants;
pub mod context;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod markdown;
pub mod session;

// Re-export key types
pub use analysis::{AnalysisClient, AnalysisReply, Diagnosis, ReplyStatus};
pub use config::Settings;
pub use context::{FileKind, LogFile, RepoContext, RepoField};
pub use conversation::{ChatMessage, ChatRole, Conversation, RequestState};
pub use error::SentinelError;
pub use llm::{GeminiClient, GenerateRequest, LlmClient, LlmResponse, Role, Turn, Usage};
pub use markdown::{Block, CommonMarkFormatter, Inline, MarkdownFormatter};
pub use session::{AnalysisJob, Session};
