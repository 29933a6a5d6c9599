mod client;
mod diagnosis;
pub mod history;
pub mod prompt;
pub mod system_prompt;

pub use client::{format_failure, AnalysisClient, AnalysisReply, ReplyStatus};
pub use diagnosis::Diagnosis;
pub use prompt::{assemble_prompt, truncate_chars, PromptAssembler};
pub use system_prompt::{SystemInstructionBuilder, CORE_INSTRUCTION};
