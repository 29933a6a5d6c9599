use super::diagnosis::Diagnosis;
use super::history::to_wire_history;
use super::prompt::PromptAssembler;
use super::system_prompt::SystemInstructionBuilder;
use crate::constants::messages;
use crate::context::{LogFile, RepoContext};
use crate::conversation::ChatMessage;
use crate::llm::{GenerateRequest, GenerationConfig, LlmClient, Turn, Usage};

/// How a turn ended. Every variant still carries displayable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Answered,
    Empty,
    Failed,
}

#[derive(Debug, Clone)]
pub struct AnalysisReply {
    pub text: String,
    pub status: ReplyStatus,
    pub usage: Option<Usage>,
}

impl AnalysisReply {
    pub fn diagnosis(&self) -> Option<Diagnosis> {
        match self.status {
            ReplyStatus::Answered => Diagnosis::parse(&self.text),
            _ => None,
        }
    }
}

/// Sends one diagnosis turn to the model. Never fails: transport and API
/// errors come back as an `Error analyzing logs: ...` reply.
pub struct AnalysisClient {
    llm: Box<dyn LlmClient>,
    system_instruction: String,
    config: GenerationConfig,
    history_limit: Option<usize>,
}

impl AnalysisClient {
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_instruction: SystemInstructionBuilder::new().build(),
            config: GenerationConfig::default(),
            history_limit: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// The exact request [`analyze`](Self::analyze) would send.
    pub fn build_request(
        &self,
        input: &str,
        history: &[ChatMessage],
        files: &[LogFile],
        repo: &RepoContext,
    ) -> GenerateRequest {
        let prompt = PromptAssembler::new(input)
            .with_files(files)
            .with_repo_context(repo)
            .build();

        let mut contents = to_wire_history(history, self.history_limit);
        contents.push(Turn::user(prompt));

        GenerateRequest {
            system_instruction: self.system_instruction.clone(),
            contents,
            config: self.config.clone(),
        }
    }

    pub async fn analyze(
        &self,
        input: &str,
        history: &[ChatMessage],
        files: &[LogFile],
        repo: &RepoContext,
    ) -> AnalysisReply {
        let request = self.build_request(input, history, files, repo);
        tracing::info!(
            model = %self.llm.model(),
            turns = request.contents.len(),
            files = files.len(),
            repo_context = repo.has_access,
            "starting analysis"
        );

        match self.llm.generate(&request).await {
            Ok(response) => match response.text {
                Some(text) if !text.trim().is_empty() => AnalysisReply {
                    text,
                    status: ReplyStatus::Answered,
                    usage: response.usage,
                },
                _ => {
                    tracing::warn!("model returned no text");
                    AnalysisReply {
                        text: messages::EMPTY_RESPONSE.to_string(),
                        status: ReplyStatus::Empty,
                        usage: response.usage,
                    }
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "analysis request failed");
                AnalysisReply {
                    text: format_failure(&e),
                    status: ReplyStatus::Failed,
                    usage: None,
                }
            }
        }
    }
}

/// `Error analyzing logs: <message>`, where the message walks the error's
/// source chain so wrapped transport causes are visible.
pub fn format_failure(error: &(dyn std::error::Error + 'static)) -> String {
    let mut description = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !description.contains(&text) {
            if !description.is_empty() {
                description.push_str(": ");
            }
            description.push_str(&text);
        }
        source = cause.source();
    }

    if description.trim().is_empty() {
        description = messages::UNKNOWN_ERROR.to_string();
    }
    format!("{} {}", messages::ERROR_PREFIX, description)
}
