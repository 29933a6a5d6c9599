use std::path::Path;
use std::sync::Arc;

use crate::analysis::{AnalysisClient, AnalysisReply, Diagnosis};
use crate::context::{read_log_file, FileSet, LogFile, RepoContext, RepoContextStore};
use crate::conversation::{ChatMessage, Conversation};
use crate::error::Result;
use crate::llm::Usage;

/// Everything one operator session owns: attachments, repository context,
/// the conversation, and the injected analysis client.
///
/// Mutation only happens through these methods; the external call runs on
/// an [`AnalysisJob`] that holds snapshots, so the session stays free while
/// a request is pending.
pub struct Session {
    id: String,
    files: FileSet,
    repo: RepoContextStore,
    conversation: Conversation,
    client: Arc<AnalysisClient>,
    usage: Usage,
    last_diagnosis: Option<Diagnosis>,
}

/// Snapshot of one accepted submission, ready to run off the UI task.
pub struct AnalysisJob {
    client: Arc<AnalysisClient>,
    input: String,
    history: Vec<ChatMessage>,
    files: Vec<LogFile>,
    repo: RepoContext,
}

impl AnalysisJob {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub async fn run(self) -> AnalysisReply {
        self.client
            .analyze(&self.input, &self.history, &self.files, &self.repo)
            .await
    }
}

impl Session {
    pub fn new(client: Arc<AnalysisClient>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            files: FileSet::new(),
            repo: RepoContextStore::default(),
            conversation: Conversation::new(),
            client,
            usage: Usage::default(),
            last_diagnosis: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &Arc<AnalysisClient> {
        &self.client
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn repo_context(&self) -> &RepoContext {
        self.repo.get()
    }

    pub fn replace_repo_context(&mut self, next: RepoContext) {
        self.repo.replace(next);
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn last_diagnosis(&self) -> Option<Diagnosis> {
        self.last_diagnosis
    }

    pub fn attach(&mut self, file: LogFile) -> &LogFile {
        tracing::info!(
            session = %self.id,
            file = %file.name(),
            kind = %file.kind(),
            "attached file"
        );
        self.files.add(file);
        &self.files.as_slice()[self.files.len() - 1]
    }

    /// Read and attach a file. A failed read is recorded as a notice and
    /// returned; nothing is attached.
    pub async fn attach_path(&mut self, path: impl AsRef<Path>) -> Result<&LogFile> {
        match read_log_file(path).await {
            Ok(file) => Ok(self.attach(file)),
            Err(e) => {
                self.record_file_error(&e);
                Err(e)
            }
        }
    }

    /// Surface a file-read failure to the operator.
    pub fn record_file_error(&mut self, error: &crate::error::SentinelError) {
        tracing::warn!(session = %self.id, error = %error, "attachment failed");
        self.conversation.push_notice(error.to_string());
    }

    pub fn detach(&mut self, index: usize) -> Result<LogFile> {
        let removed = self.files.remove(index)?;
        tracing::info!(session = %self.id, file = %removed.name(), "detached file");
        Ok(removed)
    }

    pub fn notice(&mut self, text: impl Into<String>) {
        self.conversation.push_notice(text);
    }

    /// Would [`begin`](Self::begin) accept this input right now?
    pub fn can_submit(&self, input: &str) -> bool {
        self.conversation.can_submit(input, !self.files.is_empty())
    }

    /// Accept a submission and hand back the job that performs it.
    pub fn begin(&mut self, input: impl Into<String>) -> Result<AnalysisJob> {
        let has_files = !self.files.is_empty();
        let turn = self.conversation.begin_turn(input, has_files)?;
        Ok(AnalysisJob {
            client: Arc::clone(&self.client),
            input: turn.input,
            history: turn.history,
            files: self.files.as_slice().to_vec(),
            repo: self.repo.get().clone(),
        })
    }

    /// Record the reply of the job started by [`begin`](Self::begin).
    pub fn finish(&mut self, reply: AnalysisReply) -> &ChatMessage {
        if let Some(usage) = reply.usage {
            self.usage.input_tokens += usage.input_tokens;
            self.usage.output_tokens += usage.output_tokens;
        }
        if let Some(diagnosis) = reply.diagnosis() {
            self.last_diagnosis = Some(diagnosis);
        }
        tracing::info!(session = %self.id, status = ?reply.status, "analysis finished");
        self.conversation.complete_turn(reply.text)
    }

    /// Submit and wait for the reply in one step.
    pub async fn submit(&mut self, input: impl Into<String>) -> Result<&ChatMessage> {
        let job = self.begin(input)?;
        let reply = job.run().await;
        Ok(self.finish(reply))
    }

    /// Start a fresh conversation, keeping attachments and repository context.
    pub fn reset_conversation(&mut self) -> Result<()> {
        if self.conversation.is_in_flight() {
            return Err(crate::error::SentinelError::RequestInFlight);
        }
        self.conversation = Conversation::new();
        self.last_diagnosis = None;
        Ok(())
    }
}
