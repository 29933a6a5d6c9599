use crate::constants::{limits, prompt};
use crate::context::{LogFile, RepoContext};

/// Builds the single text block sent as the final user turn.
///
/// Layout is fixed: the user's message, then attached files in upload order,
/// then repository context (only when access is enabled).
pub struct PromptAssembler<'a> {
    message: &'a str,
    files: &'a [LogFile],
    repo: Option<&'a RepoContext>,
    max_file_chars: usize,
}

impl<'a> PromptAssembler<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            files: &[],
            repo: None,
            max_file_chars: limits::MAX_FILE_CHARS,
        }
    }

    pub fn with_files(mut self, files: &'a [LogFile]) -> Self {
        self.files = files;
        self
    }

    pub fn with_repo_context(mut self, repo: &'a RepoContext) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_max_file_chars(mut self, max: usize) -> Self {
        self.max_file_chars = max;
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::with_capacity(self.estimated_len());
        out.push_str(self.message);

        if !self.files.is_empty() {
            out.push_str("\n\n");
            out.push_str(prompt::FILES_HEADER);
            out.push('\n');
            for file in self.files {
                out.push_str(&format!(
                    "\nFile: {} ({})\n```\n{}\n```\n",
                    file.name(),
                    file.kind(),
                    truncate_chars(file.content(), self.max_file_chars)
                ));
            }
        }

        if let Some(repo) = self.repo.filter(|r| r.has_access) {
            out.push_str("\n\n");
            out.push_str(prompt::REPO_HEADER);
            out.push('\n');
            out.push_str(&format!("Repo URL: {}\n", repo.repo_url));
            out.push_str(&format!("Build Version: {}\n", repo.build_version));
            out.push_str(&format!("Branch: {}\n", repo.branch));
            if let Some(snippet) = repo.snippet() {
                out.push_str(prompt::SNIPPET_LABEL);
                out.push_str(&format!("\n```\n{snippet}\n```\n"));
            }
        }

        out
    }

    fn estimated_len(&self) -> usize {
        let files: usize = self
            .files
            .iter()
            .map(|f| f.name().len() + f.content().len().min(self.max_file_chars * 4) + 32)
            .sum();
        self.message.len() + files + 256
    }
}

/// Shorthand for the usual assembly with the default per-file cap.
pub fn assemble_prompt(message: &str, files: &[LogFile], repo: &RepoContext) -> String {
    PromptAssembler::new(message)
        .with_files(files)
        .with_repo_context(repo)
        .build()
}

/// Longest prefix of `s` holding at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn message_only_is_verbatim() {
        let repo = RepoContext::default();
        assert_eq!(
            assemble_prompt("  what broke?\n", &[], &repo),
            "  what broke?\n"
        );
    }

    #[test]
    fn snippet_is_fenced_on_its_own_lines() {
        let repo = RepoContext {
            has_access: true,
            custom_snippet: Some("let x = 1;".into()),
            ..RepoContext::default()
        };
        let prompt = assemble_prompt("q", &[], &repo);
        assert!(
            prompt.ends_with("Relevant Code Snippet Provided:\n```\nlet x = 1;\n```\n")
        );
    }

    #[test]
    fn custom_cap_applies_per_file() {
        let files = vec![LogFile::new("a.log", "abcdef"), LogFile::new("b.log", "xyz")];
        let prompt = PromptAssembler::new("q")
            .with_files(&files)
            .with_max_file_chars(4)
            .build();
        assert!(prompt.contains("File: a.log (log)\n```\nabcd\n```\n"));
        assert!(prompt.contains("File: b.log (log)\n```\nxyz\n```\n"));
    }
}
