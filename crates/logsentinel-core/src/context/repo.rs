use crate::constants::defaults;
use serde::{Deserialize, Serialize};

/// Optional metadata about the repository the logs came from.
///
/// Values are passed through to the prompt verbatim; nothing here is
/// validated. When `has_access` is false none of the other fields reach
/// the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoContext {
    pub repo_url: String,
    pub branch: String,
    pub build_version: String,
    pub has_access: bool,
    pub custom_snippet: Option<String>,
}

impl Default for RepoContext {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            branch: defaults::BRANCH.to_string(),
            build_version: String::new(),
            has_access: false,
            custom_snippet: None,
        }
    }
}

/// Editable fields of the repository form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoField {
    Url,
    Branch,
    Build,
    Snippet,
}

impl RepoField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "url" => Some(Self::Url),
            "branch" => Some(Self::Branch),
            "build" | "version" => Some(Self::Build),
            "snippet" => Some(Self::Snippet),
            _ => None,
        }
    }
}

impl RepoContext {
    /// Copy of `self` with one field replaced. An empty snippet clears it.
    pub fn with_field(&self, field: RepoField, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        match field {
            RepoField::Url => next.repo_url = value,
            RepoField::Branch => next.branch = value,
            RepoField::Build => next.build_version = value,
            RepoField::Snippet => {
                next.custom_snippet = if value.is_empty() { None } else { Some(value) }
            }
        }
        next
    }

    pub fn with_access(&self, has_access: bool) -> Self {
        Self {
            has_access,
            ..self.clone()
        }
    }

    /// Snippet text when present and non-empty.
    pub fn snippet(&self) -> Option<&str> {
        self.custom_snippet.as_deref().filter(|s| !s.is_empty())
    }
}

/// Holds the current [`RepoContext`]. Edits always replace the whole value.
#[derive(Debug, Clone, Default)]
pub struct RepoContextStore {
    current: RepoContext,
}

impl RepoContextStore {
    pub fn get(&self) -> &RepoContext {
        &self.current
    }

    pub fn replace(&mut self, next: RepoContext) {
        self.current = next;
    }
}
