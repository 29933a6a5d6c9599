//! Centralized constants for LogSentinel.
//! Magic numbers, strings and limits live here rather than inline.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    /// Reasoning-capable model used for diagnosis.
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const GEMINI_API_VERSION: &str = "v1beta";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const API_KEY_ENV: &str = "API_KEY";
    pub const TEMPERATURE: f32 = 0.2;
    pub const THINKING_BUDGET: u32 = 4096;
    pub const THEME: &str = "dark";
    pub const BRANCH: &str = "main";
    pub const DEFAULT_MODEL: &str = super::models::DEFAULT_GEMINI_MODEL;
}

// ─── Resource Limits ──────────────────────────────────────────────────────────

pub mod limits {
    /// Per-file cap, in characters, on content embedded into a prompt.
    pub const MAX_FILE_CHARS: usize = 20_000;
}

// ─── File Classification ──────────────────────────────────────────────────────

pub mod files {
    /// Suffixes that mark an attachment as configuration rather than a log.
    pub const CONFIG_SUFFIXES: &[&str] = &[".json", ".yaml", ".xml"];
}

// ─── Prompt Layout ────────────────────────────────────────────────────────────

pub mod prompt {
    pub const FILES_HEADER: &str = "--- ATTACHED FILES ---";
    pub const REPO_HEADER: &str = "--- REPO CONTEXT ---";
    pub const SNIPPET_LABEL: &str = "Relevant Code Snippet Provided:";
}

// ─── Conversation Text ────────────────────────────────────────────────────────

pub mod messages {
    pub const WELCOME_ID: &str = "welcome";

    pub const WELCOME: &str = "**System Online.**\n\n\
        I am ready to analyze your node logs. Attach the relevant log files with \
        `/attach <path>`.\n\n\
        If you suspect a code-level bug, enable repository context with `/repo on` \
        and provide the build details. I will work out whether the issue is a \
        **misconfiguration** or a **software bug** that needs a patch.";

    pub const EMPTY_RESPONSE: &str = "Analysis failed. No text returned.";
    pub const ERROR_PREFIX: &str = "Error analyzing logs:";
    pub const UNKNOWN_ERROR: &str = "Unknown error";
    pub const THINKING: &str = "Thinking process initiated...";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "logsentinel";
    pub const CONFIG_FILE: &str = "config.toml";
}
