use crate::error::SentinelError;
use serde::{Deserialize, Serialize};

/// Roles understood by the model endpoint. Anything that is not a model
/// reply travels as `user`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    /// Map an arbitrary role label onto the two wire roles.
    pub fn from_label(label: &str) -> Self {
        if label == "model" {
            Role::Model
        } else {
            Role::User
        }
    }
}

/// One role/text turn of the outbound conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    /// Token budget for extended reasoning. `0` disables thinking.
    pub thinking_budget: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: crate::constants::defaults::TEMPERATURE,
            thinking_budget: crate::constants::defaults::THINKING_BUDGET,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub contents: Vec<Turn>,
    pub config: GenerationConfig,
}

#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Concatenated answer text; `None` when the model returned no text parts.
    pub text: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A single-shot text generation backend.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send one request and wait for the full response.
    async fn generate(&self, request: &GenerateRequest) -> Result<LlmResponse, SentinelError>;
}
