// Library interface for logsentinel-cli
// The binary drives `app`; integration tests reach the other modules directly.

pub mod app;
pub mod commands;
pub mod render;
pub mod theme;

// Re-export commonly used items for easier testing
pub use commands::{complete_command, handle_command, CommandResult};
pub use render::ChatRenderer;
pub use theme::Theme;
