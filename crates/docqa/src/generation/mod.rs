//! Answer generation prompts

mod prompt;

pub use prompt::PromptBuilder;
