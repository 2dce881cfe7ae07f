//! Prompt templates for document Q&A

use crate::providers::ChatMessage;
use crate::retrieval::ScoredChunk;

/// System instruction for Tanglish answers
const TANGLISH_INSTRUCTION: &str = "You are helpful. Answer in Tanglish (Tamil + English mix).";

/// System instruction for every other language tag
const DEFAULT_INSTRUCTION: &str = "You are helpful. Provide clear, accurate answers.";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// System instruction for a language tag
    pub fn system_instruction(language: &str) -> &'static str {
        if language.trim().eq_ignore_ascii_case("ta") {
            TANGLISH_INSTRUCTION
        } else {
            DEFAULT_INSTRUCTION
        }
    }

    /// Retrieved chunk texts in rank order, separated by blank lines
    pub fn build_context(chunks: &[ScoredChunk]) -> String {
        chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// User prompt grounding the question in the retrieved context
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            "Context:\n{}\n\nQuestion: {}\n\nAnswer based on context. If not found, say so politely.",
            context, question
        )
    }

    /// Full message list for one query
    pub fn build_messages(question: &str, chunks: &[ScoredChunk], language: &str) -> Vec<ChatMessage> {
        let context = Self::build_context(chunks);
        vec![
            ChatMessage::system(Self::system_instruction(language)),
            ChatMessage::user(Self::build_qa_prompt(question, &context)),
        ]
    }
}
