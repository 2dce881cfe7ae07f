//! docqa: document question answering over uploaded files
//!
//! Upload a PDF, Office document, text file or image; its text, OCR output and
//! vision-model image descriptions are chunked and embedded into a collection
//! owned by a session. Questions against the session are answered by a hosted
//! chat model grounded in the closest chunks. Answers can be read aloud through
//! a text-to-speech endpoint.

pub mod analysis;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod speech;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use server::{build_router, state::AppState, RagServer};
pub use types::{
    document::FileType,
    query::{QueryRequest, TtsRequest},
    response::{QueryResponse, UploadResponse},
};
