//! Core types for the document Q&A service

pub mod document;
pub mod query;
pub mod response;

pub use document::FileType;
pub use query::{QueryRequest, TtsRequest};
pub use response::{DeleteResponse, QueryResponse, ServiceInfo, StatusResponse, UploadResponse};
