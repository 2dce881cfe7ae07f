//! Question answering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::session::SessionId;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/v1/query - Ask a question about an uploaded document
pub async fn query_document(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    let Json(request) = payload?;
    let session_id = SessionId::parse(&request.session_id)?;
    request.validate()?;

    tracing::info!("Query on {}: \"{}\"", session_id, request.question);

    let session = state.sessions().get(&session_id).await?;
    let collection = session.collection()?;

    let outcome = state
        .query_engine()
        .query(&collection, &request.question, &request.language, request.top_k)
        .await?;

    tracing::info!(
        "Answered query on {} from {} chunks in {}ms",
        session_id,
        outcome.retrieved.len(),
        start.elapsed().as_millis()
    );

    Ok(Json(QueryResponse {
        answer: outcome.answer,
        session_id: session_id.to_string(),
        question: request.question,
        chunks_retrieved: outcome.retrieved.len(),
    }))
}
