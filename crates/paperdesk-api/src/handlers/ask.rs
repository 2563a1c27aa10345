//! Question answering endpoints.
//!
//! `POST /api/v1/ask` returns the whole answer as JSON.
//! `GET /api/v1/ask/stream` sends `chunk` events then `done`, or a single
//! `warning` event when the run did not complete. Failures are sent as a
//! `failure` event so `EventSource` clients can show them.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use paperdesk_core::defaults::SSE_KEEPALIVE_SECS;
use paperdesk_workflow::{answer_question, extract_answer_stream, AnswerOutcome};

use crate::state::AppState;
use crate::ApiError;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    /// Empty when the run produced no text or did not complete.
    pub answer: String,
    pub warning: Option<String>,
}

impl From<&AnswerOutcome> for AskResponse {
    fn from(outcome: &AnswerOutcome) -> Self {
        Self {
            answer: outcome.answer().unwrap_or_default().to_string(),
            warning: outcome.warning(),
        }
    }
}

async fn run_question(state: &AppState, question: &str) -> Result<AnswerOutcome, ApiError> {
    let resources = state.resources().await?;
    let outcome = answer_question(&state.ctx, &resources, question).await?;
    info!(
        subsystem = "api",
        component = "ask",
        answered = outcome.warning().is_none(),
        "Question handled"
    );
    Ok(outcome)
}

pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let outcome = run_question(&state, &req.question).await?;
    Ok(Json(AskResponse::from(&outcome)))
}

/// SSE data cannot carry carriage returns; fold them into line feeds.
fn sse_data(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn single_event(name: &'static str, data: String) -> BoxStream<'static, Result<Event, Infallible>> {
    stream::once(async move { Ok(Event::default().event(name).data(sse_data(&data))) }).boxed()
}

pub async fn ask_stream(
    State(state): State<AppState>,
    Query(req): Query<AskRequest>,
) -> Sse<BoxStream<'static, Result<Event, Infallible>>> {
    let result = run_question(&state, &req.question).await;
    let events: BoxStream<'static, Result<Event, Infallible>> = match result {
        Ok(AnswerOutcome::Answered { messages, .. }) => {
            extract_answer_stream(messages, state.ctx.config.stream_delay)
                .map(|chunk| {
                    trace!(subsystem = "api", component = "ask", len = chunk.len(), "Chunk");
                    Ok(Event::default().event("chunk").data(sse_data(&chunk)))
                })
                .chain(stream::once(async {
                    Ok(Event::default().event("done").data(""))
                }))
                .boxed()
        }
        Ok(not_completed) => {
            single_event("warning", not_completed.warning().unwrap_or_default())
        }
        Err(e) => {
            warn!(
                subsystem = "api",
                component = "ask",
                status = e.status().as_u16(),
                error = %e,
                "Streamed question failed"
            );
            single_event("failure", e.to_string())
        }
    };

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEPALIVE_SECS))
            .text("keepalive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_data_folds_carriage_returns() {
        assert_eq!(sse_data("one\r\ntwo\rthree\nfour"), "one\ntwo\nthree\nfour");
        assert_eq!(sse_data("plain"), "plain");
    }
}
