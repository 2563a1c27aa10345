//! Per-question session: assistant, conversation, run, answer.

use tokio::time::Instant;
use tracing::{info, warn};

use paperdesk_core::defaults::MAX_QUESTION_CHARS;
use paperdesk_core::{
    ConversationSession, Error, MessageList, ProvisionedResources, Result, RunResult, RunStatus,
    SessionHandle,
};

use crate::context::WorkflowContext;
use crate::extract::extract_answer;
use crate::poll::poll_until;

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The run completed. `answer` is absent when no message had text.
    Answered {
        answer: Option<String>,
        messages: MessageList,
    },
    /// The run stopped in a state other than `completed`.
    NotCompleted { status: RunStatus },
}

impl AnswerOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Answered { answer, .. } => answer.as_deref(),
            Self::NotCompleted { .. } => None,
        }
    }

    /// Warning shown instead of an answer.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Answered { .. } => None,
            Self::NotCompleted { status } => Some(format!("Run status: {}", status)),
        }
    }
}

/// Ask `question` against the index, with the uploaded file attached.
///
/// Creates an assistant bound to `index_id`, opens a session holding the
/// question, starts a run, and waits until the run is terminal.
pub async fn ask(
    ctx: &WorkflowContext,
    index_id: &str,
    file_id: &str,
    question: &str,
) -> Result<(RunResult, SessionHandle)> {
    let question = validate_question(question)?;
    let backend = ctx.backend.as_ref();
    let started = Instant::now();

    let assistant_id = backend
        .create_assistant(&ctx.config.assistant_config())
        .await?;
    backend.update_assistant(&assistant_id, index_id).await?;

    let session = ConversationSession::for_question(question, file_id);
    let session_id = backend.create_session(&session).await?;

    let run = backend
        .create_run(&session_id, &assistant_id, &ctx.config.persona)
        .await?;
    let run = if run.status.is_terminal() {
        run
    } else {
        let (sid, rid) = (session_id.as_str(), run.id.as_str());
        poll_until(
            &ctx.config.poll,
            move || backend.retrieve_run(sid, rid),
            |r| r.status.is_terminal(),
        )
        .await?
    };

    info!(
        subsystem = "workflow",
        component = "session",
        session_id = %session_id,
        run_id = %run.id,
        status = %run.status,
        duration_ms = started.elapsed().as_millis() as u64,
        "Run finished"
    );

    Ok((
        run,
        SessionHandle {
            session_id,
            assistant_id,
        },
    ))
}

/// Answer a question with provisioned resources.
///
/// Fails with [`Error::NotReady`] before any remote call when no file was
/// uploaded. Messages are listed only for a completed run.
pub async fn answer_question(
    ctx: &WorkflowContext,
    resources: &ProvisionedResources,
    question: &str,
) -> Result<AnswerOutcome> {
    let file_id = resources.file_id.as_deref().ok_or_else(|| {
        Error::NotReady("no document has been uploaded yet".to_string())
    })?;

    let (run, handle) = ask(ctx, &resources.index_id, file_id, question).await?;

    if !run.status.is_completed() {
        warn!(
            subsystem = "workflow",
            component = "session",
            session_id = %handle.session_id,
            run_id = %run.id,
            status = %run.status,
            "Run did not complete"
        );
        return Ok(AnswerOutcome::NotCompleted { status: run.status });
    }

    let messages = ctx.backend.list_messages(&handle.session_id).await?;
    let answer = extract_answer(&messages);
    info!(
        subsystem = "workflow",
        component = "session",
        session_id = %handle.session_id,
        response_len = answer.as_ref().map(|a| a.len()).unwrap_or(0),
        "Answer extracted"
    );

    Ok(AnswerOutcome::Answered { answer, messages })
}

fn validate_question(question: &str) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::InvalidInput("question is empty".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(Error::InvalidInput(format!(
            "question exceeds {} characters",
            MAX_QUESTION_CHARS
        )));
    }
    Ok(question)
}
