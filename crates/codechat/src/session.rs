//! One question-to-answer cycle: append the user message, call the
//! remote endpoint with the full history, append the reply, render it.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::context::{build_user_content, read_file_sections, FileReadError, PromptTemplate};
use crate::conversation::{Conversation, Message};
use crate::errors::{TurnError, TurnResult};
use crate::providers::base::Provider;
use crate::render;

/// What the caller (editor glue, CLI) hands in for one turn.
#[derive(Debug, Default)]
pub struct TurnRequest {
    pub question: String,
    /// The active selection, or the whole document when nothing is
    /// selected. Omitted entirely when the caller has no document.
    pub code: Option<String>,
    /// Extra workspace files to include as labeled context sections.
    pub file_paths: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct TurnOutcome {
    /// The assistant's raw reply text.
    pub reply: String,
    /// The reply rendered as a standalone HTML page.
    pub html: String,
    /// Context files that could not be read. Non-fatal; the turn ran
    /// without them.
    pub file_errors: Vec<FileReadError>,
}

/// A caller-owned chat session: one conversation, one provider, an
/// optional prompt template.
///
/// `ask` takes `&mut self`, so a session runs one turn at a time; callers
/// wanting concurrency scope a fresh session per stream of questions
/// instead of sharing one store.
pub struct Session {
    provider: Box<dyn Provider>,
    conversation: Conversation,
    template: Option<PromptTemplate>,
}

impl Session {
    pub fn new(provider: Box<dyn Provider>, template: Option<PromptTemplate>) -> Self {
        Self {
            provider,
            conversation: Conversation::new(),
            template,
        }
    }

    /// Runs one turn.
    ///
    /// An empty question aborts before anything is appended. A failed
    /// completion leaves the already-appended user message in history as
    /// a dangling turn; it will ride along (un-replied) in the next
    /// attempt's context unless the caller clears the session.
    pub async fn ask(&mut self, request: TurnRequest) -> TurnResult<TurnOutcome> {
        if request.question.trim().is_empty() {
            return Err(TurnError::Input("question is empty".to_string()));
        }

        let (sections, file_errors) = read_file_sections(&request.file_paths);
        for error in &file_errors {
            debug!(path = %error.path.display(), "skipping unreadable context file");
        }

        let content = build_user_content(
            &request.question,
            self.template.as_ref(),
            request.code.as_deref(),
            &sections,
        );
        self.conversation.append(Message::user(content));

        let reply = self
            .provider
            .complete(self.conversation.snapshot())
            .await
            .map_err(TurnError::Completion)?;

        self.conversation.append(Message::assistant(reply.clone()));
        info!(history = self.conversation.len(), "turn completed");

        let html = render::render_page(&reply);
        Ok(TurnOutcome {
            reply,
            html,
            file_errors,
        })
    }

    /// Drops the whole history; the next turn starts a fresh context.
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    pub fn history(&self) -> &[Message] {
        self.conversation.snapshot()
    }
}
