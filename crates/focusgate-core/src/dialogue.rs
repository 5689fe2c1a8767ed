
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::DialogueError;
use crate::settings::DomainSettingsStore;

pub use focusgate_ai::DONE_SENTINEL;

/// One answered question. Order within a history is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub question: String,
    pub answer: String,
}

impl ContextEntry {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Source of contextualization questions
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Next question for `domain` given the answers so far, or `DONE`.
    ///
    /// An empty `history` means the opening question is wanted.
    async fn next_question(&self, domain: &str, history: &[ContextEntry]) -> Result<String>;
}

/// Where a dialogue stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueState {
    AwaitingQuestion,
    AwaitingAnswer(String),
    Done,
}

/// What the caller should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Show this question and submit the user's answer
    Question(String),
    /// No more questions; the history is final
    Done,
}

fn is_done_sentinel(reply: &str) -> bool {
    reply.trim().eq_ignore_ascii_case(DONE_SENTINEL)
}

/// One user's question/answer session.
///
/// Each session owns its history; concurrent dialogues never share state.
pub struct DialogueSession {
    id: Uuid,
    domain: String,
    started_at: DateTime<Utc>,
    state: DialogueState,
    history: Vec<ContextEntry>,
    aborted: bool,
    generator: Arc<dyn QuestionGenerator>,
}

impl DialogueSession {
    /// Start a dialogue for a configured domain
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::UnknownDomain` if the domain is not in the store.
    pub fn start(
        store: &DomainSettingsStore,
        domain: &str,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Result<Self, DialogueError> {
        if !store.contains(domain) {
            return Err(DialogueError::UnknownDomain(domain.to_string()));
        }
        let session = Self {
            id: Uuid::new_v4(),
            domain: domain.to_string(),
            started_at: Utc::now(),
            state: DialogueState::AwaitingQuestion,
            history: Vec::new(),
            aborted: false,
            generator,
        };
        log::debug!("Started dialogue {} for domain '{domain}'", session.id);
        Ok(session)
    }

    /// Ask for the next question.
    ///
    /// Repeats the pending question if one is still unanswered. A generator
    /// failure ends the dialogue, keeping the answers collected so far.
    pub async fn next_question(&mut self) -> Turn {
        match &self.state {
            DialogueState::AwaitingAnswer(question) => return Turn::Question(question.clone()),
            DialogueState::Done => return Turn::Done,
            DialogueState::AwaitingQuestion => {}
        }

        match self.generator.next_question(&self.domain, &self.history).await {
            Ok(reply) if is_done_sentinel(&reply) => {
                log::info!(
                    "Dialogue {} complete after {} answers",
                    self.id,
                    self.history.len()
                );
                self.state = DialogueState::Done;
                Turn::Done
            }
            Ok(question) => {
                let question = question.trim().to_string();
                self.state = DialogueState::AwaitingAnswer(question.clone());
                Turn::Question(question)
            }
            Err(e) => {
                log::warn!(
                    "Question generation failed, ending dialogue {} with {} answers: {e:#}",
                    self.id,
                    self.history.len()
                );
                self.aborted = true;
                self.state = DialogueState::Done;
                Turn::Done
            }
        }
    }

    /// Answer the pending question
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::NoPendingQuestion` when no question is waiting
    /// and `DialogueError::EmptyAnswer` for a blank answer. The state is
    /// unchanged in both cases.
    pub fn submit_answer(&mut self, answer: &str) -> Result<(), DialogueError> {
        let DialogueState::AwaitingAnswer(question) = &self.state else {
            return Err(DialogueError::NoPendingQuestion);
        };
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(DialogueError::EmptyAnswer);
        }
        self.history.push(ContextEntry::new(question.clone(), answer));
        self.state = DialogueState::AwaitingQuestion;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == DialogueState::Done
    }

    /// Whether the dialogue ended because the generator failed
    #[must_use]
    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    #[must_use]
    pub fn history(&self) -> &[ContextEntry] {
        &self.history
    }

    /// Consume the session, yielding its answers in order
    #[must_use]
    pub fn into_context(self) -> Vec<ContextEntry> {
        self.history
    }
}
