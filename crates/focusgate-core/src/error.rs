use thiserror::Error;

/// Errors produced while classifying a URL.
///
/// `InvalidUrl` and `UnknownDomain` are caller mistakes and are returned
/// from `classify`. `Fetch` and `Classifier` come from collaborators during
/// the content tier; the engine logs them and answers "not productive".
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid URL '{0}': no parseable host")]
    InvalidUrl(String),

    #[error("unknown domain '{0}'")]
    UnknownDomain(String),

    #[error("failed to fetch page: {0:#}")]
    Fetch(anyhow::Error),

    #[error("content classifier failed: {0:#}")]
    Classifier(anyhow::Error),
}

impl ClassifyError {
    /// Whether the error stems from bad input rather than a failing collaborator
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::UnknownDomain(_))
    }
}

/// Misuse of a contextualization dialogue
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("unknown domain '{0}'")]
    UnknownDomain(String),

    #[error("no question is waiting for an answer")]
    NoPendingQuestion,

    #[error("answer must not be blank")]
    EmptyAnswer,
}
