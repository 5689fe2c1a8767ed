
use anyhow::{Context, Result};

use crate::ai_provider::{create_provider, AiProviderTrait};
use crate::config::AiConfig;

/// Reply a question generator gives once it has enough context
pub const DONE_SENTINEL: &str = "DONE";

/// Unified AI Service
///
/// Owns the configured provider and turns the two productivity questions
/// (is this site productive, what should we ask next) into prompts and
/// parses the answers back.
pub struct AiService {
    provider: Box<dyn AiProviderTrait>,
}

impl AiService {
    /// Create a new AI service from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created (missing API key).
    pub fn new(config: &AiConfig) -> Result<Self> {
        let provider = create_provider(config)?;
        log::debug!("AI service using model {}", provider.model_name());
        Ok(Self { provider })
    }

    /// Wrap an already constructed provider
    #[must_use]
    pub fn with_provider(provider: Box<dyn AiProviderTrait>) -> Self {
        Self { provider }
    }

    /// Check if AI service is available/online
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Get the model name in use
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Ask whether the site described by `site_json` is productive.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails. Any reply other than
    /// an exact "yes" is a negative verdict, not an error.
    pub async fn judge_site(&self, site_json: &str) -> Result<bool> {
        let prompt = build_judgement_prompt(site_json);
        let response = self
            .provider
            .generate(&prompt)
            .await
            .context("Productivity judgement request failed")?;
        let verdict = is_affirmative(&response);
        log::debug!("Model answered {:?} -> productive={verdict}", response.trim());
        Ok(verdict)
    }

    /// Ask for the next contextualization question.
    ///
    /// `transcript` is `None` on the first turn, which asks a scoping
    /// question about the domain instead of a follow-up.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails or the reply is empty.
    pub async fn ask_next_question(&self, domain: &str, transcript: Option<&str>) -> Result<String> {
        let prompt = match transcript {
            None => build_opening_prompt(domain),
            Some(transcript) => build_followup_prompt(domain, transcript),
        };
        let response = self
            .provider
            .generate(&prompt)
            .await
            .context("Question generation request failed")?;
        let question = clean_question(&response);
        if question.is_empty() {
            anyhow::bail!("Question generator returned an empty reply");
        }
        Ok(question)
    }
}

fn build_judgement_prompt(site_json: &str) -> String {
    format!(
        "You decide whether a website helps a user with their current task.\n\
         The JSON below has the activity domain, the user's answers about what they are \
         working on, the domain's allow and block lists, and the page URL, title and the \
         start of its text.\n\
         \n\
         {site_json}\n\
         \n\
         Based on this data, is this website productive for the task?\n\
         Answer with exactly one word: YES or NO."
    )
}

fn build_opening_prompt(domain: &str) -> String {
    format!(
        "You are helping a user stay focused during a {domain} session.\n\
         Ask ONE short question that finds out what specific {domain} task they are \
         about to work on.\n\
         Return only the question text."
    )
}

fn build_followup_prompt(domain: &str, transcript: &str) -> String {
    format!(
        "You are helping a user stay focused during a {domain} session.\n\
         Here is what they have told you so far:\n\
         \n\
         {transcript}\n\
         \n\
         If you know enough to judge which websites help with this task, reply with \
         exactly {DONE_SENTINEL}.\n\
         Otherwise ask ONE short follow-up question that builds on their answers.\n\
         Return only the question text or {DONE_SENTINEL}."
    )
}

/// True only for an exact affirmative reply ("yes", any case, optional
/// trailing period or exclamation mark).
#[must_use]
pub fn is_affirmative(response: &str) -> bool {
    response
        .trim()
        .trim_end_matches(&['.', '!'][..])
        .eq_ignore_ascii_case("yes")
}

/// Strip whitespace, code fences and wrapping quotes from a generated question.
fn clean_question(response: &str) -> String {
    response
        .trim()
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}
