use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;

use focusgate_ai::AiService;

use crate::classifier::{ContentClassifier, ContentPayload};
use crate::dialogue::{ContextEntry, QuestionGenerator};

/// Render answers as a `Q:`/`A:` transcript for prompting
#[must_use]
pub fn format_transcript(history: &[ContextEntry]) -> String {
    let mut text = String::new();
    for entry in history {
        let _ = writeln!(text, "Q: {}", entry.question);
        let _ = writeln!(text, "A: {}", entry.answer);
    }
    text
}

/// Semantic content classifier backed by the AI service
pub struct AiContentClassifier {
    ai_service: Arc<AiService>,
}

impl AiContentClassifier {
    #[must_use]
    pub fn new(ai_service: Arc<AiService>) -> Self {
        Self { ai_service }
    }
}

#[async_trait]
impl ContentClassifier for AiContentClassifier {
    async fn classify(&self, payload: &ContentPayload<'_>) -> Result<bool> {
        let site_json =
            serde_json::to_string(payload).context("Failed to serialize page payload")?;
        self.ai_service.judge_site(&site_json).await
    }
}

/// Question generator backed by the AI service
pub struct AiQuestionGenerator {
    ai_service: Arc<AiService>,
}

impl AiQuestionGenerator {
    #[must_use]
    pub fn new(ai_service: Arc<AiService>) -> Self {
        Self { ai_service }
    }
}

#[async_trait]
impl QuestionGenerator for AiQuestionGenerator {
    async fn next_question(&self, domain: &str, history: &[ContextEntry]) -> Result<String> {
        if history.is_empty() {
            return self.ai_service.ask_next_question(domain, None).await;
        }
        let transcript = format_transcript(history);
        self.ai_service
            .ask_next_question(domain, Some(&transcript))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DomainSettings;
    use focusgate_ai::AiProviderTrait;
    use std::sync::Mutex;

    struct EchoProvider {
        reply: String,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl AiProviderTrait for EchoProvider {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn service(reply: &str) -> (Arc<AiService>, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = EchoProvider {
            reply: reply.to_string(),
            prompts: Arc::clone(&prompts),
        };
        (Arc::new(AiService::with_provider(Box::new(provider))), prompts)
    }

    #[test]
    fn test_format_transcript() {
        let history = vec![
            ContextEntry::new("What task?", "Essay"),
            ContextEntry::new("Topic?", "History"),
        ];
        assert_eq!(
            format_transcript(&history),
            "Q: What task?\nA: Essay\nQ: Topic?\nA: History\n"
        );
    }

    #[tokio::test]
    async fn test_content_classifier_sends_payload_json() {
        let (ai, prompts) = service("yes");
        let classifier = AiContentClassifier::new(ai);
        let settings = DomainSettings::default();
        let context = vec![ContextEntry::new("Goal?", "Ship the release")];
        let payload = ContentPayload {
            domain: "work",
            context: &context,
            settings: &settings,
            url: "https://docs.rs",
            title: "Docs.rs".to_string(),
            text: "crate docs".to_string(),
        };

        assert!(classifier.classify(&payload).await.unwrap());
        let prompt = prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains(r#""url":"https://docs.rs""#));
        assert!(prompt.contains("Ship the release"));
    }

    #[tokio::test]
    async fn test_question_generator_prompt_shapes() {
        let (ai, prompts) = service("Which course?");
        let generator = AiQuestionGenerator::new(ai);

        generator.next_question("school", &[]).await.unwrap();
        generator
            .next_question("school", &[ContextEntry::new("Which course?", "Biology")])
            .await
            .unwrap();

        let prompts = prompts.lock().unwrap();
        assert!(!prompts[0].contains("A: Biology"));
        assert!(prompts[1].contains("Q: Which course?\nA: Biology"));
    }
}
