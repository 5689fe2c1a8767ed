pub mod ai_classifier;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod fetcher;
pub mod matcher;
pub mod settings;

pub use ai_classifier::{AiContentClassifier, AiQuestionGenerator};
pub use cache::CachedClassifier;
pub use classifier::{
    Classification, ClassificationEngine, ContentClassifier, ContentPayload, DecisionTier,
    PageContent, PageFetcher,
};
pub use config::AppConfig;
pub use dialogue::{ContextEntry, DialogueSession, DialogueState, QuestionGenerator, Turn};
pub use error::{ClassifyError, DialogueError};
pub use fetcher::HttpPageFetcher;
pub use matcher::{is_ai_site, is_allowed_platform, PlatformMatch};
pub use settings::{DomainSettings, DomainSettingsStore};
