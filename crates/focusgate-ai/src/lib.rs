pub mod ai_provider;
pub mod ai_service;
pub mod config;
pub mod http;
pub mod providers;

pub use ai_provider::{create_provider, AiProviderTrait};
pub use ai_service::{is_affirmative, AiService, DONE_SENTINEL};
pub use config::{AiConfig, AiProvider};
