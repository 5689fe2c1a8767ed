/// Interactive session: contextualize, then classify URLs until `quit`
use anyhow::Result;
use std::sync::Arc;

use focusgate_core::{
    CachedClassifier, ClassificationEngine, DomainSettingsStore, QuestionGenerator,
};

use super::contextualize::run_dialogue;
use super::helpers::{format_verdict, prompt_line};

pub async fn handle_session_command(
    store: &DomainSettingsStore,
    domain: &str,
    generator: Arc<dyn QuestionGenerator>,
    engine: ClassificationEngine,
    cache_size: usize,
) -> Result<()> {
    let context = run_dialogue(store, domain, generator).await?;
    let classifier = CachedClassifier::new(engine, cache_size);

    loop {
        let Some(url) = prompt_line("Enter URL to analyze (or 'quit' to exit): ")? else {
            break;
        };
        if url.eq_ignore_ascii_case("quit") {
            break;
        }
        if url.is_empty() {
            continue;
        }
        match classifier.classify_full(&url, domain, &context).await {
            Ok(result) => println!("{}", format_verdict(&result)),
            Err(e) => println!("Error: {e}"),
        }
    }
    Ok(())
}
