/// URL classification command handler
use anyhow::Result;
use std::path::Path;

use focusgate_core::config::load_context;
use focusgate_core::ClassificationEngine;

use super::helpers::format_verdict;

pub async fn handle_classify_command(
    engine: &ClassificationEngine,
    url: &str,
    domain: &str,
    context_path: Option<&Path>,
) -> Result<()> {
    let context = match context_path {
        Some(path) => load_context(path)?,
        None => Vec::new(),
    };
    log::debug!("Classifying with {} context answers", context.len());

    let result = engine.classify_full(url, domain, &context).await?;
    println!("{}", format_verdict(&result));
    Ok(())
}
