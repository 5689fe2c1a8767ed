/// Contextualization dialogue command handler
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use focusgate_core::config::save_context;
use focusgate_core::{
    ContextEntry, DialogueError, DialogueSession, DomainSettingsStore, QuestionGenerator, Turn,
};

use super::helpers::prompt_line;

/// Ask questions on the terminal until the generator is satisfied
pub async fn run_dialogue(
    store: &DomainSettingsStore,
    domain: &str,
    generator: Arc<dyn QuestionGenerator>,
) -> Result<Vec<ContextEntry>> {
    let mut session = DialogueSession::start(store, domain, generator)?;
    println!("Answer a few questions about your {domain} task (Ctrl-D to stop).\n");

    while let Turn::Question(question) = session.next_question().await {
        let Some(answer) = prompt_line(&format!("{question}\n> "))? else {
            println!();
            break;
        };
        match session.submit_answer(&answer) {
            Ok(()) => {}
            Err(DialogueError::EmptyAnswer) => println!("Please enter an answer."),
            Err(e) => return Err(e.into()),
        }
    }

    if session.was_aborted() {
        println!("Could not get more questions; continuing with what you told me so far.");
    }
    Ok(session.into_context())
}

pub async fn handle_contextualize_command(
    store: &DomainSettingsStore,
    domain: &str,
    generator: Arc<dyn QuestionGenerator>,
    context_path: &Path,
) -> Result<()> {
    let context = run_dialogue(store, domain, generator).await?;
    save_context(context_path, &context)?;
    println!(
        "Saved {} answers to {}",
        context.len(),
        context_path.display()
    );
    Ok(())
}
