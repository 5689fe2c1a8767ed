pub mod anthropic;
pub mod google;
pub mod ollama;
pub mod openai;

#[cfg(test)]
pub(crate) mod test_server;

/// Judgements and questions must not vary between identical prompts
pub const TEMPERATURE: f32 = 0.0;

/// Replies are one word or one short question
pub const MAX_OUTPUT_TOKENS: u32 = 128;
