// Project-plan generation: form validation, prompt building, streamed completion.
// All completion calls go through llm_client::CompletionBackend — no direct HTTP here.

pub mod aggregator;
pub mod handlers;
pub mod methodology;
pub mod prompt_builder;
pub mod prompts;
