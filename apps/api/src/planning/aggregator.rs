//! Completion Aggregator — sends a prompt to the completion backend and
//! assembles the streamed fragments into one plan.
//!
//! Each submission runs its own `Generation`:
//! Idle → Requesting → Streaming → Completed | Failed.
//! No retries, no backoff, no state shared between submissions.

use futures::StreamExt;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::llm_client::prompts::PORTUGUESE_INSTRUCTION;
use crate::llm_client::{
    CompletionBackend, CompletionRequest, FragmentStream, LlmError, MAX_TOKENS, TEMPERATURE, TOP_P,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

impl GenerationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationState::Completed | GenerationState::Failed)
    }

    fn can_transition_to(self, next: GenerationState) -> bool {
        use GenerationState::*;
        !self.is_terminal()
            && matches!(
                (self, next),
                (Idle, Requesting)
                    | (Requesting, Streaming)
                    | (Requesting, Failed)
                    | (Streaming, Streaming)
                    | (Streaming, Completed)
                    | (Streaming, Failed)
            )
    }
}

/// Tracks one submission through the state machine.
#[derive(Debug)]
pub struct Generation {
    id: Uuid,
    state: GenerationState,
    fragments: usize,
}

impl Default for Generation {
    fn default() -> Self {
        Self::new()
    }
}

impl Generation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: GenerationState::Idle,
            fragments: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn transition(&mut self, next: GenerationState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid generation transition {:?} -> {:?}",
            self.state,
            next
        );
        if self.state != next {
            debug!("generation {}: {:?} -> {:?}", self.id, self.state, next);
        }
        self.state = next;
    }

    /// Opens the completion stream. Moves to Streaming on success, Failed otherwise.
    pub async fn start(
        &mut self,
        backend: &dyn CompletionBackend,
        prompt: &str,
    ) -> Result<FragmentStream, LlmError> {
        self.transition(GenerationState::Requesting);
        let request = plan_request(prompt);

        match backend.stream_completion(&request).await {
            Ok(stream) => {
                self.transition(GenerationState::Streaming);
                Ok(stream)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Records an arrived fragment.
    pub fn record_fragment(&mut self) {
        self.fragments += 1;
        self.transition(GenerationState::Streaming);
    }

    pub fn complete(&mut self) {
        self.transition(GenerationState::Completed);
        info!(
            "generation {} completed with {} fragments",
            self.id, self.fragments
        );
    }

    pub fn fail(&mut self, e: &LlmError) {
        self.transition(GenerationState::Failed);
        error!("generation {} failed: {e}", self.id);
    }
}

/// The fixed two-message request for a built prompt: the system message repeats
/// the prompt plus the language instruction, the user message is the prompt.
pub fn plan_request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        system_message: format!("{prompt}\n\n{PORTUGUESE_INSTRUCTION}"),
        user_message: prompt.to_string(),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        top_p: TOP_P,
        stream: true,
    }
}

/// Concatenates fragments in arrival order and trims the result.
/// Returns `None` when there is nothing to show.
pub fn assemble_plan<I, S>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: String = fragments
        .into_iter()
        .fold(String::new(), |mut acc, fragment| {
            acc.push_str(fragment.as_ref());
            acc
        });

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Runs one full generation: request, consume every fragment, assemble.
///
/// `Ok(None)` means the model answered with nothing; any transport or API
/// failure comes back as `Err` and nothing partial is returned.
pub async fn generate_plan(
    backend: &dyn CompletionBackend,
    prompt: &str,
) -> Result<Option<String>, LlmError> {
    let mut generation = Generation::new();
    let mut stream = generation.start(backend, prompt).await?;

    let mut buffer = String::new();
    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => {
                generation.record_fragment();
                buffer.push_str(&text);
            }
            Err(e) => {
                generation.fail(&e);
                return Err(e);
            }
        }
    }

    generation.complete();
    Ok(assemble_plan([buffer]))
}
