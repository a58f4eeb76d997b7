//! Axum route handlers for the Planning API.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use futures::{stream, Stream, StreamExt};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::planning::aggregator::{assemble_plan, generate_plan, Generation};
use crate::planning::methodology::Methodology;
use crate::planning::prompt_builder::{build_prompt, PlanForm};
use crate::planning::prompts::template_for;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub methodology: Methodology,
    /// `None` when the model produced no text.
    pub plan: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MethodologyOption {
    pub value: Methodology,
    pub label: &'static str,
    pub sections: &'static [&'static str],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/methodologies
///
/// The options for the methodology select, with the sections each plan will contain.
pub async fn handle_list_methodologies() -> Json<Vec<MethodologyOption>> {
    Json(
        Methodology::ALL
            .into_iter()
            .map(template_for)
            .map(|template| MethodologyOption {
                value: template.methodology,
                label: template.methodology.label(),
                sections: template.sections,
            })
            .collect(),
    )
}

/// POST /api/v1/plans
///
/// Validates the form, builds the prompt and waits for the whole plan.
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Json(form): Json<PlanForm>,
) -> Result<Json<PlanResponse>, AppError> {
    let input = form.validate()?;
    let prompt = build_prompt(&input);
    info!("Generating {} plan", input.methodology);

    let plan = generate_plan(state.completion.as_ref(), &prompt).await?;
    if plan.is_none() {
        info!("Completion returned no text; nothing to display");
    }

    Ok(Json(PlanResponse {
        id: Uuid::new_v4(),
        methodology: input.methodology,
        plan,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/plans/stream
///
/// Same validation as `/plans`, then forwards fragments as they arrive.
/// Events: `fragment` (non-empty raw text), then exactly one `error`, or one
/// `done` carrying `{"plan": <trimmed plan> | null}` that replaces the streamed text.
pub async fn handle_stream_plan(
    State(state): State<AppState>,
    Json(form): Json<PlanForm>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let input = form.validate()?;
    let prompt = build_prompt(&input);
    let mut generation = Generation::new();
    info!(
        "Streaming {} plan (generation {})",
        input.methodology,
        generation.id()
    );

    let fragments = generation
        .start(state.completion.as_ref(), &prompt)
        .await?;

    let events = stream::unfold(
        Some((generation, fragments, String::new())),
        |current| async move {
            let Some((mut generation, mut fragments, mut buffer)) = current else {
                return None;
            };
            match fragments.next().await {
                Some(Ok(text)) => {
                    generation.record_fragment();
                    let event = if text.is_empty() {
                        None
                    } else {
                        buffer.push_str(&text);
                        Some(Event::default().event("fragment").data(sse_data(&text)))
                    };
                    Some((event, Some((generation, fragments, buffer))))
                }
                Some(Err(e)) => {
                    generation.fail(&e);
                    let message = AppError::from(e).user_message();
                    Some((Some(Event::default().event("error").data(sse_data(&message))), None))
                }
                None => {
                    generation.complete();
                    let plan = assemble_plan([buffer]);
                    if plan.is_none() {
                        info!("Completion returned no text; nothing to display");
                    }
                    let done = Event::default()
                        .event("done")
                        .data(json!({ "plan": plan }).to_string());
                    Some((Some(done), None))
                }
            }
        },
    )
    .filter_map(|event| async move { event.map(Ok::<_, Infallible>) });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// SSE data may not carry carriage returns; newlines are split into data lines by axum.
fn sse_data(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
