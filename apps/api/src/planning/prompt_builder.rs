//! Prompt Builder — turns a validated form into the prompt sent to the model.
//!
//! Field values are inserted verbatim in a single pass over the template: a
//! value that itself looks like a placeholder (e.g. `{objetivo}`) is never
//! expanded again.

use serde::Deserialize;

use crate::errors::{AppError, MISSING_FIELDS_MESSAGE};
use crate::planning::methodology::{Methodology, MethodologyParseError};
use crate::planning::prompts::{
    template_for, MATERIALS_PLACEHOLDER, OBJECTIVE_PLACEHOLDER, TITLE_PLACEHOLDER,
};

/// Raw form submission, exactly as the page sends it. Every field may be blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanForm {
    #[serde(default, alias = "titulo")]
    pub title: String,
    #[serde(default, alias = "objetivo")]
    pub objective: String,
    #[serde(default, alias = "materiais")]
    pub materials: String,
    #[serde(default, alias = "metodologia")]
    pub methodology: String,
}

/// A submission that passed validation. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub title: String,
    pub objective: String,
    pub materials: String,
    pub methodology: Methodology,
}

impl PlanForm {
    /// All four fields are required; the methodology must be a known variant.
    /// Text fields only need to be non-empty and are passed on untouched.
    pub fn validate(self) -> Result<UserInput, AppError> {
        let any_blank = [&self.title, &self.objective, &self.materials]
            .iter()
            .any(|field| field.is_empty());
        if any_blank {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let methodology = self.methodology.parse::<Methodology>().map_err(|e| match e {
            MethodologyParseError::Blank => {
                AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())
            }
            MethodologyParseError::Unknown(value) => AppError::Validation(format!(
                "Metodologia desconhecida: '{value}'. Escolha Científica ou Engenharia."
            )),
        })?;

        Ok(UserInput {
            title: self.title,
            objective: self.objective,
            materials: self.materials,
            methodology,
        })
    }
}

/// Builds the prompt for a validated submission. Pure and deterministic.
pub fn build_prompt(input: &UserInput) -> String {
    let template = template_for(input.methodology);

    render_template(template.text, |name| match name {
        TITLE_PLACEHOLDER => Some(input.title.as_str()),
        OBJECTIVE_PLACEHOLDER => Some(input.objective.as_str()),
        MATERIALS_PLACEHOLDER => Some(input.materials.as_str()),
        _ => None,
    })
}

/// Replaces `{name}` placeholders in one left-to-right pass.
/// Unknown names and unbalanced braces are copied through untouched.
pub fn render_template<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) => match lookup(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
