// Cross-cutting prompt fragments shared by every completion call.
// Feature-specific templates live next to the feature (see planning::prompts).

/// Appended to the system message so plans come back in Brazilian Portuguese
/// regardless of the language the student typed in.
pub const PORTUGUESE_INSTRUCTION: &str = "Responda sempre em português do Brasil.";
