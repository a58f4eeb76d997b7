//! Methodology — the closed set of project types a student can pick.
//!
//! The form sends the Portuguese label ("Científica" / "Engenharia"). Anything
//! else, including the blank "choose one" option, is rejected before a prompt
//! is ever built.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Methodology {
    #[serde(rename = "Científica")]
    Scientific,
    #[serde(rename = "Engenharia")]
    Engineering,
}

/// Why a submitted methodology value could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodologyParseError {
    Blank,
    Unknown(String),
}

impl Methodology {
    pub const ALL: [Methodology; 2] = [Methodology::Scientific, Methodology::Engineering];

    /// The label shown in the form and sent back on submission.
    pub fn label(self) -> &'static str {
        match self {
            Methodology::Scientific => "Científica",
            Methodology::Engineering => "Engenharia",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Methodology {
    type Err = MethodologyParseError;

    /// Case-insensitive; the accent on "Científica" is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('í', "i");
        match normalized.as_str() {
            "" => Err(MethodologyParseError::Blank),
            "cientifica" => Ok(Methodology::Scientific),
            "engenharia" => Ok(Methodology::Engineering),
            _ => Err(MethodologyParseError::Unknown(s.trim().to_string())),
        }
    }
}
