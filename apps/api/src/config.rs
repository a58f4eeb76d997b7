use anyhow::{Context, Result};

pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_BRAND_NAME: &str = "Faísca";
pub const DEFAULT_BRAND_TAGLINE: &str = "Um chatbot de inteligência artificial feito sob medida para \
    alunos da educação básica. Ele não é apenas um assistente; é uma fonte de inspiração que vai \
    acender sua criatividade e ajudar você a gerar ideias para seus projetos.";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub brand: Brand,
    pub port: u16,
    pub rust_log: String,
}

/// Branding shown on the form page. One core serves every branding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub name: String,
    pub tagline: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            name: DEFAULT_BRAND_NAME.to_string(),
            tagline: DEFAULT_BRAND_TAGLINE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Brand::default();

        Ok(Config {
            groq_api_key: get("GROQ_API_KEY").with_context(|| {
                "Required environment variable 'GROQ_API_KEY' is not set".to_string()
            })?,
            groq_api_url: get("GROQ_API_URL").unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string()),
            brand: Brand {
                name: get("BRAND_NAME").unwrap_or(defaults.name),
                tagline: get("BRAND_TAGLINE").unwrap_or(defaults.tagline),
            },
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
