use crate::error::{ExtractionError, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Largest request Gemini accepts with the document inlined.
pub const INLINE_LIMIT_BYTES: usize = 20 * 1024 * 1024;

/// How the PDF reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTransport {
    /// Inline below [`INLINE_LIMIT_BYTES`], File API above.
    Auto,
    Inline,
    FileApi,
    /// Text pulled out of the PDF locally.
    Text,
}

impl FromStr for DocumentTransport {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "inline" => Ok(Self::Inline),
            "file_api" | "file-api" | "file" => Ok(Self::FileApi),
            "text" => Ok(Self::Text),
            other => Err(ExtractionError::Config(format!(
                "unknown DOCUMENT_TRANSPORT '{}' (expected auto, inline, file_api or text)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub transport: DocumentTransport,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            timeout_secs: 300,
            transport: DocumentTransport::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Reads the process environment. Call once at startup, after `.env` is loaded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ExtractionError::Config("GEMINI_API_KEY environment variable not set".to_string())
            })?;

        let mut gemini = GeminiConfig::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL") {
            gemini.model = model.trim().trim_start_matches("models/").to_string();
        }
        if let Some(base) = lookup("GEMINI_API_BASE") {
            gemini.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("GEMINI_TEMPERATURE") {
            gemini.temperature = parse_var("GEMINI_TEMPERATURE", &value)?;
        }
        if let Some(value) = lookup("GEMINI_MAX_OUTPUT_TOKENS") {
            gemini.max_output_tokens = parse_var("GEMINI_MAX_OUTPUT_TOKENS", &value)?;
        }
        if let Some(value) = lookup("GEMINI_TIMEOUT_SECS") {
            gemini.timeout_secs = parse_var("GEMINI_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("DOCUMENT_TRANSPORT") {
            gemini.transport = value.parse()?;
        }

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(value) => parse_var("MAX_UPLOAD_BYTES", &value)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            gemini,
            bind_addr,
            max_upload_bytes,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ExtractionError::Config(format!("{} has an invalid value '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "AIza-test")])).unwrap();
        assert_eq!(config.gemini.api_key, "AIza-test");
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert_eq!(config.gemini.api_base, DEFAULT_API_BASE);
        assert_eq!(config.gemini.transport, DocumentTransport::Auto);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        assert!(Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "models/gemini-2.5-flash"),
            ("GEMINI_API_BASE", "http://localhost:9000/"),
            ("GEMINI_TEMPERATURE", "0.7"),
            ("GEMINI_MAX_OUTPUT_TOKENS", "2048"),
            ("DOCUMENT_TRANSPORT", "file_api"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ]))
        .unwrap();

        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.api_base, "http://localhost:9000");
        assert_eq!(config.gemini.temperature, 0.7);
        assert_eq!(config.gemini.max_output_tokens, 2048);
        assert_eq!(config.gemini.transport, DocumentTransport::FileApi);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn bad_numbers_and_transports_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("MAX_UPLOAD_BYTES", "lots"),
        ]))
        .is_err());

        assert!("carrier-pigeon".parse::<DocumentTransport>().is_err());
        assert_eq!("TEXT".parse::<DocumentTransport>().unwrap(), DocumentTransport::Text);
    }
}
