//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_TRANSLATION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";
/// Sample rate the speech model renders raw PCM at.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
pub const DEFAULT_CHANNELS: u16 = 1;
pub const DEFAULT_GATEWAY_PORT: u16 = 8787;

/// Top-level Tannoy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GeminiConfig {
    /// Resolve the API key: check `api_key` first, then the `api_key_env` environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        let env = self
            .api_key_env
            .clone()
            .or_else(|| Some(DEFAULT_API_KEY_ENV.to_string()));
        resolve_secret_field(&self.api_key, &env)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Prebuilt voice name (e.g. "Kore", "Puck").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_GATEWAY_PORT
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "plain" (default) or "json".
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log level override (trace/debug/info/warn/error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Per-crate log level overrides (e.g. "tannoy_providers=debug").
    #[serde(default)]
    pub filters: Vec<String>,

    /// Output target: "stderr" (default) or "stdout".
    #[serde(default = "default_log_output")]
    pub output: String,
}

fn default_log_format() -> String {
    "plain".into()
}

fn default_log_output() -> String {
    "stderr".into()
}

/// Resolve a secret: check the direct value first, then the env-var reference.
pub fn resolve_secret_field(direct: &Option<String>, env_var: &Option<String>) -> Option<String> {
    if let Some(val) = direct {
        if !val.is_empty() {
            return Some(val.clone());
        }
    }
    if let Some(env) = env_var {
        if let Ok(val) = std::env::var(env) {
            if !val.is_empty() {
                return Some(val);
            }
        }
    }
    None
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> crate::error::Result<String> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| crate::error::TannoyError::Config(e.to_string()))?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .into_owned())
}

impl Config {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;

        // Substitute ${ENV_VAR} references before parsing
        let substituted = substitute_env_vars(&raw)?;

        let config: Config = json5::from_str(&substituted)
            .map_err(|e| crate::error::TannoyError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Default config file path.
    pub fn config_path() -> PathBuf {
        data_dir().join("config.json")
    }

    pub fn api_key(&self) -> Option<String> {
        self.gemini
            .clone()
            .unwrap_or_default()
            .resolve_api_key()
    }

    pub fn gemini_base_url(&self) -> String {
        self.gemini
            .as_ref()
            .and_then(|g| g.base_url.as_deref())
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn translation_model(&self) -> String {
        self.translation
            .as_ref()
            .and_then(|t| t.model.clone())
            .unwrap_or_else(|| DEFAULT_TRANSLATION_MODEL.to_string())
    }

    pub fn speech_model(&self) -> String {
        self.speech
            .as_ref()
            .and_then(|s| s.model.clone())
            .unwrap_or_else(|| DEFAULT_SPEECH_MODEL.to_string())
    }

    pub fn voice(&self) -> String {
        self.speech
            .as_ref()
            .and_then(|s| s.voice.clone())
            .unwrap_or_else(|| DEFAULT_VOICE.to_string())
    }

    pub fn sample_rate(&self) -> u32 {
        self.speech
            .as_ref()
            .and_then(|s| s.sample_rate)
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    pub fn channels(&self) -> u16 {
        self.speech
            .as_ref()
            .and_then(|s| s.channels)
            .unwrap_or(DEFAULT_CHANNELS)
    }

    /// Gateway port.
    pub fn gateway_port(&self) -> u16 {
        self.gateway
            .as_ref()
            .map(|g| g.port)
            .unwrap_or(DEFAULT_GATEWAY_PORT)
    }

    pub fn gateway_bind(&self) -> String {
        self.gateway
            .as_ref()
            .and_then(|g| g.bind.clone())
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    /// Validate the config, returning `(warnings, errors)`.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if self.api_key().is_none() {
            let env = self
                .gemini
                .as_ref()
                .and_then(|g| g.api_key_env.as_deref())
                .unwrap_or(DEFAULT_API_KEY_ENV);
            warnings.push(format!(
                "No Gemini API key configured (set gemini.api_key or {env})"
            ));
        }

        if self.sample_rate() == 0 {
            errors.push("speech.sample_rate must be greater than zero".to_string());
        }
        if self.channels() == 0 {
            errors.push("speech.channels must be greater than zero".to_string());
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
                warnings.push(format!("Unknown logging.level '{level}'"));
            }
        }

        (warnings, errors)
    }

    /// Fail if `validate()` reports any errors. Warnings are logged by callers.
    pub fn ensure_valid(&self) -> crate::error::Result<()> {
        let (_, errors) = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(crate::error::TannoyError::Config(errors.join("; ")))
        }
    }
}

/// Tannoy's data directory (`~/.tannoy`).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tannoy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_substitution() {
        // SAFETY: test-only, single-threaded test runner
        unsafe { std::env::set_var("TEST_TANNOY_KEY", "key-test-123") };
        let input = r#"{"key": "${TEST_TANNOY_KEY}", "other": "plain"}"#;
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("key-test-123"));
        assert!(result.contains("plain"));
        unsafe { std::env::remove_var("TEST_TANNOY_KEY") };
    }

    #[test]
    fn test_env_var_missing() {
        let input = r#"{"key": "${NONEXISTENT_VAR_TANNOY_TEST}"}"#;
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains(r#""""#)); // empty string
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateway_port(), DEFAULT_GATEWAY_PORT);
        assert_eq!(config.sample_rate(), 24_000);
        assert_eq!(config.channels(), 1);
        assert_eq!(config.voice(), "Kore");
        assert_eq!(config.gemini_base_url(), DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_gemini_resolve_api_key() {
        // SAFETY: test-only, single-threaded test runner
        unsafe { std::env::set_var("TEST_TANNOY_API_KEY", "from-env") };
        let gemini = GeminiConfig {
            api_key: None,
            api_key_env: Some("TEST_TANNOY_API_KEY".into()),
            base_url: None,
        };
        assert_eq!(gemini.resolve_api_key(), Some("from-env".into()));

        let gemini2 = GeminiConfig {
            api_key: Some("direct-key".into()),
            api_key_env: Some("TEST_TANNOY_API_KEY".into()),
            base_url: None,
        };
        // Direct key takes priority
        assert_eq!(gemini2.resolve_api_key(), Some("direct-key".into()));
        unsafe { std::env::remove_var("TEST_TANNOY_API_KEY") };
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.json")).unwrap();
        assert!(config.speech.is_none());
        assert_eq!(config.speech_model(), DEFAULT_SPEECH_MODEL);
    }

    #[test]
    fn test_load_json5_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                // comments are allowed
                gemini: { base_url: "http://localhost:9999/" },
                speech: { voice: "Puck", sample_rate: 16000 },
                gateway: { port: 9000 },
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.gemini_base_url(), "http://localhost:9999");
        assert_eq!(config.voice(), "Puck");
        assert_eq!(config.sample_rate(), 16_000);
        assert_eq!(config.channels(), 1);
        assert_eq!(config.gateway_port(), 9000);
        assert_eq!(config.translation_model(), DEFAULT_TRANSLATION_MODEL);
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ speech: ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, crate::error::TannoyError::Config(_)));
    }

    #[test]
    fn test_logging_config_defaults() {
        // Deserialize an empty logging config to get the serde defaults
        let json_str = r#"{ "logging": {} }"#;
        let config: Config = json5::from_str(json_str).unwrap();
        let logging = config.logging.expect("logging should be present");
        assert_eq!(logging.format, "plain");
        assert!(logging.level.is_none());
        assert_eq!(logging.output, "stderr");
        assert!(logging.filters.is_empty());
    }

    #[test]
    fn test_validate_missing_api_key_warns() {
        let config = Config {
            gemini: Some(GeminiConfig {
                api_key: None,
                api_key_env: Some("TANNOY_TEST_UNSET_KEY".into()),
                base_url: None,
            }),
            ..Config::default()
        };
        let (warnings, errors) = config.validate();
        assert!(errors.is_empty());
        assert!(
            warnings.iter().any(|w| w.contains("TANNOY_TEST_UNSET_KEY")),
            "Expected a warning about the missing key, got: {warnings:?}"
        );
    }

    #[test]
    fn test_validate_zero_format_errors() {
        let config = Config {
            gemini: Some(GeminiConfig {
                api_key: Some("k".into()),
                ..GeminiConfig::default()
            }),
            speech: Some(SpeechConfig {
                sample_rate: Some(0),
                channels: Some(0),
                ..SpeechConfig::default()
            }),
            ..Config::default()
        };
        let (warnings, errors) = config.validate();
        assert!(warnings.is_empty());
        assert_eq!(errors.len(), 2);

        let err = config.ensure_valid().unwrap_err();
        assert!(matches!(err, crate::error::TannoyError::Config(_)));
        assert!(err.to_string().contains("speech.channels"));
        assert!(err.to_string().contains("speech.sample_rate"));
    }

    #[test]
    fn test_ensure_valid_accepts_defaults() {
        assert!(Config::default().ensure_valid().is_ok());
    }
}
