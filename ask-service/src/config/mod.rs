use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Gemini model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Directory, relative to the working directory, holding the knowledge file.
pub const DEFAULT_KNOWLEDGE_DIR: &str = "knowledge_json";

pub const DEFAULT_KNOWLEDGE_FILE: &str = "data.json";

/// Character budget for the context sent with every question.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 14_000;

#[derive(Debug, Clone)]
pub struct AskConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub knowledge: KnowledgeSettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    /// Upstream request timeout. `None` leaves the call unbounded.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeSettings {
    pub dir: PathBuf,
    pub file_name: String,
    pub max_context_chars: usize,
}

impl KnowledgeSettings {
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl AskConfig {
    /// Build the configuration from the environment (and `.env`).
    ///
    /// Fails when `GEMINI_API_KEY` is missing or blank, or when a numeric
    /// setting does not parse.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let api_key = get_env("GEMINI_API_KEY", None)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY is set but empty"
            )));
        }

        let knowledge_dir = match optional_env("KNOWLEDGE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "Failed to determine the current directory: {}",
                        e
                    ))
                })?
                .join(DEFAULT_KNOWLEDGE_DIR),
        };

        Ok(AskConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL))?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE))?,
                timeout_secs: optional_env("GEMINI_TIMEOUT_SECS")
                    .map(|raw| parse_value("GEMINI_TIMEOUT_SECS", &raw))
                    .transpose()?,
            },
            knowledge: KnowledgeSettings {
                dir: knowledge_dir,
                file_name: get_env("KNOWLEDGE_FILE", Some(DEFAULT_KNOWLEDGE_FILE))?,
                max_context_chars: parse_value(
                    "MAX_CONTEXT_CHARS",
                    &get_env(
                        "MAX_CONTEXT_CHARS",
                        Some(&DEFAULT_MAX_CONTEXT_CHARS.to_string()),
                    )?,
                )?,
            },
            observability: ObservabilitySettings {
                log_level: get_env("LOG_LEVEL", Some("info"))?,
                otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn parse_value_accepts_padded_numbers() {
        let value: usize = parse_value("MAX_CONTEXT_CHARS", " 2048 ").unwrap();
        assert_eq!(value, 2048);
    }

    #[test]
    fn parse_value_names_the_offending_key() {
        let err = parse_value::<u64>("GEMINI_TIMEOUT_SECS", "soon").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("GEMINI_TIMEOUT_SECS"));
        assert!(message.contains("soon"));
    }

    #[test]
    fn get_env_uses_default_for_unset_key() {
        let value = get_env("ASK_SERVICE_TEST_UNSET_KEY", Some("fallback")).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_without_default_is_a_config_error() {
        let err = get_env("ASK_SERVICE_TEST_UNSET_KEY", None).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("ASK_SERVICE_TEST_UNSET_KEY is required"));
    }

    // Single test so the GEMINI_API_KEY mutations run in sequence.
    #[test]
    fn load_requires_non_blank_api_key() {
        let previous = env::var("GEMINI_API_KEY").ok();

        env::remove_var("GEMINI_API_KEY");
        let err = AskConfig::load().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY is required but not set"
        );

        env::set_var("GEMINI_API_KEY", "   ");
        let err = AskConfig::load().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY is set but empty"
        );

        env::set_var("GEMINI_API_KEY", "live-key");
        let config = AskConfig::load().unwrap();
        assert_eq!(config.gemini.api_key.expose_secret(), "live-key");
        assert_eq!(config.gemini.model, DEFAULT_MODEL);

        match previous {
            Some(value) => env::set_var("GEMINI_API_KEY", value),
            None => env::remove_var("GEMINI_API_KEY"),
        }
    }

    #[test]
    fn knowledge_file_path_joins_dir_and_name() {
        let settings = KnowledgeSettings {
            dir: PathBuf::from("/srv/knowledge_json"),
            file_name: DEFAULT_KNOWLEDGE_FILE.to_string(),
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        };
        assert_eq!(
            settings.file_path(),
            PathBuf::from("/srv/knowledge_json/data.json")
        );
    }
}
