//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, credential loading from
//! `~/.env`, and the resolved [`ChatConfig`] that the client and session are built
//! from.  Nothing reads the environment after startup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::single_shot::SingleShot;
use crate::client::DEFAULT_API_URL;
use crate::error::{Error, Result};
use crate::types::Model;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VARIABLE: &str = "GOOGLE_API_KEY";

/// Default maximum tokens per response.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Default HTTP timeout for a single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const MAX_TEMPERATURE: f32 = 2.0;

/// Command-line arguments for the gemini-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// File whose contents are used as context (single-shot mode).
    #[arrrg(optional, "File to use as context (single-shot mode)", "PATH")]
    pub file: Option<String>,

    /// File the response is written to (single-shot mode).
    #[arrrg(optional, "File to save the response to (single-shot mode)", "PATH")]
    pub output: Option<String>,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.0-flash)", "MODEL")]
    pub model: Option<String>,

    /// System instruction sent with every request.
    #[arrrg(optional, "System instruction for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 8192)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature, kept as text until validated.
    #[arrrg(optional, "Sampling temperature between 0.0 and 2.0", "TEMP")]
    pub temperature: Option<String>,

    /// Append every request and response as JSON lines to this file.
    #[arrrg(optional, "Log requests and responses as JSON lines", "PATH")]
    pub log_requests: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// The Gemini API key.  Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, rejecting empty values.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(Error::configuration(format!(
                "{API_KEY_VARIABLE} is empty"
            )));
        }
        Ok(Self(value))
    }

    /// The raw key, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `~/.env`, when a home directory is known.
    pub fn default_env_file() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".env"))
    }

    /// Loads the key from the process environment, falling back to `~/.env`.
    pub fn load() -> Result<Self> {
        let process_value = std::env::var(API_KEY_VARIABLE).ok();
        Self::resolve(process_value, Self::default_env_file().as_deref())
    }

    /// Resolves the key from an already-read process value and an optional env file.
    ///
    /// A non-empty process value wins.  The env file is parsed without touching the
    /// process environment; a missing file is the same as a file without the key.
    pub fn resolve(process_value: Option<String>, env_file: Option<&Path>) -> Result<Self> {
        if let Some(value) = process_value.filter(|v| !v.trim().is_empty()) {
            return Self::new(value);
        }
        let from_file = match env_file {
            Some(path) => Self::from_env_file(path)?,
            None => None,
        };
        match from_file {
            Some(value) => Self::new(value),
            None => Err(Error::configuration(format!(
                "{API_KEY_VARIABLE} was not found in the environment or in ~/.env"
            ))),
        }
    }

    /// Reads `GOOGLE_API_KEY` from a dotenv-style file.
    pub fn from_env_file(path: &Path) -> Result<Option<String>> {
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(err) if err.not_found() => return Ok(None),
            Err(err) => {
                return Err(Error::configuration(format!(
                    "cannot read {}: {err}",
                    path.display()
                )));
            }
        };
        for entry in entries {
            let (key, value) = entry.map_err(|err| {
                Error::configuration(format!("cannot parse {}: {err}", path.display()))
            })?;
            if key == API_KEY_VARIABLE {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Credential for the Gemini API.
    pub api_key: ApiKey,

    /// The model to use for generating responses.
    pub model: Model,

    /// Optional system instruction.
    pub system_prompt: Option<String>,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// API endpoint root.
    pub base_url: String,

    /// HTTP timeout per remote call.
    pub timeout: Duration,

    /// Where to append the JSON-lines request log, if anywhere.
    pub request_log: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.0-flash
    /// - Max tokens: 8192
    /// - Color: enabled
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: Model::default(),
            system_prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            use_color: true,
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            request_log: None,
        }
    }

    /// Resolves command-line arguments on top of the defaults.
    pub fn from_args(args: &ChatArgs, api_key: ApiKey) -> Result<Self> {
        let mut config = Self::new(api_key);
        if let Some(model) = &args.model {
            let model = model.parse::<Model>().map_err(Error::configuration)?;
            config = config.with_model(model);
        }
        if let Some(system) = &args.system {
            config = config.with_system_prompt(system.clone());
        }
        if let Some(max_tokens) = args.max_tokens {
            if max_tokens == 0 {
                return Err(Error::configuration("--max-tokens must be positive"));
            }
            config = config.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = &args.temperature {
            config = config.with_temperature(Some(parse_temperature(temperature)?));
        }
        if let Some(path) = &args.log_requests {
            config = config.with_request_log(Some(PathBuf::from(path)));
        }
        if args.no_color {
            config = config.without_color();
        }
        Ok(config)
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Points the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the request log path.
    pub fn with_request_log(mut self, path: Option<PathBuf>) -> Self {
        self.request_log = path;
        self
    }
}

fn parse_temperature(text: &str) -> Result<f32> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("invalid temperature '{text}'")))?;
    if !(0.0..=MAX_TEMPERATURE).contains(&value) {
        return Err(Error::configuration(format!(
            "temperature must be between 0.0 and {MAX_TEMPERATURE}, got {value}"
        )));
    }
    Ok(value)
}

/// How the program runs, decided once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read-eval-print loop, optionally primed with a first message.
    Interactive {
        /// Positional words joined with spaces, if any were given.
        initial_prompt: Option<String>,
    },

    /// One request, one response.  Selected by `--file` or `--output`.
    SingleShot(SingleShot),
}

impl Mode {
    /// Picks the mode from parsed flags and the leftover positional words.
    pub fn resolve(args: &ChatArgs, words: &[String]) -> Self {
        let prompt = words.join(" ");
        if args.file.is_some() || args.output.is_some() {
            return Mode::SingleShot(SingleShot::new(
                prompt,
                args.file.as_ref().map(PathBuf::from),
                args.output.as_ref().map(PathBuf::from),
            ));
        }
        let initial_prompt = Some(prompt).filter(|p| !p.trim().is_empty());
        Mode::Interactive { initial_prompt }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::KnownModel;

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[test]
    fn default_config() {
        let config = ChatConfig::new(key());
        assert_eq!(config.model, Model::Known(KnownModel::Gemini20Flash));
        assert_eq!(config.max_tokens, 8192);
        assert!(config.use_color);
        assert!(config.system_prompt.is_none());
        assert!(config.temperature.is_none());
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.request_log.is_none());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            system: Some("You are helpful.".to_string()),
            max_tokens: Some(1024),
            temperature: Some("0.4".to_string()),
            log_requests: Some("requests.jsonl".to_string()),
            no_color: true,
            ..ChatArgs::default()
        };
        let config = ChatConfig::from_args(&args, key()).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.system_prompt, Some("You are helpful.".to_string()));
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.request_log, Some(PathBuf::from("requests.jsonl")));
        assert!(!config.use_color);
    }

    #[test]
    fn config_rejects_bad_temperature() {
        for bad in ["hot", "-0.1", "2.5"] {
            let args = ChatArgs {
                temperature: Some(bad.to_string()),
                ..ChatArgs::default()
            };
            let err = ChatConfig::from_args(&args, key()).unwrap_err();
            assert!(err.is_configuration(), "{bad}: {err}");
        }
    }

    #[test]
    fn config_rejects_zero_max_tokens() {
        let args = ChatArgs {
            max_tokens: Some(0),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::from_args(&args, key()).unwrap_err().is_configuration());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new(key())
            .with_model(Model::Custom("tunedModels/mine".to_string()))
            .with_system_prompt("Be brief".to_string())
            .with_max_tokens(256)
            .with_temperature(Some(1.0))
            .with_base_url("http://localhost:9999/")
            .with_timeout(Duration::from_secs(5))
            .without_color();
        assert_eq!(config.model, Model::Custom("tunedModels/mine".to_string()));
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.base_url, "http://localhost:9999/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.use_color);
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        assert!(!format!("{key:?}").contains("super-secret"));
        assert_eq!(key.expose(), "super-secret");
    }

    #[test]
    fn api_key_rejects_empty() {
        assert!(ApiKey::new("   ").unwrap_err().is_configuration());
    }

    #[test]
    fn api_key_process_value_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GOOGLE_API_KEY=from-file").unwrap();
        let key = ApiKey::resolve(Some("from-process".to_string()), Some(file.path())).unwrap();
        assert_eq!(key.expose(), "from-process");
    }

    #[test]
    fn api_key_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# credentials").unwrap();
        writeln!(file, "OTHER=1").unwrap();
        writeln!(file, "GOOGLE_API_KEY=\"from-file\"").unwrap();
        let key = ApiKey::resolve(None, Some(file.path())).unwrap();
        assert_eq!(key.expose(), "from-file");

        let key = ApiKey::resolve(Some(String::new()), Some(file.path())).unwrap();
        assert_eq!(key.expose(), "from-file");
    }

    #[test]
    fn api_key_missing_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(".env");
        let err = ApiKey::resolve(None, Some(&missing)).unwrap_err();
        assert!(err.is_configuration());
        assert!(ApiKey::resolve(None, None).unwrap_err().is_configuration());
    }

    #[test]
    fn mode_interactive_without_flags() {
        let args = ChatArgs::default();
        assert_eq!(
            Mode::resolve(&args, &[]),
            Mode::Interactive {
                initial_prompt: None
            }
        );
        let words = vec!["tell".to_string(), "me".to_string(), "a joke".to_string()];
        assert_eq!(
            Mode::resolve(&args, &words),
            Mode::Interactive {
                initial_prompt: Some("tell me a joke".to_string())
            }
        );
    }

    #[test]
    fn mode_single_shot_with_file_or_output() {
        let args = ChatArgs {
            output: Some("answer.txt".to_string()),
            ..ChatArgs::default()
        };
        let words = vec!["why?".to_string()];
        match Mode::resolve(&args, &words) {
            Mode::SingleShot(job) => {
                assert_eq!(job.prompt(), "why?");
                assert!(job.file().is_none());
                assert_eq!(job.output(), Some(Path::new("answer.txt")));
            }
            other => panic!("expected single-shot, got {other:?}"),
        }
    }
}
