//! Settings and the `key=value` configuration file.
//!
//! Settings start from built-in defaults, are overridden by the configuration
//! file, then by command-line flags. After that only the word limit changes.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::chat::{Role, RoleSetting};
use crate::warn;

pub(crate) const DEFAULT_MODEL_NAME: &str = "qwen q2";
pub(crate) const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Please answer concisely.";
pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:1234/v1/chat/completions";
pub(crate) const TEMPERATURE: f64 = 0.7;

/// Keys recognized in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ConfigKey {
    ModelName,
    IncludeHistory,
    Role,
    SystemPrompt,
    ApiUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigEntry {
    pub line: usize,
    pub key: ConfigKey,
    pub value: String,
}

/// A line that could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigIssue {
    MissingSeparator { line: usize },
    UnknownKey { line: usize, key: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedConfig {
    pub entries: Vec<ConfigEntry>,
    pub issues: Vec<ConfigIssue>,
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parses the configuration file. Entries are returned in file order since
/// later keys may override earlier ones (e.g. `SYSTEM_PROMPT` after `ROLE`).
pub(crate) fn parse_config(raw: &str) -> ParsedConfig {
    let mut parsed = ParsedConfig::default();

    for (i, line) in raw.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some(kv) => kv,
            None => {
                parsed
                    .issues
                    .push(ConfigIssue::MissingSeparator { line: line_no });
                continue;
            }
        };

        let key = key.trim();
        let value = strip_quotes(value.trim());

        match ConfigKey::from_str(key) {
            Ok(key) => parsed.entries.push(ConfigEntry {
                line: line_no,
                key,
                value: value.to_string(),
            }),
            Err(_) => parsed.issues.push(ConfigIssue::UnknownKey {
                line: line_no,
                key: key.to_string(),
            }),
        }
    }

    parsed
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

fn get_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("config.ini");

    if local.exists() {
        return Some(local);
    }

    let home = std::env::var_os("HOME")?;
    let home = PathBuf::from(home);

    const USER_PATHS: [&str; 2] = [".config/chatline/config.ini", ".chatline.ini"];

    USER_PATHS
        .iter()
        .map(|path| home.join(path))
        .find(|path| path.exists())
}

/// Reads the configuration file, either the one given or the first one found
/// on the search path. A file that cannot be read is reported and skipped.
pub(crate) fn read_config(config: Option<PathBuf>) -> Option<(PathBuf, ParsedConfig)> {
    let path = config.or_else(get_config_path)?;

    log::debug!("reading configuration from {}", path.display());

    match std::fs::read_to_string(&path) {
        Ok(raw) => Some((path, parse_config(&raw))),
        Err(err) => {
            warn!("failed to read config {}: {}", path.display(), err);
            None
        }
    }
}

/// Command-line overrides. `None` leaves the setting alone.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub model: Option<String>,
    pub role: Option<String>,
    pub system_prompt: Option<String>,
    pub api_url: Option<String>,
    pub word_limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub model_name: String,
    pub system_prompt: String,
    pub role: RoleSetting,
    pub temperature: f64,
    pub api_url: Url,
    /// Parsed for compatibility; history is never sent.
    pub include_history: bool,
    /// Set when the configured `ROLE` was not a role and became the system prompt.
    pub role_was_prompt: bool,
    word_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            role: RoleSetting::default(),
            temperature: TEMPERATURE,
            // A compile-time constant, verified by tests
            api_url: Url::parse(DEFAULT_API_URL).expect("the default API URL is invalid"),
            include_history: false,
            role_was_prompt: false,
            word_limit: 0,
        }
    }
}

impl Settings {
    pub(crate) fn word_limit(&self) -> u32 {
        self.word_limit
    }

    /// The only setting that may change during a session. Zero means unlimited.
    pub(crate) fn set_word_limit(&mut self, word_limit: u32) {
        self.word_limit = word_limit;
    }

    fn set_api_url(&mut self, value: &str, origin: &str) {
        match Url::parse(value) {
            Ok(url) => self.api_url = url,
            Err(err) => warn!(
                "{}: invalid API URL \"{}\" ({}), using {}",
                origin, value, err, self.api_url
            ),
        }
    }

    pub(crate) fn apply_config(&mut self, config: &ParsedConfig) {
        for issue in &config.issues {
            match issue {
                ConfigIssue::MissingSeparator { line } => {
                    warn!("config line {} is not a key=value pair, ignoring", line)
                }
                ConfigIssue::UnknownKey { line, key } => {
                    warn!("config contains extraneous key \"{}\" on line {}, ignoring", key, line)
                }
            }
        }

        for ConfigEntry { line, key, value } in &config.entries {
            match key {
                ConfigKey::IncludeHistory => self.include_history = is_truthy(value),
                _ if value.is_empty() => {}
                ConfigKey::ModelName => self.model_name = value.clone(),
                ConfigKey::Role => match RoleSetting::parse(value) {
                    RoleSetting::Valid(role) => {
                        self.role = RoleSetting::Valid(role);
                        self.role_was_prompt = false;
                    }
                    RoleSetting::Unrecognized(prompt) => {
                        self.system_prompt = prompt;
                        self.role = RoleSetting::Valid(Role::User);
                        self.role_was_prompt = true;
                    }
                },
                ConfigKey::SystemPrompt => self.system_prompt = value.clone(),
                ConfigKey::ApiUrl => self.set_api_url(value, &format!("config line {}", line)),
            }
        }
    }

    pub(crate) fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(model) = overrides.model {
            self.model_name = model;
        }

        if let Some(role) = overrides.role {
            self.role = RoleSetting::parse(&role);
            self.role_was_prompt = false;
        }

        if let Some(prompt) = overrides.system_prompt {
            self.system_prompt = prompt;
        }

        if let Some(api_url) = overrides.api_url {
            self.set_api_url(&api_url, "--api-url");
        }

        if let Some(word_limit) = overrides.word_limit {
            self.word_limit = word_limit;
        }
    }

    /// The one-line summary printed at startup.
    pub(crate) fn summary(&self, config_path: Option<&Path>) -> String {
        let source = match config_path {
            Some(path) => path.display().to_string(),
            None => "defaults".to_string(),
        };

        let role = if self.role_was_prompt {
            "ROLE looked like a prompt so SYSTEM_PROMPT was set; sending role=user".to_string()
        } else {
            match &self.role {
                RoleSetting::Valid(role) => format!("role={}", role),
                RoleSetting::Unrecognized(value) => format!("role={} (invalid, sending user)", value),
            }
        };

        format!(
            "[config] source={}, model={}, include_history={}, {}",
            source, self.model_name, self.include_history, role
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
; Local model settings
# comments start with ; or #
MODEL_NAME = "llama-3.2-3b-instruct"
INCLUDE_HISTORY=Yes
  ROLE = assistant
API_URL=http://localhost:8080/v1/chat/completions
"#;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.model_name, "qwen q2");
        assert_eq!(settings.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(settings.role, RoleSetting::Valid(Role::User));
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.word_limit(), 0);
        assert!(!settings.include_history);
    }

    #[test]
    fn test_parse_config() {
        let parsed = parse_config(CONFIG);

        assert!(parsed.issues.is_empty());
        assert_eq!(
            parsed.entries[0],
            ConfigEntry {
                line: 4,
                key: ConfigKey::ModelName,
                value: "llama-3.2-3b-instruct".to_string(),
            }
        );
        assert_eq!(parsed.entries[2].key, ConfigKey::Role);
        assert_eq!(parsed.entries[2].value, "assistant");
        assert_eq!(parsed.entries.len(), 4);
    }

    #[test]
    fn test_parse_config_issues() {
        let parsed = parse_config("MODEL_NAME=a\nnonsense\nmodel_name=b\nTEMPERATURE=1\n");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(
            parsed.issues,
            vec![
                ConfigIssue::MissingSeparator { line: 2 },
                ConfigIssue::UnknownKey {
                    line: 3,
                    key: "model_name".to_string()
                },
                ConfigIssue::UnknownKey {
                    line: 4,
                    key: "TEMPERATURE".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_config_value_with_equals() {
        let parsed = parse_config("SYSTEM_PROMPT=\"a = b\"");

        assert_eq!(parsed.entries[0].value, "a = b");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"x\""), "x");
        assert_eq!(strip_quotes("\"\""), "");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("\"half"), "\"half");
    }

    #[test]
    fn test_apply_config() {
        let mut settings = Settings::default();

        settings.apply_config(&parse_config(CONFIG));

        assert_eq!(settings.model_name, "llama-3.2-3b-instruct");
        assert!(settings.include_history);
        assert_eq!(settings.role, RoleSetting::Valid(Role::Assistant));
        assert_eq!(
            settings.api_url.as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(settings.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_role_redirected_to_prompt() {
        let mut settings = Settings::default();

        settings.apply_config(&parse_config("ROLE=You are a pirate. Talk like one."));

        assert_eq!(settings.system_prompt, "You are a pirate. Talk like one.");
        assert_eq!(settings.role, RoleSetting::Valid(Role::User));
        assert!(settings.role_was_prompt);
        assert!(settings.summary(None).contains("ROLE looked like a prompt"));
    }

    #[test]
    fn test_later_keys_win() {
        let mut settings = Settings::default();

        settings.apply_config(&parse_config(
            "ROLE=You are a pirate.\nSYSTEM_PROMPT=You are a poet.\nROLE=system",
        ));

        assert_eq!(settings.system_prompt, "You are a poet.");
        assert_eq!(settings.role, RoleSetting::Valid(Role::System));
        assert!(!settings.role_was_prompt);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut settings = Settings::default();

        settings.apply_config(&parse_config(
            "MODEL_NAME=\nROLE=\"\"\nSYSTEM_PROMPT=\nAPI_URL=\nINCLUDE_HISTORY=",
        ));

        assert_eq!(settings.model_name, DEFAULT_MODEL_NAME);
        assert_eq!(settings.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(settings.api_url.as_str(), DEFAULT_API_URL);
        assert!(!settings.include_history);
    }

    #[test]
    fn test_truthy() {
        for value in ["true", "TRUE", "1", "yes", "Y"] {
            assert!(is_truthy(value), "{}", value);
        }

        for value in ["false", "0", "no", "on", "", "yes please"] {
            assert!(!is_truthy(value), "{}", value);
        }
    }

    #[test]
    fn test_invalid_api_url_is_ignored() {
        let mut settings = Settings::default();

        settings.apply_config(&parse_config("API_URL=not a url"));

        assert_eq!(settings.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_apply_overrides() {
        let mut settings = Settings::default();
        settings.apply_config(&parse_config("ROLE=You are a pirate."));

        settings.apply_overrides(Overrides {
            model: Some("phi-4".to_string()),
            role: Some("narrator".to_string()),
            system_prompt: None,
            api_url: Some("http://10.0.0.2:1234/v1/chat/completions".to_string()),
            word_limit: Some(25),
        });

        assert_eq!(settings.model_name, "phi-4");
        assert_eq!(
            settings.role,
            RoleSetting::Unrecognized("narrator".to_string())
        );
        assert!(!settings.role_was_prompt);
        // The prompt taken from ROLE survives
        assert_eq!(settings.system_prompt, "You are a pirate.");
        assert_eq!(settings.api_url.host_str(), Some("10.0.0.2"));
        assert_eq!(settings.word_limit(), 25);
    }

    #[test]
    fn test_set_word_limit() {
        let mut settings = Settings::default();

        settings.set_word_limit(40);
        assert_eq!(settings.word_limit(), 40);

        settings.set_word_limit(0);
        assert_eq!(settings.word_limit(), 0);
    }

    #[test]
    fn test_read_config_file() {
        let path = std::env::temp_dir().join(format!("chatline-test-{}.ini", std::process::id()));
        std::fs::write(&path, CONFIG).unwrap();

        let (read_path, parsed) = read_config(Some(path.clone())).expect("config not read");

        assert_eq!(read_path, path);
        assert_eq!(parsed, parse_config(CONFIG));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_missing_config() {
        let path = std::env::temp_dir().join("chatline-test-does-not-exist.ini");

        assert!(read_config(Some(path)).is_none());
    }
}
