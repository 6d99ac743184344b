use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub wake: WakeConfig,

    #[serde(default)]
    pub stt: SttConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub apps: HashMap<String, AppTargets>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    #[serde(default = "default_prompt_name")]
    pub prompt_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            assistant_name: default_assistant_name(),
            prompt_name: default_prompt_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    #[serde(default)]
    pub preferred_sample_rate: Option<u32>,

    #[serde(default = "default_capture_seconds")]
    pub capture_seconds: f32,

    #[serde(default = "default_block_frames")]
    pub block_frames: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            preferred_sample_rate: None,
            capture_seconds: default_capture_seconds(),
            block_frames: default_block_frames(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    Wake,
    Manual,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TriggerConfig {
    #[serde(default = "default_trigger_mode")]
    pub mode: TriggerMode,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            mode: default_trigger_mode(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WakeConfig {
    #[serde(default = "default_wake_engine")]
    pub engine: String,

    #[serde(default = "default_keyword")]
    pub keyword: String,

    #[serde(default)]
    pub keyword_path: Option<String>,

    /// Activation credential for the wake engine. Required in wake mode;
    /// usually injected via `${PICOVOICE_ACCESS_KEY}` interpolation.
    #[serde(default)]
    pub access_key: String,

    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            engine: default_wake_engine(),
            keyword: default_keyword(),
            keyword_path: None,
            access_key: String::new(),
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SttConfig {
    #[serde(default = "default_stt_engine")]
    pub engine: String,

    #[serde(default)]
    pub model_path: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            engine: default_stt_engine(),
            model_path: None,
            language: default_language(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_engine")]
    pub engine: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: default_speech_engine(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotesConfig {
    #[serde(default = "default_notes_file")]
    pub file: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            file: default_notes_file(),
        }
    }
}

/// Per-OS launch targets for one allowlist entry.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppTargets {
    #[serde(default)]
    pub win: Option<String>,

    #[serde(default)]
    pub mac: Option<String>,

    #[serde(default)]
    pub linux: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_assistant_name() -> String {
    "Hark".to_string()
}

fn default_prompt_name() -> String {
    "HARK".to_string()
}

fn default_capture_seconds() -> f32 {
    4.0
}

fn default_block_frames() -> u32 {
    1024
}

fn default_trigger_mode() -> TriggerMode {
    TriggerMode::Wake
}

fn default_wake_engine() -> String {
    "energy".to_string()
}

fn default_keyword() -> String {
    "hark".to_string()
}

fn default_threshold() -> f32 {
    0.03
}

fn default_stt_engine() -> String {
    "null".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_speech_engine() -> String {
    "console".to_string()
}

fn default_notes_file() -> String {
    "hark_notes.txt".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Startup validation. Anything rejected here is fatal before the
    /// session loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.capture_seconds <= 0.0 {
            return Err(ConfigError::Invalid(
                "audio.capture_seconds must be positive".to_string(),
            ));
        }
        if self.audio.block_frames == 0 {
            return Err(ConfigError::Invalid(
                "audio.block_frames must be positive".to_string(),
            ));
        }
        if self.trigger.mode == TriggerMode::Wake {
            if self.wake.access_key.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "wake mode requires wake.access_key (set it in the config, \
                     e.g. access_key = \"${PICOVOICE_ACCESS_KEY}\")"
                        .to_string(),
                ));
            }
            if self.wake.keyword.trim().is_empty() && self.wake.keyword_path.is_none() {
                return Err(ConfigError::Invalid(
                    "wake mode requires wake.keyword or wake.keyword_path".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_valid_toml() {
        let toml_str = r#"
[general]
log_level = "debug"
assistant_name = "Echo"

[audio]
preferred_sample_rate = 16000
capture_seconds = 3.5

[trigger]
mode = "manual"

[stt]
engine = "whisper"
model_path = "./models/ggml-small.bin"
language = "en"

[apps.terminal]
linux = "gnome-terminal"
mac = "Terminal"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.assistant_name, "Echo");
        assert_eq!(config.audio.preferred_sample_rate, Some(16000));
        assert_eq!(config.audio.capture_seconds, 3.5);
        assert_eq!(config.trigger.mode, TriggerMode::Manual);
        assert_eq!(config.stt.engine, "whisper");
        assert_eq!(
            config.stt.model_path.as_deref(),
            Some("./models/ggml-small.bin")
        );
        let terminal = config.apps.get("terminal").unwrap();
        assert_eq!(terminal.linux.as_deref(), Some("gnome-terminal"));
        assert_eq!(terminal.mac.as_deref(), Some("Terminal"));
        assert!(terminal.win.is_none());
    }

    #[test]
    fn test_config_default_values() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.assistant_name, "Hark");
        assert_eq!(config.general.prompt_name, "HARK");
        assert!(config.audio.preferred_sample_rate.is_none());
        assert_eq!(config.audio.capture_seconds, 4.0);
        assert_eq!(config.audio.block_frames, 1024);
        assert_eq!(config.trigger.mode, TriggerMode::Wake);
        assert_eq!(config.wake.engine, "energy");
        assert_eq!(config.wake.keyword, "hark");
        assert!(config.wake.access_key.is_empty());
        assert_eq!(config.stt.engine, "null");
        assert_eq!(config.speech.engine, "console");
        assert_eq!(config.notes.file, "hark_notes.txt");
        assert!(config.apps.is_empty());
    }

    #[test]
    fn test_config_env_var_interpolation() {
        std::env::set_var("HARK_TEST_KEY", "secret123");
        let toml_str = r#"
[wake]
access_key = "${HARK_TEST_KEY}"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.wake.access_key, "secret123");
        std::env::remove_var("HARK_TEST_KEY");
    }

    #[test]
    fn test_config_missing_env_var_error() {
        let toml_str = r#"
[wake]
access_key = "${DEFINITELY_DOES_NOT_EXIST_12345}"
"#;
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("DEFINITELY_DOES_NOT_EXIST_12345"));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let toml_str = "this is not valid toml [[[";
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = std::env::temp_dir().join("hark_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            r#"
[general]
log_level = "warn"

[audio]
capture_seconds = 2.0
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.audio.capture_seconds, 2.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_load_from_file_not_found() {
        let result = AppConfig::load_from_file(std::path::Path::new("/nonexistent/path.toml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("failed to read config file"));
    }

    #[test]
    fn test_validate_wake_mode_requires_access_key() {
        let config = AppConfig::from_toml_str("").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("access_key"));
    }

    #[test]
    fn test_validate_wake_mode_with_access_key_passes() {
        let config = AppConfig::from_toml_str(
            r#"
[wake]
access_key = "abc123"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_manual_mode_needs_no_access_key() {
        let config = AppConfig::from_toml_str(
            r#"
[trigger]
mode = "manual"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nonpositive_capture_window() {
        let config = AppConfig::from_toml_str(
            r#"
[trigger]
mode = "manual"

[audio]
capture_seconds = 0.0
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("capture_seconds"));
    }

    #[test]
    fn test_validate_wake_mode_requires_keyword_or_path() {
        let config = AppConfig::from_toml_str(
            r#"
[wake]
access_key = "abc123"
keyword = ""
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("keyword"));
    }

    #[test]
    fn test_wake_config_round_trips_through_toml_value() {
        let config = AppConfig::from_toml_str(
            r#"
[wake]
engine = "energy"
keyword = "porcupine"
access_key = "abc123"
threshold = 0.05
"#,
        )
        .unwrap();
        let value = toml::Value::try_from(&config.wake).unwrap();
        assert_eq!(
            value.get("keyword").and_then(|v| v.as_str()),
            Some("porcupine")
        );
        assert_eq!(
            value.get("threshold").and_then(|v| v.as_float()),
            Some(f64::from(0.05f32))
        );
    }
}
