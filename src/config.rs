use crate::error::{Result, SparrowError};
use crate::logic::keywords::KeywordTable;
use crate::logic::rules::closing::{default_tips, ClosingLineRule, DEFAULT_GREETING_NAME};
use chrono::NaiveTime;
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub weather: WeatherConfig,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub advice: AdviceConfig,
    #[serde(default)]
    pub keywords: KeywordTable,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    pub api_key: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// QWeather location id or `lon,lat`
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_host() -> String {
    "devapi.qweather.com".into()
}

fn default_location() -> String {
    // Beijing
    "101010100".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_host", &self.api_host)
            .field("location", &self.location)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub server: String,
    #[serde(default = "default_smtp_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Pause between recipients, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_pause_ms() -> u64 {
    1000
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(value) => value.trim().parse::<u16>().map_err(|_| {
            D::Error::custom(format!(
                "invalid port '{}' - ensure SMTP_PORT environment variable is set",
                value
            ))
        }),
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("pause_ms", &self.pause_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Daily send times, `HH:MM` in UTC+8
    #[serde(default = "default_send_times")]
    pub send_times: Vec<String>,
}

fn default_send_times() -> Vec<String> {
    vec!["09:00".into()]
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            send_times: default_send_times(),
        }
    }
}

impl ScheduleConfig {
    pub fn parsed_times(&self) -> Result<Vec<NaiveTime>> {
        self.send_times
            .iter()
            .map(|t| {
                NaiveTime::parse_from_str(t.trim(), "%H:%M").map_err(|_| {
                    SparrowError::Config(format!("invalid send time '{}', expected HH:MM", t))
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdviceConfig {
    /// Name used in the first-of-month greeting
    #[serde(default = "default_greeting_name")]
    pub greeting_name: String,
    /// Replaces the built-in closing tips when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

fn default_greeting_name() -> String {
    DEFAULT_GREETING_NAME.into()
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            greeting_name: default_greeting_name(),
            tips: None,
        }
    }
}

impl AdviceConfig {
    pub fn closing_rule(&self) -> ClosingLineRule {
        let tips = self.tips.clone().unwrap_or_else(default_tips);
        ClosingLineRule::new(self.greeting_name.clone(), tips)
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(SparrowError::Config(format!(
                "Config file not found at {:?}. Run `sparrowcast init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SparrowError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after substituting `${VAR}` placeholders from the environment
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        serde_yaml::from_str(&content)
            .map_err(|e| SparrowError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/sparrowcast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SparrowError::Config("Cannot determine config directory".into()))?
            .join("sparrowcast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Problems that would make a send cycle fail, one message per problem
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.weather.api_key.trim().is_empty() {
            problems.push("weather.api_key is not set".to_string());
        }
        if self.smtp.server.trim().is_empty()
            || self.smtp.user.trim().is_empty()
            || self.smtp.password.is_empty()
        {
            problems.push("smtp settings are incomplete (server, user, password)".to_string());
        }
        if self.recipients.is_empty() {
            problems.push("no recipients configured".to_string());
        }
        if let Err(e) = self.schedule.parsed_times() {
            problems.push(e.to_string());
        }
        if let Some(tips) = &self.advice.tips {
            if tips.iter().all(|t| t.trim().is_empty()) {
                problems.push("advice.tips is empty, the built-in tips will be used".to_string());
            }
        }

        problems
    }

    /// Run interactive setup prompts and write config to disk, at
    /// `config_override` when given, else the XDG default path.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive(config_override: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up sparrowcast!");
        println!();

        // --- QWeather ---
        println!("QWeather");
        let api_key: String = Password::new()
            .with_prompt("  API key")
            .interact()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        let api_host: String = Input::new()
            .with_prompt("  API host")
            .default(default_api_host())
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        let location: String = Input::new()
            .with_prompt("  Location id")
            .default(default_location())
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- SMTP ---
        println!("SMTP");
        let server: String = Input::new()
            .with_prompt("  Server")
            .default("smtp.qq.com".into())
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        let port: u16 = Input::new()
            .with_prompt("  Port")
            .default(default_smtp_port())
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        let user: String = Input::new()
            .with_prompt("  Login address")
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        let password: String = Password::new()
            .with_prompt("  Password / authorization code")
            .interact()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Delivery ---
        println!("Delivery");
        let recipients: String = Input::new()
            .with_prompt("  Recipients (comma separated)")
            .default(user.clone())
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        let send_times: String = Input::new()
            .with_prompt("  Send times, HH:MM Beijing time (comma separated)")
            .default("09:00".into())
            .interact_text()
            .map_err(|e| SparrowError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            weather: WeatherConfig {
                api_key,
                api_host,
                location,
                timeout_secs: default_timeout_secs(),
            },
            smtp: SmtpConfig {
                server,
                port,
                user,
                password,
                pause_ms: default_pause_ms(),
            },
            recipients: split_list(&recipients),
            schedule: ScheduleConfig {
                send_times: split_list(&send_times),
            },
            advice: AdviceConfig::default(),
            keywords: KeywordTable::default(),
        };

        config.schedule.parsed_times()?;

        let config_path = match config_override {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        config.save(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    /// Write this config as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| SparrowError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# sparrowcast configuration\n# Generated by `sparrowcast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;

        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| SparrowError::Config(format!("Invalid placeholder pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
