use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::ConfigError;

pub const DEFAULT_RUN_MODE: &str = "cli";
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:3030";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_TYPING_DELAY_MS: u64 = 1500;
pub const DEFAULT_AUTH_DELAY_MS: u64 = 1000;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Cli,
    Api,
}

/// Typed runtime settings. Each key is read from the config file first and
/// then from the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub http_bind: SocketAddr,
    pub timezone: Tz,
    pub typing_delay: Duration,
    pub auth_delay: Duration,
    pub default_duration_minutes: u32,
    pub notifications_enabled: bool,
    pub calendar_access_token: Option<String>,
    pub calendar_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Cli,
            http_bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            timezone: DEFAULT_TIMEZONE,
            typing_delay: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
            auth_delay: Duration::from_millis(DEFAULT_AUTH_DELAY_MS),
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            notifications_enabled: true,
            calendar_access_token: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }
}

impl Settings {
    pub fn from_lookup<F>(get_prop: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = match get_prop("RUN_MODE")
            .unwrap_or(DEFAULT_RUN_MODE.to_string())
            .as_str()
        {
            "cli" => RunMode::Cli,
            "api" => RunMode::Api,
            other => return Err(invalid("RUN_MODE", other)),
        };

        let http_bind_raw = get_prop("HTTP_BIND").unwrap_or(DEFAULT_HTTP_BIND.to_string());
        let http_bind = http_bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| invalid("HTTP_BIND", &http_bind_raw))?;

        let timezone = match get_prop("TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|_| invalid("TIMEZONE", &name))?,
            None => DEFAULT_TIMEZONE,
        };

        let typing_delay_ms = parse_number(&get_prop, "TYPING_DELAY_MS", DEFAULT_TYPING_DELAY_MS)?;
        let auth_delay_ms = parse_number(&get_prop, "AUTH_DELAY_MS", DEFAULT_AUTH_DELAY_MS)?;
        let default_duration_minutes = parse_number(
            &get_prop,
            "DEFAULT_DURATION_MINUTES",
            DEFAULT_DURATION_MINUTES,
        )?;

        let notifications_enabled = match get_prop("NOTIFICATIONS_ENABLED") {
            None => true,
            Some(value) => match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid("NOTIFICATIONS_ENABLED", &value)),
            },
        };

        let calendar_access_token = get_prop("GOOGLE_CALENDAR_ACCESS_TOKEN")
            .filter(|token| !token.trim().is_empty());
        let calendar_id =
            get_prop("GOOGLE_CALENDAR_ID").unwrap_or(DEFAULT_CALENDAR_ID.to_string());

        Ok(Self {
            run_mode,
            http_bind,
            timezone,
            typing_delay: Duration::from_millis(typing_delay_ms),
            auth_delay: Duration::from_millis(auth_delay_ms),
            default_duration_minutes,
            notifications_enabled,
            calendar_access_token,
            calendar_id,
        })
    }
}

fn parse_number<F, T>(get_prop: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get_prop(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_export_and_quotes() {
        let config = AppConfig::parse(
            "# comment\nexport RUN_MODE=\"api\"\nTIMEZONE='Europe/Berlin'\n\nTYPING_DELAY_MS = 10\n",
        )
        .unwrap();
        assert_eq!(config.get("RUN_MODE").as_deref(), Some("api"));
        assert_eq!(config.get("TIMEZONE").as_deref(), Some("Europe/Berlin"));
        assert_eq!(config.get("TYPING_DELAY_MS").as_deref(), Some("10"));
    }

    #[test]
    fn parse_rejects_lines_without_equals() {
        let err = AppConfig::parse("RUN_MODE=cli\nbogus line").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));
    }

    #[test]
    fn settings_default_when_nothing_set() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.run_mode, RunMode::Cli);
        assert_eq!(settings.timezone, chrono_tz::America::New_York);
        assert_eq!(settings.typing_delay, Duration::from_millis(1500));
        assert_eq!(settings.auth_delay, Duration::from_millis(1000));
        assert_eq!(settings.default_duration_minutes, 60);
        assert!(settings.notifications_enabled);
        assert!(settings.calendar_access_token.is_none());
        assert_eq!(settings.calendar_id, "primary");
    }

    #[test]
    fn settings_read_from_config_values() {
        let config = AppConfig::parse(
            "RUN_MODE=api\nHTTP_BIND=0.0.0.0:8080\nTIMEZONE=Europe/Berlin\nNOTIFICATIONS_ENABLED=off\nGOOGLE_CALENDAR_ACCESS_TOKEN=abc",
        )
        .unwrap();
        let settings = Settings::from_lookup(|key| config.get(key)).unwrap();
        assert_eq!(settings.run_mode, RunMode::Api);
        assert_eq!(settings.http_bind.port(), 8080);
        assert_eq!(settings.timezone, chrono_tz::Europe::Berlin);
        assert!(!settings.notifications_enabled);
        assert_eq!(settings.calendar_access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn settings_reject_unknown_run_mode() {
        let err = Settings::from_lookup(|key| {
            (key == "RUN_MODE").then(|| "discord".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "RUN_MODE"));
    }

    #[test]
    fn settings_reject_bad_numbers() {
        let err = Settings::from_lookup(|key| {
            (key == "TYPING_DELAY_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
