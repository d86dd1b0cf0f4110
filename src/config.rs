use std::collections::HashMap;
use std::env;
use std::fs;

use crate::error::{BotError, Result};

const DEFAULT_EVENT_PAGE_LIMIT: u32 = 10;
const DEFAULT_DIGEST_DAY: u32 = 1;
const DEFAULT_DIGEST_HOUR: u32 = 9;
const DEFAULT_LISTEN_PORT: u16 = 8787;
const DEFAULT_DB_LOCATION: &str = "./data";

/// Raw KEY=VALUE configuration, read from the file named by `CONFIG_FILE`
/// (or `--config`). Values in the file win over process environment.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("cannot read {}: {}", path, e)))?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(BotError::Config(format!(
                    "invalid config line {}: {}",
                    idx + 1,
                    line
                )));
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

    /// File value if present, otherwise the process environment.
    pub fn prop(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

/// Everything the bot needs at runtime, resolved once at startup and passed
/// into constructors. No module reads config or env on its own after this.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub admin_token: String,
    pub discord_api_token: String,
    pub discord_channel: String,
    pub event_page_limit: u32,
    pub digest_day: u32,
    pub digest_hour: u32,
    pub listen_port: u16,
    pub store_location: String,
}

impl BotConfig {
    pub fn load(props: &AppConfig) -> Result<Self> {
        let config = BotConfig {
            admin_token: required(props, "ADMIN_TOKEN")?,
            discord_api_token: required(props, "DISCORD_API_TOKEN")?,
            discord_channel: required(props, "DISCORD_CHANNEL")?,
            event_page_limit: parsed(props, "EVENT_PAGE_LIMIT", DEFAULT_EVENT_PAGE_LIMIT)?,
            digest_day: parsed(props, "DIGEST_DAY", DEFAULT_DIGEST_DAY)?,
            digest_hour: parsed(props, "DIGEST_HOUR", DEFAULT_DIGEST_HOUR)?,
            listen_port: parsed(props, "LISTEN_PORT", DEFAULT_LISTEN_PORT)?,
            store_location: format!(
                "{}/groups.json",
                props
                    .prop("DB_LOCATION")
                    .unwrap_or_else(|| DEFAULT_DB_LOCATION.to_string())
            ),
        };
        if !(1..=31).contains(&config.digest_day) {
            return Err(BotError::Config(format!(
                "DIGEST_DAY must be between 1 and 31, got {}",
                config.digest_day
            )));
        }
        if config.digest_hour > 23 {
            return Err(BotError::Config(format!(
                "DIGEST_HOUR must be between 0 and 23, got {}",
                config.digest_hour
            )));
        }
        Ok(config)
    }
}

fn required(props: &AppConfig, key: &str) -> Result<String> {
    props
        .prop(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| BotError::Config(format!("{} must be set", key)))
}

fn parsed<T: std::str::FromStr>(props: &AppConfig, key: &str, default: T) -> Result<T> {
    match props.prop(key) {
        Some(value) => value
            .parse()
            .map_err(|_| BotError::Config(format!("{} is not a valid value for {}", value, key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn write_config(lines: &str) -> String {
        let path = env::temp_dir().join(format!("meetupbot_cfg_{}.env", uuid::Uuid::new_v4()));
        fs::write(&path, lines).expect("write temp config");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn parses_export_prefix_quotes_and_comments() {
        let path = write_config(
            "# secrets\nexport ADMIN_TOKEN=\"hunter2\"\nDISCORD_CHANNEL='123'\n\nDISCORD_API_TOKEN=abc\n",
        );
        let props = AppConfig::from_file(&path).expect("config should parse");
        assert_eq!(props.get("ADMIN_TOKEN"), Some("hunter2".to_string()));
        assert_eq!(props.get("DISCORD_CHANNEL"), Some("123".to_string()));
        assert_eq!(props.get("DISCORD_API_TOKEN"), Some("abc".to_string()));
        assert_eq!(props.get("# secrets"), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        let path = write_config("ADMIN_TOKEN\n");
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn load_applies_defaults() {
        let path = write_config(
            "ADMIN_TOKEN=secret\nDISCORD_API_TOKEN=token\nDISCORD_CHANNEL=123\n",
        );
        let props = AppConfig::from_file(&path).expect("config should parse");
        let config = BotConfig::load(&props).expect("load should succeed");
        assert_eq!(config.event_page_limit, 10);
        assert_eq!(config.digest_day, 1);
        assert_eq!(config.digest_hour, 9);
        assert_eq!(config.listen_port, 8787);
        assert!(config.store_location.ends_with("/groups.json"));
    }

    #[test]
    fn load_rejects_missing_admin_token() {
        let path = write_config("DISCORD_API_TOKEN=token\nDISCORD_CHANNEL=123\n");
        let props = AppConfig::from_file(&path).expect("config should parse");
        let err = BotConfig::load(&props).expect_err("load should fail");
        assert!(err.to_string().contains("ADMIN_TOKEN"));
    }

    #[test]
    fn load_rejects_out_of_range_digest_day() {
        let path = write_config(
            "ADMIN_TOKEN=secret\nDISCORD_API_TOKEN=token\nDISCORD_CHANNEL=123\nDIGEST_DAY=0\n",
        );
        let props = AppConfig::from_file(&path).expect("config should parse");
        assert!(BotConfig::load(&props).is_err());
    }
}
