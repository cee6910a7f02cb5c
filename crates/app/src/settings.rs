//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and overridden by `ITINERA__`-prefixed
//! environment variables (`ITINERA__SERVER__PORT=8080`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    #[serde(default = "default_liveness_interval")]
    pub liveness_interval_secs: u64,
    pub public_base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_liveness_interval() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("ITINERA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn server_section_is_optional() {
        let settings = parse("[app]\nlevel = \"debug\"\n");
        assert_eq!(settings.app.level, "debug");
        assert!(settings.server.is_none());
    }

    #[test]
    fn sqlite_database_and_defaults() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = { sqlite = "itinera.db" }
            "#,
        );
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "itinera.db"));
        assert_eq!(server.liveness_interval_secs, 30);
        assert_eq!(settings.app.level, "info");
    }

    #[test]
    fn memory_database() {
        let settings = parse("[server]\nport = 3000\ndatabase = \"memory\"\n");
        assert!(matches!(settings.server.unwrap().database, Database::Memory));
    }
}
