use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    DatabaseSettings, LoggingSettings, MediaSettings, ServerOverrides, ServerSettings,
    SessionSettings, Settings,
};

/// The configuration file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fitgym.toml";

/// Loads the application settings.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at `path`
/// (or `fitgym.toml`; a missing file is fine), `FITGYM__SECTION__KEY`
/// environment variables, and finally `DATABASE_URL`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    build_settings(
        path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)),
        None,
        std::env::var("DATABASE_URL").ok(),
    )
}

fn build_settings(
    path: &Path,
    env: Option<HashMap<String, String>>,
    database_url: Option<String>,
) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("FITGYM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .set_override_option("database.url", database_url)?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = build_settings(&dir.path().join("absent.toml"), Some(HashMap::new()), None)
            .unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.media.default_image, core_types::DEFAULT_IMAGE);
        assert_eq!(settings.session.ttl_hours, 336);
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn file_then_env_then_database_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitgym.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\nhost = \"0.0.0.0\"\n\n[database]\nurl = \"sqlite://file.db\"\n\n[media]\nroot = \"/srv/media\""
        )
        .unwrap();

        let env = HashMap::from([("FITGYM__SERVER__PORT".to_string(), "9100".to_string())]);
        let settings =
            build_settings(&path, Some(env), Some("sqlite://env.db".to_string())).unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.database.url, "sqlite://env.db");
        assert_eq!(settings.media.root, std::path::PathBuf::from("/srv/media"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let env = HashMap::from([("FITGYM__SESSION__TTL_HOURS".to_string(), "0".to_string())]);
        let err = build_settings(&dir.path().join("absent.toml"), Some(env), None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn cli_overrides_replace_server_section() {
        let mut settings = Settings::default();
        settings.apply_overrides(&ServerOverrides {
            host: None,
            port: Some(3000),
        });
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.socket_addr().unwrap().port(), 3000);
    }
}
