use anyhow::Context;
use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

/// Where the data store lives and how to authenticate with it
#[derive(serde::Deserialize, Clone, Debug)]
pub struct StoreSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub require_tls: bool,
    pub api_key: SecretString,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    /// Used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl StoreSettings {
    pub fn server_address(&self) -> String {
        let scheme = if self.require_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

/// Loads `base.toml` then the file for the current environment from
/// `config_dir` (defaults to `configuration` in the current directory)
pub fn get_configuration(config_dir: Option<PathBuf>) -> anyhow::Result<Configuration> {
    let configuration_directory = match config_dir {
        Some(dir) => dir,
        None => std::env::current_dir()
            .context("failed to determine the current directory")?
            .join("configuration"),
    };

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("failed to parse APP_ENVIRONMENT")?;
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_STORE__PORT=5001 would set `Settings.store.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("failed to read configuration from {configuration_directory:?}"))?;

    settings
        .try_deserialize::<Configuration>()
        .context("configuration has unexpected format")
}

/// The possible runtime environment for our application.
#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
