use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;
pub mod models;
pub use models::*;

/// Prefix of the environment variables overriding file values,
/// e.g. `BOOKIT__API__BASE_URL`.
pub const ENV_PREFIX: &str = "BOOKIT";

/// Where the layered configuration is read from.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Directory holding `default.*` and `{run_env}.*`.
    pub dir: PathBuf,
    pub run_env: String,
    pub env_prefix: String,
}

impl ConfigSources {
    /// Sources as selected by the process environment:
    /// `BOOKIT_CONFIG_DIR` (default `config`) and `RUN_ENV` (default `debug`).
    pub fn from_env() -> Self {
        Self {
            dir: env::var("BOOKIT_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config")),
            run_env: env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string()),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }
}

/// Loads the configuration once at startup.
///
/// Layers, later ones winning: built-in defaults, `config/default`,
/// `config/{RUN_ENV}`, then `BOOKIT__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    load_config_from(&ConfigSources::from_env())
}

/// Loads the configuration from explicit sources.
pub fn load_config_from(sources: &ConfigSources) -> Result<AppConfig, ConfigError> {
    let default_path = sources.dir.join("default");
    let env_path = sources.dir.join(&sources.run_env);

    debug!("config: default_path: {}", default_path.display());
    debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&sources.env_prefix)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("api.fallback_urls")
                .with_list_parse_key("booking.loading_messages"),
        );

    let app_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(app_config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` names an alternative file; otherwise `.env` is used.
/// Loading happens at most once per process. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
