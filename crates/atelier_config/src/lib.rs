use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod models;
pub use models::*;

/// Prefix of the environment variables that override file configuration,
/// e.g. `ATELIER__SERVER__PORT=9000`.
pub const DEFAULT_PREFIX: &str = "ATELIER";

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `<CONFIG_DIR>/default.{toml,json,yaml}` (optional)
/// 2. `<CONFIG_DIR>/<RUN_ENV>.{toml,json,yaml}` (optional, `RUN_ENV` defaults to `debug`)
/// 3. `ATELIER__*` environment variables (prefix overridable through `PREFIX`)
///
/// `CONFIG_DIR` defaults to `config` relative to the working directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());

    load_config_from(Path::new(&config_dir), &run_env, &prefix)
}

/// Loads the configuration from an explicit directory, environment name and
/// environment-variable prefix.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path: PathBuf = config_dir.join("default");
    let env_path: PathBuf = config_dir.join(run_env);

    debug!(
        "Loading configuration from {} and {} (env prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("booking.slots"),
        );

    let app_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(app_config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` selects the file; otherwise a first command line argument
/// starting with `.env` is used, falling back to `.env`. Loading happens at most
/// once per process and a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
