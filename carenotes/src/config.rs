use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default)]
    pub seed_demo_notes: bool,
    /// Base URL of a remote notes API. The browser talks to the local store when unset.
    pub notes_api_url: Option<String>,
    #[serde(default)]
    pub log_json: bool,

    // build
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "db/carenotes.db".into()
}

fn default_static_dir() -> String {
    "static".into()
}

fn default_local() -> String {
    "local".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            static_dir: default_static_dir(),
            seed_demo_notes: false,
            notes_api_url: None,
            log_json: false,
            source: default_local(),
            git_commit: default_local(),
            pipeline_id: default_local(),
            version: default_local(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Loads the configuration from the environment once. Later calls return the stored value.
pub fn init() -> Result<&'static Config, envy::Error> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
