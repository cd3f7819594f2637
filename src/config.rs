use anyhow::Context;
use serde::Deserialize;

/// Config, read from a TOML file whose path is the server's first CLI argument.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// <address>:<port> to serve the blog API on
    pub listen_address: String,

    /// <address>:<port> to serve metrics on
    pub metrics_address: String,

    /// By default, output JSON logs. Only if this flag is set to true, output colourful human-friendly logs
    #[serde(default)]
    pub human_logs: bool,

    /// Max HTTP body size the API accepts
    #[serde(default = "max_body_size")]
    pub max_body_size: usize,

    /// Where posts are kept.
    #[serde(default)]
    pub store: StoreKind,

    /// password to connect to database. Only read when `store = "postgres"`.
    pub db_dsn: Option<String>,

    /// maximum number of connections maintained by PostgresStore
    #[serde(default = "db_pool_size")]
    pub db_pool_size: u32,

    /// maximum seconds waiting for a database connection
    #[serde(default = "db_connection_timeout")]
    pub db_connection_timeout: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Posts live in the server process and vanish when it exits.
    #[default]
    Memory,
    /// Posts live in Postgres. Needs the `postgres` cargo feature.
    Postgres,
}

impl Config {
    pub fn from_file(filepath: &str) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(filepath)
            .with_context(|| format!("couldn't read config file {}", filepath))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, anyhow::Error> {
        toml::from_str(contents).context("couldn't parse config file")
    }
}

fn max_body_size() -> usize {
    65536
}

fn db_pool_size() -> u32 {
    8
}

fn db_connection_timeout() -> u64 {
    5
}
