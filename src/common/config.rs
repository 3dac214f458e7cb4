use serde::Deserialize;
use anyhow::Result;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Memory,
    File,
    Sqlite,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub node_store_type: StorageType,
    pub node_store_file_path: String,
    pub node_store_sqlite_path: String,
    pub node_store_redis_urls: Option<String>,
    pub node_store_redis_prefix: String,
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let builder = config::Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)?
        .set_default("node_store_type", "memory")?
        .set_default("node_store_file_path", "./data/policy_nodes.json")?
        .set_default("node_store_sqlite_path", "./data/policy_nodes.sqlite3")?
        .set_default("node_store_redis_prefix", "policy_node")?;
    Ok(builder)
}

/// Loads the server config: defaults, then the optional file, then `POLICY_*` env vars.
pub fn load_server_config(path: Option<&str>) -> Result<ServerConfig> {
    dotenv::dotenv().ok();
    let mut builder = builder_with_defaults()?;
    if let Some(path) = path {
        log::debug!("Loading server config from {}", path);
        builder = builder.add_source(config::File::with_name(path).required(true));
    }
    let settings = builder
        .add_source(config::Environment::with_prefix("POLICY").try_parsing(true))
        .build()?;
    let config: ServerConfig = settings.try_deserialize()?;
    Ok(config)
}
