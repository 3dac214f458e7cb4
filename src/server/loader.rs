use crate::common::config::{ServerConfig, StorageType};
use crate::storage::{
    file::file_node_store::FileNodeStore,
    memory::memory_node_store::MemoryNodeStore,
    node_store_impl::NodeStoreImpl,
    redis::redis_client::RedisClient,
    redis::redis_node_store::RedisNodeStore,
    sqlite::sqlite_node_store::SqliteNodeStore,
};
use anyhow::Result;

pub async fn load_node_store(server_config: &ServerConfig) -> Result<NodeStoreImpl> {
    let node_store_load = match &server_config.node_store_type {
        StorageType::Memory => {
            log::debug!("Using in-memory node store");
            NodeStoreImpl::Memory(MemoryNodeStore::new())
        }
        StorageType::File => {
            log::debug!("Using File node store at {}", server_config.node_store_file_path);
            NodeStoreImpl::File(FileNodeStore::new(&server_config.node_store_file_path))
        }
        StorageType::Sqlite => {
            log::debug!("Using SQLite node store at {}", server_config.node_store_sqlite_path);
            NodeStoreImpl::Sqlite(SqliteNodeStore::open(&server_config.node_store_sqlite_path)?)
        }
        StorageType::Redis => {
            log::debug!("Using Redis node store");
            let redis_urls = server_config
                .node_store_redis_urls
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Redis urls not configured"))?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<String>>();
            let redis_client = RedisClient::connect(&redis_urls).await?;
            NodeStoreImpl::Redis(RedisNodeStore::new(
                redis_client,
                server_config.node_store_redis_prefix.clone(),
            ))
        }
    };
    Ok(node_store_load)
}
