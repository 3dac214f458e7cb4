use crate::common::node::{NewNode, Node};
use crate::query::{NodePage, NodeQuery};
use crate::storage::file::file_node_store::FileNodeStore;
use crate::storage::memory::memory_node_store::MemoryNodeStore;
use crate::storage::redis::redis_node_store::RedisNodeStore;
use crate::storage::sqlite::sqlite_node_store::SqliteNodeStore;
use crate::traits::node_store::NodeStore;
use anyhow::Result;

pub enum NodeStoreImpl {
    Memory(MemoryNodeStore),
    File(FileNodeStore),
    Sqlite(SqliteNodeStore),
    Redis(RedisNodeStore),
}

impl NodeStore for NodeStoreImpl {
    async fn select_nodes(&self, query: &NodeQuery) -> Result<NodePage> {
        match self {
            NodeStoreImpl::Memory(m) => m.select_nodes(query).await,
            NodeStoreImpl::File(f) => f.select_nodes(query).await,
            NodeStoreImpl::Sqlite(s) => s.select_nodes(query).await,
            NodeStoreImpl::Redis(r) => r.select_nodes(query).await,
        }
    }

    async fn get_node(&self, id: u64) -> Result<Option<Node>> {
        match self {
            NodeStoreImpl::Memory(m) => m.get_node(id).await,
            NodeStoreImpl::File(f) => f.get_node(id).await,
            NodeStoreImpl::Sqlite(s) => s.get_node(id).await,
            NodeStoreImpl::Redis(r) => r.get_node(id).await,
        }
    }

    async fn insert_node(&self, node: &NewNode) -> Result<Node> {
        match self {
            NodeStoreImpl::Memory(m) => m.insert_node(node).await,
            NodeStoreImpl::File(f) => f.insert_node(node).await,
            NodeStoreImpl::Sqlite(s) => s.insert_node(node).await,
            NodeStoreImpl::Redis(r) => r.insert_node(node).await,
        }
    }
}
