use crate::common::node::{NewNode, Node};
use crate::query::{NodePage, NodeQuery};
use crate::traits::node_store::NodeStore;
use anyhow::Result;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    last_id: u64,
    rows: BTreeMap<u64, Node>,
}

/// Process-local node table. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryNodeStore {
    table: RwLock<Table>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeStore for MemoryNodeStore {
    async fn select_nodes(&self, query: &NodeQuery) -> Result<NodePage> {
        let table = self.table.read().await;
        Ok(query.apply(table.rows.values().cloned()))
    }

    async fn get_node(&self, id: u64) -> Result<Option<Node>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert_node(&self, node: &NewNode) -> Result<Node> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let row = node.clone().with_id(table.last_id);
        table.rows.insert(row.id, row.clone());
        log::debug!("Inserted node {} into memory store", row.id);
        Ok(row)
    }
}
