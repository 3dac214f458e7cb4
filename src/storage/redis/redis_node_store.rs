use crate::common::node::{NewNode, Node};
use crate::query::{NodePage, NodeQuery};
use crate::storage::redis::redis_client::RedisClient;
use crate::traits::node_store::NodeStore;
use anyhow::Result;

/// Node table in Redis.
///
/// Layout under `prefix`:
/// - `{prefix}:id_seq`: id counter, bumped with INCR
/// - `{prefix}:node:{id}`: JSON encoded node
/// - `{prefix}:ids`: sorted set of ids scored by id
pub struct RedisNodeStore {
    client: RedisClient,
    prefix: String,
}

impl RedisNodeStore {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn seq_key(&self) -> String {
        format!("{}:id_seq", self.prefix)
    }

    fn ids_key(&self) -> String {
        format!("{}:ids", self.prefix)
    }

    fn node_key(&self, id: u64) -> String {
        format!("{}:node:{}", self.prefix, id)
    }
}

impl NodeStore for RedisNodeStore {
    async fn select_nodes(&self, query: &NodeQuery) -> Result<NodePage> {
        let ids = self.client.zrange_all(&self.ids_key()).await?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            let id: u64 = id.parse()?;
            match self.get_node(id).await? {
                Some(node) => rows.push(node),
                None => log::debug!("Node {} indexed but missing its value, skipping", id),
            }
        }
        Ok(query.apply(rows))
    }

    async fn get_node(&self, id: u64) -> Result<Option<Node>> {
        let value: Option<String> = self.client.get(&self.node_key(id)).await?;
        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn insert_node(&self, node: &NewNode) -> Result<Node> {
        let id = self
            .client
            .incr(&self.seq_key(), 1)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to increment node id: {}", e))?;
        let row = node.clone().with_id(id as u64);

        // value first, so every indexed id resolves
        let value = serde_json::to_string(&row)?;
        self.client.set(&self.node_key(row.id), value).await?;
        self.client
            .zadd(&self.ids_key(), &row.id.to_string(), id)
            .await?;

        log::debug!("Inserted node {} into redis store", row.id);
        Ok(row)
    }
}
