use crate::common::node::{NewNode, Node};
use crate::query::{NodePage, NodeQuery};
use anyhow::Result;

/// Table session over the policy node table.
#[trait_variant::make(NodeStore: Send)]
pub trait UnsendNodeStore {
    /// Filtered, id-ordered, paginated read. `total` counts matches before paging.
    async fn select_nodes(&self, query: &NodeQuery) -> Result<NodePage>;
    async fn get_node(&self, id: u64) -> Result<Option<Node>>;
    /// Inserts one row and returns it with its freshly minted id.
    async fn insert_node(&self, node: &NewNode) -> Result<Node>;
}
