use serde::Serialize;

use crate::common::error::PolicyError;
use crate::common::node::{ListRequest, Node};

/// Longest name filter accepted by a list request, in characters.
pub const MAX_NAME_FILTER_LEN: usize = 50;

/// A validated list query: optional case-sensitive name substring plus an
/// offset/limit window over nodes ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeQuery {
    name: Option<String>,
    offset: u64,
    limit: Option<u64>,
}

/// One page of a list query and the number of matches before paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodePage {
    pub nodes: Vec<Node>,
    pub total: u64,
}

impl NodeQuery {
    /// Validates a list request. Nothing is read from storage here.
    pub fn from_request(request: &ListRequest) -> Result<Self, PolicyError> {
        let name = if request.name.is_empty() {
            None
        } else {
            let len = request.name.chars().count();
            if len > MAX_NAME_FILTER_LEN {
                return Err(PolicyError::LengthOverflowParameterValue {
                    parameter: "name",
                    max: MAX_NAME_FILTER_LEN,
                    actual: len,
                });
            }
            Some(request.name.clone())
        };

        Ok(Self {
            name,
            offset: request.offset.unwrap_or(0),
            limit: request.limit.filter(|l| *l > 0),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// `None` means no cap.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn matches(&self, node: &Node) -> bool {
        match &self.name {
            Some(name) => node.name.contains(name.as_str()),
            None => true,
        }
    }

    /// Filters, orders by id and pages `rows` in memory.
    pub fn apply<I>(&self, rows: I) -> NodePage
    where
        I: IntoIterator<Item = Node>,
    {
        let mut matched: Vec<Node> = rows.into_iter().filter(|n| self.matches(n)).collect();
        matched.sort_by_key(|n| n.id);
        let total = matched.len() as u64;

        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let nodes = matched.into_iter().skip(skip).take(take).collect();

        NodePage { nodes, total }
    }
}
