use serde::{Deserialize, Serialize};

/// A stored policy node: a named endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: u64,
    pub name: String,
    pub ip: String,
    pub port: u64,
    #[serde(default)]
    pub remarks: String,
}

/// A node row about to be inserted; the store assigns the id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub name: String,
    pub ip: String,
    pub port: u64,
    pub remarks: String,
}

impl NewNode {
    pub fn with_id(self, id: u64) -> Node {
        Node {
            id,
            name: self.name,
            ip: self.ip,
            port: self.port,
            remarks: self.remarks,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ListRequest {
    #[serde(default)]
    pub name: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GetRequest {
    #[serde(default)]
    pub id: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NodePayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub port: u64,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AddRequest {
    #[serde(default)]
    pub node: Option<NodePayload>,
}
