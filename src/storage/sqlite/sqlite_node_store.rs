use crate::common::node::{NewNode, Node};
use crate::query::{NodePage, NodeQuery};
use crate::traits::node_store::NodeStore;
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS policy_node (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT    NOT NULL,
    ip      TEXT    NOT NULL,
    port    INTEGER NOT NULL,
    remarks TEXT    NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS policy_node_name_idx ON policy_node (name);
";

// instr() keeps the match case-sensitive; LIKE folds ASCII case in SQLite.
const NAME_PREDICATE: &str = "(?1 IS NULL OR instr(name, ?1) > 0)";

// Window bounds only. No table holds more than i64::MAX rows, so clamping
// selects the same rows.
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn node_from_row(row: &Row<'_>) -> rusqlite::Result<Node> {
    let id: i64 = row.get(0)?;
    let port: i64 = row.get(3)?;
    Ok(Node {
        id: id as u64,
        name: row.get(1)?,
        ip: row.get(2)?,
        port: port as u64,
        remarks: row.get(4)?,
    })
}

/// Node table in an SQLite database; filtering and paging run in SQL.
pub struct SqliteNodeStore {
    conn: Mutex<Connection>,
}

impl SqliteNodeStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite node store at {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sqlite node store connection poisoned"))
    }
}

impl NodeStore for SqliteNodeStore {
    async fn select_nodes(&self, query: &NodeQuery) -> Result<NodePage> {
        let conn = self.conn()?;
        let name = query.name();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM policy_node WHERE {NAME_PREDICATE}"),
            params![name],
            |row| row.get(0),
        )?;

        // LIMIT -1 is SQLite for "no limit"
        let limit = query.limit().map(to_i64).unwrap_or(-1);
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name, ip, port, remarks FROM policy_node \
             WHERE {NAME_PREDICATE} ORDER BY id ASC LIMIT ?2 OFFSET ?3"
        ))?;
        let nodes = stmt
            .query_map(params![name, limit, to_i64(query.offset())], node_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(NodePage {
            nodes,
            total: total as u64,
        })
    }

    async fn get_node(&self, id: u64) -> Result<Option<Node>> {
        let conn = self.conn()?;
        let node = conn
            .query_row(
                "SELECT id, name, ip, port, remarks FROM policy_node WHERE id = ?1",
                params![to_i64(id)],
                node_from_row,
            )
            .optional()?;
        Ok(node)
    }

    async fn insert_node(&self, node: &NewNode) -> Result<Node> {
        let port = i64::try_from(node.port)
            .with_context(|| format!("port {} does not fit an sqlite integer", node.port))?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO policy_node (name, ip, port, remarks) VALUES (?1, ?2, ?3, ?4)",
            params![node.name, node.ip, port, node.remarks],
        )?;
        let id = conn.last_insert_rowid() as u64;
        log::debug!("Inserted node {} into sqlite store", id);
        Ok(Node {
            id,
            name: node.name.clone(),
            ip: node.ip.clone(),
            port: port as u64,
            remarks: node.remarks.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::node::ListRequest;

    fn new_node(name: &str) -> NewNode {
        NewNode {
            name: name.to_string(),
            ip: "127.0.0.1".to_string(),
            port: 5555,
            remarks: String::new(),
        }
    }

    #[tokio::test]
    async fn name_filter_does_not_fold_case() {
        let store = SqliteNodeStore::open_in_memory().unwrap();
        store.insert_node(&new_node("Alpha")).await.unwrap();
        store.insert_node(&new_node("alpha")).await.unwrap();

        let query = NodeQuery::from_request(&ListRequest {
            name: "alp".to_string(),
            ..Default::default()
        })
        .unwrap();
        let page = store.select_nodes(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.nodes[0].name, "alpha");
    }

    #[tokio::test]
    async fn port_beyond_sqlite_integer_is_rejected() {
        let store = SqliteNodeStore::open_in_memory().unwrap();
        let mut node = new_node("huge");
        node.port = u64::MAX;
        assert!(store.insert_node(&node).await.is_err());

        let page = store.select_nodes(&NodeQuery::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn wildcard_characters_are_literal() {
        let store = SqliteNodeStore::open_in_memory().unwrap();
        store.insert_node(&new_node("edge_1")).await.unwrap();
        store.insert_node(&new_node("edge-1")).await.unwrap();

        let query = NodeQuery::from_request(&ListRequest {
            name: "_".to_string(),
            ..Default::default()
        })
        .unwrap();
        let page = store.select_nodes(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.nodes[0].name, "edge_1");
    }
}
