use crate::common::node::{NewNode, Node};
use crate::query::{NodePage, NodeQuery};
use crate::traits::node_store::NodeStore;
use anyhow::Result;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{ErrorKind::NotFound, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct NodeTable {
    last_id: u64,
    nodes: Vec<Node>,
}

fn read_table(file: &mut File) -> Result<NodeTable> {
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    if contents.trim().is_empty() {
        Ok(NodeTable::default())
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Node table kept in a single JSON file, guarded by an advisory file lock.
pub struct FileNodeStore {
    path: PathBuf,
}

impl FileNodeStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    fn load(&self) -> Result<NodeTable> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == NotFound => return Ok(NodeTable::default()),
            Err(e) => return Err(e.into()),
        };
        FileExt::lock_shared(&file)?;
        let table = read_table(&mut file);
        FileExt::unlock(&file)?;
        table
    }
}

impl NodeStore for FileNodeStore {
    async fn select_nodes(&self, query: &NodeQuery) -> Result<NodePage> {
        let table = self.load()?;
        Ok(query.apply(table.nodes))
    }

    async fn get_node(&self, id: u64) -> Result<Option<Node>> {
        let table = self.load()?;
        Ok(table.nodes.into_iter().find(|n| n.id == id))
    }

    async fn insert_node(&self, node: &NewNode) -> Result<Node> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        FileExt::lock_exclusive(&file)?;
        let mut table = read_table(&mut file)?;
        table.last_id += 1;
        let row = node.clone().with_id(table.last_id);
        table.nodes.push(row.clone());

        let json = serde_json::to_string_pretty(&table)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        FileExt::unlock(&file)?;

        log::debug!("Inserted node {} into {:?}", row.id, self.path);
        Ok(row)
    }
}
