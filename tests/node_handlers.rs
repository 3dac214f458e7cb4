use policy_node::common::error::PolicyError;
use policy_node::common::node::{AddRequest, GetRequest, ListRequest, NewNode, Node, NodePayload};
use policy_node::handler::{
    add::handle_add_request, get::handle_get_request, get_list::handle_get_list_request,
};
use policy_node::query::{NodePage, NodeQuery};
use std::sync::atomic::{AtomicUsize, Ordering};
use policy_node::storage::file::file_node_store::FileNodeStore;
use policy_node::storage::memory::memory_node_store::MemoryNodeStore;
use policy_node::storage::node_store_impl::NodeStoreImpl;
use policy_node::storage::sqlite::sqlite_node_store::SqliteNodeStore;
use policy_node::traits::node_store::NodeStore;

fn new_node(name: &str, ip: &str, remarks: &str) -> NewNode {
    NewNode {
        name: name.to_string(),
        ip: ip.to_string(),
        port: 5555,
        remarks: remarks.to_string(),
    }
}

async fn seed<S: NodeStore + Sync>(store: &S) -> Vec<Node> {
    let mut rows = Vec::new();
    for n in [
        new_node("test1", "1.1.1.1", "remarks1"),
        new_node("test2", "2.2.2.2", "remarks2"),
        new_node("test3", "3.3.3.3", "remarks3"),
        new_node("diff1", "4.4.4.4", "remarks4"),
    ] {
        rows.push(store.insert_node(&n).await.unwrap());
    }
    rows
}

/// Each case runs against a fresh store of every local backend.
fn stores(dir: &tempfile::TempDir) -> Vec<(&'static str, NodeStoreImpl)> {
    vec![
        ("memory", NodeStoreImpl::Memory(MemoryNodeStore::new())),
        ("file", NodeStoreImpl::File(FileNodeStore::new(dir.path().join("nodes.json")))),
        ("sqlite", NodeStoreImpl::Sqlite(SqliteNodeStore::open(dir.path().join("nodes.sqlite3")).unwrap())),
    ]
}

fn list_request(name: &str, offset: u64, limit: u64) -> ListRequest {
    ListRequest {
        name: name.to_string(),
        offset: Some(offset),
        limit: Some(limit),
    }
}

#[tokio::test]
async fn test_get_node_list() {
    struct Case {
        case: &'static str,
        name: String,
        offset: u64,
        limit: u64,
        expected: usize,
        error: Option<&'static str>,
    }

    let cases = vec![
        Case { case: "no filter", name: String::new(), offset: 0, limit: 0, expected: 4, error: None },
        Case { case: "name filter", name: "test".to_string(), offset: 0, limit: 0, expected: 3, error: None },
        Case { case: "pagination filter", name: String::new(), offset: 2, limit: 2, expected: 2, error: None },
        Case { case: "unknown filter data", name: "unknown".to_string(), offset: 0, limit: 0, expected: 0, error: None },
        Case {
            case: "abnormal case: name length overflow",
            name: "a".repeat(51),
            offset: 0,
            limit: 0,
            expected: 0,
            error: Some("length overflow parameter value"),
        },
    ];

    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        seed(&store).await;
        for tc in &cases {
            let result =
                handle_get_list_request(&store, &list_request(&tc.name, tc.offset, tc.limit)).await;
            match tc.error {
                Some(msg) => {
                    let err = result.expect_err(tc.case);
                    assert_eq!(err.to_string(), msg, "{backend}: {}", tc.case);
                }
                None => {
                    let page = result.unwrap_or_else(|e| panic!("{backend}: {}: {e}", tc.case));
                    assert_eq!(page.nodes.len(), tc.expected, "{backend}: {}", tc.case);
                }
            }
        }
    }
}

#[tokio::test]
async fn list_window_and_total_agree_across_backends() {
    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        let rows = seed(&store).await;

        let page = handle_get_list_request(&store, &list_request("", 2, 2)).await.unwrap();
        assert_eq!(page.nodes, rows[2..4].to_vec(), "{backend}");
        assert_eq!(page.total, 4, "{backend}");

        let page = handle_get_list_request(&store, &list_request("test", 1, 0)).await.unwrap();
        assert_eq!(page.nodes, rows[1..3].to_vec(), "{backend}");
        assert_eq!(page.total, 3, "{backend}");

        let page = handle_get_list_request(&store, &ListRequest::default()).await.unwrap();
        assert_eq!(page.nodes, rows, "{backend}");
    }
}

#[tokio::test]
async fn list_name_filter_is_case_sensitive() {
    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        seed(&store).await;
        let page = handle_get_list_request(&store, &list_request("Test", 0, 0)).await.unwrap();
        assert!(page.nodes.is_empty(), "{backend}");
        assert_eq!(page.total, 0, "{backend}");
    }
}

#[tokio::test]
async fn test_get_node_detail() {
    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        let pn = store
            .insert_node(&new_node("test", "1.1.1.1", "remarks"))
            .await
            .unwrap();

        let rsp = handle_get_request(&store, &GetRequest { id: pn.id }).await.unwrap();
        assert_eq!(rsp.id, pn.id, "{backend}");
        assert_eq!(rsp.name, "test", "{backend}");
        assert_eq!(rsp.ip, "1.1.1.1", "{backend}");
        assert_eq!(rsp.port, 5555, "{backend}");
        assert_eq!(rsp.remarks, "remarks", "{backend}");

        let err = handle_get_request(&store, &GetRequest { id: 0 }).await.unwrap_err();
        assert_eq!(err.to_string(), "required parameter", "{backend}");

        let err = handle_get_request(&store, &GetRequest { id: pn.id + 100 }).await.unwrap_err();
        assert!(matches!(err, PolicyError::NotFound(id) if id == pn.id + 100), "{backend}");
    }
}

#[tokio::test]
async fn test_add_node() {
    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        let err = handle_add_request(&store, &AddRequest::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "required parameter", "{backend}");
        let page = store.select_nodes(&NodeQuery::default()).await.unwrap();
        assert_eq!(page.total, 0, "{backend}: rejected add must not insert");

        let rsp = handle_add_request(
            &store,
            &AddRequest {
                node: Some(NodePayload {
                    name: "test".to_string(),
                    ip: "1.1.1.1".to_string(),
                    port: 5555,
                    remarks: Some("test".to_string()),
                }),
            },
        )
        .await
        .unwrap();
        assert!(rsp.id > 0, "{backend}");
        assert_eq!(rsp.name, "test", "{backend}");
        assert_eq!(rsp.ip, "1.1.1.1", "{backend}");
        assert_eq!(rsp.port, 5555u64, "{backend}");
        assert_eq!(rsp.remarks, "test", "{backend}");

        let stored = handle_get_request(&store, &GetRequest { id: rsp.id }).await.unwrap();
        assert_eq!(stored, rsp, "{backend}");
    }
}

#[tokio::test]
async fn add_without_remarks_stores_empty_remarks() {
    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        let first = handle_add_request(
            &store,
            &AddRequest {
                node: Some(NodePayload {
                    name: "bare".to_string(),
                    ip: "9.9.9.9".to_string(),
                    port: 22,
                    remarks: None,
                }),
            },
        )
        .await
        .unwrap();
        assert_eq!(first.remarks, "", "{backend}");

        let second = store.insert_node(&new_node("next", "8.8.8.8", "")).await.unwrap();
        assert!(second.id > first.id, "{backend}: ids must increase");
    }
}

/// Fails every call and remembers how many it got.
#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NodeStore for CountingStore {
    async fn select_nodes(&self, _query: &NodeQuery) -> anyhow::Result<NodePage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("store must not be reached"))
    }

    async fn get_node(&self, _id: u64) -> anyhow::Result<Option<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("store must not be reached"))
    }

    async fn insert_node(&self, _node: &NewNode) -> anyhow::Result<Node> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("store must not be reached"))
    }
}

#[tokio::test]
async fn validation_runs_before_any_storage_access() {
    let store = CountingStore::default();

    let err = handle_get_list_request(&store, &list_request(&"a".repeat(51), 0, 0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "length overflow parameter value");

    let err = handle_get_request(&store, &GetRequest { id: 0 }).await.unwrap_err();
    assert_eq!(err.to_string(), "required parameter");

    let err = handle_add_request(&store, &AddRequest::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "required parameter");

    assert_eq!(store.calls(), 0);

    // a valid request does reach the store, and its failure passes through
    let err = handle_get_request(&store, &GetRequest { id: 1 }).await.unwrap_err();
    assert!(matches!(err, PolicyError::Storage(_)));
    assert_eq!(err.to_string(), "store must not be reached");
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn added_port_reads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    for (backend, store) in stores(&dir) {
        let huge = AddRequest {
            node: Some(NodePayload {
                name: "huge".to_string(),
                ip: "1.1.1.1".to_string(),
                port: u64::MAX,
                remarks: None,
            }),
        };
        let err = handle_add_request(&store, &huge).await.unwrap_err();
        assert!(matches!(err, PolicyError::OutOfRangeParameterValue("node.port")), "{backend}");
        assert_eq!(store.select_nodes(&NodeQuery::default()).await.unwrap().total, 0, "{backend}");

        let added = handle_add_request(
            &store,
            &AddRequest {
                node: Some(NodePayload {
                    name: "top".to_string(),
                    ip: "1.1.1.1".to_string(),
                    port: 65535,
                    remarks: None,
                }),
            },
        )
        .await
        .unwrap();
        let stored = handle_get_request(&store, &GetRequest { id: added.id }).await.unwrap();
        assert_eq!(stored, added, "{backend}");
    }
}
