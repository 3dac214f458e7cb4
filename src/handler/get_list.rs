use crate::common::error::PolicyError;
use crate::common::node::ListRequest;
use crate::query::{NodePage, NodeQuery};
use crate::traits::node_store::NodeStore;

/// Lists nodes matching the request's name filter, one page at a time.
pub async fn handle_get_list_request<S>(
    store: &S,
    request: &ListRequest,
) -> Result<NodePage, PolicyError>
where
    S: NodeStore + Sync,
{
    log::info!("Handling GetList");
    log::debug!("ListRequest: {:?}", request);

    let query = NodeQuery::from_request(request)?;
    let page = store.select_nodes(&query).await.map_err(|e| {
        log::error!("Failed to select nodes: {:?}", e);
        PolicyError::Storage(e)
    })?;

    log::debug!("GetList returned {} of {} nodes", page.nodes.len(), page.total);
    Ok(page)
}
