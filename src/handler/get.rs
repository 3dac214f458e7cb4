use crate::common::error::PolicyError;
use crate::common::node::{GetRequest, Node};
use crate::traits::node_store::NodeStore;

pub async fn handle_get_request<S>(store: &S, request: &GetRequest) -> Result<Node, PolicyError>
where
    S: NodeStore + Sync,
{
    log::info!("Handling Get {}", request.id);

    if request.id == 0 {
        return Err(PolicyError::RequiredParameter("id"));
    }

    match store.get_node(request.id).await {
        Ok(Some(node)) => Ok(node),
        Ok(None) => {
            log::debug!("Node {} not found", request.id);
            Err(PolicyError::NotFound(request.id))
        }
        Err(e) => {
            log::error!("Failed to get node {}: {:?}", request.id, e);
            Err(PolicyError::Storage(e))
        }
    }
}
