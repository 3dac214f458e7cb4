use crate::common::error::PolicyError;
use crate::common::node::{AddRequest, NewNode, Node, NodePayload};
use crate::traits::node_store::NodeStore;

pub const MAX_PORT: u64 = 65535;

fn validate(payload: Option<&NodePayload>) -> Result<NewNode, PolicyError> {
    let payload = payload.ok_or(PolicyError::RequiredParameter("node"))?;
    if payload.name.is_empty() {
        return Err(PolicyError::RequiredParameter("node.name"));
    }
    if payload.ip.is_empty() {
        return Err(PolicyError::RequiredParameter("node.ip"));
    }
    if payload.port == 0 {
        return Err(PolicyError::RequiredParameter("node.port"));
    }
    if payload.port > MAX_PORT {
        return Err(PolicyError::OutOfRangeParameterValue("node.port"));
    }

    Ok(NewNode {
        name: payload.name.clone(),
        ip: payload.ip.clone(),
        port: payload.port,
        remarks: payload.remarks.clone().unwrap_or_default(),
    })
}

/// Inserts one node. Not idempotent: every successful call mints a new id.
pub async fn handle_add_request<S>(store: &S, request: &AddRequest) -> Result<Node, PolicyError>
where
    S: NodeStore + Sync,
{
    log::info!("Handling Add");
    log::debug!("AddRequest: {:?}", request);

    let new_node = validate(request.node.as_ref())?;
    let node = store.insert_node(&new_node).await.map_err(|e| {
        log::error!("Failed to insert node: {:?}", e);
        PolicyError::Storage(e)
    })?;

    log::info!("Added node {} ({})", node.id, node.name);
    Ok(node)
}
