use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::common::error::PolicyError;
use crate::common::node::{AddRequest, GetRequest, ListRequest, Node};
use crate::handler::{
    add::handle_add_request, get::handle_get_request, get_list::handle_get_list_request,
};
use crate::server::rest_server::AppState;

impl IntoResponse for PolicyError {
    fn into_response(self) -> Response {
        let status = match &self {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            PolicyError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

fn node_json(node: &Node) -> serde_json::Value {
    serde_json::json!({
        "id": node.id,
        "name": node.name,
        "ip": node.ip,
        "port": node.port,
        "remarks": node.remarks,
    })
}

pub async fn get_nodes(
    State(st): State<AppState>,
    query: Result<Query<ListRequest>, QueryRejection>,
) -> Result<Json<serde_json::Value>, PolicyError> {
    let Query(request) = query.map_err(|e| {
        log::debug!("Rejected list query: {}", e);
        PolicyError::InvalidParameterValue("query")
    })?;
    let page = handle_get_list_request(st.node_store.as_ref(), &request).await?;
    Ok(Json(serde_json::json!({
        "nodes": page.nodes.iter().map(node_json).collect::<Vec<_>>(),
        "pagination": {
            "totalItems": page.total,
            "offset": request.offset.unwrap_or(0),
            "limit": request.limit.unwrap_or(0),
        },
    })))
}

pub async fn get_node(
    State(st): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<serde_json::Value>, PolicyError> {
    let Path(id) = path.map_err(|e| {
        log::debug!("Rejected node id: {}", e);
        PolicyError::InvalidParameterValue("id")
    })?;
    let node = handle_get_request(st.node_store.as_ref(), &GetRequest { id }).await?;
    Ok(Json(serde_json::json!({ "node": node_json(&node) })))
}

pub async fn add_node(
    State(st): State<AppState>,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), PolicyError> {
    // an unreadable body carries no node
    let Json(request) = body.map_err(|e| {
        log::debug!("Rejected add body: {}", e);
        PolicyError::RequiredParameter("node")
    })?;
    let node = handle_add_request(st.node_store.as_ref(), &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "node": node_json(&node) })),
    ))
}
