use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::rest::nodes::{add_node, get_node, get_nodes};
use crate::{
    common::config::{ServerConfig, load_server_config},
    server::loader::load_node_store,
    storage::node_store_impl::NodeStoreImpl,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub node_store: Arc<NodeStoreImpl>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/nodes", get(get_nodes).post(add_node))
        .route("/nodes/{id}", get(get_node))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn rest_server_start(config_path: Option<&str>) -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting policy node Rest Api server...");
    let server_config_load = Arc::new(load_server_config(config_path)?);
    log::debug!("Server config: {:?}", server_config_load);

    let node_store = Arc::new(load_node_store(&server_config_load).await?);
    let state = AppState {
        config: Arc::clone(&server_config_load),
        node_store,
    };

    let addr = format!("{}:{}", server_config_load.host, server_config_load.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Policy node server listening on {}", addr);

    axum::serve(listener, app(state)).await.map_err(|e| {
        error!("Failed to start server: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}

async fn health(State(st): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "config": {
            "node_store_type": format!("{:?}", st.config.node_store_type).to_lowercase(),
        }
    }))
}
