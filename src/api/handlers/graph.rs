//! Graph data handler

use crate::api::AppState;
use crate::types::Result;
use crate::viz::{figure, NetworkGraph, DEFAULT_TITLE};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Every relationship in the store as a Plotly figure.
///
/// Any failure, including an unreachable database, is reported as
/// `500 {"error": "<message>"}` so the viewer can show it.
pub async fn get_graph(State(state): State<AppState>) -> Response {
    match build_figure(&state).await {
        Ok(fig) => Json(fig).into_response(),
        Err(e) => {
            tracing::error!("Error getting graph data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn build_figure(state: &AppState) -> Result<Value> {
    let triples = state.graph_store.fetch_triples().await?;
    let graph = NetworkGraph::from_triples(&triples);
    tracing::debug!(
        "Built network graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edges.len()
    );
    let positions = graph.layout(&state.layout);
    Ok(figure(&graph, &positions, DEFAULT_TITLE))
}
