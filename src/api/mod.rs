//! Graph visualization server
//!
//! A small axum application that renders the graph store as an interactive
//! Plotly network.
//!
//! # Endpoints
//!
//! - `GET /` - the viewer page
//! - `GET /api/graph` - Plotly figure JSON for every relationship in the store
//! - `GET /static/{*path}` - embedded scripts and stylesheets
//!
//! Unknown paths answer `404 {"error": "Not found"}`.

/// Request handlers for the viewer and graph endpoints.
pub mod handlers;
/// Router configuration.
pub mod routes;

use crate::graph::GraphStore;
use crate::viz::LayoutOptions;
use std::sync::Arc;

/// Shared state for every request
#[derive(Clone)]
pub struct AppState {
    pub graph_store: Arc<dyn GraphStore>,
    /// Layout used for `/api/graph`; unseeded by default so each refresh re-arranges the graph
    pub layout: LayoutOptions,
}

impl AppState {
    pub fn new(graph_store: Arc<dyn GraphStore>) -> Self {
        Self {
            graph_store,
            layout: LayoutOptions::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

pub use routes::create_router;
