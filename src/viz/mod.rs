//! Graph visualization
//!
//! Lays out node/edge graphs with a spring model and turns them into Plotly
//! figure JSON. Used by the `/api/graph` endpoint and the workflow HTML export.

/// Plotly figure building.
pub mod figure;
/// Spring layout.
pub mod layout;

pub use figure::{figure, standalone_html, NetworkEdge, NetworkGraph, DEFAULT_TITLE};
pub use layout::{spring_layout, LayoutOptions};
