//! Plotly figure construction for node/edge graphs.

use crate::graph::GraphTriple;
use crate::viz::layout::{spring_layout, LayoutOptions};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Title used for database graph figures
pub const DEFAULT_TITLE: &str = "Neo4j Graph Visualization";

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    pub source: usize,
    pub target: usize,
    /// Hover text, usually the relation type
    pub label: String,
}

/// A directed graph ready for layout: node labels plus at most one edge per
/// ordered node pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkGraph {
    pub labels: Vec<String>,
    pub edges: Vec<NetworkEdge>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        self.labels.push(label.into());
        self.labels.len() - 1
    }

    /// Add or relabel the edge `source -> target`.
    pub fn add_edge(&mut self, source: usize, target: usize, label: impl Into<String>) {
        let label = label.into();
        match self
            .edges
            .iter_mut()
            .find(|e| e.source == source && e.target == target)
        {
            Some(edge) => edge.label = label,
            None => self.edges.push(NetworkEdge {
                source,
                target,
                label,
            }),
        }
    }

    /// Build from database triples. The last relation seen for a pair wins.
    pub fn from_triples(triples: &[GraphTriple]) -> Self {
        let mut graph = Self::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for triple in triples {
            let mut ends = [0usize; 2];
            for (slot, node) in [&triple.source, &triple.target].into_iter().enumerate() {
                let i = match index.get(&node.id) {
                    Some(&i) => i,
                    None => {
                        let i = graph.add_node(String::new());
                        index.insert(node.id.clone(), i);
                        i
                    }
                };
                graph.labels[i] = node.display_name();
                ends[slot] = i;
            }
            graph.add_edge(ends[0], ends[1], triple.relation.clone());
        }

        graph
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of distinct successors per node
    pub fn out_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.labels.len()];
        for edge in &self.edges {
            degrees[edge.source] += 1;
        }
        degrees
    }

    pub fn layout(&self, options: &LayoutOptions) -> Vec<[f64; 2]> {
        let pairs: Vec<(usize, usize)> = self.edges.iter().map(|e| (e.source, e.target)).collect();
        spring_layout(self.node_count(), &pairs, options)
    }
}

/// Plotly figure JSON: one line trace per edge, one marker trace for nodes.
pub fn figure(graph: &NetworkGraph, positions: &[[f64; 2]], title: &str) -> Value {
    let mut data: Vec<Value> = graph
        .edges
        .iter()
        .map(|edge| {
            let a = positions[edge.source];
            let b = positions[edge.target];
            json!({
                "type": "scatter",
                "x": [a[0], b[0], null],
                "y": [a[1], b[1], null],
                "line": { "width": 1, "color": "#888" },
                "hoverinfo": "text",
                "text": edge.label,
                "mode": "lines",
                "showlegend": false
            })
        })
        .collect();

    let node_x: Vec<f64> = positions.iter().map(|p| p[0]).collect();
    let node_y: Vec<f64> = positions.iter().map(|p| p[1]).collect();

    data.push(json!({
        "type": "scatter",
        "x": node_x,
        "y": node_y,
        "mode": "markers+text",
        "text": graph.labels,
        "textposition": "top center",
        "hoverinfo": "text",
        "marker": {
            "showscale": true,
            "colorscale": "Viridis",
            "size": 15,
            "color": graph.out_degrees(),
            "colorbar": {
                "thickness": 15,
                "title": { "text": "Node Connections", "side": "right" },
                "xanchor": "left"
            }
        }
    }));

    let hidden_axis = json!({ "showgrid": false, "zeroline": false, "showticklabels": false });

    json!({
        "data": data,
        "layout": {
            "title": {
                "text": title,
                "y": 0.95,
                "x": 0.5,
                "xanchor": "center",
                "yanchor": "top",
                "font": { "size": 24 }
            },
            "showlegend": false,
            "hovermode": "closest",
            "margin": { "b": 20, "l": 5, "r": 5, "t": 40 },
            "plot_bgcolor": "white",
            "paper_bgcolor": "white",
            "xaxis": hidden_axis,
            "yaxis": hidden_axis,
            "height": 800,
            "width": 1000
        }
    })
}

/// Standalone HTML page that renders `fig` with Plotly from the CDN.
pub fn standalone_html(fig: &Value, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
</head>
<body>
<div id="graph"></div>
<script>
const fig = {fig};
Plotly.newPlot('graph', fig.data, fig.layout);
</script>
</body>
</html>
"#,
        title = title,
        fig = fig
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphNode;

    fn node(id: &str, name: Option<&str>) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            labels: vec!["Concept".to_string()],
            name: name.map(str::to_string),
        }
    }

    fn triple(a: GraphNode, rel: &str, b: GraphNode) -> GraphTriple {
        GraphTriple {
            source: a,
            relation: rel.to_string(),
            target: b,
        }
    }

    #[test]
    fn test_from_triples_dedupes_pairs() {
        let triples = vec![
            triple(node("1", Some("DSPy")), "USES", node("2", Some("RAG"))),
            triple(node("1", Some("DSPy")), "IMPROVES_UPON", node("2", Some("RAG"))),
            triple(node("2", Some("RAG")), "USES", node("3", None)),
        ];
        let graph = NetworkGraph::from_triples(&triples);

        assert_eq!(graph.labels, vec!["DSPy", "RAG", "Node 3"]);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].label, "IMPROVES_UPON");
        assert_eq!(graph.out_degrees(), vec![1, 1, 0]);
    }

    #[test]
    fn test_figure_shape() {
        let mut graph = NetworkGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.add_edge(a, b, "LINKS");

        let positions = vec![[-1.0, 0.0], [1.0, 0.0]];
        let fig = figure(&graph, &positions, DEFAULT_TITLE);

        let data = fig["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["mode"], "lines");
        assert_eq!(data[0]["text"], "LINKS");
        assert_eq!(data[0]["x"], json!([-1.0, 1.0, null]));
        assert_eq!(data[1]["marker"]["color"], json!([1, 0]));
        assert_eq!(
            data[1]["marker"]["colorbar"]["title"]["text"],
            "Node Connections"
        );
        assert_eq!(fig["layout"]["title"]["text"], "Neo4j Graph Visualization");
        assert_eq!(fig["layout"]["width"], 1000);
        assert_eq!(fig["layout"]["height"], 800);
    }

    #[test]
    fn test_empty_graph_figure() {
        let graph = NetworkGraph::new();
        let fig = figure(&graph, &[], DEFAULT_TITLE);
        assert_eq!(fig["data"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_standalone_html_embeds_figure() {
        let fig = json!({"data": [], "layout": {}});
        let html = standalone_html(&fig, "Flow");
        assert!(html.contains("<title>Flow</title>"));
        assert!(html.contains("Plotly.newPlot"));
    }
}
