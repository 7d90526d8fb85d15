//! Text, Graphviz and HTML renderings of a workflow graph.

use crate::viz::{figure, standalone_html, LayoutOptions, NetworkGraph};
use crate::workflows::graph::DiGraph;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

pub const HTML_TITLE: &str = "GraphFlow Visualization";

/// Seed for workflow layouts so pages are stable between runs
pub const LAYOUT_SEED: u64 = 42;

/// Agent list with their instructions, then the edge list
pub fn describe(graph: &DiGraph) -> String {
    let mut out = String::from("Agents:\n");
    for (i, node) in graph.nodes().iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}: {}", i + 1, node.name(), node.agent.summary());
    }

    out.push_str("\nEdges (Workflow):\n");
    for edge in graph.edges() {
        let condition = if edge.condition.is_conditional() {
            format!(" (condition: {})", edge.condition)
        } else {
            String::new()
        };
        let _ = writeln!(out, "  {} ----→ {}{}", edge.from, edge.to, condition);
    }
    out
}

fn boxed(name: &str) -> [String; 3] {
    let bar = "─".repeat(name.chars().count() + 2);
    [
        format!("  ┌{}┐", bar),
        format!("  │ {} │", name),
        format!("  └{}┘", bar),
    ]
}

fn push_box(lines: &mut Vec<String>, name: &str) {
    lines.extend(boxed(name));
}

fn push_arrow(lines: &mut Vec<String>) {
    lines.push("       │".to_string());
    lines.push("       ▼".to_string());
}

fn generic(lines: &mut Vec<String>, graph: &DiGraph) {
    lines.push("  [Workflow with these agents:]".to_string());
    for name in graph.node_names() {
        lines.push(format!("  - {}", name));
    }
}

/// The single node every child of `root` leads to, when there is one
fn common_grandchild<'a>(
    root: &str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
) -> Option<&'a str> {
    let children = adjacency.get(root)?;
    if children.len() < 2 {
        return None;
    }

    let mut common: Option<&str> = None;
    for child in children {
        for grandchild in adjacency.get(child).into_iter().flatten() {
            match common {
                None => common = Some(grandchild),
                Some(c) if c == *grandchild => {}
                Some(_) => return None,
            }
        }
    }
    common
}

/// Box-and-arrow drawing. Fan-out/fan-in graphs are drawn side by side,
/// anything else as the chain found by following each node's first edge.
pub fn ascii(graph: &DiGraph) -> String {
    let mut lines: Vec<String> = Vec::new();

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
    }

    let roots = graph.start_nodes();
    let Some(root) = roots.first().copied() else {
        lines.push("  Could not identify root nodes. Using generic representation.".to_string());
        generic(&mut lines, graph);
        return lines.join("\n");
    };
    if roots.len() > 1 {
        lines.push(format!("  Multiple root nodes found. Using {} as primary.", root));
    }

    if let Some(final_node) = common_grandchild(root, &adjacency) {
        let children = &adjacency[root];
        let branches = children.len() - 1;

        push_box(&mut lines, root);
        lines.push("       │".to_string());
        lines.push(format!("       ├{}", format!("{}┐", "─".repeat(9)).repeat(branches)));
        lines.push(format!("       │{}", format!("{}│", " ".repeat(9)).repeat(branches)));
        lines.push(format!("       ▼{}", format!("{}▼", " ".repeat(9)).repeat(branches)));

        let boxes: Vec<[String; 3]> = children.iter().map(|c| boxed(c)).collect();
        for row in 0..3 {
            lines.push(
                boxes
                    .iter()
                    .map(|b| b[row].as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        lines.push("       │".to_string());
        lines.push(format!("       └{}", format!("{}┘", "─".repeat(9)).repeat(branches)));
        push_arrow(&mut lines);
        push_box(&mut lines, final_node);
        return lines.join("\n");
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(root);
    while let Some(name) = current {
        if !visited.insert(name) {
            break;
        }
        push_box(&mut lines, name);
        current = adjacency.get(name).and_then(|next| next.first().copied());
        if current.is_some() {
            push_arrow(&mut lines);
        }
    }

    lines.join("\n")
}

/// Graphviz DOT source, conditional edges labelled with their condition
pub fn to_dot(graph: &DiGraph) -> String {
    let mut out = String::from("digraph GraphFlow {\n    rankdir=TB;\n    node [shape=box, style=filled, fillcolor=lightblue];\n");
    for name in graph.node_names() {
        let _ = writeln!(out, "    \"{}\";", name.replace('"', "\\\""));
    }
    for edge in graph.edges() {
        let from = edge.from.replace('"', "\\\"");
        let to = edge.to.replace('"', "\\\"");
        if edge.condition.is_conditional() {
            let label = edge.condition.to_string().replace('"', "\\\"");
            let _ = writeln!(out, "    \"{}\" -> \"{}\" [label=\"{}\"];", from, to, label);
        } else {
            let _ = writeln!(out, "    \"{}\" -> \"{}\";", from, to);
        }
    }
    out.push_str("}\n");
    out
}

/// Spring-layout Plotly page of the workflow
pub fn to_html(graph: &DiGraph) -> String {
    let mut network = NetworkGraph::new();
    for name in graph.node_names() {
        network.add_node(name);
    }
    for edge in graph.edges() {
        if let (Some(a), Some(b)) = (graph.position(&edge.from), graph.position(&edge.to)) {
            let label = if edge.condition.is_conditional() {
                edge.condition.to_string()
            } else {
                String::new()
            };
            network.add_edge(a, b, label);
        }
    }

    let positions = network.layout(&LayoutOptions::seeded(LAYOUT_SEED));
    let fig = figure(&network, &positions, HTML_TITLE);
    standalone_html(&fig, HTML_TITLE)
}
