//! Include graph built during a crawl.
//!
//! Nodes are template names and an edge `a → b` means `a` contains
//! `# @include b`. The crawl itself only de-duplicates names; cycles are found
//! here with an explicit DFS before anything is rendered.

use anyhow::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use crate::core::StrataError;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the current DFS path (include in progress).
    Gray,
    /// Fully explored.
    Black,
}

/// Directed graph of template includes.
#[derive(Debug, Default)]
pub struct IncludeGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl IncludeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template if it is not in the graph yet.
    pub fn add_template(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(name) {
            index
        } else {
            let index = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), index);
            index
        }
    }

    /// Record that `from` includes `to`. Repeated includes add one edge.
    pub fn add_include(&mut self, from: &str, to: &str) {
        let from_idx = self.add_template(from);
        let to_idx = self.add_template(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Fail on the first include cycle found.
    ///
    /// # Errors
    ///
    /// [`StrataError::CircularInclude`] with the cycle rendered as
    /// `a → b → a`.
    pub fn detect_cycles(&self) -> Result<()> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();
        let mut path: Vec<NodeIndex> = Vec::new();

        for node in self.graph.node_indices() {
            if matches!(colors.get(&node), Some(Color::White))
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                let chain = cycle
                    .iter()
                    .map(|index| self.graph[*index].as_str())
                    .collect::<Vec<_>>()
                    .join(" → ");
                return Err(StrataError::CircularInclude {
                    chain,
                }
                .into());
            }
        }

        Ok(())
    }

    /// DFS visit for cycle detection.
    ///
    /// Returns `Some(cycle_path)` if a cycle is reachable from `node`.
    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.direct_includes(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let start = path.iter().position(|n| *n == neighbor).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Targets of `node` in the order the includes were recorded.
    fn direct_includes(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut targets: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        targets.reverse();
        targets
    }

    /// Names directly included by `name`, in source order.
    #[cfg(test)]
    pub fn includes_of(&self, name: &str) -> Vec<String> {
        self.node_map
            .get(name)
            .map(|&index| {
                self.direct_includes(index).into_iter().map(|n| self.graph[n].clone()).collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn template_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn include_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render the include hierarchy below `root` as a tree.
    ///
    /// A template reached a second time is listed once more but not expanded.
    #[must_use]
    pub fn to_tree_string(&self, root: &str) -> String {
        let mut result = String::new();
        let Some(&index) = self.node_map.get(root) else {
            return result;
        };
        result.push_str(root);
        result.push('\n');

        let mut expanded = HashSet::from([index]);
        let children = self.direct_includes(index);
        for (i, child) in children.iter().enumerate() {
            self.build_tree_string(*child, &mut result, "", i == children.len() - 1, &mut expanded);
        }
        result
    }

    fn build_tree_string(
        &self,
        node: NodeIndex,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        expanded: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{prefix}{connector}{}", self.graph[node]));

        if !expanded.insert(node) {
            result.push_str(" (see above)\n");
            return;
        }
        result.push('\n');

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        let children = self.direct_includes(node);
        for (i, child) in children.iter().enumerate() {
            self.build_tree_string(*child, result, &child_prefix, i == children.len() - 1, expanded);
        }
    }
}
