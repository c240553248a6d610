//! Dependency resolution into a linear execution order.
//!
//! Resolution repeatedly scans the unresolved nodes left to right and moves a
//! node to the output once every one of its dependencies has been resolved.
//! Nodes without dependencies therefore keep their structural order, and
//! declared dependencies override it. Quadratic in the node count, which is
//! fine for pipelines of tens of nodes.

use super::Node;
use crate::errors::{CircularDependencyError, ConfigurationError, Result};
use std::collections::{HashMap, HashSet};

/// Resolves the execution order of `nodes`, returned as indices into it.
///
/// # Errors
///
/// Returns a configuration error if a dependency names an unknown node, and
/// a circular dependency error if a full pass resolves nothing.
pub fn resolve_execution_order<T>(nodes: &[Node<T>]) -> Result<Vec<usize>> {
    let known: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    for node in nodes {
        if let Some(missing) = node.dependencies.iter().find(|d| !known.contains(d.as_str())) {
            return Err(ConfigurationError::missing_dependency(&node.name, missing).into());
        }
    }

    let mut resolved: Vec<usize> = Vec::with_capacity(nodes.len());
    let mut resolved_names: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut unresolved: Vec<usize> = (0..nodes.len()).collect();

    while !unresolved.is_empty() {
        let mut progressed = false;

        unresolved.retain(|&index| {
            let node = &nodes[index];
            let ready = node
                .dependencies
                .iter()
                .all(|dep| resolved_names.contains(dep.as_str()));
            if ready {
                resolved.push(index);
                resolved_names.insert(node.name.as_str());
                progressed = true;
            }
            !ready
        });

        if !progressed {
            let remaining: Vec<&Node<T>> = unresolved.iter().map(|&i| &nodes[i]).collect();
            return Err(CircularDependencyError::new(
                remaining.iter().map(|n| n.name.clone()).collect(),
                trace_cycle(&remaining),
            )
            .into());
        }
    }

    Ok(resolved)
}

/// Finds one concrete cycle among nodes that could not be resolved.
fn trace_cycle<T>(remaining: &[&Node<T>]) -> Vec<String> {
    let deps: HashMap<&str, &[String]> = remaining
        .iter()
        .map(|n| (n.name.as_str(), n.dependencies.as_slice()))
        .collect();

    let mut visited = HashSet::new();
    let mut on_path = HashSet::new();
    let mut path = Vec::new();

    for node in remaining {
        if let Some(cycle) = dfs_cycle(&node.name, &deps, &mut visited, &mut on_path, &mut path) {
            return cycle;
        }
    }
    Vec::new()
}

fn dfs_cycle<'a>(
    node: &'a str,
    deps: &HashMap<&'a str, &'a [String]>,
    visited: &mut HashSet<&'a str>,
    on_path: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    if on_path.contains(node) {
        let start = path.iter().position(|n| *n == node).unwrap_or(0);
        let mut cycle: Vec<String> = path[start..].iter().map(|n| (*n).to_string()).collect();
        cycle.push(node.to_string());
        return Some(cycle);
    }
    if !visited.insert(node) {
        return None;
    }

    on_path.insert(node);
    path.push(node);

    if let Some(edges) = deps.get(node) {
        for dep in *edges {
            // Resolved dependencies are not part of any remaining cycle.
            if deps.contains_key(dep.as_str()) {
                if let Some(cycle) = dfs_cycle(dep.as_str(), deps, visited, on_path, path) {
                    return Some(cycle);
                }
            }
        }
    }

    path.pop();
    on_path.remove(node);
    None
}
