//! Build order computation.
//!
//! The package graph is held in a petgraph [`DiGraph`] and traversed with a
//! depth-first post-order walk from the root:
//!
//! - a visited set is the cycle guard, so a package reachable through several
//!   paths is placed at its *first* discovery;
//! - the root traverses `requires` and then `dev_requires`; every other
//!   package traverses `requires` only;
//! - a package is placed after all of its dependencies, so the root comes last;
//! - names with no loaded package are ignored.
//!
//! Cycles and dangling edges never fail; they degrade to a valid partial order.

use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::package::PackageNode;

/// Kind of dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Regular requirement.
    Require,
    /// Development requirement, only present on the root.
    DevRequire,
}

/// A package placed in the build order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedPackage {
    /// Package name.
    pub name: String,
    /// Nesting depth at first discovery; the root is at depth 1.
    pub depth: usize,
}

/// Packages in build order: dependencies before dependents, root last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildOrder {
    entries: Vec<OrderedPackage>,
}

impl BuildOrder {
    /// Ordered entries.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OrderedPackage> {
        self.entries.iter()
    }

    /// Package names in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Position of `name`, if ordered.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Number of ordered packages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was ordered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Traversal state threaded through the recursive walk.
#[derive(Default)]
struct Traversal {
    visited: HashSet<NodeIndex>,
    depth: usize,
    order: Vec<OrderedPackage>,
}

/// Computes a [`BuildOrder`] over a package set.
pub struct DependencyOrderer {
    graph: DiGraph<String, EdgeKind>,
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyOrderer {
    /// Build the package graph.
    ///
    /// Edges to unknown package names are dropped. Development edges are kept
    /// for the root only, since they are never traversed elsewhere.
    pub fn new(packages: &[PackageNode]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for package in packages {
            let index = graph.add_node(package.name.clone());
            node_map.insert(package.name.clone(), index);
        }

        for package in packages {
            let from = node_map[&package.name];
            let dev: &[String] = if package.is_root {
                &package.dev_requires
            } else {
                &[]
            };

            let edges = package
                .requires
                .iter()
                .map(|name| (name, EdgeKind::Require))
                .chain(dev.iter().map(|name| (name, EdgeKind::DevRequire)));

            for (target, kind) in edges {
                match node_map.get(target) {
                    Some(&to) => {
                        graph.add_edge(from, to, kind);
                    }
                    None => {
                        tracing::debug!(
                            "Ignoring dependency {} -> {}: package not loaded",
                            package.name,
                            target
                        );
                    }
                }
            }
        }

        if is_cyclic_directed(&graph) {
            tracing::debug!("Package graph contains dependency cycles; first discovery wins");
        }

        Self {
            graph,
            node_map,
        }
    }

    /// Compute the build order starting at `root`.
    ///
    /// Returns an empty order when `root` is not a loaded package.
    pub fn order(&self, root: &str) -> BuildOrder {
        let mut traversal = Traversal::default();

        if let Some(&start) = self.node_map.get(root) {
            self.visit(start, true, &mut traversal);
        }

        BuildOrder {
            entries: traversal.order,
        }
    }

    fn visit(&self, node: NodeIndex, include_dev: bool, traversal: &mut Traversal) {
        if !traversal.visited.insert(node) {
            return;
        }

        traversal.depth += 1;
        let depth = traversal.depth;

        for dependency in self.dependencies(node, EdgeKind::Require) {
            self.visit(dependency, false, traversal);
        }
        if include_dev {
            for dependency in self.dependencies(node, EdgeKind::DevRequire) {
                self.visit(dependency, false, traversal);
            }
        }

        tracing::trace!("Placed {} at depth {}", self.graph[node], depth);
        traversal.order.push(OrderedPackage {
            name: self.graph[node].clone(),
            depth,
        });
        traversal.depth -= 1;
    }

    /// Targets of `node`'s edges of `kind`, in declaration order.
    fn dependencies(&self, node: NodeIndex, kind: EdgeKind) -> Vec<NodeIndex> {
        // petgraph lists outgoing edges most recent first
        let mut targets: Vec<NodeIndex> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| *edge.weight() == kind)
            .map(|edge| edge.target())
            .collect();
        targets.reverse();
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, requires: &[&str]) -> PackageNode {
        PackageNode::new(name, format!("/vendor/{name}")).with_requires(requires.iter().copied())
    }

    fn order_of(packages: &[PackageNode], root: &str) -> Vec<String> {
        DependencyOrderer::new(packages)
            .order(root)
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_simple_chain() {
        let packages =
            vec![pkg("app", &["b"]).root(), pkg("b", &["c"]), pkg("c", &[])];
        assert_eq!(order_of(&packages, "app"), vec!["c", "b", "app"]);
    }

    #[test]
    fn test_declaration_order_of_siblings() {
        let packages = vec![
            pkg("app", &["z", "a", "m"]).root(),
            pkg("a", &[]),
            pkg("m", &[]),
            pkg("z", &[]),
        ];
        assert_eq!(order_of(&packages, "app"), vec!["z", "a", "m", "app"]);
    }

    #[test]
    fn test_post_order_invariant_on_diamond() {
        let packages = vec![
            pkg("app", &["b", "c"]).root(),
            pkg("b", &["d"]),
            pkg("c", &["d"]),
            pkg("d", &[]),
        ];
        let order = DependencyOrderer::new(&packages).order("app");

        for package in &packages {
            let own = order.position(&package.name).unwrap();
            for dep in &package.requires {
                assert!(order.position(dep).unwrap() < own, "{dep} before {}", package.name);
            }
        }
        assert_eq!(order.position("app"), Some(order.len() - 1));
    }

    #[test]
    fn test_cycle_terminates_with_each_node_once() {
        let packages = vec![pkg("app", &["a"]).root(), pkg("a", &["b"]), pkg("b", &["a"])];
        assert_eq!(order_of(&packages, "app"), vec!["b", "a", "app"]);
    }

    #[test]
    fn test_self_dependency() {
        let packages = vec![pkg("app", &["app"]).root()];
        assert_eq!(order_of(&packages, "app"), vec!["app"]);
    }

    #[test]
    fn test_first_discovery_wins_over_deepest() {
        // d is found through b before c asks for it
        let packages = vec![
            pkg("app", &["b", "c"]).root(),
            pkg("b", &["d"]),
            pkg("c", &["d"]),
            pkg("d", &[]),
        ];
        let order = DependencyOrderer::new(&packages).order("app");
        let depths: Vec<_> = order.iter().map(|e| (e.name.as_str(), e.depth)).collect();
        assert_eq!(depths, vec![("d", 3), ("b", 2), ("c", 2), ("app", 1)]);
    }

    #[test]
    fn test_missing_dependency_ignored() {
        let packages = vec![pkg("app", &["ghost", "a"]).root(), pkg("a", &["phantom"])];
        assert_eq!(order_of(&packages, "app"), vec!["a", "app"]);
    }

    #[test]
    fn test_dev_requires_only_from_root() {
        let packages = vec![
            pkg("app", &["a"]).root().with_dev_requires(["testing"]),
            pkg("a", &[]).with_dev_requires(["a-dev"]),
            pkg("testing", &[]),
            pkg("a-dev", &[]),
        ];
        assert_eq!(order_of(&packages, "app"), vec!["a", "testing", "app"]);
    }

    #[test]
    fn test_requires_traversed_before_dev_requires() {
        let packages = vec![
            pkg("app", &["a"]).root().with_dev_requires(["testing"]),
            pkg("a", &[]),
            pkg("testing", &["a"]),
        ];
        assert_eq!(order_of(&packages, "app"), vec!["a", "testing", "app"]);
    }

    #[test]
    fn test_unreachable_packages_are_not_ordered() {
        let packages = vec![pkg("app", &[]).root(), pkg("orphan", &[])];
        assert_eq!(order_of(&packages, "app"), vec!["app"]);
    }

    #[test]
    fn test_unknown_root_yields_empty_order() {
        let packages = vec![pkg("app", &[]).root()];
        assert!(DependencyOrderer::new(&packages).order("nope").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let packages = vec![
            pkg("app", &["b", "c"]).root(),
            pkg("b", &["c", "d"]),
            pkg("c", &["b"]),
            pkg("d", &["app"]),
        ];
        let first = DependencyOrderer::new(&packages).order("app");
        let second = DependencyOrderer::new(&packages).order("app");
        assert_eq!(first, second);
    }
}
