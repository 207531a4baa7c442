//! Dependency graph - construction, cycle detection, validation, ordering

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::application::errors::ModuleError;
use super::registry::ModuleRegistry;

/// Vertex state during cycle detection
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Not yet visited
    White,
    /// On the current DFS path
    Gray,
    /// Fully explored, no cycle through it
    Black,
}

/// Dependency graph for one activation batch.
///
/// Rebuilt on every `enable_modules` call. Adjacency covers the batch's
/// transitive closure through the registry: a registered dependency outside
/// the batch still contributes its own edges, so a cycle routed through a
/// module nobody requested is still reported as a cycle. Referenced names
/// with no registry entry become leaves; those are a validation concern, not
/// a cycle-detector concern.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Deduplicated batch, essential modules first
    batch: Vec<String>,
    /// name -> required names, for every registered name reachable from the batch
    edges: HashMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph for a batch of module names.
    ///
    /// Every batch name must be registered; unregistered batch names are
    /// collected and reported together in one [`ModuleError::UnknownModule`]
    /// so the caller sees the complete picture, not just the first miss.
    pub fn build(registry: &ModuleRegistry, batch: &[String]) -> Result<Self, ModuleError> {
        let missing: Vec<String> = batch
            .iter()
            .filter(|name| !registry.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ModuleError::UnknownModule(missing));
        }

        let mut edges: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut pending: Vec<String> = batch.to_vec();
        while let Some(name) = pending.pop() {
            if edges.contains_key(&name) {
                continue;
            }
            let Ok(descriptor) = registry.lookup(&name) else {
                // Dangling dependency, left for validation to report
                continue;
            };
            let required: BTreeSet<String> =
                descriptor.required_modules().iter().cloned().collect();
            pending.extend(required.iter().cloned());
            edges.insert(name, required);
        }

        Ok(Self {
            batch: batch.to_vec(),
            edges,
        })
    }

    /// Find the first dependency cycle, if any.
    ///
    /// Three-color depth-first search started from every batch name, so a
    /// cycle in a component unreachable from earlier start points is still
    /// found. Returns the cycle as an ordered path with the repeated name at
    /// both ends, e.g. `[a, b, a]`.
    pub fn detect_cycle(&self) -> Option<Vec<String>> {
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut path: Vec<String> = Vec::new();

        for start in &self.batch {
            if let Some(cycle) = self.walk(start, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn walk<'a>(
        &'a self,
        node: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        match marks.get(node).copied().unwrap_or(Mark::White) {
            Mark::Gray => {
                // Back edge: slice the path from the first occurrence and
                // close the loop with the repeated name
                let start = path.iter().position(|n| n == node).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(node.to_string());
                return Some(cycle);
            }
            Mark::Black => return None,
            Mark::White => {}
        }

        marks.insert(node, Mark::Gray);
        path.push(node.to_string());

        if let Some(required) = self.edges.get(node) {
            for dependency in required {
                if let Some(cycle) = self.walk(dependency, marks, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        marks.insert(node, Mark::Black);
        None
    }

    /// Check that every requirement of every batch member is itself in the
    /// batch. Fails on the first violation, naming both sides.
    pub fn validate(&self) -> Result<(), ModuleError> {
        let enabled: HashSet<&str> = self.batch.iter().map(String::as_str).collect();
        for name in &self.batch {
            if let Some(required) = self.edges.get(name) {
                for dependency in required {
                    if !enabled.contains(dependency.as_str()) {
                        return Err(ModuleError::UnsatisfiedDependency {
                            module: name.clone(),
                            requires: dependency.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Batch names in activation order: every module appears after all of its
    /// requirements. Only valid once cycle detection and validation passed.
    pub fn activation_order(&self) -> Vec<String> {
        let mut order = Vec::with_capacity(self.batch.len());
        let mut seen = HashSet::new();
        for name in &self.batch {
            self.visit(name, &mut seen, &mut order);
        }
        order
    }

    fn visit(&self, node: &str, seen: &mut HashSet<String>, order: &mut Vec<String>) {
        if !seen.insert(node.to_string()) {
            return;
        }
        if let Some(required) = self.edges.get(node) {
            for dependency in required {
                self.visit(dependency, seen, order);
            }
        }
        order.push(node.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::noop_module;

    fn registry_of(specs: &[(&str, &[&str])]) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for (name, required) in specs {
            let mut descriptor = noop_module(*name);
            for dep in *required {
                descriptor = descriptor.requires(*dep);
            }
            registry.register(descriptor).unwrap();
        }
        registry
    }

    fn batch(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn build_reports_all_unknown_names_at_once() {
        let registry = registry_of(&[("core", &[])]);
        let err =
            DependencyGraph::build(&registry, &batch(&["core", "ghost", "phantom"])).unwrap_err();
        match err {
            ModuleError::UnknownModule(names) => {
                assert_eq!(names, vec!["ghost".to_string(), "phantom".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let registry = registry_of(&[("core", &[]), ("stats", &["core"]), ("ranks", &["stats"])]);
        let graph =
            DependencyGraph::build(&registry, &batch(&["core", "stats", "ranks"])).unwrap();
        assert!(graph.detect_cycle().is_none());
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn two_node_cycle_reports_closed_path() {
        let registry = registry_of(&[("a", &["b"]), ("b", &["a"])]);
        let graph = DependencyGraph::build(&registry, &batch(&["a"])).unwrap();
        assert_eq!(graph.detect_cycle(), Some(batch(&["a", "b", "a"])));
    }

    #[test]
    fn self_cycle_is_detected() {
        let registry = registry_of(&[("a", &["a"])]);
        let graph = DependencyGraph::build(&registry, &batch(&["a"])).unwrap();
        assert_eq!(graph.detect_cycle(), Some(batch(&["a", "a"])));
    }

    #[test]
    fn cycle_in_second_component_is_found() {
        // "solo" has no edges; the cycle lives in a component only reachable
        // from the later start points
        let registry = registry_of(&[("solo", &[]), ("x", &["y"]), ("y", &["x"])]);
        let graph = DependencyGraph::build(&registry, &batch(&["solo", "x", "y"])).unwrap();
        let cycle = graph.detect_cycle().expect("cycle should be found");
        assert!(cycle.contains(&"x".to_string()));
        assert!(cycle.contains(&"y".to_string()));
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn dependency_outside_batch_is_not_a_cycle() {
        let registry = registry_of(&[("core", &[]), ("stats", &["core"])]);
        let graph = DependencyGraph::build(&registry, &batch(&["stats"])).unwrap();
        assert!(graph.detect_cycle().is_none());

        let err = graph.validate().unwrap_err();
        match err {
            ModuleError::UnsatisfiedDependency { module, requires } => {
                assert_eq!(module, "stats");
                assert_eq!(requires, "core");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unregistered_dependency_fails_validation() {
        let registry = registry_of(&[("stats", &["ghost"])]);
        let graph = DependencyGraph::build(&registry, &batch(&["stats"])).unwrap();
        assert!(graph.detect_cycle().is_none());
        assert!(matches!(
            graph.validate(),
            Err(ModuleError::UnsatisfiedDependency { .. })
        ));
    }

    #[test]
    fn activation_order_puts_requirements_first() {
        let registry = registry_of(&[
            ("core", &[]),
            ("stats", &["core"]),
            ("ranks", &["stats", "core"]),
        ]);
        let graph =
            DependencyGraph::build(&registry, &batch(&["ranks", "stats", "core"])).unwrap();
        let order = graph.activation_order();

        assert_eq!(order.len(), 3);
        let position = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert!(position("core") < position("stats"));
        assert!(position("stats") < position("ranks"));
    }
}
