//! Build-graph resolution
//!
//! Constructs every registered module's descriptor for a target
//! context, resolves dependency names, rejects cycles and
//! cross-category duplicates, and computes include-path visibility:
//! public dependencies' public include paths propagate to consumers,
//! private ones never do. Dynamic dependencies are load-time edges —
//! resolved for existence, excluded from cycles and propagation.

use crate::descriptor::ModuleDescriptor;
use crate::registry::ModuleRegistry;
use crate::target::TargetContext;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur during graph resolution
#[derive(Debug, Error)]
pub enum GraphError {
    /// Rules produced a descriptor under a different name
    #[error("Rules registered as '{registered}' produced descriptor named '{reported}'")]
    NameMismatch { registered: String, reported: String },

    /// A dependency name declared in more than one category
    #[error("Module '{module}' lists '{dependency}' in more than one dependency category")]
    DuplicateDependency { module: String, dependency: String },

    /// A module listing itself as a direct dependency
    #[error("Module '{0}' depends on itself")]
    SelfDependency(String),

    /// A dependency name with no declared module or prebuilt entry
    #[error("Module '{module}' depends on unknown module '{dependency}'")]
    ModuleNotFound { module: String, dependency: String },

    /// A cycle through static (link-time) dependency edges
    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),
}

/// One module after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedModule {
    /// The constructed descriptor
    pub descriptor: ModuleDescriptor,

    /// Include paths this module exposes to public dependents
    ///
    /// Own public paths plus the exported paths of public
    /// dependencies, transitively. Prebuilt modules export nothing.
    pub exported_includes: Vec<String>,

    /// Include paths visible while compiling this module
    ///
    /// Own public and private paths plus the exported paths of every
    /// static dependency.
    pub compile_includes: Vec<String>,
}

/// The resolved build graph for one target context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGraph {
    /// Target the graph was resolved for
    pub target: TargetContext,

    /// Resolved modules, keyed by name
    pub modules: BTreeMap<String, ResolvedModule>,

    /// Dependency-first build order, lexicographic tie-break
    pub build_order: Vec<String>,

    /// Prebuilt module names referenced by the graph
    pub prebuilt: BTreeSet<String>,
}

impl ResolvedGraph {
    /// Look up a resolved module by name
    pub fn get(&self, name: &str) -> Option<&ResolvedModule> {
        self.modules.get(name)
    }

    /// Serialize the graph as JSON for an external orchestrator
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize the graph as pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve the full graph for one target context
///
/// Every registered module's descriptor is constructed exactly once.
/// Identical registry and target input yields an identical graph.
pub fn resolve(
    registry: &ModuleRegistry,
    target: &TargetContext,
) -> Result<ResolvedGraph, GraphError> {
    let mut descriptors: BTreeMap<String, ModuleDescriptor> = BTreeMap::new();
    for rules in registry.iter() {
        let descriptor = rules.describe(target);
        if descriptor.name != rules.name() {
            return Err(GraphError::NameMismatch {
                registered: rules.name().to_string(),
                reported: descriptor.name,
            });
        }
        descriptors.insert(descriptor.name.clone(), descriptor);
    }

    let mut referenced_prebuilt = BTreeSet::new();
    for descriptor in descriptors.values() {
        if let Some((dependency, _, _)) = descriptor.duplicate_dependency() {
            return Err(GraphError::DuplicateDependency {
                module: descriptor.name.clone(),
                dependency: dependency.to_string(),
            });
        }
        if descriptor.depends_on_self() {
            return Err(GraphError::SelfDependency(descriptor.name.clone()));
        }
        for (dependency, _) in descriptor.all_dependencies() {
            if descriptors.contains_key(dependency) {
                continue;
            }
            if registry.is_prebuilt(dependency) {
                referenced_prebuilt.insert(dependency.to_string());
            } else {
                return Err(GraphError::ModuleNotFound {
                    module: descriptor.name.clone(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }

    check_cycles(&descriptors)?;
    let build_order = topological_order(&descriptors);

    // Dependency-first order lets each closure read its dependencies'
    // already-computed exports.
    let mut exported: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut modules: BTreeMap<String, ResolvedModule> = BTreeMap::new();
    for name in &build_order {
        let descriptor = &descriptors[name];

        let mut exports: Vec<String> = Vec::new();
        for path in &descriptor.public_include_paths {
            push_unique(&mut exports, path.clone());
        }
        for dep in &descriptor.public_dependencies {
            if let Some(dep_exports) = exported.get(dep) {
                for path in dep_exports {
                    push_unique(&mut exports, path.clone());
                }
            }
        }

        let mut compile: Vec<String> = Vec::new();
        for path in &descriptor.public_include_paths {
            push_unique(&mut compile, path.clone());
        }
        for path in &descriptor.private_include_paths {
            push_unique(&mut compile, path.clone());
        }
        for dep in descriptor.static_dependencies() {
            if let Some(dep_exports) = exported.get(dep) {
                for path in dep_exports {
                    push_unique(&mut compile, path.clone());
                }
            }
        }

        exported.insert(name.clone(), exports.clone());
        modules.insert(
            name.clone(),
            ResolvedModule {
                descriptor: descriptor.clone(),
                exported_includes: exports,
                compile_includes: compile,
            },
        );
    }

    Ok(ResolvedGraph {
        target: *target,
        modules,
        build_order,
        prebuilt: referenced_prebuilt,
    })
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// DFS cycle check over static edges between declared modules
fn check_cycles(descriptors: &BTreeMap<String, ModuleDescriptor>) -> Result<(), GraphError> {
    let mut visited = BTreeSet::new();
    let mut stack = Vec::new();

    for name in descriptors.keys() {
        if !visited.contains(name.as_str()) {
            visit(name, descriptors, &mut visited, &mut stack)?;
        }
    }
    Ok(())
}

fn visit(
    name: &str,
    descriptors: &BTreeMap<String, ModuleDescriptor>,
    visited: &mut BTreeSet<String>,
    stack: &mut Vec<String>,
) -> Result<(), GraphError> {
    if let Some(pos) = stack.iter().position(|n| n == name) {
        let mut path: Vec<&str> = stack[pos..].iter().map(String::as_str).collect();
        path.push(name);
        return Err(GraphError::CircularDependency(path.join(" -> ")));
    }
    if visited.contains(name) {
        return Ok(());
    }

    stack.push(name.to_string());
    if let Some(descriptor) = descriptors.get(name) {
        for dep in descriptor.static_dependencies() {
            if descriptors.contains_key(dep) {
                visit(dep, descriptors, visited, stack)?;
            }
        }
    }
    stack.pop();
    visited.insert(name.to_string());
    Ok(())
}

/// Kahn's algorithm over static edges, lexicographic among ready nodes
fn topological_order(descriptors: &BTreeMap<String, ModuleDescriptor>) -> Vec<String> {
    let mut indegree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (name, descriptor) in descriptors {
        indegree.entry(name).or_insert(0);
        for dep in descriptor.static_dependencies() {
            if descriptors.contains_key(dep) {
                *indegree.entry(name).or_insert(0) += 1;
                dependents.entry(dep).or_default().push(name);
            }
        }
    }

    let mut ready: BTreeSet<&str> = indegree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(n, _)| *n)
        .collect();
    let mut order = Vec::with_capacity(descriptors.len());

    while let Some(name) = ready.iter().next().copied() {
        ready.remove(name);
        order.push(name.to_string());
        if let Some(deps) = dependents.get(name) {
            for dependent in deps {
                if let Some(d) = indegree.get_mut(dependent) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DependencyKind;

    fn descriptor(name: &str) -> ModuleDescriptor {
        ModuleDescriptor::new(name)
    }

    fn registry_of(descriptors: Vec<ModuleDescriptor>, prebuilt: &[&str]) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for desc in descriptors {
            registry.register(desc).unwrap();
        }
        for name in prebuilt {
            registry.register_prebuilt(*name).unwrap();
        }
        registry
    }

    #[test]
    fn test_resolve_empty_registry() {
        let registry = ModuleRegistry::new();
        let graph = resolve(&registry, &TargetContext::default()).unwrap();
        assert!(graph.modules.is_empty());
        assert!(graph.build_order.is_empty());
    }

    #[test]
    fn test_unknown_dependency() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Private, "Missing");
        let registry = registry_of(vec![a], &[]);

        let result = resolve(&registry, &TargetContext::default());
        match result {
            Err(GraphError::ModuleNotFound { module, dependency }) => {
                assert_eq!(module, "Alpha");
                assert_eq!(dependency, "Missing");
            }
            other => panic!("Expected ModuleNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_prebuilt_satisfies_resolution() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Public, "Core");
        let registry = registry_of(vec![a], &["Core"]);

        let graph = resolve(&registry, &TargetContext::default()).unwrap();
        assert!(graph.prebuilt.contains("Core"));
        // Prebuilt modules export no include paths.
        assert!(graph.get("Alpha").unwrap().compile_includes.is_empty());
    }

    #[test]
    fn test_cycle_detected_with_path() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Public, "Beta");
        let mut b = descriptor("Beta");
        b.add_dependency(DependencyKind::Private, "Gamma");
        let mut c = descriptor("Gamma");
        c.add_dependency(DependencyKind::Public, "Alpha");
        let registry = registry_of(vec![a, b, c], &[]);

        let result = resolve(&registry, &TargetContext::default());
        match result {
            Err(GraphError::CircularDependency(path)) => {
                assert!(path.contains("Alpha"), "path was: {}", path);
                assert!(path.contains("->"));
            }
            other => panic!("Expected CircularDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_dynamic_edge_not_a_cycle() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Public, "Beta");
        let mut b = descriptor("Beta");
        b.add_dependency(DependencyKind::Dynamic, "Alpha");
        let registry = registry_of(vec![a, b], &[]);

        assert!(resolve(&registry, &TargetContext::default()).is_ok());
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Private, "Alpha");
        let registry = registry_of(vec![a], &[]);

        let result = resolve(&registry, &TargetContext::default());
        assert!(matches!(result, Err(GraphError::SelfDependency(_))));
    }

    #[test]
    fn test_cross_category_duplicate_rejected() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Public, "Beta");
        a.add_dependency(DependencyKind::Dynamic, "Beta");
        let registry = registry_of(vec![a, descriptor("Beta")], &[]);

        let result = resolve(&registry, &TargetContext::default());
        match result {
            Err(GraphError::DuplicateDependency { module, dependency }) => {
                assert_eq!(module, "Alpha");
                assert_eq!(dependency, "Beta");
            }
            other => panic!("Expected DuplicateDependency, got {:?}", other),
        }
    }

    #[test]
    fn test_public_includes_propagate_transitively() {
        let mut base = descriptor("Base");
        base.add_public_include_path("Base/Public");
        base.add_private_include_path("Base/Private");

        let mut mid = descriptor("Mid");
        mid.add_public_include_path("Mid/Public");
        mid.add_dependency(DependencyKind::Public, "Base");

        let mut top = descriptor("Top");
        top.add_dependency(DependencyKind::Public, "Mid");

        let registry = registry_of(vec![base, mid, top], &[]);
        let graph = resolve(&registry, &TargetContext::default()).unwrap();

        let top = graph.get("Top").unwrap();
        assert!(top.compile_includes.contains(&"Mid/Public".to_string()));
        assert!(top.compile_includes.contains(&"Base/Public".to_string()));
        // Private paths never leave their module.
        assert!(!top.compile_includes.contains(&"Base/Private".to_string()));
    }

    #[test]
    fn test_private_dependency_does_not_reexport() {
        let mut base = descriptor("Base");
        base.add_public_include_path("Base/Public");

        let mut mid = descriptor("Mid");
        mid.add_dependency(DependencyKind::Private, "Base");

        let mut top = descriptor("Top");
        top.add_dependency(DependencyKind::Public, "Mid");

        let registry = registry_of(vec![base, mid, top], &[]);
        let graph = resolve(&registry, &TargetContext::default()).unwrap();

        // Mid sees Base's public paths, Top does not.
        let mid = graph.get("Mid").unwrap();
        assert!(mid.compile_includes.contains(&"Base/Public".to_string()));
        let top = graph.get("Top").unwrap();
        assert!(!top.compile_includes.contains(&"Base/Public".to_string()));
    }

    #[test]
    fn test_build_order_dependency_first() {
        let mut a = descriptor("Alpha");
        a.add_dependency(DependencyKind::Public, "Gamma");
        let mut b = descriptor("Beta");
        b.add_dependency(DependencyKind::Private, "Alpha");
        let c = descriptor("Gamma");

        let registry = registry_of(vec![a, b, c], &[]);
        let graph = resolve(&registry, &TargetContext::default()).unwrap();
        assert_eq!(graph.build_order, vec!["Gamma", "Alpha", "Beta"]);
    }

    #[test]
    fn test_deterministic_resolution() {
        let build = |_: ()| {
            let mut base = descriptor("Base");
            base.add_public_include_path("Base/Public");
            let mut top = descriptor("Top");
            top.add_dependency(DependencyKind::Public, "Base");
            registry_of(vec![base, top], &["Core"])
        };

        let target = TargetContext::default();
        let first = resolve(&build(()), &target).unwrap();
        let second = resolve(&build(()), &target).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_name_mismatch_rejected() {
        use crate::rules::RulesFn;

        let rules = RulesFn::new("Alpha", |_, _| ModuleDescriptor::new("Beta"));
        let mut registry = ModuleRegistry::new();
        registry.register(rules).unwrap();

        let result = resolve(&registry, &TargetContext::default());
        assert!(matches!(result, Err(GraphError::NameMismatch { .. })));
    }
}
