//! Generic operations over dependency graphs.
//!
//! A graph maps every node to the list of nodes it depends on. Lists may name
//! the same dependency twice and may name nodes that are not keys; the latter
//! are treated as leaves.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::error::GraphError;

pub type Graph<K> = BTreeMap<K, Vec<K>>;

/// Nodes that no other node lists as a dependency, in key order.
pub fn find_roots<K>(graph: &Graph<K>) -> Vec<K>
where
    K: Ord + Clone,
{
    let mut has_dependents: BTreeSet<&K> = BTreeSet::new();
    for dependencies in graph.values() {
        has_dependents.extend(dependencies.iter());
    }
    graph
        .keys()
        .filter(|node| !has_dependents.contains(node))
        .cloned()
        .collect()
}

/// For every node, the nodes that list it as a dependency.
pub fn reverse_graph<K>(graph: &Graph<K>) -> Graph<K>
where
    K: Ord + Clone,
{
    let mut reversed: Graph<K> = graph.keys().map(|node| (node.clone(), Vec::new())).collect();
    for (node, dependencies) in graph {
        for dependency in dependencies {
            if let Some(dependents) = reversed.get_mut(dependency) {
                dependents.push(node.clone());
            }
        }
    }
    reversed
}

/// Depth-first post-order walk from `root`: every reachable node once, each
/// after all of its dependencies, `root` last.
///
/// With `reverse` the order is flipped so that `root` comes first and every
/// node precedes its dependencies. Cycles do not hang the walk but leave the
/// order incomplete; use [`checked_descendants_topologically_sorted`] to have
/// them reported.
pub fn descendants_topologically_sorted<K>(graph: &Graph<K>, root: &K, reverse: bool) -> Vec<K>
where
    K: Ord + Clone + Hash,
{
    let mut sorted = Vec::new();
    let mut visited: HashSet<K> = HashSet::new();
    visited.insert(root.clone());
    let mut stack: Vec<(K, usize)> = vec![(root.clone(), 0)];

    while let Some((node, next)) = stack.last_mut() {
        let dependencies = graph.get(node).map(Vec::as_slice).unwrap_or(&[]);
        if let Some(dependency) = dependencies.get(*next) {
            *next += 1;
            if visited.insert(dependency.clone()) {
                stack.push((dependency.clone(), 0));
            }
            continue;
        }
        if let Some((node, _)) = stack.pop() {
            sorted.push(node);
        }
    }

    if reverse {
        sorted.reverse();
    }
    sorted
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

/// Same walk as [`descendants_topologically_sorted`] (non-reversed), but a
/// dependency that leads back onto the current path fails with
/// [`GraphError::Cycle`].
pub fn checked_descendants_topologically_sorted<K>(
    graph: &Graph<K>,
    root: &K,
) -> Result<Vec<K>, GraphError<K>>
where
    K: Ord + Clone + Hash + std::fmt::Debug + std::fmt::Display,
{
    let mut sorted = Vec::new();
    let mut marks: HashMap<K, Mark> = HashMap::new();
    marks.insert(root.clone(), Mark::OnStack);
    let mut stack: Vec<(K, usize)> = vec![(root.clone(), 0)];

    while let Some((node, next)) = stack.last_mut() {
        let dependencies = graph.get(node).map(Vec::as_slice).unwrap_or(&[]);
        if let Some(dependency) = dependencies.get(*next) {
            *next += 1;
            match marks.get(dependency) {
                Some(Mark::OnStack) => {
                    return Err(GraphError::Cycle {
                        node: dependency.clone(),
                    });
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(dependency.clone(), Mark::OnStack);
                    stack.push((dependency.clone(), 0));
                }
            }
            continue;
        }
        if let Some((node, _)) = stack.pop() {
            marks.insert(node.clone(), Mark::Done);
            sorted.push(node);
        }
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: Vec<(&'static str, Vec<&'static str>)>) -> Graph<&'static str> {
        edges.into_iter().collect()
    }

    fn diamond() -> Graph<&'static str> {
        graph(vec![
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["d"]),
            ("d", vec![]),
            ("e", vec!["c"]),
        ])
    }

    #[test]
    fn roots_are_exactly_the_unreferenced_nodes() {
        let g = diamond();
        let roots = find_roots(&g);
        assert_eq!(roots, vec!["a", "e"]);
        for (node, _) in &g {
            let referenced = g.values().any(|deps| deps.contains(node));
            assert_eq!(roots.contains(node), !referenced, "{node}");
        }
    }

    #[test]
    fn reverse_keeps_every_key() {
        let reversed = reverse_graph(&diamond());
        assert_eq!(reversed.len(), 5);
        assert_eq!(reversed["a"], Vec::<&str>::new());
        assert_eq!(reversed["d"], vec!["b", "c"]);
        assert_eq!(reversed["c"], vec!["a", "e"]);
    }

    #[test]
    fn reverse_ignores_unknown_dependencies() {
        let reversed = reverse_graph(&graph(vec![("a", vec!["ghost"])]));
        assert_eq!(reversed.len(), 1);
        assert!(reversed["a"].is_empty());
    }

    #[test]
    fn reversing_twice_restores_edges() {
        let g = diamond();
        let twice = reverse_graph(&reverse_graph(&g));
        let edges = |g: &Graph<&'static str>| {
            let mut all: Vec<(&str, &str)> = g
                .iter()
                .flat_map(|(node, deps)| deps.iter().map(move |dep| (*node, *dep)))
                .collect();
            all.sort();
            all
        };
        assert_eq!(edges(&twice), edges(&g));
    }

    #[test]
    fn post_order_puts_dependencies_first() {
        let g = diamond();
        let sorted = descendants_topologically_sorted(&g, &"a", false);
        assert_eq!(sorted, vec!["d", "b", "c", "a"]);
        let position = |n: &str| sorted.iter().position(|x| *x == n).unwrap();
        for node in &sorted {
            for dep in &g[node] {
                assert!(position(dep) < position(node));
            }
        }
    }

    #[test]
    fn reverse_order_puts_root_first() {
        let sorted = descendants_topologically_sorted(&diamond(), &"a", true);
        assert_eq!(sorted, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn repeated_dependencies_are_emitted_once() {
        let g = graph(vec![("arr", vec!["x", "x", "y"]), ("x", vec![]), ("y", vec![])]);
        assert_eq!(
            descendants_topologically_sorted(&g, &"arr", false),
            vec!["x", "y", "arr"]
        );
    }

    #[test]
    fn cycles_terminate_and_are_reported_when_checked() {
        let g = graph(vec![("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])]);
        let lenient = descendants_topologically_sorted(&g, &"a", false);
        assert_eq!(lenient, vec!["c", "b", "a"]);
        assert_eq!(
            checked_descendants_topologically_sorted(&g, &"a"),
            Err(GraphError::Cycle { node: "a" })
        );
    }

    #[test]
    fn checked_walk_matches_lenient_walk_on_dags() {
        let g = diamond();
        assert_eq!(
            checked_descendants_topologically_sorted(&g, &"e").unwrap(),
            descendants_topologically_sorted(&g, &"e", false)
        );
    }

    #[test]
    fn deep_chains_do_not_overflow() {
        let mut g: Graph<u32> = BTreeMap::new();
        for i in 0..200_000u32 {
            g.insert(i, vec![i + 1]);
        }
        g.insert(200_000, Vec::new());
        let sorted = descendants_topologically_sorted(&g, &0, false);
        assert_eq!(sorted.len(), 200_001);
        assert_eq!(sorted[0], 200_000);
    }
}
