//! core::ancestry
//!
//! Reachability queries over the commit graph, with memoization.
//!
//! # Architecture
//!
//! The commit graph is a DAG where:
//! - Nodes are commits, identified by [`Oid`]
//! - Edges point from child to parent (merge commits have several parents)
//! - The graph itself is externally owned and read-only
//!
//! [`AncestryOracle`] answers "is commit A an ancestor of commit B?" and
//! derives from that the set of commits lying strictly between two commits.
//! Both queries are used repeatedly over overlapping history ranges (once for
//! pre-flight validation, once per candidate commit when building the
//! selection list), so the oracle memoizes ancestry facts as it discovers
//! them. History is immutable, which makes every cached fact permanent.
//!
//! # Invariants
//!
//! - A cache entry, once written, never changes value
//! - Traversal expands each commit at most once per query
//! - A malformed graph containing a cycle still terminates

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use super::types::Oid;

/// Errors from graph providers.
///
/// The oracle itself has no failure modes of its own; it only propagates
/// failures from the backing graph. A reachability query is pure and
/// deterministic, so none of these are transient.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The commit id is not present in the graph.
    #[error("unknown commit: {0}")]
    UnknownCommit(String),

    /// The backing store failed to produce a parent list.
    #[error("graph backend error: {0}")]
    Backend(String),
}

/// Read-only access to the parent structure of a commit graph.
///
/// Implementations must be deterministic and side-effect-free from the
/// oracle's perspective. The `git` layer implements this over a real
/// repository; tests use an in-memory map.
pub trait CommitGraph {
    /// Return the parent ids of a commit.
    ///
    /// Empty for a root commit, more than one entry for a merge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownCommit`] if the id does not resolve to
    /// a commit in this graph.
    fn parents_of(&self, id: &Oid) -> Result<Vec<Oid>, GraphError>;
}

impl<G: CommitGraph + ?Sized> CommitGraph for &G {
    fn parents_of(&self, id: &Oid) -> Result<Vec<Oid>, GraphError> {
        (**self).parents_of(id)
    }
}

/// Memoizing reachability oracle over a commit graph.
///
/// One oracle is constructed per invocation and passed to every call site.
/// The cache maps an ordered `(source, target)` pair to whether `target` is
/// reachable from `source` by following parent edges. Entries appear either
/// because the pair was queried or as a by-product of another query's
/// traversal, and the cache only grows.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use relcut::core::ancestry::{AncestryOracle, CommitGraph, GraphError};
/// use relcut::core::types::Oid;
///
/// struct MapGraph(HashMap<Oid, Vec<Oid>>);
///
/// impl CommitGraph for MapGraph {
///     fn parents_of(&self, id: &Oid) -> Result<Vec<Oid>, GraphError> {
///         self.0
///             .get(id)
///             .cloned()
///             .ok_or_else(|| GraphError::UnknownCommit(id.to_string()))
///     }
/// }
///
/// let root = Oid::new("a".repeat(40)).unwrap();
/// let tip = Oid::new("b".repeat(40)).unwrap();
/// let graph = MapGraph(HashMap::from([
///     (root.clone(), vec![]),
///     (tip.clone(), vec![root.clone()]),
/// ]));
///
/// let mut oracle = AncestryOracle::new(graph);
/// assert!(oracle.is_ancestor(&root, &tip).unwrap());
/// assert!(!oracle.is_ancestor(&tip, &root).unwrap());
/// ```
#[derive(Debug)]
pub struct AncestryOracle<G> {
    graph: G,
    /// `(source, target) -> target is an ancestor of source`
    cache: HashMap<(Oid, Oid), bool>,
}

impl<G: CommitGraph> AncestryOracle<G> {
    /// Create an oracle with an empty cache.
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            cache: HashMap::new(),
        }
    }

    /// Borrow the underlying graph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Is `target` an ancestor of (or equal to) `source`?
    ///
    /// `target` is an ancestor of `source` when it is reachable from
    /// `source` by following parent edges; a commit counts as its own
    /// ancestor.
    ///
    /// A breadth-first traversal starts from `source`'s immediate parents.
    /// Each frontier element carries the whole path taken from `source`, not
    /// just its tip: on a positive answer every suffix pair along that path
    /// is a proven ancestry fact and is written to the cache, so later
    /// queries anywhere along the same history are O(1) lookups. On a
    /// negative answer every visited commit is cached as not reaching
    /// `target`.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError`] if the graph cannot resolve a commit's
    /// parents. No partial answer is produced.
    pub fn is_ancestor(&mut self, target: &Oid, source: &Oid) -> Result<bool, GraphError> {
        if target == source {
            return Ok(true);
        }

        if let Some(&known) = self.cache.get(&(source.clone(), target.clone())) {
            return Ok(known);
        }

        // The visited set both dedups fan-in (a commit reachable through
        // several parent chains is expanded once) and guards against
        // non-termination on a corrupted graph that contains a cycle.
        let mut visited: HashSet<Oid> = HashSet::new();
        visited.insert(source.clone());

        let mut frontier: VecDeque<Vec<Oid>> = VecDeque::new();
        for parent in self.graph.parents_of(source)? {
            if visited.insert(parent.clone()) {
                frontier.push_back(vec![source.clone(), parent]);
            }
        }

        while let Some(path) = frontier.pop_front() {
            let tip = path[path.len() - 1].clone();

            // Reached the target, or a previous query already proved that
            // this commit reaches it. Either way the whole path is positive.
            let reached = tip == *target
                || self.cache.get(&(tip.clone(), target.clone())) == Some(&true);

            if reached {
                for i in 0..path.len() {
                    for j in i..path.len() {
                        self.cache
                            .insert((path[i].clone(), path[j].clone()), true);
                    }
                    // Covers the cache-shortcut case, where the path stops
                    // short of the target itself.
                    self.cache.insert((path[i].clone(), target.clone()), true);
                }
                return Ok(true);
            }

            for parent in self.graph.parents_of(&tip)? {
                if visited.insert(parent.clone()) {
                    let mut extended = path.clone();
                    extended.push(parent);
                    frontier.push_back(extended);
                }
            }
        }

        // Exhausted without reaching the target: nothing visited (including
        // the source itself) reaches it.
        for id in visited {
            self.cache.insert((id, target.clone()), false);
        }
        Ok(false)
    }

    /// Commits introduced between `target` and `source`, excluding both.
    ///
    /// Returns every ancestor of `source` that is not `target`, not an
    /// ancestor of `target`, and has `target` as an ancestor. Only set
    /// membership is guaranteed; callers impose display ordering (the CLI
    /// sorts by commit time, descending).
    ///
    /// The full ancestor set of `target` is materialized once; the
    /// per-candidate ancestry checks then lean on the memoization cache, so
    /// the quadratic shape stays cheap in practice.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError`] from parent lookups.
    pub fn commits_between(&mut self, target: &Oid, source: &Oid) -> Result<Vec<Oid>, GraphError> {
        let target_ancestors: HashSet<Oid> = self.ancestors_of(target)?.into_iter().collect();

        let mut commits = Vec::new();
        for ancestor in self.ancestors_of(source)? {
            if ancestor != *target
                && !target_ancestors.contains(&ancestor)
                && self.is_ancestor(target, &ancestor)?
            {
                commits.push(ancestor);
            }
        }

        Ok(commits)
    }

    /// All transitive ancestors of `start`, excluding `start` itself, in
    /// breadth-first discovery order.
    fn ancestors_of(&self, start: &Oid) -> Result<Vec<Oid>, GraphError> {
        let mut seen: HashSet<Oid> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<Oid> = self.graph.parents_of(start)?.into();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            for parent in self.graph.parents_of(&id)? {
                if !seen.contains(&parent) {
                    queue.push_back(parent);
                }
            }
            order.push(id);
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory graph with a parent-lookup counter, for verifying that
    /// cached queries perform no traversal.
    struct MemoryGraph {
        parents: HashMap<Oid, Vec<Oid>>,
        lookups: Cell<usize>,
    }

    impl MemoryGraph {
        fn new() -> Self {
            Self {
                parents: HashMap::new(),
                lookups: Cell::new(0),
            }
        }

        fn add(&mut self, commit: &Oid, parents: &[&Oid]) {
            self.parents
                .insert(commit.clone(), parents.iter().map(|&p| p.clone()).collect());
        }

        fn lookups(&self) -> usize {
            self.lookups.get()
        }
    }

    impl CommitGraph for MemoryGraph {
        fn parents_of(&self, id: &Oid) -> Result<Vec<Oid>, GraphError> {
            self.lookups.set(self.lookups.get() + 1);
            self.parents
                .get(id)
                .cloned()
                .ok_or_else(|| GraphError::UnknownCommit(id.to_string()))
        }
    }

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    /// `a <- b <- c <- d` (parent edges point left).
    fn linear_chain() -> (MemoryGraph, Oid, Oid, Oid, Oid) {
        let (a, b, c, d) = (oid('a'), oid('b'), oid('c'), oid('d'));
        let mut graph = MemoryGraph::new();
        graph.add(&a, &[]);
        graph.add(&b, &[&a]);
        graph.add(&c, &[&b]);
        graph.add(&d, &[&c]);
        (graph, a, b, c, d)
    }

    #[test]
    fn reflexive_without_graph_access() {
        // The commit does not even need recorded parents.
        let graph = MemoryGraph::new();
        let mut oracle = AncestryOracle::new(&graph);
        let c = oid('c');

        assert!(oracle.is_ancestor(&c, &c).unwrap());
        assert_eq!(graph.lookups(), 0);
    }

    #[test]
    fn transitive_closure_on_chain() {
        let (graph, a, b, c, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);

        assert!(oracle.is_ancestor(&a, &d).unwrap());
        assert!(oracle.is_ancestor(&b, &d).unwrap());
        assert!(oracle.is_ancestor(&a, &c).unwrap());
        assert!(!oracle.is_ancestor(&d, &a).unwrap());
    }

    #[test]
    fn positive_result_cached_without_retraversal() {
        let (graph, a, _, _, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);

        assert!(oracle.is_ancestor(&a, &d).unwrap());
        let after_first = graph.lookups();

        assert!(oracle.is_ancestor(&a, &d).unwrap());
        assert_eq!(graph.lookups(), after_first);
    }

    #[test]
    fn negative_result_cached_without_retraversal() {
        let (graph, a, _, _, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);

        assert!(!oracle.is_ancestor(&d, &a).unwrap());
        let after_first = graph.lookups();

        assert!(!oracle.is_ancestor(&d, &a).unwrap());
        assert_eq!(graph.lookups(), after_first);
    }

    #[test]
    fn suffix_pairs_cached_along_discovered_path() {
        let (graph, a, b, c, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);

        // Walking d -> c -> b -> a proves every suffix pair on the way.
        assert!(oracle.is_ancestor(&a, &d).unwrap());
        let after_first = graph.lookups();

        assert!(oracle.is_ancestor(&b, &c).unwrap());
        assert!(oracle.is_ancestor(&b, &d).unwrap());
        assert!(oracle.is_ancestor(&c, &d).unwrap());
        assert_eq!(graph.lookups(), after_first);
    }

    #[test]
    fn cache_hit_mid_traversal_short_circuits() {
        let (graph, a, _, c, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);

        // Seed the cache from c, then query from d: the traversal stops as
        // soon as it pops c, and the (d, a) fact is recorded anyway.
        assert!(oracle.is_ancestor(&a, &c).unwrap());
        assert!(oracle.is_ancestor(&a, &d).unwrap());

        let after = graph.lookups();
        assert!(oracle.is_ancestor(&a, &d).unwrap());
        assert_eq!(graph.lookups(), after);
    }

    #[test]
    fn merge_fan_in_expands_shared_ancestor_once() {
        // r <- x <- m and r <- y <- m: both parent chains of the merge
        // commit m reach r.
        let (r, x, y, m) = (oid('1'), oid('2'), oid('3'), oid('4'));
        let mut graph = MemoryGraph::new();
        graph.add(&r, &[]);
        graph.add(&x, &[&r]);
        graph.add(&y, &[&r]);
        graph.add(&m, &[&x, &y]);

        let mut oracle = AncestryOracle::new(&graph);
        assert!(oracle.is_ancestor(&r, &m).unwrap());

        // m, x, y expanded; r found by equality before expansion. If r were
        // enqueued twice the count would exceed this.
        assert!(graph.lookups() <= 3, "lookups = {}", graph.lookups());
    }

    #[test]
    fn commits_between_excludes_endpoints() {
        let (graph, a, b, c, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);

        let between = oracle.commits_between(&a, &d).unwrap();
        let set: HashSet<Oid> = between.into_iter().collect();
        assert_eq!(set, HashSet::from([b, c]));
    }

    #[test]
    fn commits_between_skips_other_branch() {
        // a <- b <- d (development), a <- e (unrelated branch tip merged
        // nowhere): e is an ancestor of nothing on the d side.
        let (a, b, d, e) = (oid('a'), oid('b'), oid('d'), oid('e'));
        let mut graph = MemoryGraph::new();
        graph.add(&a, &[]);
        graph.add(&b, &[&a]);
        graph.add(&d, &[&b]);
        graph.add(&e, &[&a]);

        let mut oracle = AncestryOracle::new(&graph);
        let between = oracle.commits_between(&a, &d).unwrap();
        assert_eq!(between, vec![b]);
    }

    #[test]
    fn commits_between_empty_for_adjacent_commits() {
        let (graph, _, _, c, d) = linear_chain();
        let mut oracle = AncestryOracle::new(&graph);
        assert!(oracle.commits_between(&c, &d).unwrap().is_empty());
    }

    #[test]
    fn disjoint_roots_unreachable_both_ways() {
        let (x, y) = (oid('5'), oid('6'));
        let mut graph = MemoryGraph::new();
        graph.add(&x, &[]);
        graph.add(&y, &[]);

        let mut oracle = AncestryOracle::new(&graph);
        assert!(!oracle.is_ancestor(&x, &y).unwrap());
        assert!(!oracle.is_ancestor(&y, &x).unwrap());

        // Both negatives now answered from cache.
        let after = graph.lookups();
        assert!(!oracle.is_ancestor(&x, &y).unwrap());
        assert!(!oracle.is_ancestor(&y, &x).unwrap());
        assert_eq!(graph.lookups(), after);
    }

    #[test]
    fn cyclic_graph_terminates() {
        // Invalid history: a and b are each other's parent. The visited set
        // must still bound the traversal.
        let (a, b, unreachable) = (oid('a'), oid('b'), oid('f'));
        let mut graph = MemoryGraph::new();
        graph.add(&a, &[&b]);
        graph.add(&b, &[&a]);
        graph.add(&unreachable, &[]);

        let mut oracle = AncestryOracle::new(&graph);
        assert!(!oracle.is_ancestor(&unreachable, &a).unwrap());
        assert!(oracle.is_ancestor(&b, &a).unwrap());
    }

    #[test]
    fn unknown_commit_is_an_error() {
        let graph = MemoryGraph::new();
        let mut oracle = AncestryOracle::new(&graph);

        let err = oracle.is_ancestor(&oid('a'), &oid('b')).unwrap_err();
        assert!(matches!(err, GraphError::UnknownCommit(_)));
    }
}
