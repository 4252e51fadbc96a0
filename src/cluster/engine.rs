//! Union-find forest augmented with a circular membership list.

use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};

use crate::matches::SubmissionId;

/// Node in the union-find forest. `parent == own id` marks a root;
/// `next` links every node sharing a root into one circular list.
#[derive(Debug)]
struct Node {
    parent: SubmissionId,
    next: SubmissionId,
    rank: u32,
}

/// Dynamic partition of submissions into similarity clusters.
///
/// Union by rank with path compression gives near-constant-time
/// `merge`/`find_root`; the circular membership list makes enumerating
/// one cluster linear in its size, with no per-cluster index to keep
/// in sync. Each engine instance owns its own node map and roots set,
/// so independent runs never share state.
#[derive(Debug, Default)]
pub struct ClusterEngine {
    nodes: HashMap<SubmissionId, Node>,
    roots: HashSet<SubmissionId>,
    // Insertion order of every submission; cluster ordering ties are
    // broken by the order roots were first seen, so this must be stable.
    order: Vec<SubmissionId>,
}

impl ClusterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new singleton node.
    ///
    /// The caller must ensure `x` is not already present; `try_insert`
    /// is the checked path and the only one the aggregator uses.
    pub fn insert(&mut self, x: SubmissionId) {
        self.nodes.insert(
            x.clone(),
            Node {
                parent: x.clone(),
                next: x.clone(),
                rank: 1,
            },
        );
        self.roots.insert(x.clone());
        self.order.push(x);
    }

    /// Inserts `x` only if absent; returns whether an insertion happened.
    pub fn try_insert(&mut self, x: SubmissionId) -> bool {
        if self.nodes.contains_key(&x) {
            return false;
        }
        self.insert(x);
        true
    }

    pub fn contains(&self, x: &SubmissionId) -> bool {
        self.nodes.contains_key(x)
    }

    /// Number of submissions inserted so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds the root of `x`'s cluster, compressing the path behind it.
    ///
    /// Two passes: walk to the root, then repoint every visited node
    /// directly at it. Iterative on purpose, so deep parent chains
    /// can't exhaust the stack.
    ///
    /// # Returns
    /// * `Err` - If `x` was never inserted; the aggregator inserts both
    ///   endpoints before any lookup, so this is a caller bug and must
    ///   surface rather than be masked
    pub fn find_root(&mut self, x: &SubmissionId) -> Result<SubmissionId> {
        let mut visited = Vec::new();
        let mut current = x.clone();
        let root = loop {
            let parent = match self.nodes.get(&current) {
                Some(node) => node.parent.clone(),
                None => {
                    return Err(anyhow!(
                        "find_root on submission {} that was never inserted",
                        current
                    ))
                }
            };
            if parent == current {
                break current;
            }
            visited.push(current);
            current = parent;
        };
        for id in visited {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.parent = root.clone();
            }
        }
        Ok(root)
    }

    /// Unifies the clusters containing `x` and `y`.
    ///
    /// Merging an already-unified pair is an explicit no-op: ranks and
    /// membership lists are left untouched. Otherwise the lower-rank
    /// root is subsumed under the higher-rank one; on a rank tie the
    /// second argument's root is subsumed into the first's, a fixed
    /// tie-break that keeps cluster ordering deterministic.
    pub fn merge(&mut self, x: &SubmissionId, y: &SubmissionId) -> Result<()> {
        let x_root = self.find_root(x)?;
        let y_root = self.find_root(y)?;
        if x_root == y_root {
            return Ok(());
        }

        let x_rank = self.rank_of(&x_root)?;
        let y_rank = self.rank_of(&y_root)?;
        let (winner, loser) = if x_rank < y_rank {
            (y_root, x_root)
        } else {
            (x_root, y_root)
        };

        self.roots.remove(&loser);
        if let Some(node) = self.nodes.get_mut(&loser) {
            node.parent = winner.clone();
        }
        if x_rank == y_rank {
            if let Some(node) = self.nodes.get_mut(&winner) {
                node.rank += 1;
            }
        }

        // Splice the two circular lists by swapping the roots' next
        // pointers; walking from either former root now traverses the
        // combined membership exactly once.
        let winner_next = self.next_of(&winner)?;
        let loser_next = self.next_of(&loser)?;
        if let Some(node) = self.nodes.get_mut(&winner) {
            node.next = loser_next;
        }
        if let Some(node) = self.nodes.get_mut(&loser) {
            node.next = winner_next;
        }
        Ok(())
    }

    /// Ordered membership of `x`'s cluster, starting at `x`.
    ///
    /// Walks the circular list until `x` comes round again. Membership
    /// is root-independent, but callers wanting predictable output
    /// should pass a root from `roots()`.
    pub fn members(&self, x: &SubmissionId) -> Result<Vec<SubmissionId>> {
        if !self.nodes.contains_key(x) {
            return Err(anyhow!(
                "members of submission {} that was never inserted",
                x
            ));
        }
        let mut result = vec![x.clone()];
        let mut current = self.next_of(x)?;
        while current != *x {
            let next = self.next_of(&current)?;
            result.push(current);
            current = next;
        }
        Ok(result)
    }

    /// Current cluster roots, in the order they were first inserted.
    pub fn roots(&self) -> Vec<SubmissionId> {
        self.order
            .iter()
            .filter(|id| self.roots.contains(*id))
            .cloned()
            .collect()
    }

    fn rank_of(&self, x: &SubmissionId) -> Result<u32> {
        self.nodes
            .get(x)
            .map(|node| node.rank)
            .ok_or_else(|| anyhow!("rank of submission {} that was never inserted", x))
    }

    fn next_of(&self, x: &SubmissionId) -> Result<SubmissionId> {
        self.nodes
            .get(x)
            .map(|node| node.next.clone())
            .ok_or_else(|| anyhow!("membership link of submission {} that was never inserted", x))
    }
}
