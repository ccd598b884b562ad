//! Connected components over overlapping groups.
//!
//! Each input group is read as a path of edges between its members; two groups that
//! share a member therefore land in the same component. A clique reading gives the
//! same connectivity, so only the path edges are added to the union-find.

use std::collections::{BTreeSet, HashMap};

use super::util::UnionFind;

/// Merge overlapping groups into maximal disjoint groups.
///
/// Output groups are ordered by the earliest input group that contributed to them,
/// so input without overlaps comes back unchanged and in the same order.
///
/// ```rust
/// use erlink::connected_components;
///
/// let groups = connected_components(vec![
///     vec!["a", "b"],
///     vec!["b", "c"],
///     vec!["d", "e"],
/// ]);
/// assert_eq!(groups.len(), 2);
/// assert!(groups[0].contains("c"));
/// ```
pub fn connected_components<I, G, S>(groups: I) -> Vec<BTreeSet<String>>
where
    I: IntoIterator<Item = G>,
    G: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut names: Vec<String> = Vec::new();
    let mut uf = UnionFind::new(0);

    for group in groups {
        let mut prev: Option<usize> = None;
        for member in group {
            let member = member.into();
            let idx = match index.get(&member) {
                Some(&idx) => idx,
                None => {
                    let idx = uf.push();
                    index.insert(member.clone(), idx);
                    names.push(member);
                    idx
                }
            };
            if let Some(p) = prev {
                uf.union(p, idx);
            }
            prev = Some(idx);
        }
    }

    // Indices are assigned in first-seen order, so walking them in order visits
    // components in order of first appearance.
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut out: Vec<BTreeSet<String>> = Vec::new();
    for (idx, name) in names.into_iter().enumerate() {
        let root = uf.find(idx);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            out.push(BTreeSet::new());
            out.len() - 1
        });
        out[slot].insert(name);
    }
    debug_assert_eq!(uf.len(), index.len());
    out
}

/// `true` if some member occurs in more than one group.
pub(crate) fn has_overlaps(groups: &[BTreeSet<String>]) -> bool {
    if groups.len() < 2 {
        return false;
    }
    let total: usize = groups.iter().map(BTreeSet::len).sum();
    let union: BTreeSet<&String> = groups.iter().flatten().collect();
    total > union.len()
}
