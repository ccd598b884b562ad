use std::collections::BTreeSet;

/// Disjoint-set forest over dense indices `0..n`.
#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    pub(crate) parent: Vec<usize>,
    pub(crate) size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Append a fresh singleton and return its index.
    pub(crate) fn push(&mut self) -> usize {
        let idx = self.parent.len();
        self.parent.push(idx);
        self.size.push(1);
        idx
    }

    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }

    pub(crate) fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        // Union by size.
        let (mut big, mut small) = (ra, rb);
        if self.size[big] < self.size[small] {
            std::mem::swap(&mut big, &mut small);
        }

        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }
}

/// All unordered 2-combinations of a member set, in ascending member order.
pub(crate) fn pairs_of(members: &BTreeSet<String>) -> impl Iterator<Item = (&str, &str)> + '_ {
    members.iter().enumerate().flat_map(move |(i, a)| {
        members
            .iter()
            .skip(i + 1)
            .map(move |b| (a.as_str(), b.as_str()))
    })
}

/// Number of unordered pairs in a set of `n` members.
#[inline]
pub(crate) fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_joins_transitively() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        uf.union(2, 1);
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(3));

        let extra = uf.push();
        assert_eq!(extra, 4);
        assert_eq!(uf.len(), 5);
        assert_eq!(uf.find(extra), extra);
    }

    #[test]
    fn pairs_match_pair_count() {
        let members: BTreeSet<String> = ["a", "b", "c", "d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pairs: Vec<_> = pairs_of(&members).collect();
        assert_eq!(pairs.len(), pair_count(4));
        assert_eq!(pairs[0], ("a", "b"));
        assert_eq!(pairs[5], ("c", "d"));
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
    }
}
