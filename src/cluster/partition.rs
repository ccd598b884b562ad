//! The cluster partition: a two-way index between entities and clusters.
//!
//! `elements` maps every assigned entity to its cluster id and `clusters` maps every
//! live cluster id to its member set. Both maps describe the same partition at all
//! times: no entity is in two clusters, and every live cluster has at least two
//! members.
//!
//! Iteration is deterministic: clusters in ascending id order, members in ascending
//! lexicographic order.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::Index;

use rand::prelude::*;

use super::components::{connected_components, has_overlaps};
use super::util::{pair_count, pairs_of};
use crate::error::{Error, Result};

/// Identifier of a cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub u64);

impl ClusterId {
    /// The raw integer id.
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(ClusterId)
    }
}

impl From<u64> for ClusterId {
    fn from(id: u64) -> Self {
        ClusterId(id)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw data a partition can be built from.
///
/// Each variant corresponds to one constructor on [`ClusterPartition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionSource {
    /// Possibly overlapping groups; overlaps are merged transitively.
    Sets(Vec<Vec<String>>),
    /// Independent pairwise links, one cluster per pair.
    Links(Vec<(String, String)>),
    /// Already-disjoint clusters under caller-chosen ids.
    Clusters(Vec<(ClusterId, Vec<String>)>),
}

/// The other members of an entity's cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Linked<'a> {
    /// Exactly one partner.
    One(&'a str),
    /// Two or more partners.
    Many(BTreeSet<&'a str>),
}

impl<'a> Linked<'a> {
    /// Number of linked entities.
    pub fn len(&self) -> usize {
        match self {
            Linked::One(_) => 1,
            Linked::Many(set) => set.len(),
        }
    }

    /// `true` if there are no linked entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collapse into a set regardless of arity.
    pub fn into_set(self) -> BTreeSet<&'a str> {
        match self {
            Linked::One(e) => BTreeSet::from([e]),
            Linked::Many(set) => set,
        }
    }
}

/// Element and cluster counts of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionInfo {
    /// Number of assigned entities.
    pub num_elements: usize,
    /// Number of live clusters.
    pub num_clusters: usize,
}

impl fmt::Display for PartitionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClusterPartition(# elements:{}, # clusters:{})",
            self.num_elements, self.num_clusters
        )
    }
}

/// Disjoint clusters of entity ids with a reverse entity -> cluster index.
///
/// ```rust
/// use erlink::{ClusterPartition, Linked};
///
/// let mut p = ClusterPartition::from_sets(vec![vec!["a1", "b1"], vec!["a2", "b2"]]).unwrap();
/// assert_eq!(p.links("a1").unwrap(), Linked::One("b1"));
///
/// p.add_link("b1", "c1").unwrap();
/// assert!(p.contains_pair("a1", "c1"));
/// assert_eq!(p.number_of_links(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterPartition {
    pub(super) elements: HashMap<String, ClusterId>,
    pub(super) clusters: BTreeMap<ClusterId, BTreeSet<String>>,
}

pub(super) fn validate_identifier(id: String) -> Result<String> {
    if id.is_empty() {
        return Err(Error::InvalidIdentifier);
    }
    Ok(id)
}

pub(super) fn collect_members<G, S>(group: G) -> Result<BTreeSet<String>>
where
    G: IntoIterator<Item = S>,
    S: Into<String>,
{
    group
        .into_iter()
        .map(|m| validate_identifier(m.into()))
        .collect()
}

impl ClusterPartition {
    /// Create an empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from groups of entity ids.
    ///
    /// Groups that share members (directly or through a chain of other groups) are
    /// merged first. Resulting clusters get ids `0..k` in order of first appearance,
    /// which for overlap-free input is plain input order. A group that stays on its
    /// own after merging must have at least two distinct members; `[{"a"}]` is not a
    /// valid input.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] for an empty id, [`Error::ClusterTooSmall`] if a
    /// resulting cluster has fewer than two members, including a singleton group
    /// that overlaps nothing.
    pub fn from_sets<I, G, S>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<BTreeSet<String>> = sets
            .into_iter()
            .map(collect_members)
            .collect::<Result<_>>()?;

        if has_overlaps(&groups) {
            let before = groups.len();
            groups = connected_components(groups);
            log::debug!(
                "merged {} overlapping groups into {} clusters",
                before,
                groups.len()
            );
        }

        if let Some(small) = groups.iter().find(|g| g.len() < 2) {
            return Err(Error::ClusterTooSmall { size: small.len() });
        }

        let mut partition = Self::new();
        for (idx, members) in groups.into_iter().enumerate() {
            partition.insert_cluster(ClusterId(idx as u64), members);
        }
        Ok(partition)
    }

    /// Build from pairwise links, one two-member cluster per pair.
    ///
    /// Pairs are not merged transitively; an entity that appears in two pairs is
    /// rejected instead.
    ///
    /// # Errors
    ///
    /// [`Error::SelfLink`] if a pair links an entity to itself,
    /// [`Error::AlreadyAssigned`] if an entity occurs in more than one pair.
    pub fn from_links<I, A, B>(links: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut partition = Self::new();
        for (idx, (left, right)) in links.into_iter().enumerate() {
            let left = validate_identifier(left.into())?;
            let right = validate_identifier(right.into())?;
            if left == right {
                return Err(Error::SelfLink(left));
            }
            for entity in [&left, &right] {
                if let Some(&cluster) = partition.elements.get(entity) {
                    return Err(Error::AlreadyAssigned {
                        entity: entity.clone(),
                        cluster,
                    });
                }
            }
            partition.insert_cluster(ClusterId(idx as u64), BTreeSet::from([left, right]));
        }
        Ok(partition)
    }

    /// Build from clusters with explicit ids.
    ///
    /// The caller asserts the clusters are already disjoint, so overlaps are an error
    /// rather than something to merge.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateClusterId`], [`Error::ClusterTooSmall`] or
    /// [`Error::OverlapConflict`].
    pub fn from_clusters<I, G, S>(clusters: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ClusterId, G)>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut partition = Self::new();
        for (id, group) in clusters {
            let members = collect_members(group)?;
            if partition.clusters.contains_key(&id) {
                return Err(Error::DuplicateClusterId(id));
            }
            if members.len() < 2 {
                return Err(Error::ClusterTooSmall {
                    size: members.len(),
                });
            }
            let clash = members
                .iter()
                .find_map(|m| partition.elements.get(m).map(|&first| (m, first)));
            if let Some((entity, first)) = clash {
                return Err(Error::OverlapConflict {
                    entity: entity.clone(),
                    first,
                    second: id,
                });
            }
            partition.insert_cluster(id, members);
        }
        Ok(partition)
    }

    /// Build from an optional source; `None` gives an empty partition.
    pub fn from_source(source: Option<PartitionSource>) -> Result<Self> {
        match source {
            None => Ok(Self::new()),
            Some(source) => Self::try_from(source),
        }
    }

    /// Insert a cluster whose members are known to be unassigned.
    pub(super) fn insert_cluster(&mut self, id: ClusterId, members: BTreeSet<String>) {
        for m in &members {
            self.elements.insert(m.clone(), id);
        }
        self.clusters.insert(id, members);
    }

    /// Number of live clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// `true` if there are no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of assigned entities.
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Element and cluster counts.
    pub fn info(&self) -> PartitionInfo {
        PartitionInfo {
            num_elements: self.elements.len(),
            num_clusters: self.clusters.len(),
        }
    }

    /// Clusters in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &BTreeSet<String>)> + '_ {
        self.clusters.iter().map(|(&id, members)| (id, members))
    }

    /// Live cluster ids in ascending order.
    pub fn cluster_ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }

    /// Every assigned entity with its cluster id (unordered).
    pub fn elements(&self) -> impl Iterator<Item = (&str, ClusterId)> + '_ {
        self.elements.iter().map(|(e, &id)| (e.as_str(), id))
    }

    /// Cluster id of an entity, if assigned.
    pub fn cluster_of(&self, entity: &str) -> Option<ClusterId> {
        self.elements.get(entity).copied()
    }

    /// Members of a cluster, if it exists.
    pub fn get(&self, id: ClusterId) -> Option<&BTreeSet<String>> {
        self.clusters.get(&id)
    }

    /// Members of a cluster.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCluster`] if the id is not live.
    pub fn members(&self, id: ClusterId) -> Result<&BTreeSet<String>> {
        self.clusters.get(&id).ok_or(Error::UnknownCluster(id))
    }

    fn members_of_entity(&self, entity: &str) -> Result<&BTreeSet<String>> {
        let id = self
            .cluster_of(entity)
            .ok_or_else(|| Error::UnknownEntity(entity.to_string()))?;
        self.members(id)
    }

    /// The entities linked to `entity`: a single id for a pair, a set otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEntity`] if the entity is not assigned.
    pub fn links(&self, entity: &str) -> Result<Linked<'_>> {
        let mut others = self.linked_set(entity)?;
        if others.len() == 1 {
            if let Some(only) = others.pop_first() {
                return Ok(Linked::One(only));
            }
        }
        Ok(Linked::Many(others))
    }

    /// The entities linked to `entity`, always as a set.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEntity`] if the entity is not assigned.
    pub fn linked_set(&self, entity: &str) -> Result<BTreeSet<&str>> {
        let members = self.members_of_entity(entity)?;
        Ok(members
            .iter()
            .map(String::as_str)
            .filter(|m| *m != entity)
            .collect())
    }

    /// `true` if the entity is assigned to some cluster.
    pub fn contains_entity(&self, entity: &str) -> bool {
        self.elements.contains_key(entity)
    }

    /// `true` if the cluster id is live.
    pub fn contains_cluster(&self, id: ClusterId) -> bool {
        self.clusters.contains_key(&id)
    }

    /// `true` if `a` and `b` are distinct, both assigned, and in the same cluster.
    pub fn contains_pair(&self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        match (self.elements.get(a), self.elements.get(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    /// `true` if some cluster has exactly these members.
    pub fn contains_members<I, S>(&self, members: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: Vec<S> = members.into_iter().collect();
        let Some(first) = wanted.first() else {
            return false;
        };
        let Some(cluster) = self.cluster_of(first.as_ref()).and_then(|id| self.get(id)) else {
            return false;
        };
        let distinct: BTreeSet<&str> = wanted.iter().map(AsRef::as_ref).collect();
        distinct.len() == cluster.len() && distinct.iter().all(|m| cluster.contains(*m))
    }

    /// Every linked pair, cluster by cluster in ascending id order.
    pub fn all_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.clusters.values().flat_map(|members| pairs_of(members))
    }

    /// Every linked pair within one cluster.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCluster`] if the id is not live.
    pub fn cluster_pairs(&self, id: ClusterId) -> Result<impl Iterator<Item = (&str, &str)> + '_> {
        Ok(pairs_of(self.members(id)?))
    }

    /// Every linked pair within the cluster that contains `entity`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEntity`] if the entity is not assigned.
    pub fn entity_pairs(&self, entity: &str) -> Result<impl Iterator<Item = (&str, &str)> + '_> {
        let members = self.members_of_entity(entity)?;
        Ok(pairs_of(members))
    }

    /// Total number of linked pairs, `sum(C(|c|, 2))` over all clusters.
    pub fn number_of_links(&self) -> usize {
        self.clusters.values().map(|c| pair_count(c.len())).sum()
    }

    /// Sample `n` clusters without replacement.
    ///
    /// With `Some(seed)` the selection is reproducible; `None` draws from the thread
    /// RNG. Sampled clusters keep their ids.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSampleSize`] if `n` exceeds the number of clusters.
    pub fn sample(&self, n: usize, seed: Option<u64>) -> Result<Self> {
        let mut rng: Box<dyn RngCore> = match seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.sample_with_rng(n, &mut rng)
    }

    /// Sample `n` clusters without replacement using a caller-provided RNG.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSampleSize`] if `n` exceeds the number of clusters.
    pub fn sample_with_rng<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Self> {
        if n > self.clusters.len() {
            return Err(Error::InvalidSampleSize {
                requested: n,
                available: self.clusters.len(),
            });
        }

        let ids: Vec<ClusterId> = self.clusters.keys().copied().collect();
        let chosen: Vec<ClusterId> = ids.choose_multiple(rng, n).copied().collect();
        log::trace!("sampled {} of {} clusters", chosen.len(), ids.len());

        let mut sampled = Self::new();
        for id in chosen {
            if let Some(members) = self.clusters.get(&id) {
                sampled.insert_cluster(id, members.clone());
            }
        }
        Ok(sampled)
    }

    /// Panic unless both maps describe the same partition.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (e, id) in &self.elements {
            assert!(self.clusters[id].contains(e), "{e} missing from cluster {id}");
        }
        let mut seen = 0;
        for (id, members) in &self.clusters {
            assert!(members.len() >= 2, "cluster {id} has {} members", members.len());
            for m in members {
                assert_eq!(self.elements.get(m), Some(id));
                seen += 1;
            }
        }
        assert_eq!(seen, self.elements.len());
    }
}

impl TryFrom<PartitionSource> for ClusterPartition {
    type Error = Error;

    fn try_from(source: PartitionSource) -> Result<Self> {
        match source {
            PartitionSource::Sets(sets) => Self::from_sets(sets),
            PartitionSource::Links(links) => Self::from_links(links),
            PartitionSource::Clusters(clusters) => Self::from_clusters(clusters),
        }
    }
}

impl Index<ClusterId> for ClusterPartition {
    type Output = BTreeSet<String>;

    /// # Panics
    ///
    /// Panics if the cluster id is not live.
    fn index(&self, id: ClusterId) -> &Self::Output {
        match self.clusters.get(&id) {
            Some(members) => members,
            None => panic!("unknown cluster: {id}"),
        }
    }
}

impl fmt::Display for ClusterPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (id, members)) in self.clusters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}: {{")?;
            for (j, m) in members.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(m)?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}
