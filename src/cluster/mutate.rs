//! In-place edits of a [`ClusterPartition`].
//!
//! Every operation validates its arguments before touching either map, so a failed
//! call leaves the partition exactly as it was.

use std::collections::BTreeSet;

use super::partition::{collect_members, validate_identifier, ClusterId, ClusterPartition};
use crate::error::{Error, Result};

/// What [`ClusterPartition::add_link`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Neither entity was assigned; a new two-member cluster was created.
    Created(ClusterId),
    /// One entity was assigned; the other joined its cluster.
    Extended(ClusterId),
    /// The entities were in different clusters, which were merged.
    Merged(ClusterId),
    /// The entities were already in the same cluster.
    AlreadyLinked,
}

impl LinkOutcome {
    /// `false` only for [`LinkOutcome::AlreadyLinked`].
    pub fn changed(self) -> bool {
        !matches!(self, LinkOutcome::AlreadyLinked)
    }

    /// Cluster that now holds both entities, if anything changed.
    pub fn cluster(self) -> Option<ClusterId> {
        match self {
            LinkOutcome::Created(id) | LinkOutcome::Extended(id) | LinkOutcome::Merged(id) => {
                Some(id)
            }
            LinkOutcome::AlreadyLinked => None,
        }
    }
}

impl ClusterPartition {
    /// Next free id: one past the largest live id, or 0 when empty.
    fn next_id(&self) -> Result<ClusterId> {
        match self.clusters.last_key_value() {
            None => Ok(ClusterId(0)),
            Some((&max, _)) => max.checked_next().ok_or(Error::ClusterIdOverflow(max)),
        }
    }

    fn ensure_unassigned(&self, entity: &str) -> Result<()> {
        match self.elements.get(entity) {
            Some(&cluster) => Err(Error::AlreadyAssigned {
                entity: entity.to_string(),
                cluster,
            }),
            None => Ok(()),
        }
    }

    fn attach(&mut self, id: ClusterId, entity: String) {
        if let Some(members) = self.clusters.get_mut(&id) {
            members.insert(entity.clone());
            self.elements.insert(entity, id);
        }
    }

    /// Members for a new cluster: at least two, none assigned yet.
    fn new_cluster_members<I, S>(&self, members: I) -> Result<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = collect_members(members)?;
        if members.len() < 2 {
            return Err(Error::ClusterTooSmall {
                size: members.len(),
            });
        }
        for m in &members {
            self.ensure_unassigned(m)?;
        }
        Ok(members)
    }

    /// Add a new cluster and return its id.
    ///
    /// The id is one past the largest live id, or 0 for an empty partition.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] for an empty id,
    /// [`Error::ClusterTooSmall`] for fewer than two distinct members,
    /// [`Error::AlreadyAssigned`] if any member is already in a cluster,
    /// [`Error::ClusterIdOverflow`] if no new id can be derived.
    pub fn add<I, S>(&mut self, members: I) -> Result<ClusterId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = self.new_cluster_members(members)?;
        let id = self.next_id()?;
        self.insert_cluster(id, members);
        Ok(id)
    }

    /// Add a new cluster under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// [`Error::ClusterExists`] if `id` is live, otherwise the same member errors as
    /// [`ClusterPartition::add`].
    pub fn add_with_id<I, S>(&mut self, id: ClusterId, members: I) -> Result<ClusterId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.clusters.contains_key(&id) {
            return Err(Error::ClusterExists(id));
        }
        let members = self.new_cluster_members(members)?;
        self.insert_cluster(id, members);
        Ok(id)
    }

    /// Add one entity to an existing cluster.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] for an empty id, [`Error::UnknownCluster`] if
    /// `id` is not live, [`Error::AlreadyAssigned`] if the entity already belongs to
    /// a cluster.
    pub fn add_to_cluster(&mut self, id: ClusterId, entity: impl Into<String>) -> Result<()> {
        let entity = validate_identifier(entity.into())?;
        if !self.clusters.contains_key(&id) {
            return Err(Error::UnknownCluster(id));
        }
        self.ensure_unassigned(&entity)?;
        self.attach(id, entity);
        Ok(())
    }

    /// Record that `a` and `b` denote the same thing.
    ///
    /// Creates, extends or merges clusters as needed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if `a` or `b` is empty, [`Error::SelfLink`] if
    /// `a == b`, [`Error::ClusterIdOverflow`] if a new cluster is needed and no id
    /// can be derived.
    pub fn add_link(&mut self, a: impl Into<String>, b: impl Into<String>) -> Result<LinkOutcome> {
        let a = validate_identifier(a.into())?;
        let b = validate_identifier(b.into())?;
        if a == b {
            return Err(Error::SelfLink(a));
        }

        match (self.cluster_of(&a), self.cluster_of(&b)) {
            (None, None) => {
                let id = self.next_id()?;
                self.insert_cluster(id, BTreeSet::from([a, b]));
                Ok(LinkOutcome::Created(id))
            }
            (Some(id), None) => {
                self.attach(id, b);
                Ok(LinkOutcome::Extended(id))
            }
            (None, Some(id)) => {
                self.attach(id, a);
                Ok(LinkOutcome::Extended(id))
            }
            (Some(x), Some(y)) if x == y => Ok(LinkOutcome::AlreadyLinked),
            (Some(x), Some(y)) => self.merge(x, y, None).map(LinkOutcome::Merged),
        }
    }

    /// Merge cluster `c2` into `c1` and return the id of the result.
    ///
    /// The merged cluster is stored under `new_id` if given, otherwise under `c1`.
    /// Merging a cluster with itself only applies the rename, if any.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCluster`] if either id is not live, [`Error::ClusterExists`]
    /// if `new_id` names a third live cluster.
    pub fn merge(
        &mut self,
        c1: ClusterId,
        c2: ClusterId,
        new_id: Option<ClusterId>,
    ) -> Result<ClusterId> {
        for id in [c1, c2] {
            if !self.clusters.contains_key(&id) {
                return Err(Error::UnknownCluster(id));
            }
        }
        let target = new_id.unwrap_or(c1);
        if target != c1 && target != c2 && self.clusters.contains_key(&target) {
            return Err(Error::ClusterExists(target));
        }

        let mut merged = self.clusters.remove(&c1).unwrap_or_default();
        if c2 != c1 {
            if let Some(other) = self.clusters.remove(&c2) {
                merged.extend(other);
            }
        }
        for m in &merged {
            if let Some(slot) = self.elements.get_mut(m) {
                *slot = target;
            }
        }
        log::debug!(
            "merged clusters {} and {} into {} ({} members)",
            c1,
            c2,
            target,
            merged.len()
        );
        self.clusters.insert(target, merged);
        Ok(target)
    }

    /// Remove one entity.
    ///
    /// A cluster left with a single member is removed entirely, together with that
    /// member.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEntity`] if the entity is not assigned.
    pub fn remove(&mut self, entity: &str) -> Result<()> {
        let id = self
            .cluster_of(entity)
            .ok_or_else(|| Error::UnknownEntity(entity.to_string()))?;
        let collapses = self.clusters.get(&id).is_some_and(|c| c.len() <= 2);
        if collapses {
            log::debug!("removing {entity} collapses cluster {id}");
            self.remove_cluster(id)?;
        } else {
            self.elements.remove(entity);
            if let Some(members) = self.clusters.get_mut(&id) {
                members.remove(entity);
            }
        }
        Ok(())
    }

    /// Remove a whole cluster and return its former members.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCluster`] if `id` is not live.
    pub fn remove_cluster(&mut self, id: ClusterId) -> Result<BTreeSet<String>> {
        let members = self.clusters.remove(&id).ok_or(Error::UnknownCluster(id))?;
        for m in &members {
            self.elements.remove(m);
        }
        Ok(members)
    }
}
