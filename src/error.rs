use thiserror::Error;

use crate::cluster::ClusterId;

/// Errors returned by partition construction, queries and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An entity identifier is empty.
    #[error("invalid entity identifier: identifiers must be non-empty")]
    InvalidIdentifier,

    /// A link from an entity to itself.
    #[error("no self links allowed: {0} -> {0}")]
    SelfLink(String),

    /// Explicitly numbered clusters share an entity.
    #[error("entity {entity} appears in both cluster {first} and cluster {second}")]
    OverlapConflict {
        /// The shared entity.
        entity: String,
        /// First cluster claiming it.
        first: ClusterId,
        /// Second cluster claiming it.
        second: ClusterId,
    },

    /// Entity id is not assigned to any cluster.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Cluster id does not exist.
    #[error("unknown cluster: {0}")]
    UnknownCluster(ClusterId),

    /// Entity already belongs to a cluster.
    #[error("entity {entity} already belongs to cluster {cluster}")]
    AlreadyAssigned {
        /// The entity.
        entity: String,
        /// Its current cluster.
        cluster: ClusterId,
    },

    /// The same cluster id was supplied twice.
    #[error("duplicate cluster id: {0}")]
    DuplicateClusterId(ClusterId),

    /// Target cluster id is already taken by another live cluster.
    #[error("cluster id {0} is already in use")]
    ClusterExists(ClusterId),

    /// A cluster needs at least two distinct members.
    #[error("cluster too small: {size} distinct member(s), need at least 2")]
    ClusterTooSmall {
        /// Distinct members supplied.
        size: usize,
    },

    /// No further cluster id can be derived from the current maximum.
    #[error("cannot infer a new cluster id: {0} is the largest representable id")]
    ClusterIdOverflow(ClusterId),

    /// Requested sample is larger than the population.
    #[error("invalid sample size: requested {requested}, but partition has {available} clusters")]
    InvalidSampleSize {
        /// Requested number of clusters.
        requested: usize,
        /// Number of clusters available.
        available: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
