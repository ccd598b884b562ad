//! Cluster partitions over entity ids.
//!
//! A partition assigns every known entity to exactly one cluster. In entity
//! resolution a cluster is a set of entities, possibly from different knowledge
//! graphs, that are asserted or inferred to denote the same real-world object. A
//! *link* is the statement that two entities share a cluster, so a cluster of size
//! `n` carries `C(n, 2)` links.
//!
//! ## Invariants
//!
//! After every public operation:
//!
//! - each assigned entity is a member of exactly the cluster it maps to;
//! - clusters are pairwise disjoint;
//! - every cluster has at least two members (a removal that would leave one
//!   member drops the cluster and its survivor);
//! - cluster ids are unique among live clusters, but not necessarily contiguous.
//!
//! ## Construction
//!
//! | Constructor | Input | Overlaps |
//! |-------------|-------|----------|
//! | [`ClusterPartition::from_sets`] | groups of ids | merged via [`connected_components`] |
//! | [`ClusterPartition::from_links`] | pairs of ids | rejected |
//! | [`ClusterPartition::from_clusters`] | `(id, group)` pairs | rejected |
//!
//! ## Usage
//!
//! ```rust
//! use erlink::cluster::{ClusterId, ClusterPartition, LinkOutcome};
//!
//! let mut p = ClusterPartition::from_clusters(vec![(ClusterId(0), vec!["1", "2"])]).unwrap();
//!
//! assert_eq!(p.add_link("3", "4").unwrap(), LinkOutcome::Created(ClusterId(1)));
//! assert_eq!(p.add_link("3", "5").unwrap(), LinkOutcome::Extended(ClusterId(1)));
//! assert_eq!(p.add_link("1", "3").unwrap(), LinkOutcome::Merged(ClusterId(0)));
//!
//! assert_eq!(p.len(), 1);
//! assert_eq!(p.number_of_links(), 10);
//! assert_eq!(p.all_pairs().count(), 10);
//! ```

mod components;
mod mutate;
mod partition;
mod util;

pub use components::connected_components;
pub use mutate::LinkOutcome;
pub use partition::{ClusterId, ClusterPartition, Linked, PartitionInfo, PartitionSource};
