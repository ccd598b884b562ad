//! Entity-resolution cluster partitions.
//!
//! `erlink` tracks which entities across knowledge graphs are believed to denote
//! the same real-world object. The central type is [`ClusterPartition`], a two-way
//! index (entity -> cluster id, cluster id -> members) that stays a proper
//! partition under every edit.
//!
//! The public API is organized as:
//! - [`cluster`]: the partition itself, plus connected-components merging of
//!   overlapping groups
//! - [`eval`]: pair-based precision / recall against a gold standard
//! - [`sync`]: a reader/writer-locked handle for sharing a partition across threads

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod eval;
pub mod sync;

pub use cluster::{
    connected_components, ClusterId, ClusterPartition, Linked, LinkOutcome, PartitionInfo,
    PartitionSource,
};
pub use error::{Error, Result};
pub use eval::{match_quality, pair_entity_ratio, MatchQuality};
pub use sync::SharedPartition;
