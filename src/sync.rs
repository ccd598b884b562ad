//! Sharing a partition across threads.
//!
//! Both internal maps change together on almost every edit, so the whole partition
//! sits behind one `parking_lot::RwLock`: queries take the read lock and may run
//! side by side, mutations take the write lock.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cluster::ClusterPartition;

/// Cloneable, thread-safe handle to a [`ClusterPartition`].
///
/// # Example
///
/// ```rust
/// use erlink::{ClusterPartition, SharedPartition};
///
/// let shared = SharedPartition::new(ClusterPartition::new());
/// shared.with_write(|p| p.add_link("a", "b")).unwrap();
/// assert!(shared.read().contains_pair("a", "b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedPartition {
    inner: Arc<RwLock<ClusterPartition>>,
}

impl SharedPartition {
    /// Wrap a partition.
    pub fn new(partition: ClusterPartition) -> Self {
        Self {
            inner: Arc::new(RwLock::new(partition)),
        }
    }

    /// Shared access for queries.
    pub fn read(&self) -> RwLockReadGuard<'_, ClusterPartition> {
        self.inner.read()
    }

    /// Exclusive access for mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, ClusterPartition> {
        self.inner.write()
    }

    /// Run `f` under the read lock.
    pub fn with_read<T>(&self, f: impl FnOnce(&ClusterPartition) -> T) -> T {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock.
    pub fn with_write<T>(&self, f: impl FnOnce(&mut ClusterPartition) -> T) -> T {
        f(&mut self.inner.write())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ClusterPartition {
        self.inner.read().clone()
    }

    /// Unwrap the partition if this is the last handle, otherwise return the handle.
    pub fn try_into_inner(self) -> std::result::Result<ClusterPartition, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<ClusterPartition> for SharedPartition {
    fn from(partition: ClusterPartition) -> Self {
        Self::new(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn concurrent_links_keep_partition_consistent() {
        let shared = SharedPartition::default();
        let mut handles = vec![];

        for t in 0..4 {
            let shared = shared.clone();
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    shared
                        .with_write(|p| p.add_link(format!("hub{}", i % 5), format!("t{t}-{i}")))
                        .unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let p = shared.try_into_inner().unwrap();
        p.assert_consistent();
        assert_eq!(p.len(), 5);
        assert_eq!(p.num_elements(), 5 + 4 * 50);
    }

    #[test]
    fn readers_see_snapshot() {
        let shared: SharedPartition = ClusterPartition::from_sets(vec![vec!["a", "b"]])
            .unwrap()
            .into();
        let other = shared.clone();
        assert!(shared.with_read(|p| p.contains_entity("a")));
        other.write().remove("a").unwrap();
        assert!(shared.snapshot().is_empty());
        assert!(shared.try_into_inner().is_err());
    }
}
