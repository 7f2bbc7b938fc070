//! Thread-safe wrapper serializing access to a cluster manager.
//!
//! The engine's mutable state (index contents, visible set, zoom level) is
//! one logical unit: every operation on it, reads included, must run one at
//! a time in submission order. `SyncClusterManager` provides that contract
//! by guarding the whole manager with a mutex. A reload runs to completion
//! while holding the lock, so no caller ever observes a partially updated
//! visible set.
//!
//! # Examples
//!
//! ```rust
//! use mapgrid::{Annotation, Point, Region, SyncClusterManager, WORLD_SIZE};
//! use std::thread;
//!
//! #[derive(Debug, Clone)]
//! struct Pin {
//!     id: u64,
//!     coordinate: Point,
//! }
//!
//! impl Annotation for Pin {
//!     type Id = u64;
//!     fn id(&self) -> u64 {
//!         self.id
//!     }
//!     fn coordinate(&self) -> Point {
//!         self.coordinate
//!     }
//!     fn set_coordinate(&mut self, coordinate: Point) {
//!         self.coordinate = coordinate;
//!     }
//! }
//!
//! let center = Point::new(WORLD_SIZE / 2.0 + 500.0, WORLD_SIZE / 2.0 + 500.0);
//! let manager: SyncClusterManager<Pin> = SyncClusterManager::new();
//! let writer = manager.clone();
//!
//! let handle = thread::spawn(move || {
//!     writer.add(Pin { id: 1, coordinate: center });
//! });
//! handle.join().unwrap();
//!
//! let region = Region::new(center, 10_000.0, 10_000.0);
//! let difference = manager.reload(1024.0, region);
//! assert_eq!(difference.insertions.len(), 1);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cluster::{Annotation, ClusterOrAnnotation, Difference};
use crate::config::ClusterConfig;
use crate::geometry::Region;
use crate::manager::ClusterManager;
use crate::storage::{AnnotationStorage, VecStorage};

/// Cloneable handle to a mutex-guarded [`ClusterManager`].
///
/// A mutex rather than a reader/writer lock: the engine's contract is total
/// serialization of reads and writes, and reload already holds the lock for
/// the whole CPU-bound recomputation.
pub struct SyncClusterManager<A: Annotation, S: AnnotationStorage<Annotation = A> = VecStorage<A>>
{
    inner: Arc<Mutex<ClusterManager<A, S>>>,
}

impl<A, S> Clone for SyncClusterManager<A, S>
where
    A: Annotation,
    S: AnnotationStorage<Annotation = A>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S> SyncClusterManager<A, S>
where
    A: Annotation,
    S: AnnotationStorage<Annotation = A>,
{
    /// Create a manager over the world rectangle with default configuration.
    pub fn new() -> Self {
        Self::from_manager(ClusterManager::new())
    }

    /// Create a manager over the world rectangle with the given configuration.
    pub fn with_config(config: ClusterConfig) -> Self {
        Self::from_manager(ClusterManager::with_config(config))
    }

    /// Wrap an existing manager.
    pub fn from_manager(manager: ClusterManager<A, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Add an annotation to the index.
    pub fn add(&self, annotation: A) -> bool {
        self.inner.lock().add(annotation)
    }

    /// Add many annotations, returning the ones actually indexed.
    pub fn add_all<I>(&self, annotations: I) -> Vec<A>
    where
        I: IntoIterator<Item = A>,
    {
        self.inner.lock().add_all(annotations)
    }

    /// Remove the annotation with the same identity as `annotation`.
    pub fn remove(&self, annotation: &A) -> Option<A> {
        self.inner.lock().remove(annotation)
    }

    /// Remove every annotation matching the predicate.
    pub fn remove_where<F>(&self, predicate: F) -> Vec<A>
    where
        F: FnMut(&A) -> bool,
    {
        self.inner.lock().remove_where(predicate)
    }

    /// Remove every annotation from the index.
    pub fn remove_all(&self) {
        self.inner.lock().remove_all();
    }

    /// Every indexed annotation.
    pub fn annotations(&self) -> Vec<A> {
        self.inner.lock().annotations()
    }

    /// Number of indexed annotations.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// The visible set produced by the most recent reload.
    pub fn visible(&self) -> Vec<ClusterOrAnnotation<A>> {
        self.inner.lock().visible().to_vec()
    }

    /// The visible annotations with clusters flattened into their members.
    pub fn visible_annotations(&self) -> Vec<A> {
        self.inner.lock().visible_annotations()
    }

    /// The zoom level computed by the most recent successful reload.
    pub fn zoom_level(&self) -> usize {
        self.inner.lock().zoom_level()
    }

    /// The active configuration.
    pub fn config(&self) -> ClusterConfig {
        self.inner.lock().config().clone()
    }

    /// Recompute the visible set for a viewport and return the delta.
    ///
    /// Runs the whole recomputation under the lock; concurrent calls
    /// serialize in submission order.
    pub fn reload(&self, view_width: f64, region: Region) -> Difference<A> {
        self.inner.lock().reload(view_width, region)
    }
}

impl<A, S> Default for SyncClusterManager<A, S>
where
    A: Annotation,
    S: AnnotationStorage<Annotation = A>,
{
    fn default() -> Self {
        Self::new()
    }
}
