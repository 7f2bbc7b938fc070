//! Annotation trait and the cluster/diff result types.
//!
//! A [`Cluster`] is synthetic: it is created fresh on every reload, never
//! stored in the spatial index, and discarded once the next reload produces
//! a new visible set. The engine hands results to the caller as
//! [`ClusterOrAnnotation`] values and communicates changes between reloads
//! as a [`Difference`].

use std::fmt;
use std::hash::{Hash, Hasher};

use geo::Point;
use rustc_hash::FxHashSet;

use crate::geometry::MapRect;

/// A caller-supplied map annotation.
///
/// Annotations carry a stable identity and a mutable projected coordinate.
/// All equality the engine cares about is identity equality; coordinates are
/// never compared for proximity. The engine itself only mutates a
/// coordinate during coincident-point redistribution, and it always does so
/// by removing the annotation from the index first — callers must follow
/// the same remove-then-add discipline when moving an indexed annotation.
pub trait Annotation: Clone {
    /// Stable, hashable identity of the annotation.
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// The annotation's identity.
    fn id(&self) -> Self::Id;

    /// The annotation's current projected coordinate.
    fn coordinate(&self) -> Point;

    /// Replace the annotation's coordinate.
    fn set_coordinate(&mut self, coordinate: Point);

    /// Whether this annotation may be merged into a cluster.
    ///
    /// Returning `false` (e.g. for a pinned or featured annotation) makes
    /// the engine always emit it individually.
    fn should_cluster(&self) -> bool {
        true
    }
}

/// A synthetic aggregate standing in for several nearby annotations.
#[derive(Debug, Clone)]
pub struct Cluster<A: Annotation> {
    coordinate: Point,
    annotations: Vec<A>,
}

impl<A: Annotation> Cluster<A> {
    /// Create a cluster at `coordinate` representing `annotations`.
    pub fn new(coordinate: Point, annotations: Vec<A>) -> Self {
        Self {
            coordinate,
            annotations,
        }
    }

    /// The cluster marker's coordinate.
    pub fn coordinate(&self) -> Point {
        self.coordinate
    }

    /// The member annotations, in cell-query order.
    pub fn annotations(&self) -> &[A] {
        &self.annotations
    }

    /// Number of members.
    pub fn count(&self) -> usize {
        self.annotations.len()
    }

    /// Consume the cluster, yielding its members.
    pub fn into_annotations(self) -> Vec<A> {
        self.annotations
    }
}

// Cluster equality is structural over member identities: two clusters are
// the same value iff their member identity lists match. The coordinate is
// derived from the members and the positioning strategy, so it does not
// participate.
impl<A: Annotation> PartialEq for Cluster<A> {
    fn eq(&self, other: &Self) -> bool {
        self.annotations.len() == other.annotations.len()
            && self
                .annotations
                .iter()
                .zip(&other.annotations)
                .all(|(a, b)| a.id() == b.id())
    }
}

impl<A: Annotation> Eq for Cluster<A> {}

impl<A: Annotation> Hash for Cluster<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for annotation in &self.annotations {
            annotation.id().hash(state);
        }
    }
}

/// One element of the visible set: either a single annotation passed
/// through unclustered, or a synthetic cluster.
#[derive(Debug, Clone)]
pub enum ClusterOrAnnotation<A: Annotation> {
    /// A single annotation shown individually.
    Annotation(A),
    /// A cluster marker representing several annotations.
    Cluster(Cluster<A>),
}

impl<A: Annotation> ClusterOrAnnotation<A> {
    /// The coordinate at which this item is displayed.
    pub fn coordinate(&self) -> Point {
        match self {
            Self::Annotation(annotation) => annotation.coordinate(),
            Self::Cluster(cluster) => cluster.coordinate(),
        }
    }

    /// Number of underlying annotations (1 for a single).
    pub fn count(&self) -> usize {
        match self {
            Self::Annotation(_) => 1,
            Self::Cluster(cluster) => cluster.count(),
        }
    }

    /// Whether any underlying annotation lies within `rect`.
    pub fn has_member_inside(&self, rect: &MapRect) -> bool {
        match self {
            Self::Annotation(annotation) => rect.contains(&annotation.coordinate()),
            Self::Cluster(cluster) => cluster
                .annotations()
                .iter()
                .any(|a| rect.contains(&a.coordinate())),
        }
    }
}

impl<A: Annotation> PartialEq for ClusterOrAnnotation<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Annotation(a), Self::Annotation(b)) => a.id() == b.id(),
            (Self::Cluster(a), Self::Cluster(b)) => a == b,
            _ => false,
        }
    }
}

impl<A: Annotation> Eq for ClusterOrAnnotation<A> {}

impl<A: Annotation> Hash for ClusterOrAnnotation<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Annotation(annotation) => {
                0u8.hash(state);
                annotation.id().hash(state);
            }
            Self::Cluster(cluster) => {
                1u8.hash(state);
                cluster.hash(state);
            }
        }
    }
}

/// The insert/remove delta between two consecutive visible sets.
///
/// Constructed fresh per reload and immutable once returned; the caller
/// animates exactly these changes instead of rebuilding its display list.
#[derive(Debug, Clone)]
pub struct Difference<A: Annotation> {
    /// Items present in the new visible set but not the previous one.
    pub insertions: Vec<ClusterOrAnnotation<A>>,
    /// Items present in the previous visible set but not the new one.
    pub removals: Vec<ClusterOrAnnotation<A>>,
}

impl<A: Annotation> Difference<A> {
    /// An empty difference.
    pub fn empty() -> Self {
        Self {
            insertions: Vec::new(),
            removals: Vec::new(),
        }
    }

    /// Compute the symmetric set delta between `new` and `previous`.
    ///
    /// Comparison is by the structural equality of [`ClusterOrAnnotation`];
    /// neither input is mutated. Hash sets keep this linear in the combined
    /// size of the two visible sets.
    pub fn between(new: &[ClusterOrAnnotation<A>], previous: &[ClusterOrAnnotation<A>]) -> Self {
        let previous_set: FxHashSet<&ClusterOrAnnotation<A>> = previous.iter().collect();
        let new_set: FxHashSet<&ClusterOrAnnotation<A>> = new.iter().collect();

        Self {
            insertions: new
                .iter()
                .filter(|item| !previous_set.contains(*item))
                .cloned()
                .collect(),
            removals: previous
                .iter()
                .filter(|item| !new_set.contains(*item))
                .cloned()
                .collect(),
        }
    }

    /// True when there is nothing to insert and nothing to remove.
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.removals.is_empty()
    }
}

impl<A: Annotation> Default for Difference<A> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Poi {
        id: u32,
        coordinate: Point,
    }

    impl Poi {
        fn new(id: u32, x: f64, y: f64) -> Self {
            Self {
                id,
                coordinate: Point::new(x, y),
            }
        }
    }

    impl Annotation for Poi {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn coordinate(&self) -> Point {
            self.coordinate
        }

        fn set_coordinate(&mut self, coordinate: Point) {
            self.coordinate = coordinate;
        }
    }

    fn single(id: u32) -> ClusterOrAnnotation<Poi> {
        ClusterOrAnnotation::Annotation(Poi::new(id, 0.0, 0.0))
    }

    fn cluster(ids: &[u32]) -> ClusterOrAnnotation<Poi> {
        let members = ids.iter().map(|&id| Poi::new(id, 0.0, 0.0)).collect();
        ClusterOrAnnotation::Cluster(Cluster::new(Point::new(0.0, 0.0), members))
    }

    #[test]
    fn test_single_equality_is_by_identity() {
        let a = ClusterOrAnnotation::Annotation(Poi::new(1, 0.0, 0.0));
        let moved = ClusterOrAnnotation::Annotation(Poi::new(1, 9.0, 9.0));
        assert_eq!(a, moved);
        assert_ne!(a, single(2));
    }

    #[test]
    fn test_cluster_equality_is_by_member_list() {
        assert_eq!(cluster(&[1, 2, 3]), cluster(&[1, 2, 3]));
        // One member different, or one member missing, is a different value.
        assert_ne!(cluster(&[1, 2, 3]), cluster(&[1, 2, 4]));
        assert_ne!(cluster(&[1, 2, 3]), cluster(&[1, 2]));
    }

    #[test]
    fn test_variants_never_compare_equal() {
        assert_ne!(single(1), cluster(&[1]));
    }

    #[test]
    fn test_difference_between() {
        let previous = vec![single(1), cluster(&[2, 3])];
        let new = vec![single(1), cluster(&[2, 3, 4])];

        let difference = Difference::between(&new, &previous);
        assert_eq!(difference.insertions, vec![cluster(&[2, 3, 4])]);
        assert_eq!(difference.removals, vec![cluster(&[2, 3])]);
    }

    #[test]
    fn test_difference_identical_sets_is_empty() {
        let set = vec![single(1), cluster(&[2, 3])];
        assert!(Difference::between(&set, &set.clone()).is_empty());
    }

    #[test]
    fn test_has_member_inside() {
        let rect = MapRect::new(0.0, 0.0, 10.0, 10.0);
        let inside = ClusterOrAnnotation::Annotation(Poi::new(1, 5.0, 5.0));
        let outside = ClusterOrAnnotation::Annotation(Poi::new(2, 50.0, 5.0));
        assert!(inside.has_member_inside(&rect));
        assert!(!outside.has_member_inside(&rect));

        let mixed = ClusterOrAnnotation::Cluster(Cluster::new(
            Point::new(5.0, 5.0),
            vec![Poi::new(3, 50.0, 5.0), Poi::new(4, 5.0, 5.0)],
        ));
        assert!(mixed.has_member_inside(&rect));
    }
}
