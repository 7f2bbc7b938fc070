//! The clustering engine.
//!
//! A [`ClusterManager`] owns one quadtree plus the visible set produced by
//! the previous reload. Callers mutate the index through `add`/`remove`,
//! then call [`ClusterManager::reload`] whenever the viewport changes; the
//! returned [`Difference`] is the only thing that crosses back into the
//! caller's display layer.
//!
//! # Thread Safety
//!
//! `ClusterManager` is not thread-safe by itself; one instance is meant to
//! be driven from a single owner. For shared access use
//! [`SyncClusterManager`], which serializes every operation on the
//! instance.

use std::f64::consts::TAU;

use geo::Point;
use rustc_hash::FxHashMap;

use crate::cluster::{Annotation, Cluster, ClusterOrAnnotation, Difference};
use crate::config::{ClusterConfig, ClusterPosition};
use crate::geometry::{MapRect, Region, WORLD_SIZE, offset_coordinate};
use crate::quadtree::QuadTree;
use crate::storage::{AnnotationStorage, VecStorage};
use crate::zoom;

mod sync;

pub use sync::SyncClusterManager;

/// Incremental grid clustering over a quadtree-indexed annotation set.
///
/// Each [`reload`](Self::reload) recomputes the visible set from scratch:
/// the visible rectangle is partitioned into zoom-sized grid cells aligned
/// to a fixed global origin, each cell's annotations either coalesce into
/// one [`Cluster`] or pass through individually, and the result is diffed
/// against the previous visible set. Recomputing wholesale keeps the
/// grouping correct under arbitrary pans and zooms; the diff keeps the
/// caller's rendering incremental.
pub struct ClusterManager<A: Annotation, S: AnnotationStorage<Annotation = A> = VecStorage<A>> {
    tree: QuadTree<A, S>,
    visible: Vec<ClusterOrAnnotation<A>>,
    zoom_level: usize,
    config: ClusterConfig,
}

impl<A, S> ClusterManager<A, S>
where
    A: Annotation,
    S: AnnotationStorage<Annotation = A>,
{
    /// Create a manager over the world rectangle with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClusterConfig::default())
    }

    /// Create a manager over the world rectangle with the given configuration.
    pub fn with_config(config: ClusterConfig) -> Self {
        Self::with_rect_and_config(MapRect::world(), config)
    }

    /// Create a manager whose index covers a custom universal rectangle.
    pub fn with_rect_and_config(rect: MapRect, config: ClusterConfig) -> Self {
        Self {
            tree: QuadTree::new(rect),
            visible: Vec::new(),
            zoom_level: 0,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// The zoom level computed by the most recent successful reload.
    pub fn zoom_level(&self) -> usize {
        self.zoom_level
    }

    /// Add an annotation to the index.
    ///
    /// Returns `false` when the coordinate is outside the universal
    /// rectangle; the annotation is then not indexed.
    pub fn add(&mut self, annotation: A) -> bool {
        self.tree.add(annotation)
    }

    /// Add many annotations, returning the ones actually indexed.
    pub fn add_all<I>(&mut self, annotations: I) -> Vec<A>
    where
        I: IntoIterator<Item = A>,
    {
        self.tree.add_all(annotations)
    }

    /// Remove the annotation with the same identity as `annotation`.
    pub fn remove(&mut self, annotation: &A) -> Option<A> {
        self.tree.remove(annotation)
    }

    /// Remove every annotation matching the predicate.
    pub fn remove_where<F>(&mut self, predicate: F) -> Vec<A>
    where
        F: FnMut(&A) -> bool,
    {
        self.tree.remove_where(predicate)
    }

    /// Remove every annotation from the index.
    ///
    /// The visible set is untouched until the next reload reports the
    /// corresponding removals.
    pub fn remove_all(&mut self) {
        self.tree.clear();
    }

    /// Every indexed annotation.
    pub fn annotations(&self) -> Vec<A> {
        self.tree.annotations()
    }

    /// Number of indexed annotations.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The visible set produced by the most recent reload.
    pub fn visible(&self) -> &[ClusterOrAnnotation<A>] {
        &self.visible
    }

    /// The visible annotations with clusters flattened into their members.
    pub fn visible_annotations(&self) -> Vec<A> {
        let mut annotations = Vec::new();
        for item in &self.visible {
            match item {
                ClusterOrAnnotation::Annotation(annotation) => {
                    annotations.push(annotation.clone());
                }
                ClusterOrAnnotation::Cluster(cluster) => {
                    annotations.extend_from_slice(cluster.annotations());
                }
            }
        }
        annotations
    }

    /// Recompute the visible set for a viewport and return the delta.
    ///
    /// `view_width` is the rendering surface's width in screen points;
    /// `region` is the visible map region. A degenerate scale ratio (zero
    /// or non-finite visible width) yields an empty difference and leaves
    /// the prior visible set and zoom level unchanged.
    pub fn reload(&mut self, view_width: f64, region: Region) -> Difference<A> {
        let visible_rect = region.to_rect();
        let scale = zoom::scale_ratio(view_width, visible_rect.width());
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("reload skipped: degenerate scale ratio {scale}");
            return Difference::empty();
        }

        self.zoom_level = zoom::zoom_level(scale);

        if self.config.distribute_coincident_points {
            self.distribute_coincident_points(&visible_rect);
        }

        let cell_size = self.config.cell_sizing.cell_size(self.zoom_level);
        let mut new_visible = Vec::new();
        let mut cells = 0usize;

        // Cell indices are taken against the global origin, not the visible
        // rectangle's corner, so cell boundaries are stable while panning.
        let min_cell_x = (visible_rect.min_x() / cell_size).floor() as i64;
        let max_cell_x = (visible_rect.max_x() / cell_size).floor() as i64;
        let min_cell_y = (visible_rect.min_y() / cell_size).floor() as i64;
        let max_cell_y = (visible_rect.max_y() / cell_size).floor() as i64;

        for cell_y in min_cell_y..=max_cell_y {
            for cell_x in min_cell_x..=max_cell_x {
                let mut origin_x = cell_x as f64 * cell_size;
                let origin_y = cell_y as f64 * cell_size;
                // The world wraps horizontally.
                if origin_x > WORLD_SIZE {
                    origin_x -= WORLD_SIZE;
                }

                let cell = MapRect::from_origin_and_size(origin_x, origin_y, cell_size, cell_size);
                self.cluster_cell(&cell, &mut new_visible);
                cells += 1;
            }
        }

        let mut difference = Difference::between(&new_visible, &self.visible);
        if !self.config.remove_invisible_annotations {
            difference
                .removals
                .retain(|item| !item.has_member_inside(&visible_rect));
        }

        log::debug!(
            "reload at zoom {}: {} cells, {} visible, +{} -{}",
            self.zoom_level,
            cells,
            new_visible.len(),
            difference.insertions.len(),
            difference.removals.len(),
        );

        self.visible = new_visible;
        difference
    }

    /// Cluster or pass through the annotations of one grid cell.
    fn cluster_cell(&self, cell: &MapRect, out: &mut Vec<ClusterOrAnnotation<A>>) {
        let annotations = self.tree.annotations_in(cell);
        if annotations.is_empty() {
            return;
        }

        let (candidates, pinned): (Vec<A>, Vec<A>) =
            annotations.into_iter().partition(|a| a.should_cluster());

        // Annotations that opted out of clustering are always individual.
        out.extend(pinned.into_iter().map(ClusterOrAnnotation::Annotation));

        let clusterable = candidates.len() >= self.config.min_count_for_clustering
            && self.zoom_level <= self.config.max_zoom_level_for_clustering;
        if clusterable {
            let coordinate = match self.config.cluster_position {
                ClusterPosition::Centroid => centroid(&candidates),
                ClusterPosition::CellCenter => cell.center(),
            };
            out.push(ClusterOrAnnotation::Cluster(Cluster::new(
                coordinate, candidates,
            )));
        } else {
            out.extend(candidates.into_iter().map(ClusterOrAnnotation::Annotation));
        }
    }

    /// Spread annotations sharing an exact coordinate around a circle.
    ///
    /// Runs before grid clustering so the spread annotations land in their
    /// natural cells. Each member moves by remove-then-add, keeping the
    /// index consistent with the coordinates it was built from.
    fn distribute_coincident_points(&mut self, visible_rect: &MapRect) {
        let mut groups: FxHashMap<(u64, u64), Vec<A>> = FxHashMap::default();
        for annotation in self.tree.annotations_in(visible_rect) {
            let coordinate = annotation.coordinate();
            groups
                .entry((coordinate.x().to_bits(), coordinate.y().to_bits()))
                .or_default()
                .push(annotation);
        }

        let offset = self.config.contested_coordinate_offset;
        for group in groups.into_values() {
            if group.len() < 2 {
                continue;
            }

            let count = group.len();
            for (index, annotation) in group.into_iter().enumerate() {
                let Some(mut moved) = self.tree.remove(&annotation) else {
                    continue;
                };
                let bearing = TAU * index as f64 / count as f64;
                moved.set_coordinate(offset_coordinate(moved.coordinate(), offset, bearing));
                if !self.tree.add(moved) {
                    log::warn!("annotation left the index bounds during redistribution");
                }
            }
        }
    }
}

impl<A, S> Default for ClusterManager<A, S>
where
    A: Annotation,
    S: AnnotationStorage<Annotation = A>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Mean of the member coordinates.
fn centroid<A: Annotation>(annotations: &[A]) -> Point {
    let count = annotations.len() as f64;
    let (sum_x, sum_y) = annotations.iter().fold((0.0, 0.0), |(sx, sy), a| {
        let c = a.coordinate();
        (sx + c.x(), sy + c.y())
    });
    Point::new(sum_x / count, sum_y / count)
}
