//! Cluster manager builder for flexible configuration.
//!
//! This module provides a builder pattern for creating managers with a
//! validated configuration and, when needed, a custom universal rectangle
//! for the underlying index.

use crate::cluster::Annotation;
use crate::config::ClusterConfig;
use crate::error::{MapGridError, Result};
use crate::geometry::MapRect;
use crate::manager::{ClusterManager, SyncClusterManager};
use crate::storage::AnnotationStorage;

/// Builder for a [`ClusterManager`].
///
/// # Examples
///
/// ```rust
/// use mapgrid::{Annotation, ClusterConfig, ClusterManagerBuilder, Point};
///
/// #[derive(Debug, Clone)]
/// struct Pin {
///     id: u64,
///     coordinate: Point,
/// }
///
/// impl Annotation for Pin {
///     type Id = u64;
///     fn id(&self) -> u64 {
///         self.id
///     }
///     fn coordinate(&self) -> Point {
///         self.coordinate
///     }
///     fn set_coordinate(&mut self, coordinate: Point) {
///         self.coordinate = coordinate;
///     }
/// }
///
/// let manager = ClusterManagerBuilder::new()
///     .config(ClusterConfig::default().with_min_count_for_clustering(3))
///     .build::<Pin>()
///     .unwrap();
/// assert!(manager.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ClusterManagerBuilder {
    config: ClusterConfig,
    rect: MapRect,
}

impl ClusterManagerBuilder {
    /// Create a builder with the default configuration over the world
    /// rectangle.
    pub fn new() -> Self {
        Self {
            config: ClusterConfig::default(),
            rect: MapRect::world(),
        }
    }

    /// Set the clustering configuration.
    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a custom universal rectangle for the index.
    ///
    /// Annotations outside this rectangle are rejected on insert.
    pub fn rect(mut self, rect: MapRect) -> Self {
        self.rect = rect;
        self
    }

    /// Build the manager, validating the configuration.
    pub fn build<A: Annotation>(self) -> Result<ClusterManager<A>> {
        self.validate()?;
        Ok(ClusterManager::with_rect_and_config(self.rect, self.config))
    }

    /// Build with a non-default node storage implementation.
    pub fn build_with_storage<A, S>(self) -> Result<ClusterManager<A, S>>
    where
        A: Annotation,
        S: AnnotationStorage<Annotation = A>,
    {
        self.validate()?;
        Ok(ClusterManager::with_rect_and_config(self.rect, self.config))
    }

    /// Build a thread-safe manager handle.
    pub fn build_sync<A: Annotation>(self) -> Result<SyncClusterManager<A>> {
        Ok(SyncClusterManager::from_manager(self.build()?))
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;

        let degenerate = !self.rect.width().is_finite()
            || !self.rect.height().is_finite()
            || self.rect.width() <= 0.0
            || self.rect.height() <= 0.0;
        if degenerate {
            return Err(MapGridError::InvalidRect(
                "width and height must be finite and positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClusterManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
