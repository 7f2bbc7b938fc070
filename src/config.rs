//! Clustering configuration.
//!
//! Everything here is serializable so a host application can load its
//! clustering behavior from JSON or another format without code changes.

use serde::{Deserialize, Serialize};

use crate::error::{MapGridError, Result};
use crate::geometry::WORLD_SIZE;

/// How the grid cell side length is derived from the zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellSizing {
    /// Halve the cell with every zoom level, never below `min_cell_size`.
    ///
    /// The cell side is a quarter of a world tile at the current zoom
    /// level, so the default floor of 64 map units only binds at the
    /// deepest levels.
    Halving {
        /// Smallest allowed cell side in map units
        min_cell_size: f64,
    },
    /// A fixed cell side in map units, independent of zoom.
    Fixed(f64),
}

impl CellSizing {
    /// Cell side length in map units for the given zoom level.
    pub fn cell_size(&self, zoom_level: usize) -> f64 {
        match *self {
            Self::Halving { min_cell_size } => {
                let tile = WORLD_SIZE / 2f64.powi(zoom_level as i32);
                (tile / 4.0).max(min_cell_size)
            }
            Self::Fixed(size) => size,
        }
    }
}

impl Default for CellSizing {
    fn default() -> Self {
        Self::Halving {
            min_cell_size: 64.0,
        }
    }
}

/// Where a cluster marker is placed within its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterPosition {
    /// Centroid of the member coordinates
    #[default]
    Centroid,
    /// Geometric center of the grid cell
    CellCenter,
}

/// Clustering engine configuration.
///
/// # Example
///
/// ```rust
/// use mapgrid::ClusterConfig;
///
/// // Create default config
/// let config = ClusterConfig::default();
/// assert_eq!(config.min_count_for_clustering, 2);
///
/// // Load from JSON; omitted fields take their defaults
/// let json = r#"{
///     "min_count_for_clustering": 5,
///     "distribute_coincident_points": false
/// }"#;
/// let config: ClusterConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.min_count_for_clustering, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Minimum number of clusterable annotations in a cell to form a cluster
    #[serde(default = "ClusterConfig::default_min_count_for_clustering")]
    pub min_count_for_clustering: usize,

    /// Deepest zoom level at which clustering still applies; above this,
    /// every annotation is shown individually
    #[serde(default = "ClusterConfig::default_max_zoom_level_for_clustering")]
    pub max_zoom_level_for_clustering: usize,

    /// Spread annotations sharing an exact coordinate around a small circle
    /// before clustering
    #[serde(default = "ClusterConfig::default_distribute_coincident_points")]
    pub distribute_coincident_points: bool,

    /// Remove annotations from the caller's display as soon as they leave
    /// the clustered output. When `false`, removal candidates whose points
    /// are still geometrically inside the visible rectangle are retained.
    #[serde(default = "ClusterConfig::default_remove_invisible_annotations")]
    pub remove_invisible_annotations: bool,

    /// Offset distance in map units used when spreading coincident points
    #[serde(default = "ClusterConfig::default_contested_coordinate_offset")]
    pub contested_coordinate_offset: f64,

    /// Zoom level to grid cell side mapping
    #[serde(default)]
    pub cell_sizing: CellSizing,

    /// Cluster marker placement strategy
    #[serde(default)]
    pub cluster_position: ClusterPosition,
}

impl ClusterConfig {
    const fn default_min_count_for_clustering() -> usize {
        2
    }

    const fn default_max_zoom_level_for_clustering() -> usize {
        19
    }

    const fn default_distribute_coincident_points() -> bool {
        true
    }

    const fn default_remove_invisible_annotations() -> bool {
        true
    }

    const fn default_contested_coordinate_offset() -> f64 {
        3.0
    }

    /// Set the minimum cell population that forms a cluster.
    pub fn with_min_count_for_clustering(mut self, count: usize) -> Self {
        self.min_count_for_clustering = count;
        self
    }

    /// Set the deepest zoom level at which clustering applies.
    pub fn with_max_zoom_level_for_clustering(mut self, zoom_level: usize) -> Self {
        self.max_zoom_level_for_clustering = zoom_level;
        self
    }

    /// Enable or disable coincident-point distribution.
    pub fn with_distribute_coincident_points(mut self, enabled: bool) -> Self {
        self.distribute_coincident_points = enabled;
        self
    }

    /// Choose whether annotations leave the display immediately or only
    /// once geometrically out of view.
    pub fn with_remove_invisible_annotations(mut self, enabled: bool) -> Self {
        self.remove_invisible_annotations = enabled;
        self
    }

    /// Set the coincident-point spread distance in map units.
    pub fn with_contested_coordinate_offset(mut self, offset: f64) -> Self {
        self.contested_coordinate_offset = offset;
        self
    }

    /// Set the cell sizing strategy.
    pub fn with_cell_sizing(mut self, sizing: CellSizing) -> Self {
        self.cell_sizing = sizing;
        self
    }

    /// Set the cluster marker placement strategy.
    pub fn with_cluster_position(mut self, position: ClusterPosition) -> Self {
        self.cluster_position = position;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.min_count_for_clustering == 0 {
            return Err(MapGridError::InvalidConfig(
                "min_count_for_clustering must be at least 1".to_string(),
            ));
        }

        if !self.contested_coordinate_offset.is_finite() || self.contested_coordinate_offset <= 0.0
        {
            return Err(MapGridError::InvalidConfig(
                "contested_coordinate_offset must be finite and positive".to_string(),
            ));
        }

        let cell_floor = match self.cell_sizing {
            CellSizing::Halving { min_cell_size } => min_cell_size,
            CellSizing::Fixed(size) => size,
        };
        if !cell_floor.is_finite() || cell_floor <= 0.0 {
            return Err(MapGridError::InvalidConfig(
                "cell size must be finite and positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_count_for_clustering: Self::default_min_count_for_clustering(),
            max_zoom_level_for_clustering: Self::default_max_zoom_level_for_clustering(),
            distribute_coincident_points: Self::default_distribute_coincident_points(),
            remove_invisible_annotations: Self::default_remove_invisible_annotations(),
            contested_coordinate_offset: Self::default_contested_coordinate_offset(),
            cell_sizing: CellSizing::default(),
            cluster_position: ClusterPosition::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClusterConfig::default();
        assert_eq!(config.min_count_for_clustering, 2);
        assert_eq!(config.max_zoom_level_for_clustering, 19);
        assert!(config.distribute_coincident_points);
        assert!(config.remove_invisible_annotations);
        assert_eq!(config.contested_coordinate_offset, 3.0);
        assert_eq!(config.cluster_position, ClusterPosition::Centroid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_chainers() {
        let config = ClusterConfig::default()
            .with_min_count_for_clustering(4)
            .with_max_zoom_level_for_clustering(15)
            .with_distribute_coincident_points(false)
            .with_cluster_position(ClusterPosition::CellCenter);

        assert_eq!(config.min_count_for_clustering, 4);
        assert_eq!(config.max_zoom_level_for_clustering, 15);
        assert!(!config.distribute_coincident_points);
        assert_eq!(config.cluster_position, ClusterPosition::CellCenter);
    }

    #[test]
    fn test_validate_rejects_zero_min_count() {
        let config = ClusterConfig::default().with_min_count_for_clustering(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_offset() {
        let config = ClusterConfig::default().with_contested_coordinate_offset(f64::NAN);
        assert!(config.validate().is_err());

        let config = ClusterConfig::default().with_contested_coordinate_offset(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cell_size() {
        let config = ClusterConfig::default().with_cell_sizing(CellSizing::Fixed(0.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_halving_cell_size() {
        let sizing = CellSizing::default();

        // Each zoom level halves the cell.
        let z5 = sizing.cell_size(5);
        let z6 = sizing.cell_size(6);
        assert_eq!(z5, 2.0 * z6);

        // The floor binds at the deepest levels.
        assert_eq!(sizing.cell_size(20), 64.0);
        assert_eq!(sizing.cell_size(25), 64.0);
    }

    #[test]
    fn test_fixed_cell_size_ignores_zoom() {
        let sizing = CellSizing::Fixed(1000.0);
        assert_eq!(sizing.cell_size(0), 1000.0);
        assert_eq!(sizing.cell_size(20), 1000.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = ClusterConfig::default()
            .with_min_count_for_clustering(3)
            .with_cell_sizing(CellSizing::Fixed(512.0));

        let json = serde_json::to_string(&config).unwrap();
        let back: ClusterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_serde_defaults_for_omitted_fields() {
        let config: ClusterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClusterConfig::default());
    }
}
