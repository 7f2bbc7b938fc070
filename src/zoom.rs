//! Scale-ratio and zoom-level helpers.
//!
//! Pure functions with no shared state: the clustering engine feeds the
//! view's pixel width and the visible rectangle's width through these to
//! decide grid cell sizes and whether clustering applies at all.

/// The deepest zoom level, `log2(WORLD_SIZE / 256)`.
///
/// At this level one 256-unit tile of the world maps onto 256 screen
/// points, i.e. the scale ratio is 1.
pub const MAX_ZOOM_LEVEL: usize = 20;

/// Screen-points-per-map-unit ratio for a view of `view_width` pixels
/// showing `visible_width` map units.
///
/// Non-finite when the visible width is zero; callers treat that as a
/// reload no-op rather than an error.
pub fn scale_ratio(view_width: f64, visible_width: f64) -> f64 {
    view_width / visible_width
}

/// Derive the discrete zoom level from a scale ratio.
///
/// Fully zoomed out (the whole world in one tile's worth of pixels) yields
/// 0; a ratio of 1 yields [`MAX_ZOOM_LEVEL`]. The result is monotonically
/// non-increasing as the scale ratio decreases.
///
/// # Examples
///
/// ```
/// use mapgrid::zoom::{MAX_ZOOM_LEVEL, zoom_level};
///
/// assert_eq!(zoom_level(1.0), MAX_ZOOM_LEVEL);
/// assert_eq!(zoom_level(256.0 / mapgrid::WORLD_SIZE), 0);
/// ```
pub fn zoom_level(scale: f64) -> usize {
    let level = MAX_ZOOM_LEVEL as f64 + (scale.log2() + 0.5).floor();
    level.clamp(0.0, MAX_ZOOM_LEVEL as f64) as usize
}
