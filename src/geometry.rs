//! Geometry primitives for the projected map coordinate space.
//!
//! All engine math happens in a flat projected space of map units: a square
//! world with origin at the top-left and a side of [`WORLD_SIZE`] units. The
//! host platform owns the actual projection; this module only provides the
//! rectangle and coordinate predicates the index and the clustering pass
//! need.

use geo::{Point, Rect, coord};
use once_cell::sync::Lazy;

/// Side length of the world rectangle in map units.
///
/// Corresponds to 2^20 tiles of 256 map units each, so the maximum zoom
/// level works out to 20 (see [`crate::zoom`]).
pub const WORLD_SIZE: f64 = 268_435_456.0;

static WORLD: Lazy<MapRect> = Lazy::new(|| MapRect::new(0.0, 0.0, WORLD_SIZE, WORLD_SIZE));

/// A 2D axis-aligned rectangle in projected map units.
///
/// This is a wrapper around `geo::Rect` with the boundary-inclusive
/// containment convention the clustering engine relies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRect {
    /// The underlying geometric rectangle
    pub rect: Rect<f64>,
}

impl MapRect {
    /// Create a new rectangle from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapgrid::MapRect;
    ///
    /// let rect = MapRect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width(), 100.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                coord! { x: min_x, y: min_y },
                coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_and_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// The fixed world rectangle, the default universal bound of the index.
    pub fn world() -> Self {
        *WORLD
    }

    /// Get the minimum x coordinate.
    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    /// Get the minimum y coordinate.
    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    /// Get the maximum x coordinate.
    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    /// Get the maximum y coordinate.
    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    /// Get the width of the rectangle.
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Get the height of the rectangle.
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        let c = self.rect.center();
        Point::new(c.x, c.y)
    }

    /// Check if a coordinate lies within this rectangle, boundaries included.
    pub fn contains(&self, point: &Point) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }

    /// Check if this rectangle intersects with another.
    pub fn intersects(&self, other: &MapRect) -> bool {
        !(self.max_x() < other.min_x()
            || self.min_x() > other.max_x()
            || self.max_y() < other.min_y()
            || self.min_y() > other.max_y())
    }
}

/// A visible map region expressed as a center coordinate plus spans.
///
/// Mirrors the host platform's region type: the caller converts whatever its
/// UI framework reports into a `Region`, and [`Region::to_rect`] yields the
/// visible rectangle the engine clusters against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Center of the visible area
    pub center: Point,
    /// Horizontal span in map units
    pub span_x: f64,
    /// Vertical span in map units
    pub span_y: f64,
}

impl Region {
    /// Create a new region from a center and spans.
    pub fn new(center: Point, span_x: f64, span_y: f64) -> Self {
        Self {
            center,
            span_x,
            span_y,
        }
    }

    /// Convert the region into its axis-aligned visible rectangle.
    pub fn to_rect(&self) -> MapRect {
        MapRect::from_origin_and_size(
            self.center.x() - self.span_x / 2.0,
            self.center.y() - self.span_y / 2.0,
            self.span_x,
            self.span_y,
        )
    }
}

/// Offset a coordinate by a distance along a bearing.
///
/// The bearing is measured in radians clockwise from the positive y axis,
/// matching compass bearings on a projected map.
pub fn offset_coordinate(origin: Point, distance: f64, bearing: f64) -> Point {
    Point::new(
        origin.x() + distance * bearing.sin(),
        origin.y() + distance * bearing.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_creation() {
        let rect = MapRect::new(-74.0, 40.7, -73.9, 40.8);
        assert_eq!(rect.min_x(), -74.0);
        assert_eq!(rect.min_y(), 40.7);
        assert_eq!(rect.max_x(), -73.9);
        assert_eq!(rect.max_y(), 40.8);
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = MapRect::new(0.0, 0.0, 10.0, 5.0);
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 5.0);
    }

    #[test]
    fn test_rect_center() {
        let rect = MapRect::new(0.0, 0.0, 10.0, 10.0);
        let center = rect.center();
        assert_eq!(center.x(), 5.0);
        assert_eq!(center.y(), 5.0);
    }

    #[test]
    fn test_rect_contains_is_boundary_inclusive() {
        let rect = MapRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(&Point::new(5.0, 5.0)));
        assert!(rect.contains(&Point::new(0.0, 0.0)));
        assert!(rect.contains(&Point::new(10.0, 10.0)));
        assert!(!rect.contains(&Point::new(-1.0, 5.0)));
        assert!(!rect.contains(&Point::new(11.0, 5.0)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = MapRect::new(0.0, 0.0, 10.0, 10.0);
        let b = MapRect::new(5.0, 5.0, 15.0, 15.0);
        let c = MapRect::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn test_rect_from_origin_and_size() {
        let rect = MapRect::from_origin_and_size(2.0, 3.0, 4.0, 5.0);
        assert_eq!(rect.min_x(), 2.0);
        assert_eq!(rect.min_y(), 3.0);
        assert_eq!(rect.max_x(), 6.0);
        assert_eq!(rect.max_y(), 8.0);
    }

    #[test]
    fn test_world_rect() {
        let world = MapRect::world();
        assert_eq!(world.min_x(), 0.0);
        assert_eq!(world.width(), WORLD_SIZE);
        assert!(world.contains(&Point::new(WORLD_SIZE / 2.0, WORLD_SIZE / 2.0)));
    }

    #[test]
    fn test_region_to_rect() {
        let region = Region::new(Point::new(100.0, 200.0), 50.0, 20.0);
        let rect = region.to_rect();
        assert_eq!(rect.min_x(), 75.0);
        assert_eq!(rect.max_x(), 125.0);
        assert_eq!(rect.min_y(), 190.0);
        assert_eq!(rect.max_y(), 210.0);
    }

    #[test]
    fn test_offset_coordinate() {
        let origin = Point::new(10.0, 10.0);

        // Bearing 0 points along +y.
        let north = offset_coordinate(origin, 5.0, 0.0);
        assert!((north.x() - 10.0).abs() < 1e-9);
        assert!((north.y() - 15.0).abs() < 1e-9);

        // Bearing pi/2 points along +x.
        let east = offset_coordinate(origin, 5.0, std::f64::consts::FRAC_PI_2);
        assert!((east.x() - 15.0).abs() < 1e-9);
        assert!((east.y() - 10.0).abs() < 1e-9);
    }
}
