//! Rectangle helpers shared by the gesture heuristics and focus resolution.
//!
//! Everything is expressed in surface coordinates (pixels) with `kurbo`
//! types; the recognition engine works in millimetres and its boxes are
//! converted with [`EngineScale`].

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

const INCH_IN_MILLIMETER: f64 = 25.4;

/// Strict intersection: `Some` only when both rectangles share a region of
/// positive width and height.
pub fn intersection(a: Rect, b: Rect) -> Option<Rect> {
    let overlap = a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1;
    overlap.then(|| a.intersect(b))
}

/// Bounding rectangle of a point sequence; zero-sized at the single point for
/// a one-point path and [`Rect::ZERO`] for an empty one.
pub fn bounds_of(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
}

/// Millimetre-per-pixel scale of the writing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineScale {
    pub x: f64,
    pub y: f64,
}

impl EngineScale {
    pub fn from_dpi(dpi_x: f32, dpi_y: f32) -> Self {
        Self {
            x: INCH_IN_MILLIMETER / f64::from(dpi_x),
            y: INCH_IN_MILLIMETER / f64::from(dpi_y),
        }
    }

    /// Convert an engine box (millimetres) to surface pixels.
    pub fn to_surface(&self, x: f64, y: f64, width: f64, height: f64) -> Rect {
        let left = x / self.x;
        let top = y / self.y;
        Rect::new(left, top, left + width / self.x, top + height / self.y)
    }

    /// Vertical physical distance in millimetres expressed in surface pixels.
    pub fn vertical_mm_to_surface(&self, millimeters: f64) -> f64 {
        millimeters / self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(intersection(a, b).is_none());

        let c = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(intersection(a, c), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn single_point_path_has_zero_sized_bounds() {
        let bounds = bounds_of(&[Point::new(3.0, 4.0)]);
        assert_eq!(bounds, Rect::new(3.0, 4.0, 3.0, 4.0));
        assert_eq!(bounds_of(&[]), Rect::ZERO);

        let bounds = bounds_of(&[Point::new(3.0, 4.0), Point::new(1.0, 9.0)]);
        assert_eq!(bounds, Rect::new(1.0, 4.0, 3.0, 9.0));
    }

    #[test]
    fn band_distance_follows_vertical_dpi() {
        let scale = EngineScale::from_dpi(254.0, 254.0);
        // 254 dpi is 10 px per millimetre.
        assert!((scale.vertical_mm_to_surface(5.0) - 50.0).abs() < 1e-9);
        let rect = scale.to_surface(1.0, 2.0, 3.0, 4.0);
        assert!((rect.x0 - 10.0).abs() < 1e-9);
        assert!((rect.height() - 40.0).abs() < 1e-9);
    }
}
