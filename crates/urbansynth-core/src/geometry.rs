/// Planar coordinate types shared by every stage.
/// World units are metres; the origin is the city centre.
use serde::{Deserialize, Serialize};

/// A point in the world plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation, `t = 0` → `self`, `t = 1` → `other`.
    pub fn lerp(self, other: Point2, t: f64) -> Point2 {
        Point2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Square box of half-extent `half` around the origin.
    pub fn square(half: f64) -> Self {
        Self { min_x: -half, min_y: -half, max_x: half, max_y: half }
    }

    /// Tight bounds of a point set. Returns None for an empty slice.
    pub fn of_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(points.iter().skip(1).fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn center(&self) -> Point2 {
        Point2::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Touching edges count as intersecting.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.max_x < other.min_x
            || other.max_x < self.min_x
            || self.max_y < other.min_y
            || other.max_y < self.min_y)
    }
}

/// Counter-clockwise rectangle of `width` × `height` centred on `center`.
pub fn rectangle(center: Point2, width: f64, height: f64) -> Vec<Point2> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    vec![
        Point2::new(center.x - hw, center.y - hh),
        Point2::new(center.x + hw, center.y - hh),
        Point2::new(center.x + hw, center.y + hh),
        Point2::new(center.x - hw, center.y + hh),
    ]
}

/// Centre of the bounding box of a polygon. Origin for an empty polygon.
pub fn polygon_center(polygon: &[Point2]) -> Point2 {
    Bounds::of_points(polygon).map(|b| b.center()).unwrap_or(Point2::ORIGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rectangle_has_four_corners_around_center() {
        let c = Point2::new(100.0, -50.0);
        let rect = rectangle(c, 1500.0, 1000.0);
        assert_eq!(rect.len(), 4);
        let b = Bounds::of_points(&rect).unwrap();
        assert_abs_diff_eq!(b.width(), 1500.0);
        assert_abs_diff_eq!(b.height(), 1000.0);
        assert_eq!(polygon_center(&rect), c);
    }

    #[test]
    fn of_points_empty_is_none() {
        assert!(Bounds::of_points(&[]).is_none());
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Point2::new(-300.0, 20.0);
        let b = Point2::new(700.0, 980.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_abs_diff_eq!(a.lerp(b, 0.5).x, 200.0);
        assert_abs_diff_eq!(a.distance(b), (1000.0f64.powi(2) + 960.0f64.powi(2)).sqrt());
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Bounds { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 10.0 };
        let b = Bounds { min_x: 10.0, min_y: 5.0, max_x: 20.0, max_y: 15.0 };
        let c = Bounds { min_x: 10.5, min_y: 5.0, max_x: 20.0, max_y: 15.0 };
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
