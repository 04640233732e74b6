//! After-the-fact polygon overlap audit over building footprints and zones.
//!
//! Zone placement only enforces centre separation, so rectangles of large
//! zones may still intersect. This pass reports every overlapping pair.

use serde::Serialize;

use crate::geometry::{polygon_center, Bounds, Point2};
use crate::model::CityModel;

/// Segments whose direction cross product is below this are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapKind {
    Building,
    Zone,
}

/// One overlapping pair. `zone_a`/`zone_b` are the owning zones for buildings
/// and the zone ids themselves for zones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub kind: OverlapKind,
    pub a: String,
    pub b: String,
    pub zone_a: Option<String>,
    pub zone_b: Option<String>,
    /// Distance between the polygons' vertex centroids.
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlapReport {
    pub buildings_checked: usize,
    pub zones_checked: usize,
    pub overlaps: Vec<Overlap>,
}

impl OverlapReport {
    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty()
    }

    pub fn count(&self, kind: OverlapKind) -> usize {
        self.overlaps.iter().filter(|o| o.kind == kind).count()
    }
}

// ── Polygon tests ─────────────────────────────────────────────────────────────

/// Even-odd ray cast. Points exactly on an edge may land either way.
pub fn point_in_polygon(p: Point2, polygon: &[Point2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Proper or endpoint intersection of segments `p1p2` and `p3p4`. Parallel
/// segments never intersect.
pub fn segments_intersect(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }
    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

fn edges(polygon: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    polygon.iter().enumerate().map(|(i, &p)| (p, polygon[(i + 1) % polygon.len()]))
}

fn edges_intersect(a: &[Point2], b: &[Point2]) -> bool {
    edges(a).any(|(a1, a2)| edges(b).any(|(b1, b2)| segments_intersect(a1, a2, b1, b2)))
}

/// Bounding-box prefilter, then containment of either first vertex, then any
/// edge crossing. Polygons with fewer than three vertices never overlap.
pub fn polygons_overlap(a: &[Point2], b: &[Point2]) -> bool {
    let (Some(ba), Some(bb)) = (Bounds::of_points(a), Bounds::of_points(b)) else {
        return false;
    };
    if a.len() < 3 || b.len() < 3 || !ba.intersects(&bb) {
        return false;
    }
    point_in_polygon(a[0], b) || point_in_polygon(b[0], a) || edges_intersect(a, b)
}

// ── Audit ─────────────────────────────────────────────────────────────────────

struct Shape<'a> {
    id: &'a str,
    zone: Option<&'a str>,
    polygon: &'a [Point2],
}

fn pairwise(kind: OverlapKind, shapes: &[Shape<'_>], out: &mut Vec<Overlap>) {
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            if polygons_overlap(a.polygon, b.polygon) {
                out.push(Overlap {
                    kind,
                    a: a.id.to_string(),
                    b: b.id.to_string(),
                    zone_a: a.zone.map(str::to_string),
                    zone_b: b.zone.map(str::to_string),
                    distance: polygon_center(a.polygon).distance(polygon_center(b.polygon)),
                });
            }
        }
    }
}

/// Check every building pair and every zone pair.
pub fn audit_overlaps(model: &CityModel) -> OverlapReport {
    let buildings: Vec<Shape<'_>> = model
        .buildings
        .iter()
        .map(|b| Shape { id: &b.id, zone: b.zone_id.as_deref(), polygon: &b.footprint })
        .collect();
    let zones: Vec<Shape<'_>> = model
        .zones
        .iter()
        .map(|z| Shape { id: &z.id, zone: Some(&z.id), polygon: &z.boundary })
        .collect();

    let mut overlaps = Vec::new();
    pairwise(OverlapKind::Building, &buildings, &mut overlaps);
    pairwise(OverlapKind::Zone, &zones, &mut overlaps);

    OverlapReport { buildings_checked: buildings.len(), zones_checked: zones.len(), overlaps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle;

    fn square(x: f64, y: f64, side: f64) -> Vec<Point2> {
        rectangle(Point2::new(x, y), side, side)
    }

    #[test]
    fn disjoint_squares_do_not_overlap() {
        assert!(!polygons_overlap(&square(0.0, 0.0, 10.0), &square(50.0, 0.0, 10.0)));
    }

    #[test]
    fn contained_square_overlaps() {
        // No edges cross; caught by the containment test.
        assert!(polygons_overlap(&square(0.0, 0.0, 100.0), &square(5.0, 5.0, 10.0)));
        assert!(polygons_overlap(&square(5.0, 5.0, 10.0), &square(0.0, 0.0, 100.0)));
    }

    #[test]
    fn crossing_rectangles_overlap() {
        let wide = rectangle(Point2::ORIGIN, 100.0, 10.0);
        let tall = rectangle(Point2::ORIGIN, 10.0, 100.0);
        assert!(polygons_overlap(&wide, &tall));
    }

    #[test]
    fn degenerate_polygons_are_ignored() {
        let line = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)];
        assert!(!polygons_overlap(&line, &square(5.0, 5.0, 20.0)));
        assert!(!polygons_overlap(&[], &square(0.0, 0.0, 1.0)));
    }

    #[test]
    fn point_in_polygon_basic() {
        let sq = square(0.0, 0.0, 10.0);
        assert!(point_in_polygon(Point2::new(1.0, -2.0), &sq));
        assert!(!point_in_polygon(Point2::new(6.0, 0.0), &sq));
        assert!(!point_in_polygon(Point2::ORIGIN, &[]));
    }

    #[test]
    fn parallel_segments_never_intersect() {
        let (a, b) = (Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert!(!segments_intersect(a, b, Point2::new(0.0, 1.0), Point2::new(10.0, 1.0)));
        assert!(segments_intersect(a, b, Point2::new(5.0, -5.0), Point2::new(5.0, 5.0)));
    }

    #[test]
    fn audit_reports_zone_ids_and_distance() {
        let mut model = crate::generate_city("chicago", "audit", None);
        model.buildings.truncate(0);
        model.zones.truncate(2);
        if model.zones.len() < 2 {
            return;
        }
        // Force the second zone onto the first.
        let shift = model.zones[0].center();
        let c1 = model.zones[1].center();
        for p in &mut model.zones[1].boundary {
            p.x += shift.x - c1.x + 30.0;
            p.y += shift.y - c1.y + 40.0;
        }

        let report = audit_overlaps(&model);
        assert_eq!(report.zones_checked, 2);
        assert_eq!(report.count(OverlapKind::Zone), 1);
        let o = &report.overlaps[0];
        assert_eq!(o.zone_a.as_deref(), Some(model.zones[0].id.as_str()));
        assert!((o.distance - 50.0).abs() < 1e-6);
        assert!(!report.is_clean());
    }
}
