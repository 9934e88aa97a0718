//! Convex-hull membership for perceptual color point sets.
//!
//! The hull is classified by the affine dimension of its points. Full 3D sets
//! are built with an incremental hull and stored as outward half-spaces;
//! lower-dimensional sets (a single color, colors on a line, colors in a plane)
//! only accept points inside their affine span.

use glam::{DVec2, DVec3};
use itertools::Itertools;

/// Distance within which a point on the boundary still counts as inside.
pub const HULL_TOLERANCE: f64 = 1e-9;

/// Spread below which a point set is treated as lower-dimensional.
const DEGENERACY_EPS: f64 = 1e-9;

/// Minimum height above a face for a point to extend the hull.
const VISIBILITY_EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
struct Plane {
    normal: DVec3,
    offset: f64,
}

impl Plane {
    /// Signed distance, positive outside.
    #[inline]
    fn distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) - self.offset
    }
}

#[derive(Clone, Debug)]
enum Shape {
    Point(DVec3),
    Segment {
        origin: DVec3,
        dir: DVec3,
        min: f64,
        max: f64,
    },
    Polygon {
        origin: DVec3,
        normal: DVec3,
        u: DVec3,
        v: DVec3,
        /// Counter-clockwise outline in (u, v) coordinates.
        outline: Vec<DVec2>,
    },
    Polytope {
        planes: Vec<Plane>,
    },
}

#[derive(Clone, Debug)]
pub struct ConvexHull {
    points: Vec<DVec3>,
    shape: Shape,
}

impl ConvexHull {
    /// Returns `None` for an empty point set.
    pub fn new(points: Vec<DVec3>) -> Option<Self> {
        let shape: Shape = classify(&points)?;
        Some(Self { points, shape })
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Affine dimension of the point set (0 to 3).
    pub fn dimension(&self) -> usize {
        match self.shape {
            Shape::Point(_) => 0,
            Shape::Segment { .. } => 1,
            Shape::Polygon { .. } => 2,
            Shape::Polytope { .. } => 3,
        }
    }

    /// True when `p` lies inside the hull or on its boundary.
    pub fn contains(&self, p: DVec3) -> bool {
        if !p.is_finite() {
            return false;
        }
        match &self.shape {
            Shape::Point(q) => p.distance(*q) <= HULL_TOLERANCE,
            Shape::Segment {
                origin,
                dir,
                min,
                max,
            } => {
                let d: DVec3 = p - *origin;
                let t: f64 = d.dot(*dir);
                (d - *dir * t).length() <= HULL_TOLERANCE
                    && t >= min - HULL_TOLERANCE
                    && t <= max + HULL_TOLERANCE
            }
            Shape::Polygon {
                origin,
                normal,
                u,
                v,
                outline,
            } => {
                let d: DVec3 = p - *origin;
                if d.dot(*normal).abs() > HULL_TOLERANCE {
                    return false;
                }
                let q = DVec2::new(d.dot(*u), d.dot(*v));
                outline.iter().circular_tuple_windows().all(|(a, b)| {
                    let edge: DVec2 = *b - *a;
                    edge.perp_dot(q - *a) / edge.length() >= -HULL_TOLERANCE
                })
            }
            Shape::Polytope { planes } => planes
                .iter()
                .all(|plane| plane.distance(p) <= HULL_TOLERANCE),
        }
    }

    /// The hull of the same points moved by `offset`.
    pub fn translated(&self, offset: DVec3) -> Self {
        let points: Vec<DVec3> = self.points.iter().map(|p| *p + offset).collect();
        // Translation preserves the affine dimension, so the set stays non-empty.
        let shape: Shape = classify(&points).unwrap_or(Shape::Point(offset));
        Self { points, shape }
    }
}

fn farthest_by<F: Fn(DVec3) -> f64>(points: &[DVec3], metric: F) -> (DVec3, f64) {
    points
        .iter()
        .map(|p| (*p, metric(*p)))
        .fold((points[0], f64::NEG_INFINITY), |best, cur| {
            if cur.1 > best.1 {
                cur
            } else {
                best
            }
        })
}

fn classify(points: &[DVec3]) -> Option<Shape> {
    let p0: DVec3 = *points.first()?;

    let (p1, spread) = farthest_by(points, |p| p.distance(p0));
    if spread <= DEGENERACY_EPS {
        return Some(Shape::Point(p0));
    }
    let dir: DVec3 = (p1 - p0) / spread;

    let off_line = |p: DVec3| {
        let d: DVec3 = p - p0;
        (d - dir * d.dot(dir)).length()
    };
    let (p2, width) = farthest_by(points, off_line);
    if width <= DEGENERACY_EPS {
        let (min, max) = points
            .iter()
            .map(|p| (*p - p0).dot(dir))
            .minmax()
            .into_option()
            .unwrap_or((0.0, 0.0));
        return Some(Shape::Segment {
            origin: p0,
            dir,
            min,
            max,
        });
    }
    let normal: DVec3 = dir.cross(p2 - p0).normalize();

    let (p3, depth) = farthest_by(points, |p| (p - p0).dot(normal).abs());
    if depth <= DEGENERACY_EPS {
        let u: DVec3 = dir;
        let v: DVec3 = normal.cross(u);
        let projected: Vec<DVec2> = points
            .iter()
            .map(|p| {
                let d: DVec3 = *p - p0;
                DVec2::new(d.dot(u), d.dot(v))
            })
            .collect();
        return Some(Shape::Polygon {
            origin: p0,
            normal,
            u,
            v,
            outline: convex_outline(projected),
        });
    }

    Some(Shape::Polytope {
        planes: polytope_planes(points, [p0, p1, p2, p3]),
    })
}

/// Monotone chain hull of 2D points, counter-clockwise, collinear points dropped.
fn convex_outline(mut points: Vec<DVec2>) -> Vec<DVec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();

    let turns_left = |o: DVec2, a: DVec2, b: DVec2| (a - o).perp_dot(b - o) > 0.0;

    let mut lower: Vec<DVec2> = Vec::new();
    for p in &points {
        while lower.len() >= 2 && !turns_left(lower[lower.len() - 2], lower[lower.len() - 1], *p) {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<DVec2> = Vec::new();
    for p in points.iter().rev() {
        while upper.len() >= 2 && !turns_left(upper[upper.len() - 2], upper[upper.len() - 1], *p) {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

struct Face {
    vertices: [usize; 3],
    plane: Plane,
}

/// Incremental 3D hull seeded with a non-degenerate tetrahedron.
fn polytope_planes(points: &[DVec3], seed: [DVec3; 4]) -> Vec<Plane> {
    let interior: DVec3 = (seed[0] + seed[1] + seed[2] + seed[3]) / 4.0;

    let mut vertices: Vec<DVec3> = seed.to_vec();
    let mut faces: Vec<Face> = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]
        .into_iter()
        .filter_map(|tri| make_face(&vertices, tri, interior))
        .collect();

    for p in points {
        let visible: Vec<bool> = faces
            .iter()
            .map(|face| face.plane.distance(*p) > VISIBILITY_EPS)
            .collect();
        if !visible.contains(&true) {
            continue;
        }

        // Directed edges of visible faces; an edge whose reverse is not among
        // them borders a hidden face and forms the horizon.
        let visible_edges: Vec<(usize, usize)> = faces
            .iter()
            .zip(&visible)
            .filter(|(_, vis)| **vis)
            .flat_map(|(face, _)| {
                let [a, b, c] = face.vertices;
                [(a, b), (b, c), (c, a)]
            })
            .collect();
        let horizon: Vec<(usize, usize)> = visible_edges
            .iter()
            .filter(|(a, b)| !visible_edges.contains(&(*b, *a)))
            .copied()
            .collect();

        let index: usize = vertices.len();
        vertices.push(*p);

        let mut kept: Vec<Face> = faces
            .into_iter()
            .zip(visible)
            .filter(|(_, vis)| !vis)
            .map(|(face, _)| face)
            .collect();
        kept.extend(
            horizon
                .into_iter()
                .filter_map(|(a, b)| make_face(&vertices, [a, b, index], interior)),
        );
        faces = kept;
    }

    faces.into_iter().map(|face| face.plane).collect()
}

/// Orients the triangle so its normal points away from `interior`.
fn make_face(vertices: &[DVec3], tri: [usize; 3], interior: DVec3) -> Option<Face> {
    let [a, b, c] = tri;
    let (pa, pb, pc) = (vertices[a], vertices[b], vertices[c]);
    let normal: DVec3 = (pb - pa).cross(pc - pa).try_normalize()?;

    let (order, normal) = if normal.dot(interior - pa) > 0.0 {
        ([a, c, b], -normal)
    } else {
        ([a, b, c], normal)
    };

    Some(Face {
        vertices: order,
        plane: Plane {
            normal,
            offset: normal.dot(pa),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Vec<DVec3> {
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push(DVec3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn test_empty_set_has_no_hull() {
        assert!(ConvexHull::new(Vec::new()).is_none());
    }

    #[test]
    fn test_cube_membership() {
        let hull = ConvexHull::new(cube()).unwrap();
        assert_eq!(hull.dimension(), 3);
        assert!(hull.contains(DVec3::splat(0.5)));
        assert!(hull.contains(DVec3::new(1.0, 0.5, 0.5)));
        assert!(hull.contains(DVec3::new(1.0, 1.0, 1.0)));
        assert!(!hull.contains(DVec3::new(1.001, 0.5, 0.5)));
        assert!(!hull.contains(DVec3::new(0.5, -0.01, 0.5)));
        assert!(!hull.contains(DVec3::splat(f64::NAN)));
    }

    #[test]
    fn test_interior_points_do_not_change_hull() {
        let mut points = cube();
        for i in 1..10 {
            let t = i as f64 / 10.0;
            points.push(DVec3::new(t, 1.0 - t, t * t));
        }
        let hull = ConvexHull::new(points.clone()).unwrap();
        for p in &points {
            assert!(hull.contains(*p), "{p:?} should be inside");
        }
        assert!(!hull.contains(DVec3::new(0.5, 0.5, 1.1)));
    }

    #[test]
    fn test_tetrahedron_face_is_a_boundary() {
        let hull = ConvexHull::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z]).unwrap();
        assert!(hull.contains(DVec3::splat(1.0 / 3.0)));
        assert!(hull.contains(DVec3::splat(0.2)));
        assert!(!hull.contains(DVec3::splat(0.34)));
    }

    #[test]
    fn test_sphere_sample() {
        // Points on a sphere surface plus the center: every point and the center
        // must be inside, points slightly outside the sphere must not be.
        let mut points = vec![DVec3::ZERO];
        for i in 0..12 {
            for j in 1..6 {
                let theta = i as f64 * std::f64::consts::TAU / 12.0;
                let phi = j as f64 * std::f64::consts::PI / 6.0;
                points.push(DVec3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                ));
            }
        }
        points.push(DVec3::Z);
        points.push(-DVec3::Z);

        let hull = ConvexHull::new(points.clone()).unwrap();
        for p in &points {
            assert!(hull.contains(*p));
        }
        assert!(!hull.contains(DVec3::new(0.0, 0.0, 1.01)));
        assert!(!hull.contains(DVec3::new(1.01, 0.0, 0.5)));
    }

    #[test]
    fn test_single_point_hull() {
        let p = DVec3::new(0.5, 0.01, -0.02);
        let hull = ConvexHull::new(vec![p, p]).unwrap();
        assert_eq!(hull.dimension(), 0);
        assert!(hull.contains(p));
        assert!(!hull.contains(p + DVec3::new(1e-6, 0.0, 0.0)));
    }

    #[test]
    fn test_segment_hull() {
        let hull = ConvexHull::new(vec![
            DVec3::new(0.2, 0.0, 0.0),
            DVec3::new(0.6, 0.0, 0.0),
            DVec3::new(0.4, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(hull.dimension(), 1);
        assert!(hull.contains(DVec3::new(0.3, 0.0, 0.0)));
        assert!(hull.contains(DVec3::new(0.6, 0.0, 0.0)));
        assert!(!hull.contains(DVec3::new(0.7, 0.0, 0.0)));
        assert!(!hull.contains(DVec3::new(0.3, 0.01, 0.0)));
    }

    #[test]
    fn test_planar_hull() {
        let hull = ConvexHull::new(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.5, 0.5, 0.0),
        ])
        .unwrap();
        assert_eq!(hull.dimension(), 2);
        assert!(hull.contains(DVec3::new(0.25, 0.75, 0.0)));
        assert!(hull.contains(DVec3::new(1.0, 0.5, 0.0)));
        assert!(!hull.contains(DVec3::new(1.1, 0.5, 0.0)));
        assert!(!hull.contains(DVec3::new(0.5, 0.5, 0.01)));
    }

    #[test]
    fn test_translated_hull() {
        let hull = ConvexHull::new(cube()).unwrap();
        let moved = hull.translated(DVec3::new(-0.5, 0.0, 0.0));
        assert!(moved.contains(DVec3::new(-0.4, 0.5, 0.5)));
        assert!(!moved.contains(DVec3::new(0.75, 0.5, 0.5)));
        assert_eq!(moved.points()[1], hull.points()[1] - DVec3::new(0.5, 0.0, 0.0));
    }
}
