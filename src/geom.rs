//! Geometry kernel: points, rotations, polygon centroid/offset/containment.
//!
//! Everything here is pure. Angles are radians, clockwise on screen (y grows
//! downward). Polygons are vertex slices with an implicit closing edge.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::TAU;

use crate::consts::GEOM_EPSILON;

/// A point in either viewport (screen) or logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn relative_to(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }

    #[must_use]
    pub fn dist_sq(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// Axis-aligned bounds of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }
}

/// Rotate `p` about `pivot` by `angle` radians.
#[must_use]
pub fn rotate_about(p: Point, pivot: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point {
        x: dx.mul_add(cos, -dy * sin) + pivot.x,
        y: dx.mul_add(sin, dy * cos) + pivot.y,
    }
}

/// Axis-aligned bounds of `polygon`, or `None` when it is empty.
#[must_use]
pub fn bounds(polygon: &[Point]) -> Option<Bounds> {
    let first = *polygon.first()?;
    let mut b = Bounds { min: first, max: first };
    for p in &polygon[1..] {
        b.min.x = b.min.x.min(p.x);
        b.min.y = b.min.y.min(p.y);
        b.max.x = b.max.x.max(p.x);
        b.max.y = b.max.y.max(p.y);
    }
    Some(b)
}

/// Twice the signed shoelace area. Positive for clockwise-on-screen winding.
#[must_use]
pub fn signed_area2(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x.mul_add(b.y, -(b.x * a.y))
        })
        .sum()
}

/// Area-weighted centroid of a simple polygon.
///
/// A degenerate (near-zero area) polygon falls back to its bounding-box
/// midpoint; an empty one to the origin.
#[must_use]
pub fn centroid(polygon: &[Point]) -> Point {
    let n = polygon.len();
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let cross = a.x.mul_add(b.y, -(b.x * a.y));
        area2 += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if area2.abs() < GEOM_EPSILON {
        return bounds(polygon).map_or_else(Point::default, |b| b.midpoint());
    }

    // area = area2 / 2, so 6 * area = 3 * area2.
    Point::new(cx / (3.0 * area2), cy / (3.0 * area2))
}

/// Left-hand unit normal of the edge `a -> b`, or zero for a zero-length edge.
fn edge_normal(a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len < GEOM_EPSILON {
        return Point::default();
    }
    Point::new(-dy / len, dx / len)
}

/// Push every vertex of `polygon` outward by `padding` along the averaged
/// normal of its two adjacent edges.
///
/// Winding is detected from the signed area so the result always grows the
/// shape. Degenerate edges contribute a zero normal.
#[must_use]
pub fn outer_offset(polygon: &[Point], padding: f64) -> Vec<Point> {
    let n = polygon.len();
    if n < 2 {
        return polygon.to_vec();
    }
    // Left-hand normals point outward for counter-clockwise-on-screen winding.
    let sign = if signed_area2(polygon) > 0.0 { -1.0 } else { 1.0 };

    (0..n)
        .map(|i| {
            let current = polygon[i];
            let prev = polygon[(i + n - 1) % n];
            let next = polygon[(i + 1) % n];

            let n1 = edge_normal(prev, current);
            let n2 = edge_normal(current, next);
            let avg = Point::new((n1.x + n2.x) * 0.5, (n1.y + n2.y) * 0.5);
            let len = avg.x.hypot(avg.y);
            if len < GEOM_EPSILON {
                return current;
            }
            let k = sign * padding / len;
            current.offset(avg.x * k, avg.y * k)
        })
        .collect()
}

/// Even-odd ray casting. Points exactly on the boundary may go either way.
#[must_use]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[must_use]
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    p.dist_sq(center) <= radius * radius
}

/// Corners of a `w` x `h` rectangle centered on the origin: TL, TR, BR, BL.
#[must_use]
pub fn rect_corners(w: f64, h: f64) -> [Point; 4] {
    let hw = w * 0.5;
    let hh = h * 0.5;
    [Point::new(-hw, -hh), Point::new(hw, -hh), Point::new(hw, hh), Point::new(-hw, hh)]
}

/// Rotate handle: `offset` above the top-edge midpoint, turned with the shape.
///
/// `center`, `half_height`, and `offset` share one unit system; callers in
/// logical space hit-test against it directly and multiply by the viewport
/// scale only when drawing.
#[must_use]
pub fn rotate_handle_anchor(center: Point, half_height: f64, angle: f64, offset: f64) -> Point {
    let unrotated = Point::new(center.x, center.y - half_height - offset);
    rotate_about(unrotated, center, angle)
}

/// Index of the first corner within `tolerance` of `local`, if any.
#[must_use]
pub fn corner_hit(local: Point, corners: &[Point], tolerance: f64) -> Option<usize> {
    corners
        .iter()
        .position(|c| point_in_circle(local, *c, tolerance))
}

/// Signed angle swept from `pivot -> from` to `pivot -> to`, in `(-PI, PI]`.
#[must_use]
pub fn angle_between(pivot: Point, from: Point, to: Point) -> f64 {
    let a0 = (from.y - pivot.y).atan2(from.x - pivot.x);
    let a1 = (to.y - pivot.y).atan2(to.x - pivot.x);
    let mut delta = a1 - a0;
    if delta > std::f64::consts::PI {
        delta -= TAU;
    } else if delta <= -std::f64::consts::PI {
        delta += TAU;
    }
    delta
}

/// Wrap an angle into `[0, 2PI)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Round to two decimal places.
#[must_use]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
