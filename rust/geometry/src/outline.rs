// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-form panel outlines.
//!
//! An outline is a closed polygon of tagged points. Two consecutive `Arc`
//! points followed by a `Normal` point form an arc triplet: the circular arc
//! from the first point through the second to the third. [`densify`] replaces
//! every triplet with points sampled on that arc.

use std::f64::consts::TAU;

use cabinet_lite_core::{OutlinePointRecord, PointTag};

use crate::error::{Error, Result};
use crate::matrix::Matrix4;
use crate::vector::Vector4;

/// Samples per arc when no configuration says otherwise.
pub const DEFAULT_ARC_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutlinePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub tag: PointTag,
}

impl OutlinePoint {
    pub const fn new(x: f64, y: f64, z: f64, tag: PointTag) -> Self {
        Self { x, y, z, tag }
    }

    pub const fn normal(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, PointTag::Normal)
    }

    pub const fn arc(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, PointTag::Arc)
    }

    pub fn is_arc(&self) -> bool {
        self.tag == PointTag::Arc
    }

    pub fn to_vector(&self) -> Vector4 {
        Vector4::point(self.x, self.y, self.z)
    }

    fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<OutlinePointRecord> for OutlinePoint {
    fn from(p: OutlinePointRecord) -> Self {
        Self::new(p.x, p.y, p.z, p.tag)
    }
}

impl From<OutlinePoint> for OutlinePointRecord {
    fn from(p: OutlinePoint) -> Self {
        OutlinePointRecord {
            x: p.x,
            y: p.y,
            z: p.z,
            tag: p.tag,
        }
    }
}

/// Circle in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius: f64,
}

impl Circle {
    /// Circle through three points, found by intersecting the perpendicular
    /// bisectors of `a→b` and `b→c`. Collinear or coincident points have no
    /// such circle.
    pub fn through_points(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Result<Circle> {
        let m1 = [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5];
        let m2 = [(b[0] + c[0]) * 0.5, (b[1] + c[1]) * 0.5];
        // Bisector directions (perpendicular to each chord).
        let d1 = [-(b[1] - a[1]), b[0] - a[0]];
        let d2 = [-(c[1] - b[1]), c[0] - b[0]];

        // m1 + s*d1 = m2 + t*d2
        let det = d1[0] * (-d2[1]) - (-d2[0]) * d1[1];
        let scale = (d1[0].hypot(d1[1])) * (d2[0].hypot(d2[1]));
        if scale <= f64::EPSILON || det.abs() <= 1e-10 * scale {
            return Err(Error::DegenerateArc(a, b, c));
        }

        let rhs = [m2[0] - m1[0], m2[1] - m1[1]];
        let s = (rhs[0] * (-d2[1]) - (-d2[0]) * rhs[1]) / det;
        let center = [m1[0] + s * d1[0], m1[1] + s * d1[1]];
        let radius = (a[0] - center[0]).hypot(a[1] - center[1]);
        Ok(Circle { center, radius })
    }

    pub fn point_at(&self, angle: f64) -> [f64; 2] {
        [
            self.center[0] + self.radius * angle.cos(),
            self.center[1] + self.radius * angle.sin(),
        ]
    }

    fn angle_of(&self, p: [f64; 2]) -> f64 {
        (p[1] - self.center[1]).atan2(p[0] - self.center[0])
    }
}

/// Twice the signed area of the triangle `a, b, c`; positive when counter-clockwise.
fn signed_area2(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Samples `samples` points on the arc from `start` through `mid` to `end`,
/// endpoints included. The sweep runs counter-clockwise when the three points
/// do, clockwise otherwise.
pub fn sample_arc(
    start: &OutlinePoint,
    mid: &OutlinePoint,
    end: &OutlinePoint,
    samples: usize,
) -> Result<Vec<OutlinePoint>> {
    if samples < 2 {
        return Err(Error::InvalidSampleCount(samples));
    }
    let circle = Circle::through_points(start.xy(), mid.xy(), end.xy())?;

    let from = circle.angle_of(start.xy());
    let to = circle.angle_of(end.xy());
    let sweep = if signed_area2(start.xy(), mid.xy(), end.xy()) > 0.0 {
        ccw_span(from, to)
    } else {
        -ccw_span(to, from)
    };

    let last = samples - 1;
    let points = (0..samples)
        .map(|i| {
            if i == 0 {
                return OutlinePoint::new(start.x, start.y, start.z, PointTag::Normal);
            }
            if i == last {
                return OutlinePoint::new(end.x, end.y, end.z, PointTag::Normal);
            }
            let [x, y] = circle.point_at(from + sweep * (i as f64 / last as f64));
            OutlinePoint::new(x, y, start.z, PointTag::Normal)
        })
        .collect();
    Ok(points)
}

/// Counter-clockwise angle from `from` to `to`, in `(0, 2π]`.
fn ccw_span(from: f64, to: f64) -> f64 {
    let span = (to - from).rem_euclid(TAU);
    if span == 0.0 {
        TAU
    } else {
        span
    }
}

fn is_triplet(points: &[OutlinePoint], i: usize) -> bool {
    let n = points.len();
    points[i].is_arc() && points[(i + 1) % n].is_arc() && !points[(i + 2) % n].is_arc()
}

/// Replaces every arc triplet with `samples` points on its arc. Triplets may
/// wrap past the end of the list. Sampled points are tagged `Normal`, so a
/// densified outline densifies to itself.
pub fn densify(points: &[OutlinePoint], samples: usize) -> Result<Vec<OutlinePoint>> {
    let n = points.len();
    if n < 3 {
        return Ok(points.to_vec());
    }

    let mut out = Vec::with_capacity(n + samples);
    let mut i = 0;
    while i < n {
        if is_triplet(points, i) {
            let arc = sample_arc(&points[i], &points[(i + 1) % n], &points[(i + 2) % n], samples)?;
            // A wrapped triplet reuses points already emitted at the front.
            let wrapped = (i + 3).saturating_sub(n);
            out.drain(..wrapped.min(out.len()));
            out.extend(arc);
            i += 3;
        } else {
            out.push(points[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Counter-clockwise rectangle `(0,0) (w,0) (w,d) (0,d)`.
pub fn rectangle(width: f64, depth: f64) -> Vec<OutlinePoint> {
    vec![
        OutlinePoint::normal(0.0, 0.0),
        OutlinePoint::normal(width, 0.0),
        OutlinePoint::normal(width, depth),
        OutlinePoint::normal(0.0, depth),
    ]
}

/// XY bounding rectangle as `(min, max)`.
pub fn bounding_rect_xy(points: &[OutlinePoint]) -> Option<([f64; 2], [f64; 2])> {
    let first = points.first()?;
    let init = ([first.x, first.y], [first.x, first.y]);
    Some(points.iter().fold(init, |(min, max), p| {
        ([min[0].min(p.x), min[1].min(p.y)], [max[0].max(p.x), max[1].max(p.y)])
    }))
}

/// Rotates the outline about the center of its XY bounding rectangle.
pub fn rotate_about_center(points: &[OutlinePoint], degrees: f64) -> Vec<OutlinePoint> {
    let Some((min, max)) = bounding_rect_xy(points) else {
        return Vec::new();
    };
    let m = Matrix4::rotation_z_about(degrees, (min[0] + max[0]) * 0.5, (min[1] + max[1]) * 0.5);
    transform_points(points, &m)
}

/// Applies `m` to every point, keeping tags.
pub fn transform_points(points: &[OutlinePoint], m: &Matrix4) -> Vec<OutlinePoint> {
    points
        .iter()
        .map(|p| {
            let v = m.transform(&p.to_vector());
            OutlinePoint::new(v.x, v.y, v.z, p.tag)
        })
        .collect()
}

/// Ear-clipping triangulation of a densified outline in the XY plane.
/// Returns triangle indices into `points`.
pub fn triangulate(points: &[OutlinePoint]) -> Result<Vec<usize>> {
    if points.len() < 3 {
        return Err(Error::TriangulationError(format!(
            "outline needs at least 3 points, got {}",
            points.len()
        )));
    }

    let mut vertices = Vec::with_capacity(points.len() * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    earcutr::earcut(&vertices, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}
