// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed centripetal Catmull-Rom spline

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Samples used to build the arc-length table
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Parameter delta for finite-difference tangents
const TANGENT_DELTA: f64 = 1e-4;

/// Closed interpolating spline through a cyclic point sequence.
///
/// Segments use centripetal parametrization (knot spacing proportional to
/// the square root of chord length), which avoids cusps and self
/// intersections on unevenly spaced contours.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Point3<f64>>,
    /// Cumulative chord length at `ARC_LENGTH_DIVISIONS + 1` samples
    lengths: Vec<f64>,
}

impl CatmullRomCurve {
    /// Build a closed curve through `points` in order.
    ///
    /// Consecutive duplicates (including a last point repeating the first)
    /// are collapsed. At least two distinct points are required.
    pub fn closed(points: &[Point3<f64>]) -> Result<Self> {
        let mut unique: Vec<Point3<f64>> = Vec::with_capacity(points.len());
        for p in points {
            if unique.last() != Some(p) {
                unique.push(*p);
            }
        }
        while unique.len() > 1 && unique.first() == unique.last() {
            unique.pop();
        }
        if unique.len() < 2 {
            return Err(Error::InvalidCurve(format!(
                "closed curve needs 2 distinct points, got {}",
                unique.len()
            )));
        }

        let mut curve = Self {
            points: unique,
            lengths: Vec::new(),
        };
        curve.lengths = curve.compute_lengths();
        Ok(curve)
    }

    /// Control points after duplicate removal
    pub fn control_points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Approximate total arc length
    pub fn length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t` in `[0, 1]`; equal parameter steps are
    /// equal steps between control points, not equal arc lengths.
    pub fn point(&self, t: f64) -> Point3<f64> {
        let n = self.points.len();
        let p = n as f64 * t;
        let mut segment = p.floor() as i64;
        let weight = p - segment as f64;
        segment = segment.rem_euclid(n as i64);
        let at = |offset: i64| self.points[(segment + offset).rem_euclid(n as i64) as usize];

        let (p0, p1, p2, p3) = (at(-1), at(0), at(1), at(2));

        let mut dt0 = nalgebra::distance_squared(&p0, &p1).powf(0.25);
        let mut dt1 = nalgebra::distance_squared(&p1, &p2).powf(0.25);
        let mut dt2 = nalgebra::distance_squared(&p2, &p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let mut out = Point3::origin();
        for axis in 0..3 {
            out[axis] = nonuniform_segment(
                [p0[axis], p1[axis], p2[axis], p3[axis]],
                [dt0, dt1, dt2],
                weight,
            );
        }
        out
    }

    /// Point at normalized arc length `u` in `[0, 1]`
    pub fn point_at(&self, u: f64) -> Point3<f64> {
        self.point(self.arc_to_parameter(u))
    }

    /// Unit tangent at normalized arc length `u`
    pub fn tangent_at(&self, u: f64) -> Vector3<f64> {
        let t = self.arc_to_parameter(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        let delta = self.point(t2) - self.point(t1);
        delta.try_normalize(1e-12).unwrap_or_else(Vector3::x)
    }

    fn compute_lengths(&self) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut previous = self.point(0.0);
        let mut total = 0.0;
        lengths.push(0.0);
        for d in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(d as f64 / ARC_LENGTH_DIVISIONS as f64);
            total += nalgebra::distance(&previous, &current);
            lengths.push(total);
            previous = current;
        }
        lengths
    }

    fn arc_to_parameter(&self, u: f64) -> f64 {
        let total = self.length();
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }
        let target = u.clamp(0.0, 1.0) * total;

        // Last sample whose cumulative length is below the target
        let i = self.lengths.partition_point(|&l| l < target).saturating_sub(1);
        let i = i.min(self.lengths.len() - 2);
        let before = self.lengths[i];
        let segment = self.lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            ((target - before) / segment).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (i as f64 + fraction) / (self.lengths.len() - 1) as f64
    }
}

/// Evaluate one axis of a Catmull-Rom segment with non-uniform knots
fn nonuniform_segment(x: [f64; 4], dt: [f64; 3], w: f64) -> f64 {
    let [x0, x1, x2, x3] = x;
    let [dt0, dt1, dt2] = dt;

    let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
    let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
    t1 *= dt1;
    t2 *= dt1;

    let c0 = x1;
    let c1 = t1;
    let c2 = -3.0 * x1 + 3.0 * x2 - 2.0 * t1 - t2;
    let c3 = 2.0 * x1 - 2.0 * x2 + t1 + t2;
    c0 + w * (c1 + w * (c2 + w * c3))
}
