// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar nearest-landmark queries.
//!
//! Deformation only needs "which landmark is closest to this vertex in the
//! x/y plane". Both implementations here answer that identically, including
//! ties, which resolve to the lowest landmark index.

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Result of a nearest-point query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the point in the queried set
    pub index: usize,
    /// Squared planar distance to the query
    pub distance_sq: f64,
}

impl Neighbor {
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }

    #[inline]
    fn beats(&self, other: &Neighbor) -> bool {
        self.distance_sq < other.distance_sq
            || (self.distance_sq == other.distance_sq && self.index < other.index)
    }
}

/// Nearest-point lookup by planar (x, y) distance
pub trait NearestNeighbor {
    /// Closest point to `(x, y)`, or `None` for an empty set
    fn nearest(&self, x: f64, y: f64) -> Option<Neighbor>;
}

#[inline]
fn planar_distance_sq(p: &Point3<f64>, x: f64, y: f64) -> f64 {
    let dx = x - p.x;
    let dy = y - p.y;
    dx * dx + dy * dy
}

/// Brute-force scan over every point
#[derive(Debug, Clone, Copy)]
pub struct LinearScan<'a> {
    points: &'a [Point3<f64>],
}

impl<'a> LinearScan<'a> {
    pub fn new(points: &'a [Point3<f64>]) -> Self {
        Self { points }
    }
}

impl NearestNeighbor for LinearScan<'_> {
    fn nearest(&self, x: f64, y: f64) -> Option<Neighbor> {
        let mut best: Option<Neighbor> = None;
        for (index, p) in self.points.iter().enumerate() {
            let distance_sq = planar_distance_sq(p, x, y);
            if best.map_or(true, |b| distance_sq < b.distance_sq) {
                best = Some(Neighbor { index, distance_sq });
            }
        }
        best
    }
}

/// Rings searched before giving up on the grid and scanning linearly
const MAX_RING: i64 = 4096;

/// Uniform grid spatial hash over the x/y plane.
///
/// Queries search square rings of cells outward from the query cell and
/// stop once no unvisited cell can hold a point at least as close as the
/// best found so far.
#[derive(Debug)]
pub struct GridIndex<'a> {
    points: &'a [Point3<f64>],
    cell_size: f64,
    grid: FxHashMap<(i64, i64), SmallVec<[u32; 8]>>,
    min_cell: (i64, i64),
    max_cell: (i64, i64),
}

impl<'a> GridIndex<'a> {
    /// Bucket `points` into square cells of side `cell_size`.
    ///
    /// A non-positive or non-finite `cell_size` falls back to 1.0.
    pub fn new(points: &'a [Point3<f64>], cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let mut index = Self {
            points,
            cell_size,
            grid: FxHashMap::default(),
            min_cell: (i64::MAX, i64::MAX),
            max_cell: (i64::MIN, i64::MIN),
        };
        for (i, p) in points.iter().enumerate() {
            let cell = index.cell_coords(p.x, p.y);
            index.min_cell = (index.min_cell.0.min(cell.0), index.min_cell.1.min(cell.1));
            index.max_cell = (index.max_cell.0.max(cell.0), index.max_cell.1.max(cell.1));
            index.grid.entry(cell).or_default().push(i as u32);
        }
        index
    }

    fn cell_coords(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    fn scan_cell(&self, cell: (i64, i64), x: f64, y: f64, best: &mut Option<Neighbor>) {
        if let Some(indices) = self.grid.get(&cell) {
            for &i in indices {
                let index = i as usize;
                let candidate = Neighbor {
                    index,
                    distance_sq: planar_distance_sq(&self.points[index], x, y),
                };
                if best.map_or(true, |b| candidate.beats(&b)) {
                    *best = Some(candidate);
                }
            }
        }
    }
}

impl NearestNeighbor for GridIndex<'_> {
    fn nearest(&self, x: f64, y: f64) -> Option<Neighbor> {
        if self.points.is_empty() {
            return None;
        }

        let (cx, cy) = self.cell_coords(x, y);
        let max_ring = (cx.saturating_sub(self.min_cell.0))
            .abs()
            .max(cx.saturating_sub(self.max_cell.0).abs())
            .max(cy.saturating_sub(self.min_cell.1).abs())
            .max(cy.saturating_sub(self.max_cell.1).abs());
        if max_ring > MAX_RING {
            return LinearScan::new(self.points).nearest(x, y);
        }

        let mut best: Option<Neighbor> = None;
        for ring in 0..=max_ring {
            // Every point in this ring is at least (ring - 1) cells away
            if let Some(b) = best {
                let reach = (ring - 1).max(0) as f64 * self.cell_size;
                if b.distance_sq < reach * reach {
                    break;
                }
            }

            if ring == 0 {
                self.scan_cell((cx, cy), x, y, &mut best);
                continue;
            }
            for d in -ring..=ring {
                self.scan_cell((cx + d, cy - ring), x, y, &mut best);
                self.scan_cell((cx + d, cy + ring), x, y, &mut best);
            }
            for d in (-ring + 1)..ring {
                self.scan_cell((cx - ring, cy + d), x, y, &mut best);
                self.scan_cell((cx + ring, cy + d), x, y, &mut best);
            }
        }
        best
    }
}

/// Selects which nearest-neighbor implementation drives deformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialIndexKind {
    /// Scan every landmark per vertex
    #[default]
    Linear,
    /// Uniform grid spatial hash
    Grid,
}

impl SpatialIndexKind {
    /// Build a query structure over `points`
    pub fn build<'a>(self, points: &'a [Point3<f64>], cell_size: f64) -> Box<dyn NearestNeighbor + 'a> {
        match self {
            SpatialIndexKind::Linear => Box::new(LinearScan::new(points)),
            SpatialIndexKind::Grid => Box::new(GridIndex::new(points, cell_size)),
        }
    }
}

impl std::str::FromStr for SpatialIndexKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(SpatialIndexKind::Linear),
            "grid" => Ok(SpatialIndexKind::Grid),
            other => Err(format!("unknown spatial index '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for i in 0..20 {
            for j in 0..15 {
                let x = -0.8 + i as f64 * 0.083 + (j as f64 * 0.37).sin() * 0.01;
                let y = -0.8 + j as f64 * 0.11 + (i as f64 * 0.53).cos() * 0.01;
                points.push(Point3::new(x, y, 0.0));
            }
        }
        points
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(LinearScan::new(&[]).nearest(0.0, 0.0), None);
        assert_eq!(GridIndex::new(&[], 0.35).nearest(0.0, 0.0), None);
    }

    #[test]
    fn test_linear_finds_closest() {
        let points = [
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(1.0, 0.0, -5.0),
            Point3::new(0.2, 0.1, 0.0),
        ];
        let hit = LinearScan::new(&points).nearest(0.25, 0.1).unwrap();
        assert_eq!(hit.index, 2);
        assert!((hit.distance() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_ties_resolve_to_first_index() {
        let points = [
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ];
        assert_eq!(LinearScan::new(&points).nearest(0.0, 0.0).unwrap().index, 0);
        assert_eq!(GridIndex::new(&points, 0.35).nearest(0.0, 0.0).unwrap().index, 0);
    }

    #[test]
    fn test_grid_matches_linear_scan() {
        let points = lattice();
        let linear = LinearScan::new(&points);
        for cell_size in [0.05, 0.35, 2.0] {
            let grid = GridIndex::new(&points, cell_size);
            for qi in 0..40 {
                for qj in 0..40 {
                    let x = -1.5 + qi as f64 * 0.075;
                    let y = -1.5 + qj as f64 * 0.075;
                    assert_eq!(grid.nearest(x, y), linear.nearest(x, y), "query ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_far_query_falls_back() {
        let points = lattice();
        let grid = GridIndex::new(&points, 0.001);
        let hit = grid.nearest(1.0e6, 1.0e6).unwrap();
        assert_eq!(Some(hit), LinearScan::new(&points).nearest(1.0e6, 1.0e6));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("grid".parse::<SpatialIndexKind>(), Ok(SpatialIndexKind::Grid));
        assert_eq!(" Linear ".parse::<SpatialIndexKind>(), Ok(SpatialIndexKind::Linear));
        assert!("kd".parse::<SpatialIndexKind>().is_err());
    }
}
