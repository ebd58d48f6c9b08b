//! Uniform-grid broad phase for particle links.
//!
//! The grid is rebuilt from scratch every frame. With the cell size equal to
//! the link distance, every pair closer than that distance sits in the same
//! cell or in two adjacent cells, so only a 3x3 neighbourhood needs checking.
//! Visiting the cell itself plus half of its neighbours (right, bottom-left,
//! bottom, bottom-right) reaches each unordered pair exactly once.

use std::collections::HashMap;

use glam::Vec2;

/// Neighbour offsets (column, row) that together cover each adjacent cell pair once.
const HALF_NEIGHBOURHOOD: [(i32, i32); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

/// Sparse map from cell (column, row) to the indices of the points inside it.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell that contains `position`.
    pub fn cell_of(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Drop the previous frame's contents and bucket `positions` by cell.
    /// Cell vectors keep their allocation between frames.
    pub fn rebuild(&mut self, positions: &[Vec2]) {
        self.cells.retain(|_, indices| {
            let used = !indices.is_empty();
            indices.clear();
            used
        });
        for (i, &p) in positions.iter().enumerate() {
            let cell = self.cell_of(p);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    /// Indices bucketed into `cell` this frame.
    pub fn cell(&self, cell: (i32, i32)) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of points bucketed this frame.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f(i, j, distance)` once for every unordered pair with
    /// distance < `max_distance`. `positions` must be the slice passed to
    /// the last [`rebuild`](Self::rebuild), and `max_distance` must not exceed the cell size.
    pub fn for_each_pair(&self, positions: &[Vec2], max_distance: f32, mut f: impl FnMut(usize, usize, f32)) {
        debug_assert!(max_distance <= self.cell_size);
        let max_sq = max_distance * max_distance;

        let mut check = |i: usize, j: usize| {
            let dist_sq = positions[i].distance_squared(positions[j]);
            if dist_sq < max_sq {
                f(i, j, dist_sq.sqrt());
            }
        };

        for (&(col, row), here) in &self.cells {
            for (k, &i) in here.iter().enumerate() {
                for &j in &here[k + 1..] {
                    check(i, j);
                }
            }

            for (dc, dr) in HALF_NEIGHBOURHOOD {
                let Some(there) = self.cells.get(&(col + dc, row + dr)) else {
                    continue;
                };
                for &i in here {
                    for &j in there {
                        check(i, j);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{RandomSource, Rng};
    use std::collections::BTreeSet;

    fn normalized(i: usize, j: usize) -> (usize, usize) {
        if i < j { (i, j) } else { (j, i) }
    }

    fn brute_force_pairs(positions: &[Vec2], max_distance: f32) -> BTreeSet<(usize, usize)> {
        let mut pairs = BTreeSet::new();
        for i in 0..positions.len() {
            for j in i + 1..positions.len() {
                if positions[i].distance_squared(positions[j]) < max_distance * max_distance {
                    pairs.insert((i, j));
                }
            }
        }
        pairs
    }

    fn grid_pairs(positions: &[Vec2], max_distance: f32) -> (BTreeSet<(usize, usize)>, usize) {
        let mut grid = SpatialGrid::new(max_distance);
        grid.rebuild(positions);
        let mut pairs = BTreeSet::new();
        let mut visits = 0;
        grid.for_each_pair(positions, max_distance, |i, j, _| {
            visits += 1;
            pairs.insert(normalized(i, j));
        });
        (pairs, visits)
    }

    fn random_positions(seed: u64, count: usize, bounds: Vec2) -> Vec<Vec2> {
        let mut rng = Rng::new(seed);
        (0..count)
            .map(|_| Vec2::new(rng.range(0.0, bounds.x), rng.range(0.0, bounds.y)))
            .collect()
    }

    #[test]
    fn matches_brute_force_on_random_field() {
        for seed in [1, 42, 1234, 98765] {
            let positions = random_positions(seed, 150, Vec2::new(800.0, 600.0));
            let (pairs, visits) = grid_pairs(&positions, 120.0);
            let expected = brute_force_pairs(&positions, 120.0);
            assert!(!expected.is_empty());
            assert_eq!(pairs, expected, "seed {}", seed);
            assert_eq!(visits, expected.len(), "each pair must be reported exactly once");
        }
    }

    #[test]
    fn matches_brute_force_with_points_on_edges() {
        let mut positions = random_positions(7, 60, Vec2::new(400.0, 300.0));
        // Exact cell boundaries and surface corners.
        positions.extend([
            Vec2::new(0.0, 0.0),
            Vec2::new(120.0, 120.0),
            Vec2::new(240.0, 0.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(119.9, 120.1),
        ]);
        let (pairs, visits) = grid_pairs(&positions, 120.0);
        let expected = brute_force_pairs(&positions, 120.0);
        assert_eq!(pairs, expected);
        assert_eq!(visits, expected.len());
    }

    #[test]
    fn two_close_particles_report_distance() {
        let positions = [Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0)];
        let mut grid = SpatialGrid::new(120.0);
        grid.rebuild(&positions);
        let mut seen = Vec::new();
        grid.for_each_pair(&positions, 120.0, |i, j, d| seen.push((normalized(i, j), d)));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, (0, 1));
        assert!((seen[0].1 - 50.0).abs() < 1e-4);
    }

    #[test]
    fn diagonal_neighbours_across_bottom_left_are_found() {
        // (130, 110) is in cell (1, 0); (110, 130) is in cell (0, 1).
        let positions = [Vec2::new(130.0, 110.0), Vec2::new(110.0, 130.0)];
        let (pairs, _) = grid_pairs(&positions, 120.0);
        assert!(pairs.contains(&(0, 1)));
    }

    #[test]
    fn every_point_lands_in_exactly_one_cell() {
        let positions = random_positions(11, 80, Vec2::new(500.0, 500.0));
        let mut grid = SpatialGrid::new(100.0);
        grid.rebuild(&positions);
        assert_eq!(grid.len(), positions.len());
        for (i, p) in positions.iter().enumerate() {
            assert!(grid.cell(grid.cell_of(*p)).contains(&i));
        }
    }

    #[test]
    fn rebuild_forgets_previous_frame() {
        let mut grid = SpatialGrid::new(50.0);
        grid.rebuild(&[Vec2::new(10.0, 10.0), Vec2::new(400.0, 400.0)]);
        grid.rebuild(&[Vec2::new(60.0, 60.0)]);
        assert_eq!(grid.len(), 1);
        assert!(grid.cell((0, 0)).is_empty());
        assert_eq!(grid.cell((1, 1)), &[0]);
    }

    #[test]
    fn empty_grid_yields_no_pairs() {
        let (pairs, visits) = grid_pairs(&[], 120.0);
        assert!(pairs.is_empty());
        assert_eq!(visits, 0);
    }
}
