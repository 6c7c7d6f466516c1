//! A* pathfinding on the navigation grid
//!
//! Searches a 4- or 8-connected grid of cells. The open set is a binary heap
//! keyed by `f = g + h`, with ties broken by insertion order so that equal
//! inputs always yield the same route.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::{Cell, GridIndex, Terrain};

/// Which moves the search may take from a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Orthogonal moves only, each costing 1
    #[default]
    Four,
    /// Orthogonal plus diagonal moves; diagonals cost sqrt(2) and may not
    /// cut past a blocked corner
    Eight,
}

impl Connectivity {
    fn heuristic(self, from: Cell, to: Cell) -> f32 {
        let dx = from.x.abs_diff(to.x) as f32;
        let dz = from.z.abs_diff(to.z) as f32;
        match self {
            Connectivity::Four => dx + dz,
            Connectivity::Eight => dx.max(dz) + (SQRT_2 - 1.0) * dx.min(dz),
        }
    }
}

/// A route of cells from start to goal, both inclusive.
///
/// An empty path means the goal could not be reached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    cells: Vec<Cell>,
    /// Total traversal cost
    cost: f32,
}

impl Path {
    /// An unreachable result
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if no route was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells, including the start
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Number of moves between cells
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    #[must_use]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// A* node for priority queue
#[derive(Debug, Clone, Copy)]
struct Node {
    cell: Cell,
    g_cost: f32,
    f_cost: f32,
    /// Insertion sequence, for stable tie-breaking
    seq: u64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap: lowest f first, then earliest inserted
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grid A* search.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder {
    pub connectivity: Connectivity,
}

impl PathFinder {
    #[must_use]
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// Walkable neighbours of a cell with their step costs, in the fixed
    /// order +x, -x, +z, -z, then diagonals.
    fn neighbors<T: Terrain>(
        &self,
        grid: &GridIndex<T>,
        cell: Cell,
    ) -> SmallVec<[(Cell, f32); 8]> {
        let mut result = SmallVec::new();

        for (dx, dz) in Cell::ORTHOGONAL {
            let next = cell.offset(dx, dz);
            if grid.is_walkable(next) {
                result.push((next, 1.0));
            }
        }

        if self.connectivity == Connectivity::Eight {
            for (dx, dz) in Cell::DIAGONAL {
                let next = cell.offset(dx, dz);
                if grid.is_walkable(next)
                    && grid.is_walkable(cell.offset(dx, 0))
                    && grid.is_walkable(cell.offset(0, dz))
                {
                    result.push((next, SQRT_2));
                }
            }
        }

        result
    }

    /// Find the cheapest route from `start` to `goal`.
    ///
    /// Returns an empty path when the goal is outside the grid, not
    /// walkable, or enclosed. `start == goal` yields a one-cell path. The
    /// start cell itself need not be walkable, so an agent standing on a
    /// freshly painted obstacle can still walk off it.
    #[must_use]
    pub fn find_path<T: Terrain>(&self, grid: &GridIndex<T>, start: Cell, goal: Cell) -> Path {
        if !grid.contains(start) || !grid.is_walkable(goal) {
            return Path::empty();
        }

        if start == goal {
            return Path {
                cells: vec![start],
                cost: 0.0,
            };
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
        let mut g_score: FxHashMap<Cell, f32> = FxHashMap::default();
        let mut seq = 0u64;

        g_score.insert(start, 0.0);
        open_set.push(Node {
            cell: start,
            g_cost: 0.0,
            f_cost: self.connectivity.heuristic(start, goal),
            seq,
        });

        while let Some(current) = open_set.pop() {
            if current.cell == goal {
                return Path {
                    cells: reconstruct(&came_from, goal),
                    cost: current.g_cost,
                };
            }

            // Skip entries superseded by a cheaper re-queue
            if current.g_cost > g_score.get(&current.cell).copied().unwrap_or(f32::MAX) {
                continue;
            }

            for (next, step) in self.neighbors(grid, current.cell) {
                let tentative_g = current.g_cost + step;

                if tentative_g < g_score.get(&next).copied().unwrap_or(f32::MAX) {
                    came_from.insert(next, current.cell);
                    g_score.insert(next, tentative_g);

                    seq += 1;
                    open_set.push(Node {
                        cell: next,
                        g_cost: tentative_g,
                        f_cost: tentative_g + self.connectivity.heuristic(next, goal),
                        seq,
                    });
                }
            }
        }

        log::debug!("No path from {start} to {goal}");
        Path::empty()
    }
}

/// Walk `came_from` back from the goal and reverse
fn reconstruct(came_from: &FxHashMap<Cell, Cell>, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut curr = goal;

    while let Some(&prev) = came_from.get(&curr) {
        path.push(prev);
        curr = prev;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileMap;

    fn open_grid(divisions: u32) -> GridIndex<TileMap> {
        GridIndex::new(divisions as f32, TileMap::open(divisions))
    }

    fn block(grid: &mut GridIndex<TileMap>, cells: &[(i32, i32)]) {
        for &(x, z) in cells {
            grid.terrain_mut().set_blocked(Cell::new(x, z), true);
        }
    }

    fn assert_sound(grid: &GridIndex<TileMap>, path: &Path, connectivity: Connectivity) {
        for cell in path.cells() {
            assert!(grid.is_walkable(*cell), "path crosses blocked cell {cell}");
        }
        for pair in path.cells().windows(2) {
            let adjacent = match connectivity {
                Connectivity::Four => pair[0].is_orthogonal_neighbor(pair[1]),
                Connectivity::Eight => pair[0].is_neighbor(pair[1]),
            };
            assert!(adjacent, "{} and {} are not adjacent", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_open_grid_scenario() {
        let grid = open_grid(10);
        let path = PathFinder::default().find_path(&grid, Cell::new(0, 0), Cell::new(3, 4));

        let expected: Vec<Cell> = [(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (3, 3), (3, 4)]
            .into_iter()
            .map(Cell::from)
            .collect();
        assert_eq!(path.cells(), expected.as_slice());
        assert_eq!(path.len(), 8);
        assert_eq!(path.steps(), 7);
        assert_eq!(path.cost(), 7.0);
    }

    #[test]
    fn test_optimal_on_open_grid() {
        let grid = open_grid(12);
        let finder = PathFinder::default();

        for (start, goal) in [
            ((0, 0), (11, 11)),
            ((5, 5), (0, 9)),
            ((11, 0), (0, 0)),
            ((3, 7), (3, 2)),
            ((6, 1), (2, 10)),
        ] {
            let (start, goal) = (Cell::from(start), Cell::from(goal));
            let path = finder.find_path(&grid, start, goal);

            assert_eq!(path.steps() as u32, start.manhattan(goal));
            assert_eq!(path.cells().first(), Some(&start));
            assert_eq!(path.goal(), Some(goal));
            assert_sound(&grid, &path, Connectivity::Four);
        }
    }

    #[test]
    fn test_routes_around_wall() {
        let mut grid = open_grid(10);
        let wall: Vec<(i32, i32)> = (2..8).map(|z| (5, z)).collect();
        block(&mut grid, &wall);

        let path = PathFinder::default().find_path(&grid, Cell::new(2, 5), Cell::new(8, 5));

        assert!(!path.is_empty());
        assert_sound(&grid, &path, Connectivity::Four);
        // Straight line would be 6 steps; the detour adds at least 6 more
        assert!(path.steps() >= 12);
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut grid = open_grid(5);
        block(&mut grid, &[(3, 2), (3, 4), (2, 3), (4, 3)]);

        let path = PathFinder::default().find_path(&grid, Cell::new(0, 0), Cell::new(3, 3));
        assert!(path.is_empty());

        let path =
            PathFinder::new(Connectivity::Eight).find_path(&grid, Cell::new(0, 0), Cell::new(3, 3));
        assert!(path.is_empty());
    }

    #[test]
    fn test_blocked_goal_is_unreachable() {
        let mut grid = open_grid(10);
        block(&mut grid, &[(3, 4)]);

        let path = PathFinder::default().find_path(&grid, Cell::new(0, 0), Cell::new(3, 4));
        assert!(path.is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = open_grid(10);
        let finder = PathFinder::default();

        assert!(finder.find_path(&grid, Cell::new(0, 0), Cell::new(10, 0)).is_empty());
        assert!(finder.find_path(&grid, Cell::new(-1, 0), Cell::new(2, 2)).is_empty());
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(10);
        let path = PathFinder::default().find_path(&grid, Cell::new(4, 4), Cell::new(4, 4));

        assert_eq!(path.cells(), &[Cell::new(4, 4)]);
        assert_eq!(path.steps(), 0);
    }

    #[test]
    fn test_can_leave_blocked_start() {
        let mut grid = open_grid(6);
        block(&mut grid, &[(2, 2)]);

        let path = PathFinder::default().find_path(&grid, Cell::new(2, 2), Cell::new(4, 2));
        assert_eq!(path.steps(), 2);
    }

    #[test]
    fn test_deterministic() {
        let mut grid = open_grid(16);
        block(&mut grid, &[(4, 3), (4, 4), (4, 5), (8, 10), (9, 10), (10, 10)]);
        let finder = PathFinder::default();

        let first = finder.find_path(&grid, Cell::new(0, 4), Cell::new(15, 12));
        for _ in 0..5 {
            assert_eq!(finder.find_path(&grid, Cell::new(0, 4), Cell::new(15, 12)), first);
        }
    }

    #[test]
    fn test_eight_connected_diagonal() {
        let grid = open_grid(10);
        let path =
            PathFinder::new(Connectivity::Eight).find_path(&grid, Cell::new(0, 0), Cell::new(3, 3));

        assert_eq!(path.steps(), 3);
        assert!((path.cost() - 3.0 * SQRT_2).abs() < 1e-4);
        assert_sound(&grid, &path, Connectivity::Eight);
    }

    #[test]
    fn test_eight_connected_no_corner_cutting() {
        let mut grid = open_grid(4);
        block(&mut grid, &[(1, 0)]);

        let path =
            PathFinder::new(Connectivity::Eight).find_path(&grid, Cell::new(0, 0), Cell::new(1, 1));

        // Diagonal would clip the blocked corner, so go around via (0, 1)
        assert_eq!(path.cells(), &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)]);
    }

    #[test]
    fn test_large_maze_terminates() {
        let mut grid = open_grid(40);
        // Serpentine walls with alternating gaps
        for x in (2..38).step_by(4) {
            for z in 0..40 {
                let gap = if (x / 4) % 2 == 0 { 39 } else { 0 };
                if z != gap {
                    grid.terrain_mut().set_blocked(Cell::new(x, z), true);
                }
            }
        }

        let path = PathFinder::default().find_path(&grid, Cell::new(0, 0), Cell::new(39, 39));
        assert!(!path.is_empty());
        assert_sound(&grid, &path, Connectivity::Four);
    }
}
