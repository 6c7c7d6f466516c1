//! World/cell coordinate mapping

use glam::{Vec2, Vec3};

use super::{Cell, Terrain, TileType};

/// Coordinate and query facade over a square, origin-centred grid.
///
/// The grid spans `[-size/2, size/2]` on both X and Z, split into
/// `divisions` cells per side. Cell `(0, 0)` sits at the `-X, -Z` corner,
/// matching how the terrain mesh lays out its tiles.
#[derive(Debug, Clone)]
pub struct GridIndex<T: Terrain> {
    /// World extent of one side
    size: f32,
    /// Cell size in world units
    cell_size: f32,
    terrain: T,
}

impl<T: Terrain> GridIndex<T> {
    /// Create an index over `terrain`, which fixes the number of divisions
    #[must_use]
    pub fn new(size: f32, terrain: T) -> Self {
        let divisions = terrain.divisions().max(1);
        Self {
            size,
            cell_size: size / divisions as f32,
            terrain,
        }
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub fn divisions(&self) -> u32 {
        self.terrain.divisions()
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[must_use]
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut T {
        &mut self.terrain
    }

    fn half_extent(&self) -> f32 {
        self.size * 0.5
    }

    /// Map a world position to the cell containing it.
    ///
    /// The result may lie outside the grid; use [`GridIndex::contains`].
    #[must_use]
    pub fn world_to_cell(&self, point: Vec3) -> Cell {
        let local = Vec2::new(point.x, point.z) + Vec2::splat(self.half_extent());
        Cell::new(
            (local.x / self.cell_size).floor() as i32,
            (local.y / self.cell_size).floor() as i32,
        )
    }

    /// World position of a cell centre, at the terrain height
    #[must_use]
    pub fn cell_center_world(&self, cell: Cell) -> Vec3 {
        let half = self.half_extent();
        Vec3::new(
            (cell.x as f32 + 0.5) * self.cell_size - half,
            self.terrain.height_at(cell),
            (cell.z as f32 + 0.5) * self.cell_size - half,
        )
    }

    /// Whether the cell lies inside the grid
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        let d = self.divisions() as i32;
        cell.x >= 0 && cell.z >= 0 && cell.x < d && cell.z < d
    }

    /// Whether a world position lies over the grid
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x.is_finite() && point.z.is_finite() && self.contains(self.world_to_cell(point))
    }

    /// Whether an agent may enter the cell. Out-of-range cells are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.contains(cell) && self.terrain.is_walkable(cell)
    }

    #[must_use]
    pub fn tile_type_at(&self, cell: Cell) -> Option<TileType> {
        if !self.contains(cell) {
            return None;
        }
        self.terrain.tile_type_at(cell)
    }

    /// Ground height at a cell centre
    #[must_use]
    pub fn height_at(&self, cell: Cell) -> f32 {
        self.terrain.height_at(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileMap;

    fn grid(size: f32, divisions: u32) -> GridIndex<TileMap> {
        GridIndex::new(size, TileMap::open(divisions))
    }

    #[test]
    fn test_world_to_cell_corners() {
        let grid = grid(10.0, 10);

        assert_eq!(grid.world_to_cell(Vec3::new(-5.0, 0.0, -5.0)), Cell::new(0, 0));
        assert_eq!(grid.world_to_cell(Vec3::new(-4.01, 0.0, -4.99)), Cell::new(0, 0));
        assert_eq!(grid.world_to_cell(Vec3::new(0.0, 0.0, 0.0)), Cell::new(5, 5));
        assert_eq!(grid.world_to_cell(Vec3::new(4.99, 0.0, 4.99)), Cell::new(9, 9));
        assert_eq!(grid.world_to_cell(Vec3::new(-5.5, 0.0, 0.0)), Cell::new(-1, 5));
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let grid = grid(100.0, 40);

        for x in 0..40 {
            for z in [0, 7, 39] {
                let cell = Cell::new(x, z);
                let center = grid.cell_center_world(cell);
                assert_eq!(grid.world_to_cell(center), cell);
                assert_eq!(grid.cell_center_world(grid.world_to_cell(center)), center);
            }
        }
    }

    #[test]
    fn test_cell_center_offsets() {
        let grid = grid(10.0, 10);
        let center = grid.cell_center_world(Cell::new(0, 0));
        assert!((center - Vec3::new(-4.5, 0.0, -4.5)).length() < 1e-5);
    }

    #[test]
    fn test_out_of_range_is_not_walkable() {
        let grid = grid(10.0, 10);

        assert!(grid.is_walkable(Cell::new(0, 0)));
        assert!(!grid.is_walkable(Cell::new(10, 0)));
        assert!(!grid.is_walkable(Cell::new(0, -1)));
        assert!(!grid.is_walkable(Cell::new(i32::MAX, i32::MIN)));
        assert_eq!(grid.tile_type_at(Cell::new(-3, 3)), None);
    }

    #[test]
    fn test_contains_point() {
        let grid = grid(10.0, 10);

        assert!(grid.contains_point(Vec3::new(1.0, 3.0, -2.0)));
        assert!(!grid.contains_point(Vec3::new(6.0, 0.0, 0.0)));
        assert!(!grid.contains_point(Vec3::new(f32::NAN, 0.0, 0.0)));
    }

    #[test]
    fn test_height_follows_terrain() {
        let mut map = TileMap::open(4);
        map.set_height(Cell::new(2, 1), 1.5);
        let grid = GridIndex::new(4.0, map);

        assert_eq!(grid.cell_center_world(Cell::new(2, 1)).y, 1.5);
        assert_eq!(grid.cell_center_world(Cell::new(1, 1)).y, 0.0);
    }
}
