//! Uniform-grid spatial hash over active enemies.

use std::collections::HashMap;

use rampart_core::types::{EnemyId, Vec2};

/// Rebuilt every tick after enemy movement. Queries visit cells in a fixed
/// order and each cell in insertion order, so results are deterministic.
#[derive(Debug)]
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<(EnemyId, Vec2)>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, id: EnemyId, position: Vec2) {
        let coords = self.cell_coords(position);
        self.cells.entry(coords).or_default().push((id, position));
    }

    /// Enemies whose indexed position is within `radius` of `center`
    /// (boundary inclusive), with their positions.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<(EnemyId, Vec2)> {
        let min = self.cell_coords(center - Vec2::splat(radius));
        let max = self.cell_coords(center + Vec2::splat(radius));
        let mut result = Vec::new();
        for y in min.1..=max.1 {
            for x in min.0..=max.0 {
                if let Some(bucket) = self.cells.get(&(x, y)) {
                    result.extend(
                        bucket
                            .iter()
                            .filter(|(_, pos)| pos.distance(center) <= radius)
                            .copied(),
                    );
                }
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_coords(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }
}
