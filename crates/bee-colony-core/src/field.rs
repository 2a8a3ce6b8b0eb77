use crate::constants::{HIVE_SIDE, PLACEMENT_MAX_RETRIES};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::collections::HashMap;
use std::{error::Error, fmt};

/// Occupant tag for a single field cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Hive,
    Flower,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Random placement could not find a free cell within the retry cap.
    /// Indicates the field is too small or too crowded for its resource
    /// density; treat as a fatal configuration error.
    PlacementExhausted { retries: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::PlacementExhausted { retries } => {
                write!(f, "no free cell found after {retries} placement attempts")
            }
        }
    }
}

impl Error for FieldError {}

/// Bounded 2D resource field: grid occupancy plus per-flower nectar
/// bookkeeping.
///
/// The nectar map tracks depletion independently of the occupant tag. A
/// depleted flower stays tagged on the grid (untracked in the map) until
/// [`SpatialField::clear_depleted_flower`] removes it, so an agent still
/// standing on the cell never sees it vanish mid-collection. Clearing
/// spawns exactly one replacement flower, keeping the count of
/// flower-tagged cells constant for the run's lifetime.
#[derive(Clone, Debug)]
pub struct SpatialField {
    size: usize,
    cells: Vec<Cell>,
    flowers: HashMap<(usize, usize), u32>,
    flower_nectar: u32,
}

impl SpatialField {
    pub fn new(size: usize, flower_nectar: u32) -> Self {
        assert!(size >= HIVE_SIDE, "field must fit the hive footprint");
        assert!(flower_nectar > 0, "flower_nectar must be positive");
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            flowers: HashMap::new(),
            flower_nectar,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_valid_position(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// Bounds-checked occupancy query; `None` for out-of-bounds coordinates.
    pub fn get_cell(&self, x: isize, y: isize) -> Option<Cell> {
        if !self.is_valid_position(x, y) {
            return None;
        }
        Some(self.cells[y as usize * self.size + x as usize])
    }

    /// Remaining nectar at a cell; 0 for anything but a tracked flower.
    pub fn nectar_at(&self, pos: (usize, usize)) -> u32 {
        self.flowers.get(&pos).copied().unwrap_or(0)
    }

    /// Whether the cell holds a flower that still has nectar to give.
    pub fn has_active_flower(&self, pos: (usize, usize)) -> bool {
        self.cell_at(pos) == Some(Cell::Flower) && self.nectar_at(pos) > 0
    }

    /// Count of flower-tagged cells. Conserved across depletion/respawn.
    pub fn flower_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Flower).count()
    }

    /// Count of flowers still carrying nectar.
    pub fn tracked_flower_count(&self) -> usize {
        self.flowers.len()
    }

    /// Select a random all-empty 2x2 block, mark it `Hive`, and return its
    /// top-left corner.
    pub fn place_hive(&mut self, rng: &mut ChaCha12Rng) -> Result<(usize, usize), FieldError> {
        let span = self.size - HIVE_SIDE + 1;
        for _ in 0..PLACEMENT_MAX_RETRIES {
            let cx = rng.random_range(0..span);
            let cy = rng.random_range(0..span);
            let block_free = (0..HIVE_SIDE).all(|dx| {
                (0..HIVE_SIDE).all(|dy| self.cell_at((cx + dx, cy + dy)) == Some(Cell::Empty))
            });
            if block_free {
                for dx in 0..HIVE_SIDE {
                    for dy in 0..HIVE_SIDE {
                        self.set_cell((cx + dx, cy + dy), Cell::Hive);
                    }
                }
                return Ok((cx, cy));
            }
        }
        Err(FieldError::PlacementExhausted {
            retries: PLACEMENT_MAX_RETRIES,
        })
    }

    /// Place `n` flowers at distinct random empty cells.
    pub fn populate_flowers(&mut self, n: usize, rng: &mut ChaCha12Rng) -> Result<(), FieldError> {
        for _ in 0..n {
            self.add_new_flower(rng)?;
        }
        Ok(())
    }

    /// Place exactly one flower at a random empty cell, initialized with
    /// the configured nectar. Called at setup and to maintain the flower
    /// conservation invariant after a depleted flower is cleared.
    pub fn add_new_flower(&mut self, rng: &mut ChaCha12Rng) -> Result<(usize, usize), FieldError> {
        for _ in 0..PLACEMENT_MAX_RETRIES {
            let pos = (
                rng.random_range(0..self.size),
                rng.random_range(0..self.size),
            );
            if self.cell_at(pos) == Some(Cell::Empty) {
                self.set_cell(pos, Cell::Flower);
                self.flowers.insert(pos, self.flower_nectar);
                return Ok(pos);
            }
        }
        Err(FieldError::PlacementExhausted {
            retries: PLACEMENT_MAX_RETRIES,
        })
    }

    /// Collect one nectar unit from the flower at `pos`. Returns the units
    /// collected: 0 for a non-flower or depleted cell (a no-op, not an
    /// error). Emptying the flower untracks it but leaves the grid tag for
    /// the deferred clear, since the collector is standing on the cell.
    pub fn collect_nectar_from_flower(&mut self, pos: (usize, usize)) -> u32 {
        match self.flowers.get_mut(&pos) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                if *remaining == 0 {
                    self.flowers.remove(&pos);
                }
                1
            }
            _ => 0,
        }
    }

    /// Complete the deferred removal of a depleted flower once no agent
    /// occupies its cell: clear the grid tag and spawn one replacement
    /// elsewhere. Returns whether a flower was cleared. No-op for cells
    /// that are not flower-tagged or still hold nectar.
    pub fn clear_depleted_flower(
        &mut self,
        pos: (usize, usize),
        rng: &mut ChaCha12Rng,
    ) -> Result<bool, FieldError> {
        if self.cell_at(pos) != Some(Cell::Flower) || self.flowers.contains_key(&pos) {
            return Ok(false);
        }
        self.set_cell(pos, Cell::Empty);
        self.add_new_flower(rng)?;
        Ok(true)
    }

    /// Raw occupancy row-major grid, for read-only rendering.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cell_at(&self, pos: (usize, usize)) -> Option<Cell> {
        if pos.0 < self.size && pos.1 < self.size {
            Some(self.cells[pos.1 * self.size + pos.0])
        } else {
            None
        }
    }

    fn set_cell(&mut self, pos: (usize, usize), cell: Cell) {
        self.cells[pos.1 * self.size + pos.0] = cell;
    }

    /// Deterministic flower placement for scenario tests.
    #[cfg(test)]
    pub(crate) fn place_flower_for_test(&mut self, pos: (usize, usize), nectar: u32) {
        assert!(nectar > 0);
        self.set_cell(pos, Cell::Flower);
        self.flowers.insert(pos, nectar);
    }
}
