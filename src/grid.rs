use crate::random::Randomness;

pub const GRID_SIZE: usize = 3;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Probability that a spawn places a rock instead of a can
pub const ROCK_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupant {
    #[default]
    None,
    Can,
    Rock,
}

impl Occupant {
    pub fn is_some(&self) -> bool {
        !matches!(self, Occupant::None)
    }
}

/// A cell whose occupant changed, as reported to views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub index: usize,
    pub occupant: Occupant,
}

/// The 3x3 playing field. At most one cell is occupied after any spawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: [Occupant; CELL_COUNT],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<Occupant> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Occupant; CELL_COUNT] {
        &self.cells
    }

    pub fn occupied(&self) -> impl Iterator<Item = (usize, Occupant)> + '_ {
        self.cells
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, o)| o.is_some())
    }

    /// Clear every cell, returning the cells that were emptied
    pub fn clear(&mut self) -> Vec<CellChange> {
        let changes = self
            .occupied()
            .map(|(index, _)| CellChange {
                index,
                occupant: Occupant::None,
            })
            .collect();
        self.cells = [Occupant::None; CELL_COUNT];
        changes
    }

    /// Replace the whole grid with a single new occupant at a random cell.
    ///
    /// The update is applied in one step; the returned changes list the
    /// cleared cells first and the new placement last.
    pub fn spawn<R: Randomness + ?Sized>(&mut self, rng: &mut R) -> Vec<CellChange> {
        let index = rng.pick_index(CELL_COUNT);
        let occupant = if rng.chance(ROCK_CHANCE) {
            Occupant::Rock
        } else {
            Occupant::Can
        };

        let mut changes: Vec<CellChange> = self
            .occupied()
            .filter(|(i, _)| *i != index)
            .map(|(i, _)| CellChange {
                index: i,
                occupant: Occupant::None,
            })
            .collect();

        let mut next = [Occupant::None; CELL_COUNT];
        next[index] = occupant;
        self.cells = next;

        changes.push(CellChange { index, occupant });
        changes
    }

    /// Remove and return the occupant at `index`, if any
    pub fn take(&mut self, index: usize) -> Option<Occupant> {
        let cell = self.cells.get_mut(index)?;
        match std::mem::take(cell) {
            Occupant::None => None,
            occupant => Some(occupant),
        }
    }
}
