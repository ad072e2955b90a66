#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use card::*;
pub use dispenser::*;
pub use error::*;
pub use state::*;
pub use store::*;
pub use types::*;

mod board;
mod card;
mod dispenser;
mod error;
mod state;
mod store;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// `(cols, rows)`
    pub size: Coord2,
    pub free_space: bool,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Coord2, free_space: bool) -> Self {
        Self { size, free_space }
    }

    pub fn new((cols, rows): Coord2, free_space: bool) -> Self {
        let cols = cols.clamp(1, Coord::MAX);
        let rows = rows.clamp(1, Coord::MAX);
        Self::new_unchecked((cols, rows), free_space)
    }

    pub const fn cols(&self) -> Coord {
        self.size.0
    }

    pub const fn rows(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Position of the free space, the center cell rounded down.
    pub const fn free_cell(&self) -> Option<Coord2> {
        if self.free_space {
            Some((self.size.0 / 2, self.size.1 / 2))
        } else {
            None
        }
    }

    /// Phrases a fresh board draws, the free space takes none.
    pub const fn phrases_needed(&self) -> usize {
        let cells = self.total_cells() as usize;
        if self.free_space { cells.saturating_sub(1) } else { cells }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new_unchecked((5, 5), true)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    NoChange,
    Changed,
    /// Accepted, completes on the next settle.
    Pending,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed | Self::Pending => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    NoChange,
    Swapped,
    Reset,
}

impl SettleOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Notifications a card raises towards its board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardEvent {
    Checked(Coord2),
    Swapped(Coord2),
}
