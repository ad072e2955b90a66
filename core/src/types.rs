use core::time::Duration;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for phrase counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(col, row)`.
pub type Coord2 = (Coord, Coord);

/// Time a swap needs before the previously visible face may be cleared.
pub const SWAP_SETTLE: Duration = Duration::from_millis(100);

/// Time a reset flip needs before the second face is blanked.
pub const RESET_SETTLE: Duration = Duration::from_millis(300);

/// Delay between two consecutive card reveals after a build.
pub const REVEAL_STAGGER: Duration = Duration::from_millis(50);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Which of the two faces of a card is currently turned towards the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    FrontUp,
    BackUp,
}

impl Orientation {
    pub const fn flipped(self) -> Self {
        match self {
            Self::FrontUp => Self::BackUp,
            Self::BackUp => Self::FrontUp,
        }
    }

    pub(crate) const fn visible_face(self) -> usize {
        match self {
            Self::FrontUp => 0,
            Self::BackUp => 1,
        }
    }

    pub(crate) const fn hidden_face(self) -> usize {
        self.flipped().visible_face()
    }
}
