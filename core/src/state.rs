use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Version written into every saved board.
pub const STATE_VERSION: u32 = 1;

/// Key under which the board is stored.
pub const STORAGE_KEY: &str = "bingoboard";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAttributes {
    pub reroll: bool,
    pub toggleable: bool,
    pub checked: bool,
}

/// Saved form of one card: the visible phrase and its flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub text: String,
    pub attributes: FieldAttributes,
}

/// Saved form of a whole board, fields in build order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub version: u32,
    pub rows: Coord,
    pub cols: Coord,
    pub fields: Vec<FieldState>,
}

impl BoardState {
    pub fn size(&self) -> Coord2 {
        (self.cols, self.rows)
    }

    /// Checks that the declared size matches the saved fields.
    pub fn validate(&self) -> Result<()> {
        let expected = usize::from(mult(self.cols, self.rows));
        let found = self.fields.len();
        if expected == 0 || expected != found {
            return Err(BingoError::CorruptState { expected, found });
        }
        if self.version != STATE_VERSION {
            // no migrations exist yet, older and newer states are taken as they are
            log::warn!(
                "saved board has version {}, current is {}",
                self.version,
                STATE_VERSION
            );
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json).map_err(|err| {
            log::debug!("saved board is not valid json: {}", err);
            BingoError::MalformedState
        })?;
        state.validate()?;
        Ok(state)
    }
}
