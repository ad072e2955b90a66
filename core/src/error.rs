use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BingoError {
    #[error("Not enough phrases, board needs {requested} but only {available} are available")]
    InsufficientData { requested: usize, available: usize },
    #[error("Phrase pool exhausted")]
    Exhausted,
    #[error("Saved board has {found} fields but its size declares {expected}")]
    CorruptState { expected: usize, found: usize },
    #[error("Saved board could not be parsed")]
    MalformedState,
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = core::result::Result<T, BingoError>;
