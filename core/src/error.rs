use thiserror::Error;

use crate::AssistKind;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index is outside the grid")]
    InvalidIndex,
    #[error("Cell is empty")]
    EmptyCell,
    #[error("Tile value {0} is outside 1..=9")]
    InvalidTile(u8),
    #[error("Unknown game mode")]
    UnknownMode,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Why an assist did not apply.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssistError {
    #[error("{0} limit reached")]
    LimitReached(AssistKind),
    #[error("No moves to revert")]
    NothingToRevert,
    #[error("Grid limit reached")]
    GridFull,
    #[error("No numbers left to add")]
    NothingToAdd,
    #[error("Cell is already empty")]
    CellEmpty,
    #[error("Cell index is outside the grid")]
    InvalidIndex,
}

pub type AssistResult<T> = core::result::Result<T, AssistError>;
