use core::fmt;
use core::ops::Index;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

/// Hint counts above this are shown as `"5+"`.
pub const HINT_DISPLAY_CAP: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssistKind {
    Hints,
    Revert,
    AddNumbers,
    Shuffle,
    Eraser,
}

impl AssistKind {
    pub const ALL: [AssistKind; 5] = [
        AssistKind::Hints,
        AssistKind::Revert,
        AssistKind::AddNumbers,
        AssistKind::Shuffle,
        AssistKind::Eraser,
    ];

    /// Maximum uses per game, `None` when unlimited.
    pub const fn limit(self) -> Option<u32> {
        match self {
            Self::Hints | Self::Revert => None,
            Self::AddNumbers => Some(10),
            Self::Shuffle | Self::Eraser => Some(5),
        }
    }

    /// Whether this assist can get a stuck game moving again.
    pub const fn can_unblock(self) -> bool {
        matches!(self, Self::AddNumbers | Self::Shuffle | Self::Eraser)
    }

    const fn slot(self) -> usize {
        match self {
            Self::Hints => 0,
            Self::Revert => 1,
            Self::AddNumbers => 2,
            Self::Shuffle => 3,
            Self::Eraser => 4,
        }
    }
}

impl fmt::Display for AssistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hints => "Hints",
            Self::Revert => "Revert",
            Self::AddNumbers => "Add Numbers",
            Self::Shuffle => "Shuffle",
            Self::Eraser => "Eraser",
        })
    }
}

/// Per-assist usage counters, persisted as the `assistUses` map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistUses {
    #[serde(deserialize_with = "null_as_default")]
    pub hints: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub revert: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub add_numbers: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub shuffle: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub eraser: u32,
}

impl AssistUses {
    pub const fn get(&self, kind: AssistKind) -> u32 {
        match kind {
            AssistKind::Hints => self.hints,
            AssistKind::Revert => self.revert,
            AssistKind::AddNumbers => self.add_numbers,
            AssistKind::Shuffle => self.shuffle,
            AssistKind::Eraser => self.eraser,
        }
    }

    pub(crate) fn increment(&mut self, kind: AssistKind) {
        let counter = match kind {
            AssistKind::Hints => &mut self.hints,
            AssistKind::Revert => &mut self.revert,
            AssistKind::AddNumbers => &mut self.add_numbers,
            AssistKind::Shuffle => &mut self.shuffle,
            AssistKind::Eraser => &mut self.eraser,
        };
        *counter = counter.saturating_add(1);
    }

    /// Whether `kind` still has uses left, ignoring any other precondition.
    pub const fn has_remaining(&self, kind: AssistKind) -> bool {
        match kind.limit() {
            Some(limit) => self.get(kind) < limit,
            None => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AssistInfo {
    pub used: u32,
    pub limit: Option<u32>,
    pub available: bool,
}

impl AssistInfo {
    /// Uses left, `None` when unlimited.
    pub fn remaining(&self) -> Option<u32> {
        self.limit.map(|limit| limit.saturating_sub(self.used))
    }
}

/// Usage and availability of every assist, indexed by [`AssistKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AssistInfoMap {
    entries: [AssistInfo; 5],
}

impl AssistInfoMap {
    pub(crate) fn new(info: impl Fn(AssistKind) -> AssistInfo) -> Self {
        Self {
            entries: AssistKind::ALL.map(info),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssistKind, AssistInfo)> + '_ {
        AssistKind::ALL.into_iter().map(|kind| (kind, self[kind]))
    }
}

impl Index<AssistKind> for AssistInfoMap {
    type Output = AssistInfo;

    fn index(&self, kind: AssistKind) -> &Self::Output {
        &self.entries[kind.slot()]
    }
}

/// A request for one assist, dispatched by [`PuzzleEngine::assist`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssistAction {
    Hint,
    Revert,
    AddNumbers,
    Shuffle,
    Erase(CellIndex),
}

impl AssistAction {
    pub const fn kind(self) -> AssistKind {
        match self {
            Self::Hint => AssistKind::Hints,
            Self::Revert => AssistKind::Revert,
            Self::AddNumbers => AssistKind::AddNumbers,
            Self::Shuffle => AssistKind::Shuffle,
            Self::Erase(_) => AssistKind::Eraser,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssistOutcome {
    Hint(HintCount),
    Reverted,
    NumbersAdded(usize),
    Shuffled,
    Erased(CellIndex),
}

/// Number of removable pairs found by a hint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HintCount(pub usize);

impl fmt::Display for HintCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > HINT_DISPLAY_CAP {
            write!(f, "{HINT_DISPLAY_CAP}+")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> core::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
