//! Shared identifiers and board geometry names
//!
//! Positions are always expressed from the local trainer's point of view:
//! `Ally` is the near side of the field, `Foe` the far side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Trainer taking part in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrainerId(pub u8);

impl fmt::Display for TrainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A combatant, identified by its owner and its slot in the owner's party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantId {
    pub trainer: TrainerId,
    pub party_slot: u8,
}

impl CombatantId {
    pub fn new(trainer: TrainerId, party_slot: u8) -> Self {
        Self {
            trainer,
            party_slot,
        }
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.trainer, self.party_slot)
    }
}

/// Side of the field relative to the local trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Ally,
    Foe,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Ally => Side::Foe,
            Side::Foe => Side::Ally,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Ally => "ally",
            Side::Foe => "foe",
        }
    }
}

/// Column on the board. Columns line up across sides: ally-left faces foe-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Center,
    Right,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Left, Column::Center, Column::Right];

    pub fn index(self) -> usize {
        match self {
            Column::Left => 0,
            Column::Center => 1,
            Column::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Column distance, used for adjacency and "nearest" ordering
    pub fn distance(self, other: Column) -> usize {
        self.index().abs_diff(other.index())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Left => "left",
            Column::Center => "center",
            Column::Right => "right",
        }
    }
}

/// One of the six board positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPosition {
    pub side: Side,
    pub column: Column,
}

impl FieldPosition {
    pub const ALLY_LEFT: Self = Self::new(Side::Ally, Column::Left);
    pub const ALLY_CENTER: Self = Self::new(Side::Ally, Column::Center);
    pub const ALLY_RIGHT: Self = Self::new(Side::Ally, Column::Right);
    pub const FOE_LEFT: Self = Self::new(Side::Foe, Column::Left);
    pub const FOE_CENTER: Self = Self::new(Side::Foe, Column::Center);
    pub const FOE_RIGHT: Self = Self::new(Side::Foe, Column::Right);

    /// Every position, allies first, each side left to right
    pub const ALL: [Self; 6] = [
        Self::ALLY_LEFT,
        Self::ALLY_CENTER,
        Self::ALLY_RIGHT,
        Self::FOE_LEFT,
        Self::FOE_CENTER,
        Self::FOE_RIGHT,
    ];

    pub const fn new(side: Side, column: Column) -> Self {
        Self { side, column }
    }

    /// Index into [`FieldPosition::ALL`]
    pub fn index(self) -> usize {
        let base = match self.side {
            Side::Ally => 0,
            Side::Foe => 3,
        };
        base + self.column.index()
    }

    /// The position directly across the field
    pub fn facing(self) -> Self {
        Self::new(self.side.opposite(), self.column)
    }

    pub fn is_ally(self) -> bool {
        self.side == Side::Ally
    }

    pub fn is_foe(self) -> bool {
        self.side == Side::Foe
    }

    /// Parse a position name like "ally-left" or "foe-center"
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_string() == s)
            .ok_or_else(|| ProtocolError::UnknownPosition(s.to_string()))
    }
}

impl fmt::Display for FieldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.side.as_str(), self.column.as_str())
    }
}

/// Battle geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleFormat {
    /// One combatant per side
    Single,
    /// Two combatants per side, all mutually adjacent
    Double,
    /// Three combatants per side in a line; flanks do not reach the far flank
    Triple,
    /// Three per side on a rotating bench, only the front (center) one acts
    Rotation,
}

impl BattleFormat {
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        match s {
            "single" | "singles" => Ok(BattleFormat::Single),
            "double" | "doubles" => Ok(BattleFormat::Double),
            "triple" | "triples" => Ok(BattleFormat::Triple),
            "rotation" => Ok(BattleFormat::Rotation),
            _ => Err(ProtocolError::UnknownFormat(s.to_string())),
        }
    }

    /// Columns that hold combatants able to act and be targeted
    pub fn active_columns(&self) -> &'static [Column] {
        match self {
            BattleFormat::Single | BattleFormat::Rotation => &[Column::Center],
            BattleFormat::Double => &[Column::Left, Column::Right],
            BattleFormat::Triple => &[Column::Left, Column::Center, Column::Right],
        }
    }

    /// Columns that may show a combatant on screen (includes the rotation bench)
    pub fn occupied_columns(&self) -> &'static [Column] {
        match self {
            BattleFormat::Rotation => &Column::ALL,
            other => other.active_columns(),
        }
    }

    /// Number of active combatants per side
    pub fn active_per_side(&self) -> usize {
        self.active_columns().len()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BattleFormat::Single => "single",
            BattleFormat::Double => "double",
            BattleFormat::Triple => "triple",
            BattleFormat::Rotation => "rotation",
        }
    }
}

impl fmt::Display for BattleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
