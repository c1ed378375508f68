//! Move target categories and position bitsets

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;
use crate::field::FieldPosition;

/// A move's abstract targeting rule, independent of battle format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetCategory {
    /// One adjacent combatant other than the user, on either side
    Normal,
    /// Any one combatant other than the user, adjacency not required
    Any,
    /// One adjacent ally
    AdjacentAlly,
    /// One adjacent ally or the user itself
    AdjacentAllyOrSelf,
    /// One adjacent foe
    AdjacentFoe,
    /// The user only
    #[serde(rename = "self")]
    User,
    /// Every adjacent foe at once
    AllAdjacentFoes,
    /// Every adjacent combatant, foes and allies
    AllAdjacent,
    /// The user and all of its allies
    Allies,
    /// The user's side of the field
    AllySide,
    /// The opposing side of the field
    FoeSide,
    /// The entire field
    All,
    /// A random adjacent foe, chosen by the simulation
    RandomNormal,
}

impl TargetCategory {
    /// Parse from the category id ("normal", "self", "allySide", ...)
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        let category = match s {
            "normal" => TargetCategory::Normal,
            "any" => TargetCategory::Any,
            "adjacentAlly" => TargetCategory::AdjacentAlly,
            "adjacentAllyOrSelf" => TargetCategory::AdjacentAllyOrSelf,
            "adjacentFoe" => TargetCategory::AdjacentFoe,
            "self" => TargetCategory::User,
            "allAdjacentFoes" => TargetCategory::AllAdjacentFoes,
            "allAdjacent" => TargetCategory::AllAdjacent,
            "allies" => TargetCategory::Allies,
            "allySide" => TargetCategory::AllySide,
            "foeSide" => TargetCategory::FoeSide,
            "all" => TargetCategory::All,
            "randomNormal" => TargetCategory::RandomNormal,
            _ => return Err(ProtocolError::UnknownTarget(s.to_string())),
        };
        Ok(category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetCategory::Normal => "normal",
            TargetCategory::Any => "any",
            TargetCategory::AdjacentAlly => "adjacentAlly",
            TargetCategory::AdjacentAllyOrSelf => "adjacentAllyOrSelf",
            TargetCategory::AdjacentFoe => "adjacentFoe",
            TargetCategory::User => "self",
            TargetCategory::AllAdjacentFoes => "allAdjacentFoes",
            TargetCategory::AllAdjacent => "allAdjacent",
            TargetCategory::Allies => "allies",
            TargetCategory::AllySide => "allySide",
            TargetCategory::FoeSide => "foeSide",
            TargetCategory::All => "all",
            TargetCategory::RandomNormal => "randomNormal",
        }
    }

    /// Whether selecting one position applies the move to several
    pub fn is_spread(&self) -> bool {
        matches!(
            self,
            TargetCategory::AllAdjacentFoes
                | TargetCategory::AllAdjacent
                | TargetCategory::Allies
                | TargetCategory::AllySide
                | TargetCategory::FoeSide
                | TargetCategory::All
                | TargetCategory::RandomNormal
        )
    }
}

bitflags! {
    /// Set of board positions a move's effect applies to
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TargetMask: u8 {
        const ALLY_LEFT   = 1 << 0;
        const ALLY_CENTER = 1 << 1;
        const ALLY_RIGHT  = 1 << 2;
        const FOE_LEFT    = 1 << 3;
        const FOE_CENTER  = 1 << 4;
        const FOE_RIGHT   = 1 << 5;

        const ALLY_SIDE = Self::ALLY_LEFT.bits() | Self::ALLY_CENTER.bits() | Self::ALLY_RIGHT.bits();
        const FOE_SIDE  = Self::FOE_LEFT.bits() | Self::FOE_CENTER.bits() | Self::FOE_RIGHT.bits();
    }
}

impl TargetMask {
    /// Mask holding a single position
    pub fn of(position: FieldPosition) -> Self {
        Self::from_bits_truncate(1 << position.index())
    }

    pub fn has(&self, position: FieldPosition) -> bool {
        self.contains(Self::of(position))
    }

    /// Positions in the mask, in [`FieldPosition::ALL`] order
    pub fn positions(self) -> impl Iterator<Item = FieldPosition> {
        FieldPosition::ALL
            .into_iter()
            .filter(move |p| self.contains(Self::of(*p)))
    }
}

impl FromIterator<FieldPosition> for TargetMask {
    fn from_iter<I: IntoIterator<Item = FieldPosition>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TargetMask::empty(), |mask, p| mask | TargetMask::of(p))
    }
}
