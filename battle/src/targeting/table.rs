//! Resolved target tables

use baton_protocol::{BattleFormat, FieldPosition, TargetCategory, TargetMask};
use bitflags::bitflags;

bitflags! {
    /// Connecting lines to draw from a position to the others its selection hits
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AdjacencyLinks: u8 {
        /// To the neighbouring active position on the left, same side
        const LEFT   = 1 << 0;
        /// To the neighbouring active position on the right, same side
        const RIGHT  = 1 << 1;
        /// To the facing position on the other side
        const ACROSS = 1 << 2;
    }
}

/// One row of a [`TargetTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEntry {
    pub position: FieldPosition,
    pub enabled: bool,
    pub default_selected: bool,
    /// Positions the move applies to if this one is selected (empty when disabled)
    pub mask: TargetMask,
    pub links: AdjacencyLinks,
}

impl PositionEntry {
    pub(crate) fn disabled(position: FieldPosition) -> Self {
        Self {
            position,
            enabled: false,
            default_selected: false,
            mask: TargetMask::empty(),
            links: AdjacencyLinks::empty(),
        }
    }
}

/// The selection a target picker should start on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelection {
    Position(FieldPosition),
    /// Nothing is selectable; only backing out of the move is possible
    Back,
}

/// Format-resolved target choices for one move of one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTable {
    pub format: BattleFormat,
    pub user: FieldPosition,
    pub category: TargetCategory,
    pub(crate) entries: [PositionEntry; 6],
    pub(crate) default: TargetSelection,
}

impl TargetTable {
    /// All six rows, in [`FieldPosition::ALL`] order
    pub fn entries(&self) -> &[PositionEntry; 6] {
        &self.entries
    }

    pub fn entry(&self, position: FieldPosition) -> &PositionEntry {
        &self.entries[position.index()]
    }

    pub fn is_enabled(&self, position: FieldPosition) -> bool {
        self.entry(position).enabled
    }

    /// Positions that can be selected
    pub fn enabled_positions(&self) -> impl Iterator<Item = FieldPosition> + '_ {
        self.entries.iter().filter(|e| e.enabled).map(|e| e.position)
    }

    pub fn enabled_mask(&self) -> TargetMask {
        self.enabled_positions().collect()
    }

    /// Nothing selectable: the move cannot be used as things stand
    pub fn is_empty(&self) -> bool {
        !self.entries.iter().any(|e| e.enabled)
    }

    pub fn default_selection(&self) -> TargetSelection {
        self.default
    }

    /// Mask produced by selecting `position`, if it is enabled
    pub fn mask_for(&self, position: FieldPosition) -> Option<TargetMask> {
        let entry = self.entry(position);
        entry.enabled.then_some(entry.mask)
    }

    /// Mask produced by the default selection
    pub fn default_mask(&self) -> Option<TargetMask> {
        match self.default {
            TargetSelection::Position(position) => self.mask_for(position),
            TargetSelection::Back => None,
        }
    }

    /// Whether `mask` is what selecting some enabled position would produce
    pub fn offers(&self, mask: TargetMask) -> bool {
        self.entries.iter().any(|e| e.enabled && e.mask == mask)
    }
}
