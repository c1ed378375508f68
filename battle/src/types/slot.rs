//! Per-position display state

use baton_protocol::CombatantId;

/// What the presentation layer shows at one field position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionSlot {
    /// Combatant bound to the position's sprite
    pub occupant: Option<CombatantId>,

    /// Whether the sprite is drawn
    pub sprite_visible: bool,

    /// Whether the name/HP panel is drawn
    pub info_visible: bool,
}

impl PositionSlot {
    /// Bind `combatant` and show both sprite and panel
    pub fn show(&mut self, combatant: CombatantId) {
        self.occupant = Some(combatant);
        self.sprite_visible = true;
        self.info_visible = true;
    }

    /// Unbind and hide everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn is_visible(&self) -> bool {
        self.sprite_visible || self.info_visible
    }
}
