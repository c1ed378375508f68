//! Move targeting
//!
//! [`resolve`] expands a move's abstract [`TargetCategory`] against the
//! concrete board of a [`BattleFormat`] and reports, for every position,
//! whether it can be selected and which positions the move would then hit.
//! It holds no state: the same inputs always give the same table.

mod table;

use baton_protocol::{BattleFormat, FieldPosition, Side, TargetCategory, TargetMask};

use crate::geometry::{active_mask, is_adjacent, nearest_first};

pub use table::{AdjacencyLinks, PositionEntry, TargetSelection, TargetTable};

/// Resolve the selectable targets of a move used from `user`.
///
/// `temp_lock` restricts selection to previously-chosen targets when the user
/// is bound by a multi-turn move; pass an empty mask when unbound.
pub fn resolve(
    format: BattleFormat,
    user: FieldPosition,
    category: TargetCategory,
    temp_lock: TargetMask,
) -> TargetTable {
    let field = active_mask(format);
    let own = side_mask(user.side) & field;
    let other = side_mask(user.side.opposite()) & field;
    let me = TargetMask::of(user) & field;
    let reach: TargetMask = field
        .positions()
        .filter(|&p| is_adjacent(format, user, p))
        .collect();

    let (mut selectable, spread) = match category {
        TargetCategory::Normal => (reach, None),
        TargetCategory::Any => (field - me, None),
        TargetCategory::AdjacentAlly => (reach & own, None),
        TargetCategory::AdjacentAllyOrSelf => ((reach & own) | me, None),
        TargetCategory::AdjacentFoe => (reach & other, None),
        TargetCategory::User => (me, None),
        TargetCategory::AllAdjacentFoes | TargetCategory::RandomNormal => {
            (reach & other, Some(reach & other))
        }
        TargetCategory::AllAdjacent => (reach, Some(reach)),
        TargetCategory::Allies | TargetCategory::AllySide => (own, Some(own)),
        TargetCategory::FoeSide => (other, Some(other)),
        TargetCategory::All => (field, Some(field)),
    };

    if !temp_lock.is_empty() {
        selectable &= temp_lock;
    }
    selectable &= field;

    let mut entries = FieldPosition::ALL.map(PositionEntry::disabled);
    for position in selectable.positions() {
        let mask = spread.unwrap_or_else(|| TargetMask::of(position));
        entries[position.index()] = PositionEntry {
            position,
            enabled: true,
            default_selected: false,
            mask,
            links: links_for(format, position, mask),
        };
    }

    let default = default_selection(format, user, selectable);
    if let TargetSelection::Position(position) = default {
        entries[position.index()].default_selected = true;
    }

    TargetTable {
        format,
        user,
        category,
        entries,
        default,
    }
}

/// Nearest enabled foe, then nearest enabled ally, then back out
fn default_selection(
    format: BattleFormat,
    user: FieldPosition,
    selectable: TargetMask,
) -> TargetSelection {
    nearest_first(format, user, user.side.opposite())
        .into_iter()
        .chain(nearest_first(format, user, user.side))
        .find(|&p| selectable.has(p))
        .map(TargetSelection::Position)
        .unwrap_or(TargetSelection::Back)
}

fn links_for(format: BattleFormat, position: FieldPosition, mask: TargetMask) -> AdjacencyLinks {
    let mut links = AdjacencyLinks::empty();
    if mask.bits().count_ones() < 2 {
        return links;
    }

    let columns = format.active_columns();
    if let Some(i) = columns.iter().position(|&c| c == position.column) {
        if i > 0 && mask.has(FieldPosition::new(position.side, columns[i - 1])) {
            links |= AdjacencyLinks::LEFT;
        }
        if let Some(&right) = columns.get(i + 1)
            && mask.has(FieldPosition::new(position.side, right))
        {
            links |= AdjacencyLinks::RIGHT;
        }
    }
    if mask.has(position.facing()) {
        links |= AdjacencyLinks::ACROSS;
    }
    links
}

fn side_mask(side: Side) -> TargetMask {
    match side {
        Side::Ally => TargetMask::ALLY_SIDE,
        Side::Foe => TargetMask::FOE_SIDE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CATEGORIES: [TargetCategory; 13] = [
        TargetCategory::Normal,
        TargetCategory::Any,
        TargetCategory::AdjacentAlly,
        TargetCategory::AdjacentAllyOrSelf,
        TargetCategory::AdjacentFoe,
        TargetCategory::User,
        TargetCategory::AllAdjacentFoes,
        TargetCategory::AllAdjacent,
        TargetCategory::Allies,
        TargetCategory::AllySide,
        TargetCategory::FoeSide,
        TargetCategory::All,
        TargetCategory::RandomNormal,
    ];

    const FORMATS: [BattleFormat; 4] = [
        BattleFormat::Single,
        BattleFormat::Double,
        BattleFormat::Triple,
        BattleFormat::Rotation,
    ];

    #[test]
    fn test_single_adjacent_foe_in_singles() {
        let table = resolve(
            BattleFormat::Single,
            FieldPosition::ALLY_CENTER,
            TargetCategory::Normal,
            TargetMask::empty(),
        );

        let enabled: Vec<_> = table.enabled_positions().collect();
        assert_eq!(enabled, vec![FieldPosition::FOE_CENTER]);
        assert!(!table.is_enabled(FieldPosition::ALLY_CENTER));
        assert_eq!(
            table.default_selection(),
            TargetSelection::Position(FieldPosition::FOE_CENTER)
        );
        assert_eq!(table.default_mask(), Some(TargetMask::FOE_CENTER));
        assert!(table.entry(FieldPosition::FOE_CENTER).default_selected);
    }

    #[test]
    fn test_triple_left_flank_all_adjacent() {
        let table = resolve(
            BattleFormat::Triple,
            FieldPosition::ALLY_LEFT,
            TargetCategory::AllAdjacent,
            TargetMask::empty(),
        );

        let expected =
            TargetMask::ALLY_CENTER | TargetMask::FOE_LEFT | TargetMask::FOE_CENTER;
        assert_eq!(table.enabled_mask(), expected);
        assert!(!table.is_enabled(FieldPosition::ALLY_RIGHT));
        assert!(!table.is_enabled(FieldPosition::FOE_RIGHT));
        assert!(!table.is_enabled(FieldPosition::ALLY_LEFT));

        // Spread: every selection hits the same set
        for position in table.enabled_positions() {
            assert_eq!(table.mask_for(position), Some(expected));
        }
        assert_eq!(
            table.default_selection(),
            TargetSelection::Position(FieldPosition::FOE_LEFT)
        );
    }

    #[test]
    fn test_triple_flank_single_target_cannot_reach_far_flank() {
        let table = resolve(
            BattleFormat::Triple,
            FieldPosition::ALLY_RIGHT,
            TargetCategory::Normal,
            TargetMask::empty(),
        );
        assert!(!table.is_enabled(FieldPosition::FOE_LEFT));
        assert!(table.is_enabled(FieldPosition::FOE_CENTER));
        assert_eq!(table.mask_for(FieldPosition::FOE_CENTER), Some(TargetMask::FOE_CENTER));

        let any = resolve(
            BattleFormat::Triple,
            FieldPosition::ALLY_RIGHT,
            TargetCategory::Any,
            TargetMask::empty(),
        );
        assert!(any.is_enabled(FieldPosition::FOE_LEFT));
        assert!(!any.is_enabled(FieldPosition::ALLY_RIGHT));
    }

    #[test]
    fn test_self_target_defaults_to_user() {
        let table = resolve(
            BattleFormat::Double,
            FieldPosition::ALLY_RIGHT,
            TargetCategory::User,
            TargetMask::empty(),
        );
        assert_eq!(table.enabled_mask(), TargetMask::ALLY_RIGHT);
        assert_eq!(
            table.default_selection(),
            TargetSelection::Position(FieldPosition::ALLY_RIGHT)
        );
    }

    #[test]
    fn test_ally_side_in_doubles() {
        let table = resolve(
            BattleFormat::Double,
            FieldPosition::ALLY_LEFT,
            TargetCategory::AllySide,
            TargetMask::empty(),
        );
        let side = TargetMask::ALLY_LEFT | TargetMask::ALLY_RIGHT;
        assert_eq!(table.enabled_mask(), side);
        assert_eq!(table.mask_for(FieldPosition::ALLY_RIGHT), Some(side));
        assert_eq!(
            table.default_selection(),
            TargetSelection::Position(FieldPosition::ALLY_LEFT)
        );
    }

    #[test]
    fn test_temp_lock_restricts_selection() {
        let table = resolve(
            BattleFormat::Double,
            FieldPosition::ALLY_LEFT,
            TargetCategory::Normal,
            TargetMask::FOE_RIGHT,
        );
        assert_eq!(table.enabled_mask(), TargetMask::FOE_RIGHT);
        assert_eq!(
            table.default_selection(),
            TargetSelection::Position(FieldPosition::FOE_RIGHT)
        );
    }

    #[test]
    fn test_lock_outside_reach_leaves_only_back() {
        let table = resolve(
            BattleFormat::Triple,
            FieldPosition::ALLY_LEFT,
            TargetCategory::Normal,
            TargetMask::FOE_RIGHT,
        );
        assert!(table.is_empty());
        assert_eq!(table.default_selection(), TargetSelection::Back);
        assert_eq!(table.default_mask(), None);
    }

    #[test]
    fn test_adjacent_ally_in_singles_is_empty() {
        let table = resolve(
            BattleFormat::Single,
            FieldPosition::ALLY_CENTER,
            TargetCategory::AdjacentAlly,
            TargetMask::empty(),
        );
        assert!(table.is_empty());
        assert_eq!(table.default_selection(), TargetSelection::Back);
    }

    #[test]
    fn test_rotation_bench_is_not_targetable() {
        let table = resolve(
            BattleFormat::Rotation,
            FieldPosition::ALLY_CENTER,
            TargetCategory::All,
            TargetMask::empty(),
        );
        assert_eq!(
            table.enabled_mask(),
            TargetMask::ALLY_CENTER | TargetMask::FOE_CENTER
        );
    }

    #[test]
    fn test_links_for_spread_moves() {
        let table = resolve(
            BattleFormat::Triple,
            FieldPosition::ALLY_CENTER,
            TargetCategory::FoeSide,
            TargetMask::empty(),
        );
        assert_eq!(
            table.entry(FieldPosition::FOE_LEFT).links,
            AdjacencyLinks::RIGHT
        );
        assert_eq!(
            table.entry(FieldPosition::FOE_CENTER).links,
            AdjacencyLinks::LEFT | AdjacencyLinks::RIGHT
        );

        let everything = resolve(
            BattleFormat::Double,
            FieldPosition::ALLY_LEFT,
            TargetCategory::All,
            TargetMask::empty(),
        );
        assert_eq!(
            everything.entry(FieldPosition::ALLY_LEFT).links,
            AdjacencyLinks::RIGHT | AdjacencyLinks::ACROSS
        );

        let single = resolve(
            BattleFormat::Triple,
            FieldPosition::ALLY_CENTER,
            TargetCategory::Normal,
            TargetMask::empty(),
        );
        assert!(single.entries().iter().all(|e| e.links.is_empty()));
    }

    fn format_strategy() -> impl Strategy<Value = BattleFormat> {
        prop::sample::select(FORMATS.to_vec())
    }

    fn category_strategy() -> impl Strategy<Value = TargetCategory> {
        prop::sample::select(CATEGORIES.to_vec())
    }

    fn position_strategy() -> impl Strategy<Value = FieldPosition> {
        prop::sample::select(FieldPosition::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_never_enables_outside_format(
            format in format_strategy(),
            user in position_strategy(),
            category in category_strategy(),
            lock in 0u8..64,
        ) {
            let table = resolve(format, user, category, TargetMask::from_bits_truncate(lock));
            let field = active_mask(format);
            prop_assert!(field.contains(table.enabled_mask()));
            for entry in table.entries() {
                if entry.enabled {
                    prop_assert!(field.contains(entry.mask));
                    prop_assert!(!entry.mask.is_empty());
                } else {
                    prop_assert!(entry.mask.is_empty());
                }
            }
        }

        #[test]
        fn prop_resolve_is_idempotent(
            format in format_strategy(),
            user in position_strategy(),
            category in category_strategy(),
            lock in 0u8..64,
        ) {
            let lock = TargetMask::from_bits_truncate(lock);
            prop_assert_eq!(
                resolve(format, user, category, lock),
                resolve(format, user, category, lock)
            );
        }

        #[test]
        fn prop_default_is_enabled_or_back(
            format in format_strategy(),
            user in position_strategy(),
            category in category_strategy(),
        ) {
            let table = resolve(format, user, category, TargetMask::empty());
            match table.default_selection() {
                TargetSelection::Position(p) => prop_assert!(table.is_enabled(p)),
                TargetSelection::Back => prop_assert!(table.is_empty()),
            }
        }
    }
}
