//! Board geometry for each battle format

use baton_protocol::{BattleFormat, FieldPosition, Side, TargetMask};

/// Positions that hold acting, targetable combatants in `format`
pub fn active_positions(format: BattleFormat) -> impl Iterator<Item = FieldPosition> {
    [Side::Ally, Side::Foe].into_iter().flat_map(move |side| {
        format
            .active_columns()
            .iter()
            .map(move |&column| FieldPosition::new(side, column))
    })
}

/// Mask of every active position in `format`
pub fn active_mask(format: BattleFormat) -> TargetMask {
    active_positions(format).collect()
}

/// Whether `position` is an active position in `format`
pub fn is_active(format: BattleFormat, position: FieldPosition) -> bool {
    format.active_columns().contains(&position.column)
}

/// Whether two distinct positions can reach each other with an adjacent-only move.
///
/// Only triple battles restrict reach: a flank cannot touch the far flank on
/// either side. Columns are aligned across sides.
pub fn is_adjacent(format: BattleFormat, a: FieldPosition, b: FieldPosition) -> bool {
    if a == b || !is_active(format, a) || !is_active(format, b) {
        return false;
    }
    match format {
        BattleFormat::Triple => a.column.distance(b.column) <= 1,
        BattleFormat::Single | BattleFormat::Double | BattleFormat::Rotation => true,
    }
}

/// Positions on `side` ordered nearest-first relative to `from`, ties toward the left
pub fn nearest_first(
    format: BattleFormat,
    from: FieldPosition,
    side: Side,
) -> Vec<FieldPosition> {
    let mut positions: Vec<_> = format
        .active_columns()
        .iter()
        .map(|&column| FieldPosition::new(side, column))
        .collect();
    positions.sort_by_key(|p| (p.column.distance(from.column), p.column.index()));
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_positions_per_format() {
        assert_eq!(active_positions(BattleFormat::Single).count(), 2);
        assert_eq!(active_positions(BattleFormat::Double).count(), 4);
        assert_eq!(active_positions(BattleFormat::Triple).count(), 6);
        assert_eq!(active_positions(BattleFormat::Rotation).count(), 2);

        assert_eq!(
            active_mask(BattleFormat::Single),
            TargetMask::ALLY_CENTER | TargetMask::FOE_CENTER
        );
        assert!(!is_active(BattleFormat::Double, FieldPosition::ALLY_CENTER));
    }

    #[test]
    fn test_triple_flanks_do_not_reach() {
        let f = BattleFormat::Triple;
        assert!(is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::FOE_CENTER));
        assert!(is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::ALLY_CENTER));
        assert!(!is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::FOE_RIGHT));
        assert!(!is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::ALLY_RIGHT));
        assert!(is_adjacent(f, FieldPosition::ALLY_CENTER, FieldPosition::FOE_RIGHT));
    }

    #[test]
    fn test_doubles_everything_adjacent() {
        let f = BattleFormat::Double;
        assert!(is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::FOE_RIGHT));
        assert!(is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::ALLY_RIGHT));
        assert!(!is_adjacent(f, FieldPosition::ALLY_LEFT, FieldPosition::ALLY_LEFT));
    }

    #[test]
    fn test_nearest_first() {
        let order = nearest_first(BattleFormat::Triple, FieldPosition::ALLY_RIGHT, Side::Foe);
        assert_eq!(
            order,
            vec![
                FieldPosition::FOE_RIGHT,
                FieldPosition::FOE_CENTER,
                FieldPosition::FOE_LEFT
            ]
        );

        let order = nearest_first(BattleFormat::Triple, FieldPosition::ALLY_CENTER, Side::Foe);
        assert_eq!(order[0], FieldPosition::FOE_CENTER);
        assert_eq!(order[1], FieldPosition::FOE_LEFT);
    }
}
