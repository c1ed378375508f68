//! Replacement building after faints

use baton_protocol::{
    BattleFormat, CombatantId, FieldPosition, Side, Submission, SwitchDecision, SwitchRequest,
    TargetMask, TrainerId,
};
use tracing::debug;

use crate::geometry::active_positions;

use super::error::BuilderError;
use super::options::{Availability, DisabledReason, SwitchChoice};
use super::standby::StandbySet;

/// A chosen set of replacements, in the order they were picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerSwitchSet {
    pub trainer: TrainerId,
    pub decisions: Vec<SwitchDecision>,
}

impl TrainerSwitchSet {
    pub fn into_submission(self) -> Submission {
        Submission::Switches {
            trainer: self.trainer,
            decisions: self.decisions,
        }
    }
}

/// Collects up to `required` replacements, each bound to a position.
///
/// Unlike [`TurnActionBuilder`](super::TurnActionBuilder), reaching the
/// required count does not end the round by itself: the caller decides when
/// to [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct SwitchInBuilder {
    format: BattleFormat,
    request: SwitchRequest,
    entries: Vec<SwitchDecision>,
}

impl SwitchInBuilder {
    pub fn new(format: BattleFormat, request: SwitchRequest) -> Self {
        Self {
            format,
            entries: Vec::with_capacity(request.required),
            request,
        }
    }

    pub fn format(&self) -> BattleFormat {
        self.format
    }

    pub fn trainer(&self) -> TrainerId {
        self.request.trainer
    }

    pub fn request(&self) -> &SwitchRequest {
        &self.request
    }

    pub fn required(&self) -> usize {
        self.request.required
    }

    pub fn cursor(&self) -> usize {
        self.entries.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.request.required.saturating_sub(self.entries.len())
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.request.required
    }

    pub fn can_pop(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn decisions(&self) -> &[SwitchDecision] {
        &self.entries
    }

    pub fn standby(&self) -> StandbySet {
        StandbySet::new(
            self.entries.iter().map(|d| d.replacement),
            self.entries.iter().map(|d| d.position),
        )
    }

    /// Positions a replacement may be sent into: the request's open
    /// positions, or every ally active position when it lists none
    pub fn eligible_positions(&self) -> Vec<FieldPosition> {
        if self.request.open_positions.is_empty() {
            active_positions(self.format)
                .filter(|p| p.side == Side::Ally)
                .collect()
        } else {
            self.request.open_positions.clone()
        }
    }

    /// First eligible position nobody has been assigned to yet
    pub fn next_open_position(&self) -> Option<FieldPosition> {
        let standby = self.standby();
        self.eligible_positions()
            .into_iter()
            .find(|&p| !standby.contains_position(p))
    }

    /// Party listing with a reason for every member that cannot be sent in
    pub fn options(&self) -> Vec<SwitchChoice> {
        let standby = self.standby();
        let full = self.is_full();

        self.request
            .party
            .iter()
            .map(|member| SwitchChoice {
                combatant: member.id,
                name: member.name.clone(),
                availability: Availability::first_of([
                    member.active.then_some(DisabledReason::Active),
                    member.fainted.then_some(DisabledReason::Fainted),
                    standby
                        .contains_combatant(member.id)
                        .then_some(DisabledReason::Standby),
                    full.then_some(DisabledReason::NoSlotsLeft),
                ]),
            })
            .collect()
    }

    /// Send `replacement` into `position`; returns the remaining count
    pub fn push(
        &mut self,
        replacement: CombatantId,
        position: FieldPosition,
    ) -> Result<usize, BuilderError> {
        if self.is_full() {
            return Err(BuilderError::Full(self.request.required));
        }

        self.request
            .party
            .iter()
            .find(|m| m.id == replacement && m.can_enter())
            .ok_or(BuilderError::IneligibleReplacement(replacement))?;

        let standby = self.standby();
        if standby.contains_combatant(replacement) {
            return Err(BuilderError::AlreadyChosen(replacement));
        }
        let eligible: TargetMask = self.eligible_positions().into_iter().collect();
        if !eligible.has(position) {
            return Err(BuilderError::PositionUnavailable(position));
        }
        if standby.contains_position(position) {
            return Err(BuilderError::PositionTaken(position));
        }

        debug!(%replacement, %position, "Replacement recorded");
        self.entries.push(SwitchDecision {
            replacement,
            position,
        });

        Ok(self.remaining_count())
    }

    pub fn pop(&mut self) -> Result<SwitchDecision, BuilderError> {
        let decision = self.entries.pop().ok_or(BuilderError::NothingToUndo)?;
        debug!(replacement = %decision.replacement, "Replacement undone");
        Ok(decision)
    }

    /// Any number of replacements up to the required count may be submitted
    pub fn finish(self) -> TrainerSwitchSet {
        TrainerSwitchSet {
            trainer: self.request.trainer,
            decisions: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::fixtures::{bench, id, switch_request};

    fn two_faints() -> SwitchInBuilder {
        let mut party = vec![bench(0), bench(1), bench(2), bench(3), bench(4)];
        party[0].fainted = true;
        party[1].fainted = true;
        SwitchInBuilder::new(BattleFormat::Triple, switch_request(
            2,
            vec![FieldPosition::ALLY_LEFT, FieldPosition::ALLY_RIGHT],
            party,
        ))
    }

    #[test]
    fn test_remaining_count() {
        let mut builder = two_faints();
        assert_eq!(builder.remaining_count(), 2);
        assert!(!builder.can_pop());

        assert_eq!(builder.push(id(2), FieldPosition::ALLY_LEFT), Ok(1));
        assert_eq!(builder.remaining_count(), 1);
        assert_eq!(builder.next_open_position(), Some(FieldPosition::ALLY_RIGHT));

        assert_eq!(builder.push(id(3), FieldPosition::ALLY_RIGHT), Ok(0));
        assert!(builder.is_full());
        assert_eq!(builder.next_open_position(), None);
        assert_eq!(
            builder.push(id(4), FieldPosition::ALLY_RIGHT),
            Err(BuilderError::Full(2))
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut builder = two_faints();
        builder.push(id(2), FieldPosition::ALLY_LEFT).unwrap();

        assert_eq!(
            builder.push(id(2), FieldPosition::ALLY_RIGHT),
            Err(BuilderError::AlreadyChosen(id(2)))
        );
        assert_eq!(
            builder.push(id(3), FieldPosition::ALLY_LEFT),
            Err(BuilderError::PositionTaken(FieldPosition::ALLY_LEFT))
        );
        assert_eq!(builder.cursor(), 1);
    }

    #[test]
    fn test_ineligible_and_unopened() {
        let mut builder = two_faints();
        assert_eq!(
            builder.push(id(0), FieldPosition::ALLY_LEFT),
            Err(BuilderError::IneligibleReplacement(id(0)))
        );
        assert_eq!(
            builder.push(id(9), FieldPosition::ALLY_LEFT),
            Err(BuilderError::IneligibleReplacement(id(9)))
        );
        assert_eq!(
            builder.push(id(2), FieldPosition::ALLY_CENTER),
            Err(BuilderError::PositionUnavailable(FieldPosition::ALLY_CENTER))
        );
    }

    #[test]
    fn test_options_reflect_standby() {
        let mut builder = two_faints();
        builder.push(id(2), FieldPosition::ALLY_LEFT).unwrap();

        let options = builder.options();
        assert_eq!(options[0].availability.reason(), Some(DisabledReason::Fainted));
        assert_eq!(options[2].availability.reason(), Some(DisabledReason::Standby));
        assert!(options[3].availability.is_enabled());

        builder.push(id(3), FieldPosition::ALLY_RIGHT).unwrap();
        let options = builder.options();
        assert_eq!(options[4].availability.reason(), Some(DisabledReason::NoSlotsLeft));
    }

    #[test]
    fn test_pop_and_finish() {
        let mut builder = two_faints();
        builder.push(id(2), FieldPosition::ALLY_LEFT).unwrap();
        builder.push(id(3), FieldPosition::ALLY_RIGHT).unwrap();

        let undone = builder.pop().unwrap();
        assert_eq!(undone.replacement, id(3));
        assert_eq!(builder.remaining_count(), 1);

        let set = builder.finish();
        assert_eq!(set.decisions.len(), 1);
        assert_eq!(
            set.into_submission().to_choice_string(),
            "switch t0#2 ally-left"
        );
    }

    #[test]
    fn test_unlisted_positions_fall_back_to_ally_actives() {
        let mut party = vec![bench(0), bench(1), bench(2), bench(3)];
        party[0].fainted = true;
        party[1].fainted = true;
        let mut builder = SwitchInBuilder::new(BattleFormat::Double, switch_request(2, vec![], party));

        assert_eq!(
            builder.eligible_positions(),
            vec![FieldPosition::ALLY_LEFT, FieldPosition::ALLY_RIGHT]
        );
        assert_eq!(
            builder.push(id(2), FieldPosition::FOE_CENTER),
            Err(BuilderError::PositionUnavailable(FieldPosition::FOE_CENTER))
        );
        assert_eq!(
            builder.push(id(2), FieldPosition::FOE_LEFT),
            Err(BuilderError::PositionUnavailable(FieldPosition::FOE_LEFT))
        );
        // Not an active column in doubles
        assert_eq!(
            builder.push(id(2), FieldPosition::ALLY_CENTER),
            Err(BuilderError::PositionUnavailable(FieldPosition::ALLY_CENTER))
        );
        assert_eq!(builder.cursor(), 0);

        assert_eq!(builder.next_open_position(), Some(FieldPosition::ALLY_LEFT));
        assert_eq!(builder.push(id(2), FieldPosition::ALLY_LEFT), Ok(1));
        assert_eq!(builder.next_open_position(), Some(FieldPosition::ALLY_RIGHT));
    }

    #[test]
    fn test_pop_empty() {
        let mut builder = two_faints();
        assert_eq!(builder.pop(), Err(BuilderError::NothingToUndo));
    }
}
