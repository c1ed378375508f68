//! Per-turn action building

use baton_protocol::{
    ActionRequest, ActiveCombatant, BattleFormat, CombatantId, Decision, ForcedMove, MoveRef,
    Submission, TargetCategory, TrainerId, TurnDecision,
};
use tracing::{debug, warn};

use super::error::BuilderError;
use super::options::{
    ActionOptions, Availability, DisabledReason, ItemChoice, MoveChoice, SwitchChoice,
};
use super::standby::StandbySet;
use crate::targeting::{TargetTable, resolve};

/// Where a turn builder stands after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    /// Waiting for a decision for this combatant
    Awaiting(CombatantId),
    /// One decision per active combatant has been made
    Complete,
}

/// A finished set of turn decisions, in active order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerDecisionSet {
    pub trainer: TrainerId,
    pub decisions: Vec<TurnDecision>,
}

impl TrainerDecisionSet {
    pub fn into_submission(self) -> Submission {
        Submission::Turn {
            trainer: self.trainer,
            decisions: self.decisions,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    decision: TurnDecision,
    /// Pushed automatically for a forced move, not by the player
    forced: bool,
}

/// Collects one decision per active combatant for a single turn.
///
/// Combatants are visited in request order. Combatants whose move is forced
/// get their decision automatically as soon as the cursor reaches them, and
/// [`pop`](Self::pop) skips back over them to the last decision the player
/// made. Every rejected operation leaves the builder untouched.
#[derive(Debug, Clone)]
pub struct TurnActionBuilder {
    format: BattleFormat,
    request: ActionRequest,
    entries: Vec<Entry>,
}

impl TurnActionBuilder {
    pub fn new(format: BattleFormat, request: ActionRequest) -> Self {
        let mut builder = Self {
            format,
            request,
            entries: Vec::with_capacity(3),
        };
        builder.apply_forced();
        builder
    }

    pub fn format(&self) -> BattleFormat {
        self.format
    }

    pub fn trainer(&self) -> TrainerId {
        self.request.trainer
    }

    pub fn request(&self) -> &ActionRequest {
        &self.request
    }

    /// Number of decisions needed
    pub fn len(&self) -> usize {
        self.request.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request.active.is_empty()
    }

    /// Index of the combatant awaiting a decision
    pub fn cursor(&self) -> usize {
        self.entries.len()
    }

    /// The combatant awaiting a decision, `None` once complete
    pub fn current(&self) -> Option<&ActiveCombatant> {
        self.request.active.get(self.entries.len())
    }

    pub fn progress(&self) -> TurnProgress {
        match self.current() {
            Some(combatant) => TurnProgress::Awaiting(combatant.id),
            None => TurnProgress::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() >= self.request.active.len()
    }

    /// Decisions made so far, in active order
    pub fn decisions(&self) -> impl Iterator<Item = &TurnDecision> {
        self.entries.iter().map(|e| &e.decision)
    }

    /// Whether there is a player-made decision to take back
    pub fn can_pop(&self) -> bool {
        self.entries.iter().any(|e| !e.forced)
    }

    /// Replacements already claimed by earlier switch decisions
    pub fn standby(&self) -> StandbySet {
        StandbySet::new(
            self.decisions().filter_map(|d| d.decision.replacement()),
            std::iter::empty(),
        )
    }

    /// Target table for the current combatant's move in `slot`
    pub fn target_table(&self, slot: usize) -> Result<TargetTable, BuilderError> {
        let combatant = self.current().ok_or(BuilderError::Complete)?;
        let mv = combatant
            .moves
            .get(slot)
            .ok_or(BuilderError::UnknownMoveSlot(slot))?;

        Ok(resolve(
            self.format,
            combatant.position,
            mv.target,
            combatant.locked_targets,
        ))
    }

    /// Choice lists for the current combatant, `None` once complete
    pub fn options(&self) -> Option<ActionOptions> {
        let combatant = self.current()?;
        let standby = self.standby();

        let moves = combatant
            .moves
            .iter()
            .enumerate()
            .map(|(slot, mv)| {
                let no_target = self
                    .target_table(slot)
                    .map(|table| table.is_empty())
                    .unwrap_or(true);
                MoveChoice {
                    slot,
                    id: mv.id.clone(),
                    name: mv.name.clone(),
                    target: mv.target,
                    pp: mv.pp,
                    max_pp: mv.max_pp,
                    availability: Availability::first_of([
                        (mv.pp == 0).then_some(DisabledReason::NoPp),
                        mv.disabled.then_some(DisabledReason::MoveDisabled),
                        no_target.then_some(DisabledReason::NoLegalTarget),
                    ]),
                }
            })
            .collect();

        let trapped = !combatant.can_switch();
        let switches = self
            .request
            .party
            .iter()
            .map(|member| SwitchChoice {
                combatant: member.id,
                name: member.name.clone(),
                availability: Availability::first_of([
                    trapped.then_some(DisabledReason::Trapped),
                    member.active.then_some(DisabledReason::Active),
                    member.fainted.then_some(DisabledReason::Fainted),
                    standby
                        .contains_combatant(member.id)
                        .then_some(DisabledReason::Standby),
                ]),
            })
            .collect();

        let items = self
            .request
            .items
            .iter()
            .map(|item| {
                let remaining = item.quantity.saturating_sub(self.item_claims(&item.id));
                ItemChoice {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    remaining,
                    availability: Availability::first_of([
                        (remaining == 0).then_some(DisabledReason::OutOfStock),
                    ]),
                }
            })
            .collect();

        Some(ActionOptions {
            combatant: combatant.id,
            moves,
            switches,
            items,
            can_flee: self.request.can_flee,
        })
    }

    /// Record `decision` for the current combatant.
    ///
    /// Forced decisions for the following combatants are applied before
    /// returning.
    pub fn push(&mut self, decision: Decision) -> Result<TurnProgress, BuilderError> {
        let combatant = self.current().ok_or(BuilderError::Complete)?;
        self.validate(combatant, &decision)?;

        let combatant = combatant.id;
        debug!(%combatant, %decision, "Decision recorded");
        self.entries.push(Entry {
            decision: TurnDecision {
                combatant,
                decision,
            },
            forced: false,
        });
        self.apply_forced();

        Ok(self.progress())
    }

    /// Take back the last player-made decision, along with any forced
    /// decisions recorded after it.
    pub fn pop(&mut self) -> Result<TurnProgress, BuilderError> {
        if !self.can_pop() {
            return Err(BuilderError::NothingToUndo);
        }

        while let Some(entry) = self.entries.pop() {
            if !entry.forced {
                debug!(combatant = %entry.decision.combatant, "Decision undone");
                break;
            }
        }

        Ok(self.progress())
    }

    pub fn finish(self) -> Result<TrainerDecisionSet, BuilderError> {
        if !self.is_complete() {
            return Err(BuilderError::Incomplete {
                made: self.entries.len(),
                needed: self.request.active.len(),
            });
        }

        Ok(TrainerDecisionSet {
            trainer: self.request.trainer,
            decisions: self.entries.into_iter().map(|e| e.decision).collect(),
        })
    }

    fn validate(&self, combatant: &ActiveCombatant, decision: &Decision) -> Result<(), BuilderError> {
        match decision {
            Decision::Move {
                choice: MoveRef::Slot(slot),
                targets,
            } => {
                let mv = combatant
                    .moves
                    .get(*slot)
                    .ok_or(BuilderError::UnknownMoveSlot(*slot))?;
                if !mv.is_usable() {
                    return Err(BuilderError::MoveUnavailable(*slot));
                }

                let table = resolve(
                    self.format,
                    combatant.position,
                    mv.target,
                    combatant.locked_targets,
                );
                if table.is_empty() {
                    return Err(BuilderError::NoLegalTarget(*slot));
                }
                if !table.offers(*targets) {
                    return Err(BuilderError::IllegalTarget(*targets));
                }
            }
            Decision::Move {
                choice: MoveRef::Struggle,
                ..
            } => return Err(BuilderError::StruggleNotForced),
            Decision::Item { item } => {
                let option = self
                    .request
                    .items
                    .iter()
                    .find(|i| &i.id == item)
                    .ok_or_else(|| BuilderError::ItemUnavailable(item.clone()))?;
                if self.item_claims(item) >= option.quantity {
                    return Err(BuilderError::ItemUnavailable(item.clone()));
                }
            }
            Decision::Switch { replacement } => {
                if !combatant.can_switch() {
                    return Err(BuilderError::SwitchNotAllowed(combatant.id));
                }
                self.request
                    .party
                    .iter()
                    .find(|m| m.id == *replacement && m.can_enter())
                    .ok_or(BuilderError::IneligibleReplacement(*replacement))?;
                if self.standby().contains_combatant(*replacement) {
                    return Err(BuilderError::AlreadyChosen(*replacement));
                }
            }
        }

        Ok(())
    }

    fn item_claims(&self, item: &str) -> u32 {
        self.decisions()
            .filter(|d| matches!(&d.decision, Decision::Item { item: claimed } if claimed == item))
            .count() as u32
    }

    fn apply_forced(&mut self) {
        while let Some((combatant, decision)) = self
            .current()
            .and_then(|c| forced_decision(self.format, c).map(|d| (c.id, d)))
        {
            debug!(%combatant, %decision, "Forced decision applied");
            self.entries.push(Entry {
                decision: TurnDecision {
                    combatant,
                    decision,
                },
                forced: true,
            });
        }
    }
}

fn forced_decision(format: BattleFormat, combatant: &ActiveCombatant) -> Option<Decision> {
    let (choice, category) = match combatant.forced? {
        ForcedMove::Struggle => (MoveRef::Struggle, TargetCategory::RandomNormal),
        ForcedMove::Locked { slot } => (
            MoveRef::Slot(slot),
            combatant
                .moves
                .get(slot)
                .map(|m| m.target)
                .unwrap_or(TargetCategory::Normal),
        ),
    };

    // A lost lock target leaves retargeting to the simulation
    let targets = match resolve(format, combatant.position, category, combatant.locked_targets)
        .default_mask()
    {
        Some(targets) => targets,
        None => {
            warn!(
                combatant = %combatant.id,
                locked = ?combatant.locked_targets,
                "Forced move has no legal target, submitting the lock as is"
            );
            combatant.locked_targets
        }
    };

    Some(Decision::Move { choice, targets })
}
