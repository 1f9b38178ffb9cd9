use serde::Serialize;
use tracing::info;

use super::reconcile::{
    ClearPlan, SavePlan, SaveSummary, ScoreSlot, apply_clear, apply_save, plan_clear, plan_save,
};
use crate::error::AppError;
use crate::model::{ContestResult, ContestType, Player, Round, ScoreEntry, StrokeSlot, Subject};
use crate::storage::Storage;

/// The edit buffer for one hole of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoleEditor {
    round: Round,
    hole: i32,
    slots: Vec<ScoreSlot>,
    winner: Option<Player>,
}

impl HoleEditor {
    /// All slots start at the sentinel.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the round has no such hole.
    pub fn new(round: Round, hole: i32) -> Result<Self, AppError> {
        if !round.has_hole(hole) {
            return Err(AppError::NotFound(format!(
                "{round} has no hole {hole}, it has {} holes",
                round.hole_count()
            )));
        }
        Ok(Self {
            round,
            hole,
            slots: Self::empty_slots(round),
            winner: None,
        })
    }

    fn empty_slots(round: Round) -> Vec<ScoreSlot> {
        round
            .scoring_subjects()
            .iter()
            .map(|&subject| ScoreSlot {
                subject,
                value: StrokeSlot::Empty,
                baseline: StrokeSlot::Empty,
            })
            .collect()
    }

    #[must_use]
    pub fn round(&self) -> Round {
        self.round
    }

    #[must_use]
    pub fn hole(&self) -> i32 {
        self.hole
    }

    #[must_use]
    pub fn par(&self) -> i32 {
        self.round.par_for(self.hole)
    }

    #[must_use]
    pub fn contest_type(&self) -> Option<ContestType> {
        self.round.contest_type_for(self.hole)
    }

    #[must_use]
    pub fn slots(&self) -> &[ScoreSlot] {
        &self.slots
    }

    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[must_use]
    pub fn value_of(&self, subject: Subject) -> Option<StrokeSlot> {
        self.slots
            .iter()
            .find(|slot| slot.subject == subject)
            .map(|slot| slot.value)
    }

    /// Fill slots from stored rows. Rows for other holes or for names that are
    /// not a scoring subject of this round are skipped.
    pub fn populate(&mut self, scores: &[ScoreEntry], contest: Option<&ContestResult>) {
        self.slots = Self::empty_slots(self.round);
        self.winner = None;

        for row in scores {
            if row.round != self.round.name() || row.hole_number != self.hole {
                continue;
            }
            let Some(subject) = self.round.subject_for_stored_name(&row.player_name) else {
                continue;
            };
            let stored = StrokeSlot::from_stored(i64::from(row.strokes));
            if let Some(slot) = self.slots.iter_mut().find(|s| s.subject == subject) {
                slot.value = stored;
                slot.baseline = stored;
            }
        }

        if let Some(contest) = contest {
            self.winner = Player::parse(&contest.winner_name);
        }
    }

    fn slot_mut(&mut self, subject: Subject) -> Result<&mut ScoreSlot, AppError> {
        let round = self.round;
        self.slots
            .iter_mut()
            .find(|slot| slot.subject == subject)
            .ok_or_else(|| {
                AppError::Invalid(format!("{} does not score in {round}", subject.label()))
            })
    }

    /// # Errors
    ///
    /// Will return `Err` if the subject does not score in this round.
    pub fn set_score(&mut self, subject: Subject, value: StrokeSlot) -> Result<(), AppError> {
        self.slot_mut(subject)?.value = value;
        Ok(())
    }

    /// Record what the store held for a subject when the hole was loaded.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the subject does not score in this round.
    pub fn set_baseline(&mut self, subject: Subject, baseline: StrokeSlot) -> Result<(), AppError> {
        self.slot_mut(subject)?.baseline = baseline;
        Ok(())
    }

    /// # Errors
    ///
    /// Will return `Err` when naming a winner on a hole without a contest.
    pub fn set_winner(&mut self, winner: Option<Player>) -> Result<(), AppError> {
        if winner.is_some() && self.contest_type().is_none() {
            return Err(AppError::Invalid(format!(
                "hole {} of {} has no contest",
                self.hole, self.round
            )));
        }
        self.winner = winner;
        Ok(())
    }

    #[must_use]
    pub fn plan_save(&self) -> SavePlan {
        plan_save(self.round, self.hole, &self.slots, self.winner)
    }

    #[must_use]
    pub fn plan_clear(&self) -> ClearPlan {
        plan_clear(self.round, self.hole)
    }

    /// Writes the buffer to the store. On failure the buffer is left as it was.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any store call fails.
    pub async fn save(&mut self, storage: &dyn Storage) -> Result<SaveSummary, AppError> {
        let plan = self.plan_save();
        let summary = apply_save(storage, &plan).await?;
        for slot in &mut self.slots {
            slot.baseline = slot.value;
        }
        info!(round = %self.round, hole = self.hole, "{}", summary.message());
        Ok(summary)
    }

    /// Removes every score and the contest for this hole, whatever the buffer holds.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any store call fails.
    pub async fn clear(&mut self, storage: &dyn Storage) -> Result<String, AppError> {
        apply_clear(storage, &self.plan_clear()).await?;
        self.slots = Self::empty_slots(self.round);
        self.winner = None;
        Ok(format!("Cleared all data for hole {}", self.hole))
    }
}

#[must_use]
pub fn failure_notice(action: &str, err: &AppError) -> String {
    format!("Failed to {action} hole data: {}", err.user_message())
}
