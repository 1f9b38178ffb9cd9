use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::model::{ContestResult, Player, Round, ScoreEntry, StrokeSlot, Subject};
use crate::storage::{Storage, StorageError};

/// One subject's slot as the editor sees it: what is typed now and what was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSlot {
    pub subject: Subject,
    pub value: StrokeSlot,
    pub baseline: StrokeSlot,
}

/// What happens to the contest row of a hole on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContestWrite {
    /// Not a contest hole.
    Untouched,
    /// Delete whatever is there.
    Cleared,
    /// Delete whatever is there, then insert this row.
    Replaced(ContestResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    pub round: Round,
    pub hole: i32,
    pub upserts: Vec<ScoreEntry>,
    pub deletes: Vec<String>,
    pub contest: ContestWrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearPlan {
    pub round: Round,
    pub hole: i32,
    pub deletes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub hole: i32,
    pub saved: usize,
    pub removed: usize,
}

impl SaveSummary {
    #[must_use]
    pub fn message(&self) -> String {
        match (self.saved, self.removed) {
            (0, 0) => "Hole data saved successfully!".to_string(),
            (saved, 0) => format!("Saved {saved} scores for hole {}.", self.hole),
            (0, removed) => format!("Removed {removed} scores from hole {}.", self.hole),
            (saved, removed) => format!("Saved {saved} scores and removed {removed} scores."),
        }
    }
}

/// Every slot with strokes is written again; an empty slot is deleted only if
/// the store held a value for it when the hole was loaded.
#[must_use]
pub fn plan_save(round: Round, hole: i32, slots: &[ScoreSlot], winner: Option<Player>) -> SavePlan {
    let mut upserts = Vec::new();
    let mut deletes = Vec::new();
    for slot in slots {
        match (slot.value.strokes(), slot.baseline) {
            (Some(strokes), _) => {
                upserts.push(ScoreEntry::new(slot.subject, round, hole, strokes));
            }
            (None, StrokeSlot::Strokes(_)) => {
                deletes.push(slot.subject.unique_hole_id(round, hole));
            }
            (None, StrokeSlot::Empty) => {}
        }
    }

    let contest = if round.contest_type_for(hole).is_none() {
        ContestWrite::Untouched
    } else {
        match winner {
            Some(player) => ContestWrite::Replaced(ContestResult::new(round, hole, player)),
            None => ContestWrite::Cleared,
        }
    };

    SavePlan {
        round,
        hole,
        upserts,
        deletes,
        contest,
    }
}

#[must_use]
pub fn plan_clear(round: Round, hole: i32) -> ClearPlan {
    ClearPlan {
        round,
        hole,
        deletes: round
            .scoring_subjects()
            .iter()
            .map(|subject| subject.unique_hole_id(round, hole))
            .collect(),
    }
}

/// Deletes first, then the upsert batch, then the contest row.
/// The first failing call aborts the rest; nothing already applied is undone.
///
/// # Errors
///
/// Will return `Err` with the first store failure.
pub async fn apply_save(storage: &dyn Storage, plan: &SavePlan) -> Result<SaveSummary, StorageError> {
    info!(
        round = %plan.round,
        hole = plan.hole,
        upserts = plan.upserts.len(),
        deletes = plan.deletes.len(),
        "saving hole"
    );

    for unique_hole_id in &plan.deletes {
        storage.delete_score(unique_hole_id).await?;
        debug!(unique_hole_id = %unique_hole_id, "score removed");
    }

    if !plan.upserts.is_empty() {
        storage.upsert_scores(&plan.upserts).await?;
    }

    match &plan.contest {
        ContestWrite::Untouched => {}
        ContestWrite::Cleared => {
            storage.delete_contest(plan.round, plan.hole).await?;
        }
        ContestWrite::Replaced(contest) => {
            storage.delete_contest(plan.round, plan.hole).await?;
            storage.insert_contest(contest).await?;
        }
    }

    Ok(SaveSummary {
        hole: plan.hole,
        saved: plan.upserts.len(),
        removed: plan.deletes.len(),
    })
}

/// # Errors
///
/// Will return `Err` with the first store failure.
pub async fn apply_clear(storage: &dyn Storage, plan: &ClearPlan) -> Result<(), StorageError> {
    info!(round = %plan.round, hole = plan.hole, "clearing hole");
    try_join_all(plan.deletes.iter().map(|id| storage.delete_score(id))).await?;
    storage.delete_contest(plan.round, plan.hole).await?;
    Ok(())
}
