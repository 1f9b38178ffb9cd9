use ahash::RandomState;
use serde::Serialize;
use std::collections::HashMap;

use crate::model::{ContestResult, ContestType, Player, Round, ScoreEntry, StrokeSlot, Subject};

/// The two maps a round's grid is drawn from.
#[derive(Debug, Clone, Default)]
pub struct RoundLookup {
    strokes: HashMap<(Player, i32), i32, RandomState>,
    winners: HashMap<i32, Player, RandomState>,
}

impl RoundLookup {
    /// Rows from another round or with unknown names are left out.
    #[must_use]
    pub fn build(round: Round, scores: &[ScoreEntry], contests: &[ContestResult]) -> Self {
        let strokes = scores
            .iter()
            .filter(|row| row.round == round.name())
            .filter_map(|row| {
                Player::parse(&row.player_name).map(|p| ((p, row.hole_number), row.strokes))
            })
            .collect();
        let winners = contests
            .iter()
            .filter(|row| row.round == round.name())
            .filter_map(|row| Player::parse(&row.winner_name).map(|p| (row.hole_number, p)))
            .collect();
        Self { strokes, winners }
    }

    #[must_use]
    pub fn strokes(&self, subject: Subject, hole: i32) -> StrokeSlot {
        self.strokes
            .get(&(subject.stored_as(), hole))
            .map_or(StrokeSlot::Empty, |&n| StrokeSlot::from_stored(i64::from(n)))
    }

    #[must_use]
    pub fn winner(&self, hole: i32) -> Option<Player> {
        self.winners.get(&hole).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCell {
    pub subject: Subject,
    pub strokes: StrokeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoleRow {
    pub hole: i32,
    pub par: i32,
    pub contest: Option<ContestType>,
    pub winner: Option<Player>,
    pub cells: Vec<SubjectCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundCard {
    pub round: Round,
    pub subjects: Vec<Subject>,
    pub holes: Vec<HoleRow>,
}

impl RoundCard {
    #[must_use]
    pub fn hole(&self, hole: i32) -> Option<&HoleRow> {
        self.holes.iter().find(|row| row.hole == hole)
    }

    /// Strokes recorded so far for a subject, with the par of those holes.
    #[must_use]
    pub fn running_total(&self, subject: Subject) -> (i32, i32) {
        self.holes
            .iter()
            .filter_map(|row| {
                row.cells
                    .iter()
                    .find(|cell| cell.subject == subject)
                    .and_then(|cell| cell.strokes.strokes())
                    .map(|strokes| (strokes, row.par))
            })
            .fold((0, 0), |(s, p), (strokes, par)| (s + strokes, p + par))
    }
}

#[must_use]
pub fn build_round_card(round: Round, lookup: &RoundLookup) -> RoundCard {
    let subjects = round.scoring_subjects().to_vec();
    let holes = (1..=round.hole_count())
        .map(|hole| HoleRow {
            hole,
            par: round.par_for(hole),
            contest: round.contest_type_for(hole),
            winner: lookup.winner(hole),
            cells: subjects
                .iter()
                .map(|&subject| SubjectCell {
                    subject,
                    strokes: lookup.strokes(subject, hole),
                })
                .collect(),
        })
        .collect();
    RoundCard {
        round,
        subjects,
        holes,
    }
}
