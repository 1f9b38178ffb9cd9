use maud::Markup;
use std::time::Duration;
use tracing::warn;

use super::runtime::run_hole;
use crate::error::AppError;
use crate::model::{ContestResult, Round, ScoreEntry};
use crate::score::HoleEditor;
use crate::storage::Storage;
use crate::view::hole::render_hole_editor;

#[derive(Debug, Clone)]
pub struct HoleModel {
    pub editor: HoleEditor,
    pub want_render: bool,
    pub scores: Option<Vec<ScoreEntry>>,
    pub contest: Option<Option<ContestResult>>,
    pub markup: Option<Markup>,
    pub degraded: Vec<String>,
}

impl HoleModel {
    /// # Errors
    ///
    /// Will return `Err` if the round has no such hole.
    pub fn new(round: Round, hole: i32, want_render: bool) -> Result<Self, AppError> {
        Ok(Self {
            editor: HoleEditor::new(round, hole)?,
            want_render,
            scores: None,
            contest: None,
            markup: None,
            degraded: Vec::new(),
        })
    }

    fn loaded(&self) -> bool {
        self.scores.is_some() && self.contest.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    PageLoad,
    ScoresLoaded(Vec<ScoreEntry>),
    ContestLoaded(Option<ContestResult>),
    LoadDegraded(Effect, String),
    Rendered(Markup),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    LoadScores,
    LoadContest,
    RenderTemplate,
}

impl Effect {
    #[must_use]
    pub fn is_remote(self) -> bool {
        matches!(self, Effect::LoadScores | Effect::LoadContest)
    }
}

/// Once both loads have settled the editor is populated from whatever arrived.
fn settle(model: &mut HoleModel) -> Vec<Effect> {
    if !model.loaded() {
        return vec![];
    }
    let scores = model.scores.as_deref().unwrap_or_default();
    let contest = model.contest.as_ref().and_then(Option::as_ref);
    model.editor.populate(scores, contest);
    if model.want_render {
        vec![Effect::RenderTemplate]
    } else {
        vec![]
    }
}

pub fn update(model: &mut HoleModel, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::PageLoad => {
            if model.editor.contest_type().is_some() {
                vec![Effect::LoadScores, Effect::LoadContest]
            } else {
                model.contest = Some(None);
                vec![Effect::LoadScores]
            }
        }
        Msg::ScoresLoaded(rows) => {
            model.scores = Some(rows);
            settle(model)
        }
        Msg::ContestLoaded(row) => {
            model.contest = Some(row);
            settle(model)
        }
        Msg::LoadDegraded(effect, reason) => {
            warn!(
                round = %model.editor.round(),
                hole = model.editor.hole(),
                ?effect,
                "hole load degraded: {reason}"
            );
            model.degraded.push(reason);
            match effect {
                Effect::LoadScores => model.scores = Some(Vec::new()),
                Effect::LoadContest => model.contest = Some(None),
                Effect::RenderTemplate => return vec![],
            }
            settle(model)
        }
        Msg::Rendered(markup) => {
            model.markup = Some(markup);
            vec![]
        }
    }
}

#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub storage: &'a dyn Storage,
    pub load_timeout: Duration,
}

pub async fn run_effect(effect: Effect, model: &HoleModel, deps: Deps<'_>) -> Msg {
    let round = model.editor.round();
    let hole = model.editor.hole();
    match effect {
        Effect::LoadScores => match deps.storage.select_scores(round, Some(hole)).await {
            Ok(rows) => Msg::ScoresLoaded(rows),
            Err(e) => Msg::LoadDegraded(effect, e.to_string()),
        },
        // At most one row is expected; if the store holds more, the first wins.
        Effect::LoadContest => match deps.storage.select_contests(round, Some(hole)).await {
            Ok(rows) => Msg::ContestLoaded(rows.into_iter().next()),
            Err(e) => Msg::LoadDegraded(effect, e.to_string()),
        },
        Effect::RenderTemplate => Msg::Rendered(render_hole_editor(&model.editor, None)),
    }
}

/// Load a hole into a fresh editor. Store failures and the deadline never fail
/// the load; the affected slots stay at the sentinel.
///
/// # Errors
///
/// Will return `Err` if the round has no such hole.
pub async fn load_hole(
    storage: &dyn Storage,
    round: Round,
    hole: i32,
    load_timeout: Duration,
) -> Result<HoleEditor, AppError> {
    let mut model = HoleModel::new(round, hole, false)?;
    run_hole(
        &mut model,
        Msg::PageLoad,
        Deps {
            storage,
            load_timeout,
        },
    )
    .await;
    Ok(model.editor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_contest_holes_skip_the_contest_fetch() {
        let mut model = HoleModel::new(Round::Scarecrow, 1, true).unwrap();
        assert_eq!(update(&mut model, Msg::PageLoad), vec![Effect::LoadScores]);
        assert_eq!(
            update(&mut model, Msg::ScoresLoaded(Vec::new())),
            vec![Effect::RenderTemplate]
        );
    }

    #[test]
    fn degraded_loads_leave_sentinels() {
        let mut model = HoleModel::new(Round::Scarecrow, 3, false).unwrap();
        update(&mut model, Msg::PageLoad);
        update(
            &mut model,
            Msg::LoadDegraded(Effect::LoadScores, "timed out".to_string()),
        );
        update(&mut model, Msg::ContestLoaded(None));
        assert!(model.scores.is_some());
        assert!(
            model
                .editor
                .slots()
                .iter()
                .all(|slot| slot.value.strokes().is_none())
        );
    }
}
