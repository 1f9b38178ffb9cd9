use maud::Markup;
use std::time::Duration;
use tracing::warn;

use super::runtime::run_scorecard;
use crate::model::{ContestResult, Round, ScoreEntry};
use crate::score::{RoundCard, RoundLookup, build_round_card};
use crate::storage::Storage;
use crate::view::scorecard::render_scorecard_grid;

#[derive(Debug, Clone)]
pub struct ScorecardModel {
    pub round: Round,
    pub want_json: bool,
    pub scores: Option<Vec<ScoreEntry>>,
    pub contests: Option<Vec<ContestResult>>,
    pub card: Option<RoundCard>,
    pub markup: Option<Markup>,
    /// Loads that gave up, with the reason. The grid is still drawn without them.
    pub degraded: Vec<String>,
}

impl ScorecardModel {
    #[must_use]
    pub fn new(round: Round, want_json: bool) -> Self {
        Self {
            round,
            want_json,
            scores: None,
            contests: None,
            card: None,
            markup: None,
            degraded: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    PageLoad,
    ScoresLoaded(Vec<ScoreEntry>),
    ContestsLoaded(Vec<ContestResult>),
    LoadDegraded(Effect, String),
    CardBuilt(RoundCard),
    Rendered(Markup),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    LoadScores,
    LoadContests,
    BuildCard,
    RenderTemplate,
}

impl Effect {
    /// Effects that talk to the store and fall under the load deadline.
    #[must_use]
    pub fn is_remote(self) -> bool {
        matches!(self, Effect::LoadScores | Effect::LoadContests)
    }
}

fn ready_to_build(model: &ScorecardModel) -> Vec<Effect> {
    if model.scores.is_some() && model.contests.is_some() {
        vec![Effect::BuildCard]
    } else {
        vec![]
    }
}

pub fn update(model: &mut ScorecardModel, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::PageLoad => vec![Effect::LoadScores, Effect::LoadContests],
        Msg::ScoresLoaded(rows) => {
            model.scores = Some(rows);
            ready_to_build(model)
        }
        Msg::ContestsLoaded(rows) => {
            model.contests = Some(rows);
            ready_to_build(model)
        }
        Msg::LoadDegraded(effect, reason) => {
            warn!(round = %model.round, ?effect, "scorecard load degraded: {reason}");
            model.degraded.push(reason);
            match effect {
                Effect::LoadScores => model.scores = Some(Vec::new()),
                Effect::LoadContests => model.contests = Some(Vec::new()),
                Effect::BuildCard | Effect::RenderTemplate => return vec![],
            }
            ready_to_build(model)
        }
        Msg::CardBuilt(card) => {
            model.card = Some(card);
            if model.want_json {
                vec![]
            } else {
                vec![Effect::RenderTemplate]
            }
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

pub async fn run_effect(effect: Effect, model: &ScorecardModel, deps: Deps<'_>) -> Msg {
    match effect {
        Effect::LoadScores => match deps.storage.select_scores(model.round, None).await {
            Ok(rows) => Msg::ScoresLoaded(rows),
            Err(e) => Msg::LoadDegraded(effect, e.to_string()),
        },
        Effect::LoadContests => match deps.storage.select_contests(model.round, None).await {
            Ok(rows) => Msg::ContestsLoaded(rows),
            Err(e) => Msg::LoadDegraded(effect, e.to_string()),
        },
        Effect::BuildCard => {
            let scores = model.scores.as_deref().unwrap_or_default();
            let contests = model.contests.as_deref().unwrap_or_default();
            let lookup = RoundLookup::build(model.round, scores, contests);
            Msg::CardBuilt(build_round_card(model.round, &lookup))
        }
        Effect::RenderTemplate => match model.card.as_ref() {
            Some(card) => Msg::Rendered(render_scorecard_grid(card)),
            None => Msg::LoadDegraded(effect, "no card to render".to_string()),
        },
    }
}

/// Fetch a round and build its card. Store failures and the deadline degrade to
/// empty data instead of failing.
pub async fn load_round(storage: &dyn Storage, round: Round, load_timeout: Duration) -> RoundCard {
    let mut model = ScorecardModel::new(round, true);
    run_scorecard(
        &mut model,
        Msg::PageLoad,
        Deps {
            storage,
            load_timeout,
        },
    )
    .await;
    model
        .card
        .unwrap_or_else(|| build_round_card(round, &RoundLookup::default()))
}
