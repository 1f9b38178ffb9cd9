use std::future::Future;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

use crate::mvu::hole::{self, HoleModel};
use crate::mvu::scorecard::{self, ScorecardModel};

/// Wait for `fut` until `deadline`; `None` means the deadline passed first.
async fn bounded<F: Future>(deadline: Instant, fut: F) -> Option<F::Output> {
    timeout_at(deadline, fut).await.ok()
}

fn timed_out(load_timeout: std::time::Duration) -> String {
    format!("store did not answer within {} ms", load_timeout.as_millis())
}

/// Runs the MVU loop for a round's grid: seeds with `init_msg` and drains effects.
/// Store effects share one deadline; a miss becomes a degraded load.
pub async fn run_scorecard(
    model: &mut ScorecardModel,
    init_msg: scorecard::Msg,
    deps: scorecard::Deps<'_>,
) {
    let deadline = Instant::now() + deps.load_timeout;
    let mut effects = scorecard::update(model, init_msg);
    while let Some(effect) = effects.pop() {
        if cfg!(debug_assertions) {
            debug!(?effect, round = %model.round, "scorecard effect");
        }
        let msg = if effect.is_remote() {
            bounded(deadline, scorecard::run_effect(effect, model, deps))
                .await
                .unwrap_or_else(|| {
                    scorecard::Msg::LoadDegraded(effect, timed_out(deps.load_timeout))
                })
        } else {
            scorecard::run_effect(effect, model, deps).await
        };
        effects.extend(scorecard::update(model, msg));
    }
}

/// Same loop for the hole editor.
pub async fn run_hole(model: &mut HoleModel, init_msg: hole::Msg, deps: hole::Deps<'_>) {
    let deadline = Instant::now() + deps.load_timeout;
    let mut effects = hole::update(model, init_msg);
    while let Some(effect) = effects.pop() {
        if cfg!(debug_assertions) {
            debug!(
                ?effect,
                round = %model.editor.round(),
                hole = model.editor.hole(),
                "hole effect"
            );
        }
        let msg = if effect.is_remote() {
            bounded(deadline, hole::run_effect(effect, model, deps))
                .await
                .unwrap_or_else(|| hole::Msg::LoadDegraded(effect, timed_out(deps.load_timeout)))
        } else {
            hole::run_effect(effect, model, deps).await
        };
        effects.extend(hole::update(model, msg));
    }
}
