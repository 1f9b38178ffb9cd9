use actix_web::web::{Data, Path, Query};
use actix_web::{HttpRequest, HttpResponse};
use serde::Deserialize;

use super::AppSettings;
use super::auth::require_session;
use crate::model::Round;
use crate::mvu::runtime::run_scorecard;
use crate::mvu::scorecard::{Deps, Msg, ScorecardModel};
use crate::session::SessionGate;
use crate::storage::Storage;
use crate::view::layout::not_found;
use crate::view::scorecard::render_scorecard_page;

#[derive(Deserialize)]
pub struct PageQuery {
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct GridQuery {
    pub json: Option<String>,
}

pub(super) fn unknown_round(slug: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html")
        .body(not_found(&format!("There is no round called '{slug}'.")).into_string())
}

pub async fn scorecard_page(
    req: HttpRequest,
    path: Path<String>,
    query: Query<PageQuery>,
    gate: Data<SessionGate>,
) -> HttpResponse {
    if let Err(redirect) = require_session(&req, &gate).await {
        return redirect;
    }
    let Some(round) = Round::parse(&path) else {
        return unknown_round(&path);
    };
    HttpResponse::Ok()
        .content_type("text/html")
        .body(render_scorecard_page(round, query.notice.as_deref()).into_string())
}

/// The htmx fragment, or the round card as JSON with `?json=1`.
pub async fn scorecard_grid(
    req: HttpRequest,
    path: Path<String>,
    query: Query<GridQuery>,
    gate: Data<SessionGate>,
    storage: Data<dyn Storage>,
    settings: Data<AppSettings>,
) -> HttpResponse {
    if let Err(redirect) = require_session(&req, &gate).await {
        return redirect;
    }
    let Some(round) = Round::parse(&path) else {
        return unknown_round(&path);
    };
    let want_json = query.json.as_deref() == Some("1");

    let mut model = ScorecardModel::new(round, want_json);
    let deps = Deps {
        storage: &**storage,
        load_timeout: settings.load_timeout,
    };
    run_scorecard(&mut model, Msg::PageLoad, deps).await;

    if want_json {
        return match model.card {
            Some(card) => HttpResponse::Ok().json(card),
            None => HttpResponse::InternalServerError().finish(),
        };
    }
    match model.markup {
        Some(markup) => HttpResponse::Ok()
            .content_type("text/html")
            .body(markup.into_string()),
        None => HttpResponse::InternalServerError().finish(),
    }
}
