use actix_web::web::{Data, Form, Path};
use actix_web::{HttpRequest, HttpResponse};
use reqwest::Url;
use std::collections::HashMap;
use tracing::{error, warn};

use super::AppSettings;
use super::auth::{is_htmx, redirect, require_session};
use super::scorecard::unknown_round;
use crate::error::AppError;
use crate::model::{Player, Round, SENTINEL, StrokeSlot};
use crate::mvu::hole::{Deps, HoleModel, Msg, load_hole};
use crate::mvu::runtime::run_hole;
use crate::score::{HoleEditor, failure_notice};
use crate::session::SessionGate;
use crate::storage::Storage;
use crate::view::hole::{CONFIRM_FIELD, WINNER_FIELD, prior_field, render_hole_editor, score_field};
use crate::view::layout::not_found;

type HoleForm = Form<HashMap<String, String>>;

fn html(mut builder: actix_web::HttpResponseBuilder, markup: maud::Markup) -> HttpResponse {
    builder.content_type("text/html").body(markup.into_string())
}

/// Resolve the path into a blank editor, or the 404 page.
fn editor_for(slug: &str, hole: i32) -> Result<HoleEditor, HttpResponse> {
    let Some(round) = Round::parse(slug) else {
        return Err(unknown_round(slug));
    };
    HoleEditor::new(round, hole)
        .map_err(|e| html(HttpResponse::NotFound(), not_found(&e.user_message())))
}

/// Where to send the client after a save or clear, with the summary attached.
#[must_use]
pub fn scorecard_location(round: Round, notice: &str) -> String {
    let path = format!("/scorecard/{}", round.slug());
    match Url::parse_with_params(&format!("http://localhost{path}"), &[("notice", notice)]) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => path,
    }
}

/// Copy the submitted values into the editor. A missing field reads as the sentinel.
///
/// # Errors
///
/// Will return `Err` for a value that is neither the sentinel nor 1-9, or an unknown winner.
pub fn apply_form(editor: &mut HoleEditor, form: &HashMap<String, String>) -> Result<(), AppError> {
    let field = |name: &str| form.get(name).map_or(SENTINEL, String::as_str);
    let slots = editor.slots().to_vec();
    for slot in &slots {
        let value = StrokeSlot::parse(field(&score_field(slot))).map_err(AppError::Invalid)?;
        // The baseline is echoed back from the page, so a bad one reads as the sentinel.
        let prior = StrokeSlot::parse(field(&prior_field(slot))).unwrap_or_default();
        editor.set_score(slot.subject, value)?;
        editor.set_baseline(slot.subject, prior)?;
    }

    let winner = match field(WINNER_FIELD).trim() {
        "" | SENTINEL => None,
        name => Some(
            Player::parse(name)
                .ok_or_else(|| AppError::Invalid(format!("'{name}' is not one of the players")))?,
        ),
    };
    if editor.contest_type().is_some() {
        editor.set_winner(winner)?;
    }
    Ok(())
}

pub async fn hole_page(
    req: HttpRequest,
    path: Path<(String, i32)>,
    gate: Data<SessionGate>,
    storage: Data<dyn Storage>,
    settings: Data<AppSettings>,
) -> HttpResponse {
    if let Err(redirect) = require_session(&req, &gate).await {
        return redirect;
    }
    let (slug, hole) = path.into_inner();
    let editor = match editor_for(&slug, hole) {
        Ok(editor) => editor,
        Err(response) => return response,
    };

    let mut model = match HoleModel::new(editor.round(), hole, true) {
        Ok(model) => model,
        Err(e) => return html(HttpResponse::NotFound(), not_found(&e.user_message())),
    };
    let deps = Deps {
        storage: &**storage,
        load_timeout: settings.load_timeout,
    };
    run_hole(&mut model, Msg::PageLoad, deps).await;

    let markup = model
        .markup
        .unwrap_or_else(|| render_hole_editor(&model.editor, None));
    html(HttpResponse::Ok(), markup)
}

pub async fn save_hole(
    req: HttpRequest,
    path: Path<(String, i32)>,
    form: HoleForm,
    gate: Data<SessionGate>,
    storage: Data<dyn Storage>,
) -> HttpResponse {
    if let Err(redirect) = require_session(&req, &gate).await {
        return redirect;
    }
    let (slug, hole) = path.into_inner();
    let mut editor = match editor_for(&slug, hole) {
        Ok(editor) => editor,
        Err(response) => return response,
    };

    if let Err(e) = apply_form(&mut editor, &form) {
        warn!(round = %editor.round(), hole, "rejected hole form: {e}");
        let message = failure_notice("save", &e);
        return html(
            HttpResponse::BadRequest(),
            render_hole_editor(&editor, Some(&message)),
        );
    }

    match editor.save(&**storage).await {
        Ok(summary) => redirect(&req, &scorecard_location(editor.round(), &summary.message())),
        Err(e) => {
            error!(round = %editor.round(), hole, "save failed: {e}");
            let message = failure_notice("save", &e);
            html(
                HttpResponse::BadGateway(),
                render_hole_editor(&editor, Some(&message)),
            )
        }
    }
}

pub async fn clear_hole(
    req: HttpRequest,
    path: Path<(String, i32)>,
    form: HoleForm,
    gate: Data<SessionGate>,
    storage: Data<dyn Storage>,
    settings: Data<AppSettings>,
) -> HttpResponse {
    if let Err(redirect) = require_session(&req, &gate).await {
        return redirect;
    }
    let (slug, hole) = path.into_inner();
    let mut editor = match editor_for(&slug, hole) {
        Ok(editor) => editor,
        Err(response) => return response,
    };
    let round = editor.round();

    let failure = if form.get(CONFIRM_FIELD).map(String::as_str) == Some("yes") {
        match editor.clear(&**storage).await {
            Ok(message) => return redirect(&req, &scorecard_location(round, &message)),
            Err(e) => {
                error!(round = %round, hole, "clear failed: {e}");
                (HttpResponse::BadGateway(), failure_notice("clear", &e))
            }
        }
    } else {
        let e = AppError::Invalid("clearing a hole needs confirmation".to_string());
        (HttpResponse::BadRequest(), failure_notice("clear", &e))
    };

    // Nothing was removed, so redraw what the store still holds.
    let current = load_hole(&**storage, round, hole, settings.load_timeout)
        .await
        .unwrap_or(editor);
    let (mut builder, message) = failure;
    if is_htmx(&req) {
        // htmx drops 4xx/5xx bodies, so the failure page goes out as a swappable 200.
        builder = HttpResponse::Ok();
        builder
            .insert_header(("HX-Retarget", "body"))
            .insert_header(("HX-Reswap", "outerHTML"));
    }
    html(builder, render_hole_editor(&current, Some(&message)))
}
