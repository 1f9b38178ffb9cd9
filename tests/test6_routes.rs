mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::{App, test};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use common::{Mode, RecordingStorage};
use fore_scorecard::model::{Player, Round, ScoreEntry, Subject};
use fore_scorecard::session::SESSION_COOKIE;
use fore_scorecard::storage::Storage;
use fore_scorecard::{AppSettings, SessionGate, SessionPolicy, configure};

struct Harness {
    storage: Arc<RecordingStorage>,
    gate: SessionGate,
}

impl Harness {
    fn new() -> Self {
        Self {
            storage: Arc::new(RecordingStorage::new()),
            gate: SessionGate::new(SessionPolicy::with_ttl_hours("birdie", 12)),
        }
    }

    async fn cookie(&self) -> Cookie<'static> {
        let session = self.gate.login("birdie", Utc::now()).await.unwrap();
        Cookie::new(SESSION_COOKIE, session.token)
    }
}

macro_rules! app {
    ($h:expr) => {{
        let storage: Arc<dyn Storage> = $h.storage.clone();
        test::init_service(
            App::new()
                .app_data(Data::from(storage))
                .app_data(Data::new($h.gate.clone()))
                .app_data(Data::new(AppSettings {
                    load_timeout: Duration::from_millis(200),
                }))
                .configure(configure),
        )
        .await
    }};
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn pages_need_a_session() {
    let h = Harness::new();
    let app = app!(h);

    for uri in ["/", "/scorecard/scarecrow", "/hole/scarecrow/1"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/login");
    }

    let req = test::TestRequest::get()
        .uri("/scorecard/scarecrow/grid")
        .insert_header(("HX-Request", "true"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("HX-Redirect").unwrap(), "/login");

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn login_sets_a_session_cookie() {
    let h = Harness::new();
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("password", "bogey")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(resp).await;
    assert!(
        String::from_utf8_lossy(&body).contains("Incorrect password. Please try again.")
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("password", "birdie")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(cookie.http_only(), Some(true));
    assert!(h.gate.validate(cookie.value(), Utc::now()).await);

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(Cookie::new(SESSION_COOKIE, cookie.value().to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login");
    assert_eq!(h.gate.live_sessions().await, 0);
}

#[actix_web::test]
async fn unknown_rounds_and_holes_are_not_found() {
    let h = Harness::new();
    let app = app!(h);
    let cookie = h.cookie().await;

    for uri in ["/scorecard/pebble-beach", "/hole/quicksands/15", "/hole/scarecrow/0"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn save_then_view_the_scorecard() {
    let h = Harness::new();
    let app = app!(h);
    let cookie = h.cookie().await;

    let req = test::TestRequest::get()
        .uri("/hole/scarecrow/3")
        .cookie(cookie.clone())
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("name=\"score_ivan\""));
    assert!(page.contains("name=\"prior_marshall\""));
    assert!(page.contains("Long Drive"));

    let req = test::TestRequest::post()
        .uri("/hole/scarecrow/3")
        .cookie(cookie.clone())
        .set_form([
            ("score_ivan", "4"),
            ("prior_ivan", "-"),
            ("score_patrick", "5"),
            ("prior_patrick", "-"),
            ("score_jack", "-"),
            ("prior_jack", "-"),
            ("score_marshall", "-"),
            ("prior_marshall", "-"),
            ("winner", "Ivan"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/scorecard/scarecrow?notice=Saved+2+scores+for+hole+3."
    );

    let req = test::TestRequest::get()
        .uri("/scorecard/scarecrow?notice=Saved+2+scores+for+hole+3.")
        .cookie(cookie.clone())
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("Saved 2 scores for hole 3."));
    assert!(page.contains("hx-get=\"/scorecard/scarecrow/grid\""));

    let req = test::TestRequest::get()
        .uri("/scorecard/scarecrow/grid?json=1")
        .cookie(cookie.clone())
        .to_request();
    let card: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(card["holes"].as_array().unwrap().len(), 18);
    assert_eq!(card["holes"][2]["winner"], "Ivan");
    assert_eq!(card["holes"][2]["cells"][0]["strokes"]["Strokes"], 4);

    let req = test::TestRequest::get()
        .uri("/scorecard/scarecrow/grid")
        .cookie(cookie)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("<table"));
}

#[actix_web::test]
async fn invalid_and_failed_saves_redraw_the_form() {
    let h = Harness::new();
    let app = app!(h);
    let cookie = h.cookie().await;

    let req = test::TestRequest::post()
        .uri("/hole/gamble-sands/1")
        .cookie(cookie.clone())
        .set_form([("score_ivan", "11")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    h.storage
        .set_mode(Mode::FailWrites("JWT expired".to_string()));
    let req = test::TestRequest::post()
        .uri("/hole/gamble-sands/1")
        .cookie(cookie)
        .set_form([("score_ivan", "4")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Failed to save hole data: JWT expired"));
    // The submitted value stays selected.
    assert!(body.contains("<option value=\"4\" selected>4</option>"));
}

#[actix_web::test]
async fn clear_needs_confirmation() {
    let h = Harness::new();
    h.storage
        .seed_scores(&[ScoreEntry::new(
            Subject::Player(Player::Jack),
            Round::Scarecrow,
            9,
            3,
        )])
        .await;
    let app = app!(h);
    let cookie = h.cookie().await;

    let req = test::TestRequest::post()
        .uri("/hole/scarecrow/9/clear")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.storage.inner.score_count().await, 1);

    let req = test::TestRequest::post()
        .uri("/hole/scarecrow/9/clear")
        .cookie(cookie)
        .insert_header(("HX-Request", "true"))
        .set_form([("confirm", "yes")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("HX-Redirect").unwrap(),
        "/scorecard/scarecrow?notice=Cleared+all+data+for+hole+9"
    );
    assert_eq!(h.storage.inner.score_count().await, 0);
}

#[actix_web::test]
async fn failed_htmx_clear_is_swapped_into_the_page() {
    let h = Harness::new();
    h.storage
        .seed_scores(&[ScoreEntry::new(
            Subject::Player(Player::Jack),
            Round::Scarecrow,
            9,
            3,
        )])
        .await;
    h.storage
        .set_mode(Mode::FailWrites("permission denied for table scores".to_string()));
    let app = app!(h);
    let cookie = h.cookie().await;

    let req = test::TestRequest::post()
        .uri("/hole/scarecrow/9/clear")
        .cookie(cookie.clone())
        .insert_header(("HX-Request", "true"))
        .set_form([("confirm", "yes")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("HX-Retarget").unwrap(), "body");
    assert_eq!(resp.headers().get("HX-Reswap").unwrap(), "outerHTML");
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Failed to clear hole data: permission denied for table scores"));
    assert_eq!(h.storage.inner.score_count().await, 1);

    // A plain form post keeps the real status.
    let req = test::TestRequest::post()
        .uri("/hole/scarecrow/9/clear")
        .cookie(cookie)
        .set_form([("confirm", "yes")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.headers().get("HX-Retarget").is_none());
}

#[actix_web::test]
async fn out_of_range_stored_strokes_do_not_block_saves() {
    let h = Harness::new();
    h.storage
        .seed_scores(&[ScoreEntry::new(
            Subject::Player(Player::Jack),
            Round::Scarecrow,
            5,
            10,
        )])
        .await;
    let app = app!(h);
    let cookie = h.cookie().await;

    let req = test::TestRequest::get()
        .uri("/hole/scarecrow/5")
        .cookie(cookie.clone())
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("name=\"prior_jack\" value=\"-\""));

    // A stale page can still echo the raw count back.
    for prior_jack in ["-", "10"] {
        let req = test::TestRequest::post()
            .uri("/hole/scarecrow/5")
            .cookie(cookie.clone())
            .set_form([
                ("score_ivan", "4"),
                ("prior_ivan", "-"),
                ("score_patrick", "-"),
                ("prior_patrick", "-"),
                ("score_jack", "-"),
                ("prior_jack", prior_jack),
                ("score_marshall", "-"),
                ("prior_marshall", "-"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "prior_jack={prior_jack}");
        assert_eq!(
            location(&resp),
            "/scorecard/scarecrow?notice=Saved+1+scores+for+hole+5."
        );
    }
    let rows = h.storage.inner.select_scores(Round::Scarecrow, Some(5)).await.unwrap();
    assert_eq!(rows.len(), 2);
}
