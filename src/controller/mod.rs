use actix_web::web::{self, Data, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse};
use std::time::Duration;

use crate::session::SessionGate;
use crate::view::home::render_home;

pub mod auth;
pub mod hole;
pub mod scorecard;

/// Settings the handlers read on every request.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub load_timeout: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_millis(crate::DEFAULT_LOAD_TIMEOUT_MS),
        }
    }
}

pub async fn home(req: HttpRequest, gate: Data<SessionGate>) -> HttpResponse {
    if let Err(redirect) = auth::require_session(&req, &gate).await {
        return redirect;
    }
    HttpResponse::Ok()
        .content_type("text/html")
        .body(render_home().into_string())
}

/// Every route except `/static`, which needs a directory on disk.
/// Callers register `Data<dyn Storage>`, `Data<SessionGate>` and `Data<AppSettings>`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/login", web::get().to(auth::login_page))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        .route("/scorecard/{round}", web::get().to(scorecard::scorecard_page))
        .route("/scorecard/{round}/grid", web::get().to(scorecard::scorecard_grid))
        .route("/hole/{round}/{hole}", web::get().to(hole::hole_page))
        .route("/hole/{round}/{hole}", web::post().to(hole::save_hole))
        .route("/hole/{round}/{hole}/clear", web::post().to(hole::clear_hole))
        .route("/health", web::get().to(HttpResponse::Ok));
}
