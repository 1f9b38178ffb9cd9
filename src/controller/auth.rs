use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::http::header::LOCATION;
use actix_web::web::{Data, Form};
use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::session::{SESSION_COOKIE, Session, SessionGate};
use crate::view::login::render_login;

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

#[must_use]
pub fn session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub async fn is_logged_in(req: &HttpRequest, gate: &SessionGate) -> bool {
    match session_token(req) {
        Some(token) => gate.validate(&token, Utc::now()).await,
        None => false,
    }
}

pub(crate) fn is_htmx(req: &HttpRequest) -> bool {
    req.headers().contains_key("HX-Request")
}

/// A redirect that also works for htmx requests, which would otherwise swap the
/// target page into the current one.
#[must_use]
pub fn redirect(req: &HttpRequest, location: &str) -> HttpResponse {
    if is_htmx(req) {
        HttpResponse::Ok()
            .insert_header(("HX-Redirect", location))
            .finish()
    } else {
        HttpResponse::SeeOther()
            .insert_header((LOCATION, location))
            .finish()
    }
}

/// `Err` carries the response to send instead of the page.
///
/// # Errors
///
/// Will return `Err` with a redirect to the login page when there is no live session.
pub async fn require_session(req: &HttpRequest, gate: &SessionGate) -> Result<(), HttpResponse> {
    if is_logged_in(req, gate).await {
        Ok(())
    } else {
        Err(redirect(req, "/login"))
    }
}

fn session_cookie(session: &Session) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    if let Some(expires_at) = session.expires_at {
        let seconds = (expires_at - session.issued_at).num_seconds();
        cookie.set_max_age(time::Duration::seconds(seconds));
    }
    cookie
}

pub async fn login_page(req: HttpRequest, gate: Data<SessionGate>) -> HttpResponse {
    if is_logged_in(&req, &gate).await {
        return redirect(&req, "/");
    }
    HttpResponse::Ok()
        .content_type("text/html")
        .body(render_login(None).into_string())
}

pub async fn login(gate: Data<SessionGate>, form: Form<LoginForm>) -> HttpResponse {
    match gate.login(&form.password, Utc::now()).await {
        Ok(session) => HttpResponse::SeeOther()
            .cookie(session_cookie(&session))
            .insert_header((LOCATION, "/"))
            .finish(),
        Err(e) => {
            warn!("login failed: {e}");
            HttpResponse::Unauthorized()
                .content_type("text/html")
                .body(render_login(Some(&e.user_message())).into_string())
        }
    }
}

pub async fn logout(req: HttpRequest, gate: Data<SessionGate>) -> HttpResponse {
    if let Some(token) = session_token(&req) {
        gate.logout(&token).await;
    }
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    HttpResponse::SeeOther()
        .cookie(removal)
        .insert_header((LOCATION, "/login"))
        .finish()
}
