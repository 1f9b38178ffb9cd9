use maud::{DOCTYPE, Markup, html};

use crate::HTMX_PATH;

/// The document shell every page is drawn into.
pub fn page(title: &str, logged_in: bool, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" type="text/css" href="/static/styles.css";
                title { (title) }
                script src=(HTMX_PATH) defer {}
            }
            body {
                header {
                    a href="/" { "Fore" }
                    @if logged_in {
                        form class="logout" method="post" action="/logout" {
                            button type="submit" { "Log out" }
                        }
                    }
                }
                main { (body) }
            }
        }
    }
}

pub fn notice(text: Option<&str>) -> Markup {
    html! {
        @if let Some(text) = text.filter(|t| !t.is_empty()) {
            p class="notice" role="status" { (text) }
        }
    }
}

pub fn error_banner(text: Option<&str>) -> Markup {
    html! {
        @if let Some(text) = text.filter(|t| !t.is_empty()) {
            p class="error" role="alert" { (text) }
        }
    }
}

pub fn not_found(message: &str) -> Markup {
    page(
        "Not found",
        true,
        html! {
            h1 { "Not found" }
            p { (message) }
            a href="/" { "Back to the rounds" }
        },
    )
}
