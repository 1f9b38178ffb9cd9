use maud::{Markup, html};

use super::layout::{error_banner, page};

pub fn render_login(error: Option<&str>) -> Markup {
    page(
        "Log in",
        false,
        html! {
            h1 { "Golf Trip Scorecard" }
            (error_banner(error))
            form class="login" method="post" action="/login" {
                label for="password" { "Password" }
                input id="password" type="password" name="password" autocomplete="current-password" required autofocus;
                button type="submit" { "Log in" }
            }
        },
    )
}
