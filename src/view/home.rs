use maud::{Markup, html};

use super::layout::page;
use crate::model::Round;

pub fn render_home() -> Markup {
    page(
        "Rounds",
        true,
        html! {
            h1 { "Rounds" }
            ul class="rounds" {
                @for round in Round::ALL {
                    li {
                        a href={ "/scorecard/" (round.slug()) } { (round.name()) }
                        " "
                        span class="hole-count" { (round.hole_count()) " holes" }
                        @if round.is_team_round() {
                            " "
                            span class="badge" { "scramble" }
                        }
                    }
                }
            }
        },
    )
}
