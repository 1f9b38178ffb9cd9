use maud::{Markup, html};

use super::layout::{notice, page};
use crate::model::{Round, Subject};
use crate::score::{HoleRow, RoundCard};

/// Client-side cap on the grid request so the loading indicator always clears.
pub const GRID_REQUEST_TIMEOUT_MS: u64 = 5000;

const GRID_TRIGGER: &str = "load, visibilitychange[document.visibilityState=='visible'] from:document, focus from:window";

/// The page shell. The grid itself arrives through htmx and is fetched again
/// whenever the page comes back into view.
pub fn render_scorecard_page(round: Round, flash: Option<&str>) -> Markup {
    page(
        round.name(),
        true,
        html! {
            h1 { (round.name()) }
            (notice(flash))
            img id="grid-loading" alt="Loading scores..." class="htmx-indicator" width="150" src="https://htmx.org/img/bars.svg";
            div id="grid"
                hx-get={ "/scorecard/" (round.slug()) "/grid" }
                hx-trigger=(GRID_TRIGGER)
                hx-request={ "{\"timeout\":" (GRID_REQUEST_TIMEOUT_MS) "}" }
                hx-indicator="#grid-loading" {}
        },
    )
}

fn to_par(diff: i32) -> String {
    match diff {
        0 => "E".to_string(),
        d if d > 0 => format!("+{d}"),
        d => d.to_string(),
    }
}

fn subject_header(subject: Subject) -> Markup {
    html! {
        th {
            (subject.label())
            @if let Subject::Team(team) = subject {
                br;
                small { (team.members()) }
            }
        }
    }
}

fn hole_row(round: Round, row: &HoleRow) -> Markup {
    html! {
        tr {
            td {
                a href={ "/hole/" (round.slug()) "/" (row.hole) } { (row.hole) }
            }
            td { (row.par) }
            @for cell in &row.cells {
                td class="strokes" { (cell.strokes) }
            }
            td class="contest" {
                @if let Some(contest) = row.contest {
                    span class="contest-type" { (contest.label()) }
                    @if let Some(winner) = row.winner {
                        ": " (winner.name())
                    }
                }
            }
        }
    }
}

pub fn render_scorecard_grid(card: &RoundCard) -> Markup {
    html! {
        table class="styled-table scorecard" {
            thead {
                tr {
                    th { "Hole" }
                    th { "Par" }
                    @for subject in &card.subjects {
                        (subject_header(*subject))
                    }
                    th { "Contest" }
                }
            }
            tbody {
                @for row in &card.holes {
                    (hole_row(card.round, row))
                }
            }
            tfoot {
                tr {
                    td { "Total" }
                    td {}
                    @for subject in &card.subjects {
                        @let (strokes, par) = card.running_total(*subject);
                        td class="total" {
                            (strokes)
                            @if par > 0 {
                                " ("
                                (to_par(strokes - par))
                                ")"
                            }
                        }
                    }
                    td {}
                }
            }
        }
    }
}
