use maud::{Markup, html};

use super::layout::{error_banner, page};
use crate::model::{Player, SENTINEL, StrokeSlot};
use crate::score::{HoleEditor, ScoreSlot};

pub const WINNER_FIELD: &str = "winner";
pub const CONFIRM_FIELD: &str = "confirm";

#[must_use]
pub fn score_field(slot: &ScoreSlot) -> String {
    format!("score_{}", slot.subject.form_key())
}

#[must_use]
pub fn prior_field(slot: &ScoreSlot) -> String {
    format!("prior_{}", slot.subject.form_key())
}

fn stroke_select(slot: &ScoreSlot) -> Markup {
    let name = score_field(slot);
    html! {
        label for=(name) {
            (slot.subject.label())
            @if let crate::model::Subject::Team(team) = slot.subject {
                " " small { (team.members()) }
            }
        }
        select id=(name) name=(name) {
            option value=(SENTINEL) selected[slot.value == StrokeSlot::Empty] { (SENTINEL) }
            @for n in 1..=9u8 {
                option value=(n) selected[slot.value == StrokeSlot::Strokes(n)] { (n) }
            }
        }
        // What the store held when the page was drawn; saving diffs against it.
        input type="hidden" name=(prior_field(slot)) value=(slot.baseline);
    }
}

fn winner_select(editor: &HoleEditor) -> Markup {
    html! {
        @if let Some(contest) = editor.contest_type() {
            fieldset class="contest" {
                legend { (contest.label()) }
                select id=(WINNER_FIELD) name=(WINNER_FIELD) {
                    option value=(SENTINEL) selected[editor.winner().is_none()] { (SENTINEL) }
                    @for player in Player::ALL {
                        option value=(player.name()) selected[editor.winner() == Some(player)] { (player.name()) }
                    }
                }
            }
        }
    }
}

/// The score entry form for one hole, with the clear action beside it.
pub fn render_hole_editor(editor: &HoleEditor, error: Option<&str>) -> Markup {
    let round = editor.round();
    let action = format!("/hole/{}/{}", round.slug(), editor.hole());
    let back = format!("/scorecard/{}", round.slug());
    page(
        &format!("{} hole {}", round.name(), editor.hole()),
        true,
        html! {
            h1 { (round.name()) " · Hole " (editor.hole()) }
            p class="par" { "Par " (editor.par()) }
            (error_banner(error))
            form class="hole-editor" method="post" action=(action) {
                @for slot in editor.slots() {
                    div class="slot" { (stroke_select(slot)) }
                }
                (winner_select(editor))
                button type="submit" { "Save" }
                a class="cancel" href=(back) { "Cancel" }
            }
            form class="clear-hole" method="post" action={ (action) "/clear" }
                hx-post={ (action) "/clear" }
                hx-target="body" hx-swap="outerHTML"
                hx-confirm={ "Clear all scores for hole " (editor.hole()) "?" } {
                input type="hidden" name=(CONFIRM_FIELD) value="yes";
                button type="submit" class="danger" { "Clear hole" }
            }
            nav class="hole-nav" {
                @if editor.hole() > 1 {
                    a href={ "/hole/" (round.slug()) "/" (editor.hole() - 1) } { "Previous hole" }
                }
                @if editor.hole() < round.hole_count() {
                    a href={ "/hole/" (round.slug()) "/" (editor.hole() + 1) } { "Next hole" }
                }
            }
        },
    )
}
