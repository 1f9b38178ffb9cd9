use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Round {
    Scarecrow,
    GambleSands,
    Quicksands,
}

impl Round {
    pub const ALL: [Round; 3] = [Round::Scarecrow, Round::GambleSands, Round::Quicksands];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Round::Scarecrow => "Scarecrow",
            Round::GambleSands => "Gamble Sands",
            Round::Quicksands => "Quicksands",
        }
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Round::Scarecrow => "scarecrow",
            Round::GambleSands => "gamble-sands",
            Round::Quicksands => "quicksands",
        }
    }

    /// Accepts the display name or the url slug, ignoring case.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|round| {
            round.name().eq_ignore_ascii_case(input) || round.slug().eq_ignore_ascii_case(input)
        })
    }

    /// Quicksands is played as a two-team scramble.
    #[must_use]
    pub fn is_team_round(self) -> bool {
        matches!(self, Round::Quicksands)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Ivan,
    Patrick,
    Jack,
    Marshall,
}

impl Player {
    pub const ALL: [Player; 4] = [Player::Ivan, Player::Patrick, Player::Jack, Player::Marshall];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Player::Ivan => "Ivan",
            Player::Patrick => "Patrick",
            Player::Jack => "Jack",
            Player::Marshall => "Marshall",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|player| player.name().eq_ignore_ascii_case(input.trim()))
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    One,
    Two,
}

impl Team {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Team::One => "Team 1",
            Team::Two => "Team 2",
        }
    }

    #[must_use]
    pub fn members(self) -> &'static str {
        match self {
            Team::One => "IG + JC",
            Team::Two => "PT + MR",
        }
    }

    /// The player whose name the team's rows are stored under.
    #[must_use]
    pub fn lead(self) -> Player {
        match self {
            Team::One => Player::Ivan,
            Team::Two => Player::Patrick,
        }
    }
}

/// Whoever a score slot belongs to: a player, or a team standing in for its lead.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    Player(Player),
    Team(Team),
}

impl Subject {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Subject::Player(player) => player.name(),
            Subject::Team(team) => team.label(),
        }
    }

    #[must_use]
    pub fn stored_as(self) -> Player {
        match self {
            Subject::Player(player) => player,
            Subject::Team(team) => team.lead(),
        }
    }

    /// Form field suffix, e.g. `ivan` or `team1`.
    #[must_use]
    pub fn form_key(self) -> &'static str {
        match self {
            Subject::Player(Player::Ivan) => "ivan",
            Subject::Player(Player::Patrick) => "patrick",
            Subject::Player(Player::Jack) => "jack",
            Subject::Player(Player::Marshall) => "marshall",
            Subject::Team(Team::One) => "team1",
            Subject::Team(Team::Two) => "team2",
        }
    }

    #[must_use]
    pub fn unique_hole_id(self, round: Round, hole: i32) -> String {
        unique_hole_id(self.stored_as(), round, hole)
    }
}

#[must_use]
pub fn unique_hole_id(player: Player, round: Round, hole: i32) -> String {
    format!("{}-{}-{}", player.name(), round.name(), hole)
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContestType {
    LongDrive,
    ClosestToPin,
}

impl ContestType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ContestType::LongDrive => "Long Drive",
            ContestType::ClosestToPin => "Closest to the Pin",
        }
    }
}

pub const SENTINEL: &str = "-";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrokeSlot {
    #[default]
    Empty,
    Strokes(u8),
}

impl StrokeSlot {
    /// Accepts the sentinel `-` or a single digit from 1 to 9.
    ///
    /// # Errors
    ///
    /// Will return `Err` for anything else.
    pub fn parse(input: &str) -> Result<Self, String> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"^[1-9]$").expect("Invalid regex pattern - this is a programming error")
        });

        let input = input.trim();
        if input == SENTINEL {
            return Ok(StrokeSlot::Empty);
        }
        if re.is_match(input) {
            let strokes = input
                .parse::<u8>()
                .map_err(|e| format!("'{input}' is not a stroke count: {e}"))?;
            return Ok(StrokeSlot::Strokes(strokes));
        }
        Err(format!("'{input}' is not a stroke count, expected 1-9 or {SENTINEL}"))
    }

    #[must_use]
    pub fn strokes(self) -> Option<i32> {
        match self {
            StrokeSlot::Empty => None,
            StrokeSlot::Strokes(n) => Some(i32::from(n)),
        }
    }

    /// Stored counts outside 1-9 cannot be entered, so they read as the sentinel.
    #[must_use]
    pub fn from_stored(strokes: i64) -> Self {
        match u8::try_from(strokes) {
            Ok(n @ 1..=9) => StrokeSlot::Strokes(n),
            _ => StrokeSlot::Empty,
        }
    }
}

impl fmt::Display for StrokeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeSlot::Empty => write!(f, "{SENTINEL}"),
            StrokeSlot::Strokes(n) => write!(f, "{n}"),
        }
    }
}

/// One row of the `scores` table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub player_name: String,
    pub round: String,
    pub hole_number: i32,
    pub strokes: i32,
    pub unique_hole_id: String,
}

impl ScoreEntry {
    #[must_use]
    pub fn new(subject: Subject, round: Round, hole: i32, strokes: i32) -> Self {
        Self {
            player_name: subject.stored_as().name().to_string(),
            round: round.name().to_string(),
            hole_number: hole,
            strokes,
            unique_hole_id: subject.unique_hole_id(round, hole),
        }
    }
}

/// One row of the `contests` table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContestResult {
    pub round: String,
    pub hole_number: i32,
    pub winner_name: String,
}

impl ContestResult {
    #[must_use]
    pub fn new(round: Round, hole: i32, winner: Player) -> Self {
        Self {
            round: round.name().to_string(),
            hole_number: hole,
            winner_name: winner.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_slot_accepts_sentinel_and_single_digits() {
        assert_eq!(StrokeSlot::parse("-"), Ok(StrokeSlot::Empty));
        assert_eq!(StrokeSlot::parse(" 4 "), Ok(StrokeSlot::Strokes(4)));
        assert_eq!(StrokeSlot::parse("9"), Ok(StrokeSlot::Strokes(9)));
        assert!(StrokeSlot::parse("0").is_err());
        assert!(StrokeSlot::parse("10").is_err());
        assert!(StrokeSlot::parse("").is_err());
        assert!(StrokeSlot::parse("four").is_err());
    }

    #[test]
    fn stored_counts_outside_the_picker_read_as_empty() {
        assert_eq!(StrokeSlot::from_stored(7), StrokeSlot::Strokes(7));
        assert_eq!(StrokeSlot::from_stored(10), StrokeSlot::Empty);
        assert_eq!(StrokeSlot::from_stored(0), StrokeSlot::Empty);
        assert_eq!(StrokeSlot::from_stored(-3), StrokeSlot::Empty);
    }

    #[test]
    fn team_rows_are_keyed_by_the_lead_player() {
        let entry = ScoreEntry::new(Subject::Team(Team::One), Round::Quicksands, 1, 3);
        assert_eq!(entry.player_name, "Ivan");
        assert_eq!(entry.unique_hole_id, "Ivan-Quicksands-1");
    }

    #[test]
    fn rounds_parse_from_names_and_slugs() {
        assert_eq!(Round::parse("Gamble Sands"), Some(Round::GambleSands));
        assert_eq!(Round::parse("gamble-sands"), Some(Round::GambleSands));
        assert_eq!(Round::parse("QUICKSANDS"), Some(Round::Quicksands));
        assert_eq!(Round::parse("Pebble"), None);
    }
}
