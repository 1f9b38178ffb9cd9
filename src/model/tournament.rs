use super::types::{ContestType, Player, Round, Subject, Team};

/// Par used for any hole missing from the tables below.
pub const DEFAULT_PAR: i32 = 3;

const SCARECROW_PARS: [i32; 18] = [4, 3, 5, 3, 4, 5, 4, 4, 3, 4, 3, 5, 4, 4, 5, 3, 4, 4];
const GAMBLE_SANDS_PARS: [i32; 18] = [4, 4, 5, 3, 4, 3, 5, 4, 4, 3, 4, 4, 5, 4, 4, 3, 4, 5];
const QUICKSANDS_PARS: [i32; 14] = [3; 14];

const SCARECROW_LONG_DRIVE: &[i32] = &[3, 6, 15];
const SCARECROW_CLOSEST_TO_PIN: &[i32] = &[2, 4, 9, 11, 16];
const GAMBLE_SANDS_LONG_DRIVE: &[i32] = &[3, 7, 18];
const GAMBLE_SANDS_CLOSEST_TO_PIN: &[i32] = &[4, 6, 10, 13, 16];
const NO_HOLES: &[i32] = &[];

const PLAYER_SUBJECTS: [Subject; 4] = [
    Subject::Player(Player::Ivan),
    Subject::Player(Player::Patrick),
    Subject::Player(Player::Jack),
    Subject::Player(Player::Marshall),
];
const TEAM_SUBJECTS: [Subject; 2] = [Subject::Team(Team::One), Subject::Team(Team::Two)];

impl Round {
    #[must_use]
    pub fn hole_count(self) -> i32 {
        match self {
            Round::Scarecrow | Round::GambleSands => 18,
            Round::Quicksands => 14,
        }
    }

    #[must_use]
    pub fn has_hole(self, hole: i32) -> bool {
        (1..=self.hole_count()).contains(&hole)
    }

    fn pars(self) -> &'static [i32] {
        match self {
            Round::Scarecrow => &SCARECROW_PARS,
            Round::GambleSands => &GAMBLE_SANDS_PARS,
            Round::Quicksands => &QUICKSANDS_PARS,
        }
    }

    /// Never fails: holes outside the table get [`DEFAULT_PAR`].
    #[must_use]
    pub fn par_for(self, hole: i32) -> i32 {
        usize::try_from(hole - 1)
            .ok()
            .and_then(|idx| self.pars().get(idx))
            .copied()
            .unwrap_or(DEFAULT_PAR)
    }

    fn contest_holes(self) -> (&'static [i32], &'static [i32]) {
        match self {
            Round::Scarecrow => (SCARECROW_LONG_DRIVE, SCARECROW_CLOSEST_TO_PIN),
            Round::GambleSands => (GAMBLE_SANDS_LONG_DRIVE, GAMBLE_SANDS_CLOSEST_TO_PIN),
            Round::Quicksands => (NO_HOLES, NO_HOLES),
        }
    }

    #[must_use]
    pub fn contest_type_for(self, hole: i32) -> Option<ContestType> {
        let (long_drive, closest_to_pin) = self.contest_holes();
        if long_drive.contains(&hole) {
            Some(ContestType::LongDrive)
        } else if closest_to_pin.contains(&hole) {
            Some(ContestType::ClosestToPin)
        } else {
            None
        }
    }

    #[must_use]
    pub fn has_contests(self) -> bool {
        let (long_drive, closest_to_pin) = self.contest_holes();
        !long_drive.is_empty() || !closest_to_pin.is_empty()
    }

    #[must_use]
    pub fn scoring_subjects(self) -> &'static [Subject] {
        if self.is_team_round() {
            &TEAM_SUBJECTS
        } else {
            &PLAYER_SUBJECTS
        }
    }

    /// Maps a stored `player_name` back to the subject that owns it in this round.
    #[must_use]
    pub fn subject_for_stored_name(self, player_name: &str) -> Option<Subject> {
        let player = Player::parse(player_name)?;
        self.scoring_subjects()
            .iter()
            .copied()
            .find(|subject| subject.stored_as() == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn par_falls_back_outside_the_table() {
        assert_eq!(Round::Scarecrow.par_for(3), 5);
        assert_eq!(Round::Scarecrow.par_for(0), DEFAULT_PAR);
        assert_eq!(Round::GambleSands.par_for(19), DEFAULT_PAR);
    }

    #[test]
    fn only_team_leads_map_back_in_the_team_round() {
        assert_eq!(
            Round::Quicksands.subject_for_stored_name("Patrick"),
            Some(Subject::Team(Team::Two))
        );
        assert_eq!(Round::Quicksands.subject_for_stored_name("Jack"), None);
        assert_eq!(
            Round::Scarecrow.subject_for_stored_name("Jack"),
            Some(Subject::Player(Player::Jack))
        );
        assert_eq!(Round::Scarecrow.subject_for_stored_name("Tiger"), None);
    }
}
