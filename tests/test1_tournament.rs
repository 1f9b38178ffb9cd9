use fore_scorecard::model::{ContestType, DEFAULT_PAR, Player, Round, Subject, Team};

#[test]
fn hole_counts_match_the_courses() {
    assert_eq!(Round::Scarecrow.hole_count(), 18);
    assert_eq!(Round::GambleSands.hole_count(), 18);
    assert_eq!(Round::Quicksands.hole_count(), 14);
}

#[test]
fn every_hole_has_a_par() {
    for round in Round::ALL {
        for hole in 1..=round.hole_count() {
            let par = round.par_for(hole);
            assert!((3..=5).contains(&par), "{round} hole {hole} has par {par}");
        }
        assert_eq!(round.par_for(round.hole_count() + 1), DEFAULT_PAR);
        assert_eq!(round.par_for(0), DEFAULT_PAR);
    }
    assert_eq!(Round::Scarecrow.par_for(3), 5);
}

#[test]
fn contest_holes() {
    assert_eq!(
        Round::Scarecrow.contest_type_for(3),
        Some(ContestType::LongDrive)
    );
    assert_eq!(
        Round::Scarecrow.contest_type_for(2),
        Some(ContestType::ClosestToPin)
    );
    assert_eq!(Round::Scarecrow.contest_type_for(1), None);
    assert_eq!(
        Round::GambleSands.contest_type_for(18),
        Some(ContestType::LongDrive)
    );
    assert_eq!(
        Round::GambleSands.contest_type_for(13),
        Some(ContestType::ClosestToPin)
    );
    assert!(!Round::Quicksands.has_contests());
    assert!((1..=14).all(|hole| Round::Quicksands.contest_type_for(hole).is_none()));

    let scarecrow_contests = (1..=18)
        .filter(|&hole| Round::Scarecrow.contest_type_for(hole).is_some())
        .count();
    assert_eq!(scarecrow_contests, 8);
}

#[test]
fn scoring_subjects_per_round() {
    let players: Vec<Subject> = Player::ALL.into_iter().map(Subject::Player).collect();
    assert_eq!(Round::Scarecrow.scoring_subjects(), players.as_slice());
    assert_eq!(Round::GambleSands.scoring_subjects(), players.as_slice());
    assert_eq!(
        Round::Quicksands.scoring_subjects(),
        &[Subject::Team(Team::One), Subject::Team(Team::Two)]
    );
}

#[test]
fn stored_names_map_back_to_subjects() {
    assert_eq!(
        Round::Quicksands.subject_for_stored_name("Ivan"),
        Some(Subject::Team(Team::One))
    );
    assert_eq!(
        Round::Quicksands.subject_for_stored_name("Patrick"),
        Some(Subject::Team(Team::Two))
    );
    assert_eq!(Round::Quicksands.subject_for_stored_name("Jack"), None);
    assert_eq!(
        Round::Scarecrow.subject_for_stored_name("Marshall"),
        Some(Subject::Player(Player::Marshall))
    );
    assert_eq!(Round::Scarecrow.subject_for_stored_name("Tiger"), None);
}
