//! Property tests for the session state machine (pure domain).
//!
//! Sessions are driven with arbitrary, frequently invalid intents; whatever
//! is accepted or rejected, the structural invariants must hold after every
//! step.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::domain::test_state_helpers::{lobby_with, pools, proptest_config};
use crate::domain::{GameSession, SessionState, UserId, HAND_SIZE};

#[derive(Debug, Clone)]
enum Intent {
    Start,
    Submit { player: u64, ordinals: Vec<usize> },
    Choose { player: u64, ordinal: usize },
}

fn intent(players: u64) -> impl Strategy<Value = Intent> {
    prop_oneof![
        1 => Just(Intent::Start),
        4 => (1..=players + 1, prop::collection::vec(0usize..=9, 0..=4))
            .prop_map(|(player, ordinals)| Intent::Submit { player, ordinals }),
        2 => (1..=players + 1, 0usize..=8)
            .prop_map(|(player, ordinal)| Intent::Choose { player, ordinal }),
    ]
}

fn apply(session: &mut GameSession, intent: &Intent) {
    let _ = match intent {
        Intent::Start => session.start_round().map(|_| ()),
        Intent::Submit { player, ordinals } => {
            session.submit_ordinals(UserId(*player), ordinals).map(|_| ())
        }
        Intent::Choose { player, ordinal } => {
            session.choose_winner(UserId(*player), *ordinal).map(|_| ())
        }
    };
}

fn check_invariants(session: &GameSession) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for player in session.players() {
        prop_assert_eq!(player.hand().len(), HAND_SIZE, "hand size for {}", player.id);
        for card in player.hand() {
            prop_assert!(seen.insert(card.id), "card {:?} held twice", card.id);
        }
    }

    let total: u32 = session.players().iter().map(|p| p.score()).sum();
    prop_assert_eq!(total, session.rounds_played());

    if let (Some(round), Some(judge)) = (session.round(), session.judge_id()) {
        prop_assert!(!round.has_submitted(judge), "judge submitted");
        prop_assert_eq!(round.submission_order().len(), round.submission_count());
        for id in round.submission_order() {
            if let Some(answers) = round.submission_of(*id) {
                for card in answers {
                    prop_assert!(seen.insert(card.id), "submitted card still held");
                }
            }
        }
    }

    if session.state() == SessionState::WaitingForJudge {
        let round = session.round().expect("round while judging");
        prop_assert_eq!(round.submission_count(), session.players().len() - 1);
    }
    Ok(())
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property: arbitrary intent streams never break session invariants.
    #[test]
    fn prop_invariants_hold_under_arbitrary_intents(
        (players, intents) in (3u64..=6).prop_flat_map(|n| {
            (Just(n), prop::collection::vec(intent(n), 1..80))
        }),
        pick in 1u8..=3,
        seed in any::<u64>(),
    ) {
        let p = pools(40, 400, pick);
        let mut session = lobby_with(players, &p, seed);
        check_invariants(&session)?;
        for intent in &intents {
            let rounds_before = session.rounds_played();
            let scores_before: Vec<u32> = session.players().iter().map(|p| p.score()).collect();
            apply(&mut session, intent);
            check_invariants(&session)?;

            // Scores never decrease; at most one point per completed round.
            let scores_after: Vec<u32> = session.players().iter().map(|p| p.score()).collect();
            for (b, a) in scores_before.iter().zip(&scores_after) {
                prop_assert!(a >= b);
            }
            let gained: u32 = scores_after.iter().sum::<u32>() - scores_before.iter().sum::<u32>();
            prop_assert_eq!(gained, session.rounds_played() - rounds_before);
        }
    }

    /// Property: a full round always ends with exactly one point awarded to a
    /// non-judge player, whichever ordinal the judge picks.
    #[test]
    fn prop_one_winner_per_round(
        (players, choice) in (3u64..=8).prop_flat_map(|n| (Just(n), 1usize..(n as usize))),
        pick in 1u8..=3,
        seed in any::<u64>(),
    ) {
        let p = pools(10, 400, pick);
        let mut session = lobby_with(players, &p, seed);
        session.start_round().unwrap();
        let ordinals: Vec<usize> = (1..=pick as usize).collect();
        let judge = session.judge_id().unwrap();
        for id in 1..=players {
            if UserId(id) != judge {
                session.submit_ordinals(UserId(id), &ordinals).unwrap();
            }
        }
        prop_assert_eq!(session.state(), SessionState::WaitingForJudge);

        let result = session.choose_winner(judge, choice).unwrap().value;
        prop_assert_ne!(result.winner_id, judge);
        prop_assert_eq!(result.winner_score, 1);
        let winners = session.players().iter().filter(|p| p.score() == 1).count();
        prop_assert_eq!(winners, 1);
        prop_assert_eq!(session.rounds_played(), 1);
    }
}
