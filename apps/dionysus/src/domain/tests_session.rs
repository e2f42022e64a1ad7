use std::collections::HashSet;

use crate::domain::game_transition::GameTransition;
use crate::domain::test_state_helpers::{lobby_with, play_round, pools, started, submit_all};
use crate::domain::{
    AnswerCard, CardKind, EndReason, GameKey, GameSession, JoinOutcome, SessionState, UserId,
    HAND_SIZE,
};
use crate::errors::domain::GameError;

const A: UserId = UserId(1);
const B: UserId = UserId(2);
const C: UserId = UserId(3);
const D: UserId = UserId(4);

#[test]
fn scenario_full_round_with_three_players() {
    let p = pools(10, 100, 1);
    let mut session = lobby_with(3, &p, 42);

    let started = session.start_round().unwrap().value;
    assert_eq!(started.judge_id, A);
    assert_eq!(started.pick, 1);
    assert_eq!(started.round_no, 1);
    let dealt: Vec<UserId> = started.hands.iter().map(|(id, _)| *id).collect();
    assert_eq!(dealt, vec![B, C]);
    assert!(started.hands.iter().all(|(_, hand)| hand.len() == HAND_SIZE));
    assert_eq!(session.state(), SessionState::WaitingForSubmissions);

    let first = session.submit_ordinals(B, &[1]).unwrap();
    assert_eq!(first.value.remaining, 1);
    assert_eq!(session.state(), SessionState::WaitingForSubmissions);

    let second = session.submit_ordinals(C, &[1]).unwrap();
    assert_eq!(second.value.remaining, 0);
    assert_eq!(session.state(), SessionState::WaitingForJudge);
    assert!(second
        .transitions
        .contains(&GameTransition::JudgingReady { judge_id: A }));

    let result = session.choose_winner(A, 1).unwrap();
    let winner = result.value.winner_id;
    assert!(winner == B || winner == C);
    assert_eq!(session.player(winner).unwrap().score(), 1);
    assert_eq!(session.rounds_played(), 1);
    assert_eq!(session.state(), SessionState::RoundComplete);
    assert_eq!(session.winner_id(), Some(winner));
    assert_eq!(
        result.transitions,
        vec![GameTransition::RoundWon {
            round_no: 1,
            winner_id: winner
        }]
    );
}

#[test]
fn start_with_two_players_fails_and_stays_in_lobby() {
    let p = pools(10, 100, 1);
    let mut session = lobby_with(2, &p, 1);
    assert_eq!(
        session.start_round().unwrap_err(),
        GameError::NotEnoughPlayers {
            required: 3,
            actual: 2
        }
    );
    assert_eq!(session.state(), SessionState::Lobby);
    assert_eq!(session.judge_id(), None);
    assert_eq!(session.cards_remaining(CardKind::Question), 10);
}

#[test]
fn non_judge_cannot_choose() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 7);
    submit_all(&mut session);

    assert_eq!(session.choose_winner(B, 1).unwrap_err(), GameError::NotJudge);
    assert_eq!(session.state(), SessionState::WaitingForJudge);
    assert_eq!(session.rounds_played(), 0);
    assert!(session.players().iter().all(|p| p.score() == 0));
}

#[test]
fn choose_rejects_out_of_range_ordinal() {
    let p = pools(10, 100, 1);
    let mut session = started(4, &p, 7);
    submit_all(&mut session);

    assert_eq!(
        session.choose_winner(A, 4).unwrap_err(),
        GameError::IndexOutOfRange { ordinal: 4, len: 3 }
    );
    assert_eq!(
        session.choose_winner(A, 0).unwrap_err(),
        GameError::IndexOutOfRange { ordinal: 0, len: 3 }
    );
    assert_eq!(session.state(), SessionState::WaitingForJudge);
}

#[test]
fn choose_before_all_submitted_is_wrong_phase() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 7);
    session.submit_ordinals(B, &[1]).unwrap();
    assert_eq!(
        session.choose_winner(A, 1).unwrap_err(),
        GameError::WrongPhase {
            actual: SessionState::WaitingForSubmissions
        }
    );
}

#[test]
fn second_submission_is_rejected() {
    let p = pools(10, 100, 1);
    let mut session = started(4, &p, 9);
    session.submit_ordinals(B, &[2]).unwrap();
    let hand_before = session.player(B).unwrap().hand().to_vec();

    assert_eq!(
        session.submit_ordinals(B, &[1]).unwrap_err(),
        GameError::AlreadySubmitted
    );
    assert_eq!(session.player(B).unwrap().hand(), hand_before.as_slice());
    assert_eq!(session.round().unwrap().submission_count(), 1);
}

#[test]
fn judge_cannot_submit() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 9);
    assert_eq!(
        session.submit_ordinals(A, &[1]).unwrap_err(),
        GameError::JudgeCannotSubmit
    );
    // Judge check precedes ordinal resolution.
    assert_eq!(
        session.submit_ordinals(A, &[99]).unwrap_err(),
        GameError::JudgeCannotSubmit
    );
}

#[test]
fn outsider_cannot_submit() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 9);
    assert_eq!(
        session.submit_ordinals(D, &[1]).unwrap_err(),
        GameError::PlayerNotInGame { player_id: D }
    );
}

#[test]
fn wrong_count_is_rejected() {
    let p = pools(10, 100, 2);
    let mut session = started(3, &p, 9);
    assert_eq!(
        session.submit_ordinals(B, &[1]).unwrap_err(),
        GameError::WrongSubmissionCount {
            expected: 2,
            actual: 1
        }
    );
    assert_eq!(
        session.submit_ordinals(B, &[1, 2, 3]).unwrap_err(),
        GameError::WrongSubmissionCount {
            expected: 2,
            actual: 3
        }
    );
    assert!(session.submit_ordinals(B, &[1, 2]).is_ok());
}

#[test]
fn foreign_and_duplicate_cards_are_rejected() {
    let p = pools(10, 100, 2);
    let mut session = started(3, &p, 9);

    let c_card = session.player(C).unwrap().hand()[0].clone();
    let b_card = session.player(B).unwrap().hand()[0].clone();
    assert_eq!(
        session
            .submit_answer(B, vec![b_card.clone(), c_card])
            .unwrap_err(),
        GameError::AnswerNotInHand
    );
    assert_eq!(
        session
            .submit_answer(B, vec![b_card.clone(), b_card])
            .unwrap_err(),
        GameError::AnswerNotInHand
    );
    assert_eq!(
        session.submit_ordinals(B, &[3, 3]).unwrap_err(),
        GameError::AnswerNotInHand
    );
    assert_eq!(
        session
            .submit_answer(B, vec![AnswerCard::new(9999, "forged"), AnswerCard::new(9998, "x")])
            .unwrap_err(),
        GameError::AnswerNotInHand
    );
}

#[test]
fn submitted_text_comes_from_the_dealt_card() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 9);
    let real = session.player(B).unwrap().hand()[0].clone();

    let played = session
        .submit_answer(B, vec![AnswerCard::new(real.id.0, "made up")])
        .unwrap()
        .value
        .played;
    let question_no = session.current_question().unwrap().id.0;
    assert_eq!(played, format!("Q{question_no}: {}.", real.text));

    let recorded = session.round().unwrap().submission_of(B).unwrap();
    assert_eq!(recorded[0].text, real.text);

    session.submit_ordinals(C, &[1]).unwrap();
    let judge_view = crate::domain::player_view::judge_view(&session).unwrap();
    assert!(judge_view.entries.iter().all(|e| !e.text.contains("made up")));
}

#[test]
fn ordinal_outside_hand_is_out_of_range() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 9);
    assert_eq!(
        session.submit_ordinals(B, &[9]).unwrap_err(),
        GameError::IndexOutOfRange { ordinal: 9, len: 8 }
    );
}

#[test]
fn hand_is_refilled_and_played_cards_leave_it() {
    let p = pools(10, 100, 2);
    let mut session = started(3, &p, 11);
    let played: Vec<AnswerCard> = session.player(B).unwrap().hand()[..2].to_vec();

    let submission = session.submit_ordinals(B, &[1, 2]).unwrap().value;
    let question_no = session.current_question().unwrap().id.0;
    assert_eq!(
        submission.played,
        format!("Q{question_no}: {} and {}.", played[0].text, played[1].text)
    );

    let hand = session.player(B).unwrap().hand();
    assert_eq!(hand.len(), HAND_SIZE);
    assert!(played.iter().all(|card| !hand.contains(card)));
    assert_eq!(
        session.round().unwrap().submission_of(B).unwrap(),
        played.as_slice()
    );
}

#[test]
fn joining_after_start_is_rejected() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 1);
    assert_eq!(
        session.add_player(D, "late").unwrap_err(),
        GameError::GameAlreadyStarted
    );
    // Existing members re-joining is a harmless no-op.
    assert_eq!(
        session.add_player(B, "P2").unwrap().value,
        JoinOutcome::AlreadyJoined
    );
}

#[test]
fn rejoining_lobby_is_idempotent() {
    let p = pools(10, 100, 1);
    let mut session = lobby_with(1, &p, 1);
    let remaining = session.cards_remaining(CardKind::Answer);
    let outcome = session.add_player(A, "again").unwrap();
    assert_eq!(outcome.value, JoinOutcome::AlreadyJoined);
    assert!(outcome.transitions.is_empty());
    assert_eq!(session.players().len(), 1);
    assert_eq!(session.cards_remaining(CardKind::Answer), remaining);
}

#[test]
fn starting_mid_round_is_rejected() {
    let p = pools(10, 100, 1);
    let mut session = started(3, &p, 1);
    assert_eq!(
        session.start_round().unwrap_err(),
        GameError::RoundInProgress
    );
    submit_all(&mut session);
    assert_eq!(
        session.start_round().unwrap_err(),
        GameError::RoundInProgress
    );
}

#[test]
fn submitting_in_lobby_is_wrong_phase() {
    let p = pools(10, 100, 1);
    let mut session = lobby_with(3, &p, 1);
    assert_eq!(
        session.submit_ordinals(B, &[1]).unwrap_err(),
        GameError::WrongPhase {
            actual: SessionState::Lobby
        }
    );
}

#[test]
fn judge_rotates_round_robin_in_join_order() {
    let p = pools(20, 200, 1);
    let mut session = lobby_with(4, &p, 3);
    let mut judges = Vec::new();
    for _ in 0..6 {
        play_round(&mut session);
        judges.push(session.judge_id().unwrap());
    }
    assert_eq!(judges, vec![A, B, C, D, A, B]);
    assert_eq!(session.rounds_played(), 6);
}

#[test]
fn scores_accumulate_across_rounds() {
    let p = pools(20, 200, 1);
    let mut session = lobby_with(3, &p, 5);
    let mut total = 0;
    for round in 1..=5u32 {
        let before: Vec<u32> = session.players().iter().map(|p| p.score()).collect();
        let winner = play_round(&mut session);
        let after: Vec<u32> = session.players().iter().map(|p| p.score()).collect();
        for (i, player) in session.players().iter().enumerate() {
            let expected = before[i] + u32::from(player.id == winner);
            assert_eq!(after[i], expected);
        }
        total += 1;
        assert_eq!(session.rounds_played(), round);
        assert_eq!(after.iter().sum::<u32>(), total);
    }
}

#[test]
fn judge_is_never_a_submitter() {
    let p = pools(20, 200, 1);
    let mut session = lobby_with(5, &p, 8);
    for _ in 0..5 {
        session.start_round().unwrap();
        submit_all(&mut session);
        let judge = session.judge_id().unwrap();
        let round = session.round().unwrap();
        assert_eq!(round.submission_count(), session.players().len() - 1);
        assert!(!round.submission_order().contains(&judge));
        session.choose_winner(judge, 2).unwrap();
    }
}

#[test]
fn no_answer_card_is_seen_twice() {
    let p = pools(20, 200, 1);
    let mut session = lobby_with(4, &p, 13);
    let mut seen = HashSet::new();
    for player in session.players() {
        for card in player.hand() {
            assert!(seen.insert(card.id));
        }
    }
    for _ in 0..4 {
        session.start_round().unwrap();
        submit_all(&mut session);
        for player in session.players() {
            for card in player.hand() {
                seen.insert(card.id);
            }
        }
        let judge = session.judge_id().unwrap();
        session.choose_winner(judge, 1).unwrap();
    }
    // 4 players × 8 initial + 3 refills per round × 4 rounds
    assert_eq!(seen.len(), 4 * 8 + 3 * 4);
}

#[test]
fn answer_exhaustion_terminates_the_game() {
    // 3 players × 8 cards = 24; one spare refill.
    let p = pools(10, 25, 1);
    let mut session = started(3, &p, 2);
    session.submit_ordinals(B, &[1]).unwrap();

    let err = session.submit_ordinals(C, &[1]).unwrap_err();
    assert_eq!(
        err,
        GameError::DeckExhausted {
            kind: CardKind::Answer,
            wanted: 1,
            remaining: 0
        }
    );
    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(session.end_reason(), Some(EndReason::DeckExhausted));
    assert_eq!(
        session.take_unreported(),
        vec![GameTransition::GameTerminated {
            reason: EndReason::DeckExhausted
        }]
    );
    assert!(session.take_unreported().is_empty());
    assert_eq!(session.player(C).unwrap().hand().len(), HAND_SIZE);
    assert_eq!(
        session.submit_ordinals(C, &[1]).unwrap_err(),
        GameError::GameTerminated
    );
}

#[test]
fn question_exhaustion_terminates_the_game() {
    let p = pools(1, 100, 1);
    let mut session = lobby_with(3, &p, 2);
    play_round(&mut session);
    assert!(matches!(
        session.start_round(),
        Err(GameError::DeckExhausted {
            kind: CardKind::Question,
            ..
        })
    ));
    assert!(session.is_terminated());
    assert_eq!(session.take_unreported().len(), 1);
}

#[test]
fn lobby_join_without_cards_is_rejected_but_game_survives() {
    let p = pools(10, 20, 1);
    let mut session = lobby_with(2, &p, 2);
    assert!(matches!(
        session.add_player(C, "P3"),
        Err(GameError::DeckExhausted { .. })
    ));
    assert_eq!(session.state(), SessionState::Lobby);
    assert_eq!(session.players().len(), 2);
    assert!(session.take_unreported().is_empty());
}

#[test]
fn terminate_is_idempotent_and_reports_once() {
    let p = pools(10, 100, 1);
    let mut session = GameSession::new(GameKey::parse("abc"), &p, 0);
    let first = session.terminate(EndReason::Ended);
    assert_eq!(
        first.transitions,
        vec![GameTransition::GameTerminated {
            reason: EndReason::Ended
        }]
    );
    let second = session.terminate(EndReason::Idle);
    assert!(second.transitions.is_empty());
    assert_eq!(session.end_reason(), Some(EndReason::Ended));
    assert_eq!(
        session.add_player(A, "x").unwrap_err(),
        GameError::GameTerminated
    );
}

#[test]
fn same_seed_gives_same_game() {
    let p = pools(10, 100, 1);
    let s1 = started(3, &p, 99);
    let s2 = started(3, &p, 99);
    assert_eq!(s1.current_question(), s2.current_question());
    for (a, b) in s1.players().iter().zip(s2.players()) {
        assert_eq!(a.hand(), b.hand());
    }
}

#[test]
fn game_keys_are_normalized() {
    assert_eq!(GameKey::parse("  ab12cd ").as_str(), "AB12CD");
}
