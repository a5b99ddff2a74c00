use num_bigint::BigInt;
use num_rational::BigRational;
use reweighted_voting::builder::Builder;
use reweighted_voting::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn r(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn frac(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

fn ballot(scores: &[i64]) -> Ballot {
    Ballot {
        id: None,
        scores: scores.iter().map(|s| r(*s)).collect(),
    }
}

fn rules(seats: u32) -> TallyRules {
    TallyRules {
        number_of_winners: seats,
        ..TallyRules::DEFAULT_RULES
    }
}

fn names(ns: &[&str]) -> Vec<Candidate> {
    ns.iter()
        .map(|n| Candidate {
            name: n.to_string(),
            code: None,
        })
        .collect()
}

#[test]
fn two_ballots_two_seats_ties_by_index() {
    init();
    let ballots = vec![ballot(&[9, 0, 0]), ballot(&[0, 9, 0])];
    let res = tally(&ballots, 3, &rules(2)).unwrap();
    assert_eq!(res.elected_order, vec![0, 1]);
    assert_eq!(res.rounds.len(), 2);
    assert_eq!(res.rounds[0].round, 1);
    assert_eq!(res.rounds[0].totals, vec![r(9), r(9), r(0)]);
    assert_eq!(res.rounds[0].winner, 0);
    // The first ballot now counts for half: its total for A is still reported.
    assert_eq!(res.rounds[1].totals, vec![frac(9, 2), r(0), r(0)]);
    assert_eq!(res.rounds[1].winner, 1);
}

#[test]
fn reweighting_favors_other_voters() {
    init();
    let mut ballots = Vec::new();
    for _ in 0..3 {
        ballots.push(ballot(&[9, 8, 0, 0, 0]));
    }
    for _ in 0..2 {
        ballots.push(ballot(&[0, 0, 9, 8, 0]));
    }
    let res = tally(&ballots, 5, &rules(4)).unwrap();
    assert_eq!(res.elected_order, vec![0, 2, 1, 3]);
    assert_eq!(res.rounds[0].totals, vec![r(27), r(24), r(18), r(16), r(0)]);
    assert_eq!(res.rounds[1].totals, vec![frac(27, 2), r(12), r(18), r(16), r(0)]);
    assert_eq!(res.rounds[2].totals, vec![frac(27, 2), r(12), r(9), r(8), r(0)]);
    assert_eq!(
        res.rounds[3].totals,
        vec![frac(243, 26), frac(108, 13), r(9), r(8), r(0)]
    );
}

#[test]
fn partial_scores_reduce_weight_proportionally() {
    init();
    let ballots = vec![ballot(&[9, 3])];
    let res = tally(&ballots, 2, &rules(2)).unwrap();
    assert_eq!(res.elected_order, vec![0, 1]);
    assert_eq!(res.rounds[1].totals, vec![frac(9, 2), frac(3, 2)]);

    let ballots = vec![ballot(&[3, 9])];
    let res = tally(&ballots, 2, &rules(2)).unwrap();
    assert_eq!(res.elected_order, vec![1, 0]);
    // Inverse weight after the first round: 1 + 9/9 = 2.
    assert_eq!(res.rounds[1].totals, vec![frac(3, 2), frac(9, 2)]);
}

#[test]
fn custom_max_score() {
    init();
    let rules = TallyRules {
        number_of_winners: 2,
        max_score: 5,
    };
    let ballots = vec![ballot(&[5, 1]), ballot(&[0, 2])];
    let res = tally(&ballots, 2, &rules).unwrap();
    assert_eq!(res.elected_order, vec![0, 1]);
    // First ballot: 1 + 5/5 = 2. Second ballot unchanged.
    assert_eq!(res.rounds[1].totals, vec![frac(5, 2), frac(5, 2)]);
}

#[test]
fn rational_scores() {
    init();
    let ballots = vec![
        Ballot {
            id: Some("a".to_string()),
            scores: vec![frac(1, 3), frac(1, 2)],
        },
        Ballot {
            id: Some("b".to_string()),
            scores: vec![frac(2, 3), frac(1, 2)],
        },
    ];
    let res = tally(&ballots, 2, &rules(1)).unwrap();
    // 1/3 + 2/3 == 1/2 + 1/2 exactly: tie broken by index.
    assert_eq!(res.rounds[0].totals, vec![r(1), r(1)]);
    assert_eq!(res.elected_order, vec![0]);
}

#[test]
fn all_seats_filled() {
    init();
    let ballots = vec![ballot(&[1, 5, 3, 0]), ballot(&[0, 0, 0, 0])];
    let res = tally(&ballots, 4, &rules(4)).unwrap();
    assert_eq!(res.elected_order, vec![1, 2, 0, 3]);
    assert_eq!(res.rounds.len(), 4);
    assert_eq!(res.elected_flags(4), vec![true, true, true, true]);
}

#[test]
fn elected_set_grows_by_one() {
    init();
    let ballots = vec![
        ballot(&[9, 7, 2, 4, 0]),
        ballot(&[1, 9, 9, 0, 3]),
        ballot(&[0, 2, 8, 9, 9]),
    ];
    let res = tally(&ballots, 5, &rules(4)).unwrap();
    assert_eq!(res.elected_order.len(), 4);
    for (k, round) in res.rounds.iter().enumerate() {
        assert_eq!(round.round as usize, k + 1);
        assert_eq!(round.winner, res.elected_order[k]);
        assert_eq!(round.totals.len(), 5);
        assert!(!res.elected_order[..k].contains(&round.winner));
    }
}

#[test]
fn totals_never_increase() {
    init();
    let ballots = vec![
        ballot(&[9, 7, 2, 4, 0]),
        ballot(&[1, 9, 9, 0, 3]),
        ballot(&[0, 2, 8, 9, 9]),
        ballot(&[5, 5, 5, 5, 5]),
    ];
    let res = tally(&ballots, 5, &rules(5)).unwrap();
    for pair in res.rounds.windows(2) {
        for (before, after) in pair[0].totals.iter().zip(pair[1].totals.iter()) {
            assert!(after <= before);
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    init();
    let ballots = vec![
        ballot(&[9, 7, 2, 4, 0]),
        ballot(&[1, 9, 9, 0, 3]),
        ballot(&[0, 2, 8, 9, 9]),
    ];
    let res1 = tally(&ballots, 5, &rules(3)).unwrap();
    let res2 = tally(&ballots, 5, &rules(3)).unwrap();
    assert_eq!(res1, res2);

    let mut reversed = ballots.clone();
    reversed.reverse();
    let res3 = tally(&reversed, 5, &rules(3)).unwrap();
    assert_eq!(res1, res3);
}

#[test]
fn malformed_ballot() {
    init();
    let ballots = vec![ballot(&[9, 0, 0]), ballot(&[0, 9])];
    assert_eq!(
        tally(&ballots, 3, &rules(2)),
        Err(VotingErrors::MalformedBallot {
            ballot_index: 1,
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn negative_score() {
    init();
    let ballots = vec![ballot(&[9, 0, 0]), ballot(&[0, 9, -1])];
    assert_eq!(
        tally(&ballots, 3, &rules(2)),
        Err(VotingErrors::NegativeScore {
            ballot_index: 1,
            candidate_index: 2
        })
    );
}

#[test]
fn invalid_configuration() {
    init();
    let ballots = vec![ballot(&[9, 0, 0])];
    assert_eq!(
        tally(&ballots, 3, &rules(0)),
        Err(VotingErrors::InvalidNumberOfWinners {
            seats: 0,
            candidates: 3
        })
    );
    assert_eq!(
        tally(&ballots, 3, &rules(4)),
        Err(VotingErrors::InvalidNumberOfWinners {
            seats: 4,
            candidates: 3
        })
    );
    assert_eq!(tally(&[], 3, &rules(1)), Err(VotingErrors::EmptyElection));
    assert_eq!(
        tally(&[ballot(&[])], 0, &rules(1)),
        Err(VotingErrors::NoCandidates)
    );
    let zero_max = TallyRules {
        number_of_winners: 1,
        max_score: 0,
    };
    assert_eq!(
        tally(&ballots, 3, &zero_max),
        Err(VotingErrors::InvalidMaxScore)
    );
}

#[test]
fn voting_stats_with_names() {
    init();
    let ballots = vec![ballot(&[9, 0, 0]), ballot(&[0, 9, 0])];
    let res = run_voting_stats(&ballots, &rules(2), &names(&["A", "B", "C"])).unwrap();
    assert_eq!(res.winners, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(res.elected, vec![true, true, false]);
    assert_eq!(res.round_stats.len(), 2);
    assert_eq!(res.round_stats[0].elected, "A");
    assert_eq!(
        res.round_stats[0].tally,
        vec![
            ("A".to_string(), r(9)),
            ("B".to_string(), r(9)),
            ("C".to_string(), r(0))
        ]
    );
    assert_eq!(res.round_stats[1].elected, "B");
}

#[test]
fn builder_rejects_wrong_width() {
    init();
    let mut builder = Builder::new(&rules(1))
        .unwrap()
        .candidates(&["A".to_string(), "B".to_string()])
        .unwrap();
    builder.add_ballot_simple(&[1, 2]).unwrap();
    assert_eq!(
        builder.add_ballot_simple(&[1, 2, 3]),
        Err(VotingErrors::MalformedBallot {
            ballot_index: 1,
            expected: 2,
            found: 3
        })
    );
    let res = builder.tally().unwrap();
    assert_eq!(res.winners, vec!["B".to_string()]);
}
