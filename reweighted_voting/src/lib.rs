mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

pub use crate::config::*;

// **** Private structures ****

type RoundId = u32;

// A ballot as seen during the tally. Only the inverse weight changes between rounds.
#[derive(Eq, PartialEq, Debug, Clone)]
struct BallotInternal {
    scores: Vec<BigRational>,
    // Invariant: inv_weight >= 1 and it never decreases.
    inv_weight: BigRational,
}

impl BallotInternal {
    fn new(scores: Vec<BigRational>) -> BallotInternal {
        BallotInternal {
            scores,
            inv_weight: BigRational::one(),
        }
    }

    /// The weight of this ballot in the totals of the current round for this candidate.
    fn contribution(&self, cid: usize) -> BigRational {
        &self.scores[cid] / &self.inv_weight
    }

    fn reweight(&mut self, winner: usize, max_score: &BigRational) {
        let increment = &self.scores[winner] / max_score;
        self.inv_weight += increment;
    }
}

// The candidates elected so far. It only grows, by one candidate per round.
#[derive(Eq, PartialEq, Debug, Clone)]
struct ElectionState {
    elected: Vec<bool>,
    order: Vec<usize>,
}

impl ElectionState {
    fn new(num_candidates: usize) -> ElectionState {
        ElectionState {
            elected: vec![false; num_candidates],
            order: Vec::new(),
        }
    }

    fn is_elected(&self, cid: usize) -> bool {
        self.elected[cid]
    }

    fn elect(&mut self, cid: usize) {
        assert!(!self.elected[cid], "candidate {} elected twice", cid);
        self.elected[cid] = true;
        self.order.push(cid);
    }
}

// Flag to indicate if a tiebreak happened.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
enum TiebreakSituation {
    Clean,           // Did not happen
    TiebreakOccured, // Happened and was resolved by candidate order.
}

/// Runs the reweighted score tally.
///
/// Arguments:
/// * `ballots` the score table, one ballot per voter
/// * `num_candidates` the number of candidates. Every ballot must hold exactly
/// this number of scores.
/// * `rules` the number of seats and the maximum score
///
/// One candidate is elected per round, for exactly `rules.number_of_winners`
/// rounds. All the input constraints are checked before the first round.
pub fn tally(
    ballots: &[Ballot],
    num_candidates: usize,
    rules: &TallyRules,
) -> Result<Tally, VotingErrors> {
    let mut cur_ballots = checks(ballots, num_candidates, rules)?;
    let max_score = BigRational::from_integer(BigInt::from(rules.max_score));

    let mut state = ElectionState::new(num_candidates);
    let mut rounds: Vec<RoundResult> = Vec::new();
    for round_id in 1..=rules.number_of_winners {
        let round = run_one_round(&mut cur_ballots, &mut state, &max_score, round_id)?;
        rounds.push(round);
    }

    Ok(Tally {
        elected_order: state.order,
        rounds,
    })
}

/// Runs the tally and attaches the candidate names to the results.
///
/// The number of candidates is the length of `candidates`, in the order that
/// defines the candidate indices of the ballot scores.
pub fn run_voting_stats(
    coll: &[Ballot],
    rules: &TallyRules,
    candidates: &[Candidate],
) -> Result<VotingResult, VotingErrors> {
    info!(
        "run_voting_stats: Processing {:?} ballots, rules: {:?}",
        coll.len(),
        rules
    );
    for (idx, c) in candidates.iter().enumerate() {
        info!("Candidate: {}: {}", idx, c.name);
    }

    let res = tally(coll, candidates.len(), rules)?;

    let round_stats: Vec<RoundStats> = res
        .rounds
        .iter()
        .map(|r| RoundStats {
            round: r.round,
            tally: candidates
                .iter()
                .zip(r.totals.iter())
                .map(|(c, total)| (c.name.clone(), total.clone()))
                .collect(),
            elected: candidates[r.winner].name.clone(),
        })
        .collect();

    Ok(VotingResult {
        winners: res
            .elected_order
            .iter()
            .map(|cid| candidates[*cid].name.clone())
            .collect(),
        elected: res.elected_flags(candidates.len()),
        round_stats,
    })
}

/// Renders an exact value as a decimal number with a fixed number of fractional digits.
///
/// The value is rounded half away from zero. This is only meant for display:
/// all the comparisons of the tally are done on the exact values.
pub fn format_decimal(value: &BigRational, places: u32) -> String {
    let scale = BigRational::from_integer(BigInt::from(10u32).pow(places));
    let scaled: BigInt = (value * scale).round().to_integer();
    let sign = if scaled.is_negative() { "-" } else { "" };
    let digits = scaled.abs().to_string();
    if places == 0 {
        return format!("{}{}", sign, digits);
    }
    let p = places as usize;
    let padded = format!("{:0>width$}", digits, width = p + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - p);
    format!("{}{}.{}", sign, int_part, frac_part)
}

fn run_one_round(
    ballots: &mut [BallotInternal],
    state: &mut ElectionState,
    max_score: &BigRational,
    round_id: RoundId,
) -> Result<RoundResult, VotingErrors> {
    let totals = compute_totals(ballots, state.elected.len());
    debug!(
        "run_one_round: round {}: totals: {:?}",
        round_id,
        totals.iter().map(|t| t.to_string()).collect::<Vec<String>>()
    );

    let (winner, tiebreak) = find_winner(&totals, state)?;
    if tiebreak == TiebreakSituation::TiebreakOccured {
        info!(
            "Round {}: tie at {} resolved by candidate order",
            round_id, totals[winner]
        );
    }
    info!(
        "Round {}: candidate {} elected with {}",
        round_id,
        winner,
        format_decimal(&totals[winner], 3)
    );
    state.elect(winner);

    for b in ballots.iter_mut() {
        b.reweight(winner, max_score);
    }
    debug!(
        "run_one_round: round {}: inverse weights: {:?}",
        round_id,
        ballots
            .iter()
            .map(|b| b.inv_weight.to_string())
            .collect::<Vec<String>>()
    );

    Ok(RoundResult {
        round: round_id,
        totals,
        winner,
    })
}

fn compute_totals(ballots: &[BallotInternal], num_candidates: usize) -> Vec<BigRational> {
    let mut totals: Vec<BigRational> = vec![BigRational::zero(); num_candidates];
    for b in ballots.iter() {
        for (cid, total) in totals.iter_mut().enumerate() {
            if !b.scores[cid].is_zero() {
                *total += b.contribution(cid);
            }
        }
    }
    totals
}

// The unelected candidate with the strictly greatest total. On exact ties, the
// smallest candidate index wins.
fn find_winner(
    totals: &[BigRational],
    state: &ElectionState,
) -> Result<(usize, TiebreakSituation), VotingErrors> {
    let mut best: Option<usize> = None;
    let mut tiebreak = TiebreakSituation::Clean;
    for (cid, total) in totals.iter().enumerate() {
        if state.is_elected(cid) {
            continue;
        }
        match best {
            Some(b) if *total > totals[b] => {
                best = Some(cid);
                tiebreak = TiebreakSituation::Clean;
            }
            Some(b) if *total == totals[b] => {
                tiebreak = TiebreakSituation::TiebreakOccured;
            }
            Some(_) => {}
            None => {
                best = Some(cid);
            }
        }
    }
    match best {
        Some(cid) => Ok((cid, tiebreak)),
        None => Err(VotingErrors::NoConvergence),
    }
}

// Validates the input and builds the initial ballots, all with a weight of one.
fn checks(
    coll: &[Ballot],
    num_candidates: usize,
    rules: &TallyRules,
) -> Result<Vec<BallotInternal>, VotingErrors> {
    debug!("checks: coll size: {:?}", coll.len());
    if num_candidates == 0 {
        return Err(VotingErrors::NoCandidates);
    }
    if coll.is_empty() {
        return Err(VotingErrors::EmptyElection);
    }
    if rules.number_of_winners == 0 || rules.number_of_winners as usize > num_candidates {
        return Err(VotingErrors::InvalidNumberOfWinners {
            seats: rules.number_of_winners,
            candidates: num_candidates,
        });
    }
    if rules.max_score == 0 {
        return Err(VotingErrors::InvalidMaxScore);
    }

    let mut res: Vec<BallotInternal> = Vec::with_capacity(coll.len());
    for (ballot_index, b) in coll.iter().enumerate() {
        if b.scores.len() != num_candidates {
            return Err(VotingErrors::MalformedBallot {
                ballot_index,
                expected: num_candidates,
                found: b.scores.len(),
            });
        }
        if let Some(candidate_index) = b.scores.iter().position(|s| s.is_negative()) {
            return Err(VotingErrors::NegativeScore {
                ballot_index,
                candidate_index,
            });
        }
        debug!("checks: ballot {} {:?}: {:?}", ballot_index, b.id, b.scores);
        res.push(BallotInternal::new(b.scores.clone()));
    }
    Ok(res)
}
