// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use num_rational::BigRational;

/// A registered candidate.
///
/// The position of a candidate in the candidate list is its index for the
/// whole election: ballot scores, totals and the elected order all refer to it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub code: Option<String>,
}

/// The scores of one voter, one per candidate, in candidate order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub id: Option<String>,
    pub scores: Vec<BigRational>,
}

// ******** Output data structures *********

/// The outcome of one round, by candidate index.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundResult {
    pub round: u32,
    /// The reweighted total of every candidate, including the ones elected in
    /// earlier rounds.
    pub totals: Vec<BigRational>,
    pub winner: usize,
}

/// The output of the tally engine.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Tally {
    /// Candidate indices, in the order they were elected.
    pub elected_order: Vec<usize>,
    /// One record per round, aligned with `elected_order`.
    pub rounds: Vec<RoundResult>,
}

impl Tally {
    /// The elected candidates as an indicator vector in candidate order.
    pub fn elected_flags(&self, num_candidates: usize) -> Vec<bool> {
        let mut flags = vec![false; num_candidates];
        for &cid in self.elected_order.iter() {
            if let Some(f) = flags.get_mut(cid) {
                *f = true;
            }
        }
        flags
    }
}

/// Statistics for one round
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    pub tally: Vec<(String, BigRational)>,
    pub elected: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    /// The names of the winners, in elected order.
    pub winners: Vec<String>,
    /// The indicator vector of the winners, in candidate order.
    pub elected: Vec<bool>,
    pub round_stats: Vec<RoundStats>,
}

/// Errors that prevent the algorithm from completing successfully.
///
/// The input is checked before the first round: the tally never produces
/// partial results.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// No ballot was provided.
    EmptyElection,
    /// The candidate list is empty.
    NoCandidates,
    /// The number of seats is zero or exceeds the number of candidates.
    InvalidNumberOfWinners { seats: u32, candidates: usize },
    /// The normalization constant must be strictly positive.
    InvalidMaxScore,
    /// A ballot does not have exactly one score per candidate.
    MalformedBallot {
        ballot_index: usize,
        expected: usize,
        found: usize,
    },
    /// A ballot gives a negative score to a candidate.
    NegativeScore {
        ballot_index: usize,
        candidate_index: usize,
    },
    /// No candidate was left to elect in a round.
    NoConvergence,
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "no ballots to tally"),
            VotingErrors::NoCandidates => write!(f, "no candidates in the election"),
            VotingErrors::InvalidNumberOfWinners { seats, candidates } => write!(
                f,
                "the number of winners must be between 1 and {} (the number of candidates), got {}",
                candidates, seats
            ),
            VotingErrors::InvalidMaxScore => write!(f, "the maximum score must be at least 1"),
            VotingErrors::MalformedBallot {
                ballot_index,
                expected,
                found,
            } => write!(
                f,
                "ballot {} has {} scores, expected {}",
                ballot_index, found, expected
            ),
            VotingErrors::NegativeScore {
                ballot_index,
                candidate_index,
            } => write!(
                f,
                "ballot {} has a negative score for candidate {}",
                ballot_index, candidate_index
            ),
            VotingErrors::NoConvergence => write!(f, "no candidate left to elect"),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct TallyRules {
    /// The number of seats to fill. One candidate is elected per round.
    pub number_of_winners: u32,
    /// The largest score a voter may give. A ballot that gave this score to a
    /// winner has its inverse weight increased by exactly one.
    pub max_score: u32,
}

impl TallyRules {
    pub const DEFAULT_RULES: TallyRules = TallyRules {
        number_of_winners: 4,
        max_score: 9,
    };
}

impl Default for TallyRules {
    fn default() -> Self {
        TallyRules::DEFAULT_RULES
    }
}
