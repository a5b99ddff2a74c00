use num_bigint::BigInt;
use num_rational::BigRational;

pub use crate::config::*;

/// A builder for adding ballots.
///
/// ```
/// pub use reweighted_voting::builder::Builder;
/// pub use reweighted_voting::TallyRules;
/// # use reweighted_voting::VotingErrors;
///
/// let rules = TallyRules {
///     number_of_winners: 2,
///     ..TallyRules::DEFAULT_RULES
/// };
/// let mut builder = Builder::new(&rules)?
///     .candidates(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()])?;
///
/// builder.add_ballot_simple(&[9, 0, 4])?;
/// builder.add_ballot_simple(&[0, 9, 5])?;
///
/// let result = builder.tally()?;
/// assert_eq!(result.winners, vec!["Anna".to_string(), "Bob".to_string()]);
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TallyRules,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &TallyRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: *rules,
            _candidates: Vec::new(),
            _ballots: Vec::new(),
        })
    }

    /// Registers the candidates, in the order of the scores of the ballots.
    ///
    /// Ballots added before are discarded.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        if cands.is_empty() {
            return Err(VotingErrors::NoCandidates);
        }
        Ok(Builder {
            _rules: self._rules,
            _candidates: cands
                .iter()
                .map(|name| Candidate {
                    name: name.clone(),
                    code: None,
                })
                .collect(),
            _ballots: Vec::new(),
        })
    }

    /// Adds a ballot with integer scores.
    ///
    /// It is the simplest use case for most cases.
    pub fn add_ballot_simple(&mut self, scores: &[u32]) -> Result<(), VotingErrors> {
        let scores: Vec<BigRational> = scores
            .iter()
            .map(|s| BigRational::from_integer(BigInt::from(*s)))
            .collect();
        self.add_ballot(None, &scores)
    }

    /// Adds a ballot with exact scores.
    ///
    /// The ballot must hold one score per registered candidate.
    pub fn add_ballot(
        &mut self,
        id: Option<String>,
        scores: &[BigRational],
    ) -> Result<(), VotingErrors> {
        if scores.len() != self._candidates.len() {
            return Err(VotingErrors::MalformedBallot {
                ballot_index: self._ballots.len(),
                expected: self._candidates.len(),
                found: scores.len(),
            });
        }
        self._ballots.push(Ballot {
            id,
            scores: scores.to_vec(),
        });
        Ok(())
    }

    /// Runs the tally over all the ballots added so far.
    pub fn tally(&self) -> Result<VotingResult, VotingErrors> {
        crate::run_voting_stats(&self._ballots, &self._rules, &self._candidates)
    }
}
