use log::{debug, info, warn};

use reweighted_voting::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use num_rational::BigRational;
use num_traits::Signed;
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::rrv::config_reader::*;
use crate::rrv::io_common::parse_score;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod report;

#[derive(Debug, Snafu)]
pub enum RrvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet to read"))]
    EmptyExcel { path: String },
    #[snafu(display("Excel file {path}, line {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error reading CSV file {path} at line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read a number from {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Malformed input in {path}, line {lineno}: {message}"))]
    MalformedInput {
        path: String,
        lineno: usize,
        message: String,
    },
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfiguration { message: String },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RrvResult<T> = Result<T, RrvError>;

/// The path that designates the standard input.
pub const STDIN_PATH: &str = "-";

/// A ballot, as parsed by the readers.
/// The scores are still the raw content of the cells.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    pub lineno: usize,
    pub scores: Vec<String>,
}

/// The content of one file source.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub path: String,
    /// The names found in the header row for the score columns, if there is a header.
    pub header: Option<Vec<String>>,
    pub ballots: Vec<ParsedBallot>,
}

fn result_stats_to_json(rs: &VotingResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        let mut exact_tally: JSMap<String, JSValue> = JSMap::new();
        for (name, total) in round_stat.tally.iter() {
            tally.insert(name.clone(), json!(format_decimal(total, 3)));
            exact_tally.insert(name.clone(), json!(total.to_string()));
        }
        let tally_results = vec![json!({ "elected": round_stat.elected })];

        let js = json!({
            "round": round_stat.round,
            "tally": tally,
            "exactTally": exact_tally,
            "tallyResults": tally_results
        });
        l.push(js);
    }
    l
}

fn build_summary_js(config: &RrvConfig, rules: &TallyRules, rv: &VotingResult) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_juridiction.clone(),
        office: config.output_settings.contest_office.clone(),
        seats: rules.number_of_winners,
        max_score: rules.max_score,
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv),
        "winners": rv.winners })
}

fn source_path(root_path: Option<&Path>, cfs: &FileSource) -> String {
    if cfs.file_path == STDIN_PATH {
        return STDIN_PATH.to_string();
    }
    let p: PathBuf = match root_path {
        Some(root) => root.join(&cfs.file_path),
        None => PathBuf::from(&cfs.file_path),
    };
    p.as_path().display().to_string()
}

fn read_score_data(root_path: Option<&Path>, cfs: &FileSource) -> RrvResult<ParsedTable> {
    let p = source_path(root_path, cfs);
    info!("Attempting to read score file {:?}", p);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_scores(p, cfs),
        "xlsx" => io_xlsx::read_excel_scores(p, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

// Candidates are taken from the configuration if present, otherwise from the
// header of the first source.
fn resolve_candidates(
    config_candidates: &Option<Vec<RrvCandidate>>,
    tables: &[ParsedTable],
) -> RrvResult<Vec<Candidate>> {
    let candidates: Vec<Candidate> = if let Some(cands) = config_candidates {
        cands
            .iter()
            .map(|c| Candidate {
                name: c.name.clone(),
                code: match c.code.clone() {
                    Some(x) if x.is_empty() => None,
                    x => x,
                },
            })
            .collect()
    } else if let Some(header) = tables.first().and_then(|t| t.header.clone()) {
        header
            .iter()
            .map(|name| Candidate {
                name: name.trim().to_string(),
                code: None,
            })
            .collect()
    } else {
        return InvalidConfigurationSnafu {
            message: "no candidate names: provide a header row or the candidates in the configuration",
        }
        .fail();
    };

    if candidates.is_empty() {
        return InvalidConfigurationSnafu {
            message: "no candidates in the election",
        }
        .fail();
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for c in candidates.iter() {
        if !seen.insert(c.name.as_str()) {
            return InvalidConfigurationSnafu {
                message: format!("duplicate candidate name {:?}", c.name),
            }
            .fail();
        }
    }

    for t in tables.iter() {
        if let Some(header) = &t.header {
            let same = header.len() == candidates.len()
                && header
                    .iter()
                    .zip(candidates.iter())
                    .all(|(h, c)| h.trim() == c.name);
            if !same {
                warn!(
                    "resolve_candidates: header of {} does not match the candidates: {:?}",
                    t.path, header
                );
            }
        }
    }
    Ok(candidates)
}

fn validate_ballots(table: &ParsedTable, num_candidates: usize) -> RrvResult<Vec<Ballot>> {
    let mut res: Vec<Ballot> = Vec::new();
    for pb in table.ballots.iter() {
        ensure!(
            pb.scores.len() == num_candidates,
            MalformedInputSnafu {
                path: table.path.clone(),
                lineno: pb.lineno,
                message: format!(
                    "expected {} scores, found {}",
                    num_candidates,
                    pb.scores.len()
                ),
            }
        );
        let mut scores: Vec<BigRational> = Vec::with_capacity(num_candidates);
        for (idx, cell) in pb.scores.iter().enumerate() {
            let score = parse_score(cell).context(MalformedInputSnafu {
                path: table.path.clone(),
                lineno: pb.lineno,
                message: format!("cannot read the score {:?} in score column {}", cell, idx + 1),
            })?;
            ensure!(
                !score.is_negative(),
                MalformedInputSnafu {
                    path: table.path.clone(),
                    lineno: pb.lineno,
                    message: format!("negative score {:?} in score column {}", cell, idx + 1),
                }
            );
            scores.push(score);
        }
        debug!("validate_ballots: ballot {}: {:?}", pb.id, scores);
        res.push(Ballot {
            id: Some(pb.id.clone()),
            scores,
        });
    }
    Ok(res)
}

fn validate_rules(rules: &RrvRules) -> RrvResult<TallyRules> {
    let res = TallyRules {
        number_of_winners: match rules.number_of_winners()? {
            Some(x) if x > 0 => x,
            None => TallyRules::DEFAULT_RULES.number_of_winners,
            Some(x) => {
                return InvalidConfigurationSnafu {
                    message: format!("the number of winners must be positive, got {}", x),
                }
                .fail();
            }
        },
        max_score: match rules.max_score()? {
            Some(x) if x > 0 => x,
            None => TallyRules::DEFAULT_RULES.max_score,
            Some(x) => {
                return InvalidConfigurationSnafu {
                    message: format!("the maximum score must be positive, got {}", x),
                }
                .fail();
            }
        },
    };
    Ok(res)
}

/// Reads the ballots of all the sources, runs the tally, prints the report and
/// writes or checks the summary.
///
/// Any error is fatal: nothing is printed if the ballots cannot be read or tallied.
pub fn run_election(
    config: &RrvConfig,
    root_path: Option<&Path>,
    out_path: Option<String>,
    check_summary_path: Option<String>,
) -> RrvResult<VotingResult> {
    info!("config: {:?}", config);

    // Validate the rules:
    let rules = validate_rules(&config.rules)?;

    ensure!(
        !config.cvr_file_sources.is_empty(),
        InvalidConfigurationSnafu {
            message: "no file sources detected",
        }
    );

    let mut tables: Vec<ParsedTable> = Vec::new();
    for cfs in config.cvr_file_sources.iter() {
        tables.push(read_score_data(root_path, cfs)?);
    }

    let candidates = resolve_candidates(&config.candidates, &tables)?;

    let mut data: Vec<Ballot> = Vec::new();
    for t in tables.iter() {
        let mut file_data = validate_ballots(t, candidates.len())?;
        data.append(&mut file_data);
    }
    info!("Read {} ballots", data.len());

    let result = run_voting_stats(&data, &rules, &candidates).context(VotingSnafu {})?;

    print!("{}", report::render_report(&result));

    // Assemble the final json
    let result_js = build_summary_js(config, &rules, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out_path.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingSummarySnafu { path })?;
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p.clone())?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu { path: summary_p }.fail();
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_election_test(
        test_name: &str,
        config_lpath: &str,
        summary_lpath: &str,
    ) -> RrvResult<VotingResult> {
        let _ = env_logger::builder().is_test(true).try_init();
        let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
        info!("Running test {}", test_name);
        let config_path = format!("{}/{}/{}", test_dir, test_name, config_lpath);
        let config = read_config(config_path.clone())?;
        let root = Path::new(config_path.as_str()).parent();
        run_election(
            &config,
            root,
            None,
            Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        )
    }

    fn test_wrapper(test_name: &str) -> RrvResult<VotingResult> {
        run_election_test(
            test_name,
            format!("{}_config.json", test_name).as_str(),
            format!("{}_expected_summary.json", test_name).as_str(),
        )
    }

    #[test]
    fn core_election_test() {
        let res = test_wrapper("core_election_test").unwrap();
        assert_eq!(
            res.winners,
            vec!["Rocky", "Cassie", "Kitty", "Zoe"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>()
        );
        assert_eq!(res.elected, vec![true, true, true, true, false]);
    }

    #[test]
    fn tiebreak_candidate_order_test() {
        let res = test_wrapper("tiebreak_candidate_order_test").unwrap();
        assert_eq!(res.winners, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn multi_source_test() {
        let res = test_wrapper("multi_source_test").unwrap();
        assert_eq!(res.winners, vec!["Ann".to_string(), "Cal".to_string()]);
    }

    #[test]
    fn malformed_row_test() {
        let res = test_wrapper("malformed_row_test");
        assert!(
            matches!(res, Err(RrvError::MalformedInput { lineno: 3, .. })),
            "{:?}",
            res
        );
    }

    #[test]
    fn too_many_seats_test() {
        let res = test_wrapper("too_many_seats_test");
        assert!(
            matches!(
                res,
                Err(RrvError::Voting {
                    source: VotingErrors::InvalidNumberOfWinners {
                        seats: 4,
                        candidates: 3
                    }
                })
            ),
            "{:?}",
            res
        );
    }

    #[test]
    fn summary_tally_keeps_candidate_order() {
        let n = |v: i64| BigRational::from_integer(v.into());
        let rs = VotingResult {
            winners: vec!["Zoe".to_string()],
            elected: vec![true, false],
            round_stats: vec![RoundStats {
                round: 1,
                tally: vec![("Zoe".to_string(), n(9)), ("Ann".to_string(), n(2))],
                elected: "Zoe".to_string(),
            }],
        };
        let js = result_stats_to_json(&rs);
        for key in ["tally", "exactTally"] {
            let names: Vec<&String> = js[0][key].as_object().unwrap().keys().collect();
            assert_eq!(names, vec!["Zoe", "Ann"]);
        }
    }

    fn table(header: Option<Vec<&str>>, rows: Vec<Vec<&str>>) -> ParsedTable {
        ParsedTable {
            path: "test.csv".to_string(),
            header: header.map(|h| h.iter().map(|s| s.to_string()).collect()),
            ballots: rows
                .iter()
                .enumerate()
                .map(|(idx, r)| ParsedBallot {
                    id: format!("test.csv-{:08}", idx + 2),
                    lineno: idx + 2,
                    scores: r.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn validate_ballots_rejects_negative_scores() {
        let t = table(None, vec![vec!["1", "2"], vec!["3", "-1"]]);
        let res = validate_ballots(&t, 2);
        assert!(
            matches!(res, Err(RrvError::MalformedInput { lineno: 3, .. })),
            "{:?}",
            res
        );
    }

    #[test]
    fn validate_ballots_rejects_text() {
        let t = table(None, vec![vec!["1", "many"]]);
        assert!(validate_ballots(&t, 2).is_err());
    }

    #[test]
    fn candidates_from_header() {
        let t = table(Some(vec![" A", "B "]), vec![]);
        let cands = resolve_candidates(&None, &[t]).unwrap();
        let names: Vec<String> = cands.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn candidates_required() {
        let t = table(None, vec![vec!["1"]]);
        assert!(matches!(
            resolve_candidates(&None, &[t]),
            Err(RrvError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn duplicate_candidates_rejected() {
        let t = table(Some(vec!["A", "A"]), vec![]);
        assert!(matches!(
            resolve_candidates(&None, &[t]),
            Err(RrvError::InvalidConfiguration { .. })
        ));
    }
}
