use crate::rrv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName", default)]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_juridiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The description of the contest in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    pub seats: u32,
    #[serde(rename = "maxScore")]
    pub max_score: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    pub first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    pub first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    pub const DEFAULT_FIRST_VOTE_COLUMN: usize = 3;
    pub const DEFAULT_FIRST_VOTE_ROW: usize = 2;

    pub fn new(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            first_vote_column_index: None,
            first_vote_row_index: None,
            id_column_index: None,
            excel_worksheet_name: None,
        }
    }

    /// The first column with scores, starting at 0.
    pub fn first_vote_column(&self) -> RrvResult<usize> {
        let x = read_js_int_or(
            &self.first_vote_column_index,
            FileSource::DEFAULT_FIRST_VOTE_COLUMN,
        )?;
        ensure!(
            x >= 1,
            InvalidConfigurationSnafu {
                message: "firstVoteColumnIndex starts at 1",
            }
        );
        Ok(x - 1)
    }

    /// The first row with a ballot, starting at 1 to respect most conventions in the excel world.
    pub fn first_vote_row(&self) -> RrvResult<usize> {
        let x = read_js_int_or(&self.first_vote_row_index, FileSource::DEFAULT_FIRST_VOTE_ROW)?;
        ensure!(
            x >= 1,
            InvalidConfigurationSnafu {
                message: "firstVoteRowIndex starts at 1",
            }
        );
        Ok(x)
    }

    /// The column with the ballot ids, starting at 0, if any.
    pub fn id_column(&self) -> RrvResult<Option<usize>> {
        match &self.id_column_index {
            None | Some(JSValue::Null) => Ok(None),
            x => {
                let idx = read_js_int(x)?;
                ensure!(
                    idx >= 1,
                    InvalidConfigurationSnafu {
                        message: "idColumnIndex starts at 1",
                    }
                );
                Ok(Some(idx - 1))
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RrvCandidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RrvRules {
    #[serde(rename = "numberOfWinners")]
    pub number_of_winners: Option<JSValue>,
    #[serde(rename = "maxScore")]
    pub max_score: Option<JSValue>,
    #[serde(rename = "rulesDescription")]
    pub rules_description: Option<String>,
}

impl RrvRules {
    pub fn number_of_winners(&self) -> RrvResult<Option<u32>> {
        read_js_opt_u32(&self.number_of_winners)
    }

    pub fn max_score(&self) -> RrvResult<Option<u32>> {
        read_js_opt_u32(&self.max_score)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RrvConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources", default)]
    pub cvr_file_sources: Vec<FileSource>,
    pub candidates: Option<Vec<RrvCandidate>>,
    #[serde(default)]
    pub rules: RrvRules,
}

pub fn read_config(path: String) -> RrvResult<RrvConfig> {
    let config_str = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let config: RrvConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> RrvResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

fn read_js_opt_u32(x: &Option<JSValue>) -> RrvResult<Option<u32>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        _ => {
            let v = read_js_int(x)?;
            let v32 = u32::try_from(v).ok().context(ParsingJsonNumberSnafu {
                content: v.to_string(),
            })?;
            Ok(Some(v32))
        }
    }
}

fn read_js_int_or(x: &Option<JSValue>, default: usize) -> RrvResult<usize> {
    match x {
        None | Some(JSValue::Null) => Ok(default),
        _ => read_js_int(x),
    }
}

fn read_js_int(x: &Option<JSValue>) -> RrvResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize).context(ParsingJsonNumberSnafu {
            content: n.to_string(),
        }),
        // Parsing the Excel-style columns: A is 1, Z is 26, AA is 27.
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_uppercase()
                .chars()
                .try_fold(0usize, |acc, c| {
                    acc.checked_mul(26)?
                        .checked_add(c as usize - 'A' as usize + 1)
                })
                .context(ParsingJsonNumberSnafu { content: s.clone() })
        }
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        x => None.context(ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        }),
    }
}
