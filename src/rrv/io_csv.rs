// Primitives for reading CSV files.

use std::fs::File;
use std::io::Read;

use crate::rrv::{io_common::make_default_id, *};

pub fn read_csv_scores(path: String, cfs: &FileSource) -> RrvResult<ParsedTable> {
    let rdr = get_reader(&path)?;
    read_csv_table(path, rdr, cfs)
}

pub fn read_csv_table<R: Read>(
    path: String,
    rdr: csv::Reader<R>,
    cfs: &FileSource,
) -> RrvResult<ParsedTable> {
    let default_id = make_default_id(&path);

    let id_idx_o = cfs.id_column()?;
    let choices_start_col = cfs.first_vote_column()?;
    let first_row = cfs.first_vote_row()?;

    let mut header: Option<Vec<String>> = None;
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The index starts at 1 to respect most conventions in the excel world
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu {
            path: path.clone(),
            lineno,
        })?;
        if lineno < first_row {
            if lineno + 1 == first_row {
                let names: Vec<String> = line
                    .iter()
                    .skip(choices_start_col)
                    .map(|s| s.to_string())
                    .collect();
                debug!("read_csv_table: header: {:?}", names);
                header = Some(names);
            }
            continue;
        }
        // Blank lines carry no ballot.
        if line.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_table: lineno: {:?} skipping blank line", lineno);
            continue;
        }

        let id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(MalformedInputSnafu {
                    path: path.clone(),
                    lineno,
                    message: "line too short for the id column",
                })?
                .to_string()
        } else {
            default_id(lineno)
        };

        let scores: Vec<String> = line
            .iter()
            .skip(choices_start_col)
            .map(|s| s.to_string())
            .collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, &scores);

        res.push(ParsedBallot { id, lineno, scores });
    }
    Ok(ParsedTable {
        path,
        header,
        ballots: res,
    })
}

fn get_reader(path: &str) -> RrvResult<csv::Reader<Box<dyn Read>>> {
    let input: Box<dyn Read> = if path == STDIN_PATH {
        Box::new(std::io::stdin())
    } else {
        Box::new(File::open(path).context(OpeningFileSnafu { path })?)
    };
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input))
}
