// Primitives for reading Excel files.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::rrv::{io_common::make_default_id, *};

pub fn read_excel_scores(path: String, cfs: &FileSource) -> RrvResult<ParsedTable> {
    let wrange = get_range(&path, cfs)?;
    read_range(path, &wrange, cfs)
}

fn read_range(path: String, wrange: &Range<DataType>, cfs: &FileSource) -> RrvResult<ParsedTable> {
    let default_id = make_default_id(&path);

    // The range starts at the first non-empty cell, not at A1: the configured
    // positions are shifted by its origin.
    let (row0, col0) = wrange.start().unwrap_or((0, 0));
    let (row0, col0) = (row0 as usize, col0 as usize);
    let id_idx_o = match cfs.id_column()? {
        Some(id_idx) if id_idx < col0 => {
            return MalformedInputSnafu {
                path,
                lineno: row0 + 1,
                message: "the id column is left of the first non-empty column",
            }
            .fail()
        }
        Some(id_idx) => Some(id_idx - col0),
        None => None,
    };
    let start_col = cfs.first_vote_column()?.saturating_sub(col0);
    let first_row = cfs.first_vote_row()?;

    let mut header: Option<Vec<String>> = None;
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = row0 + idx + 1;
        if lineno < first_row {
            if lineno + 1 == first_row {
                let names: Vec<String> = row
                    .iter()
                    .skip(start_col)
                    .map(|cell| read_cell(&path, lineno, cell))
                    .collect::<RrvResult<Vec<String>>>()?;
                debug!("read_excel_scores: header: {:?}", names);
                header = Some(names);
            }
            continue;
        }
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }

        let id = match id_idx_o {
            Some(id_idx) => {
                let cell = row.get(id_idx).context(MalformedInputSnafu {
                    path: path.clone(),
                    lineno,
                    message: "line too short for the id column",
                })?;
                read_cell(&path, lineno, cell)?
            }
            None => default_id(lineno),
        };

        let scores: Vec<String> = row
            .iter()
            .skip(start_col)
            .map(|cell| read_cell(&path, lineno, cell))
            .collect::<RrvResult<Vec<String>>>()?;
        debug!("read_excel_scores: lineno: {:?} row: {:?}", lineno, &scores);
        res.push(ParsedBallot { id, lineno, scores });
    }
    Ok(ParsedTable {
        path,
        header,
        ballots: res,
    })
}

// Cells are turned back into text, to be read like the CSV cells.
fn read_cell(path: &str, lineno: usize, cell: &DataType) -> RrvResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.is_finite() => Ok(f.to_string()),
        DataType::Empty => Ok("".to_string()),
        _ => ExcelWrongCellTypeSnafu {
            path,
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> RrvResult<Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_scores: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(worksheet_name) = worksheet_name_o {
        workbook
            .worksheet_range(&worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };
    Ok(wrange)
}
