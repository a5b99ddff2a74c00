use clap::Parser;

/// This is a tabulation program for sequential reweighted score elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election description in JSON format.
    /// If not provided, the ballots are read in CSV format from the standard input.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, rrvtab will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, '-' or empty) The file containing the score table. Setting this option overrides the
    /// sources that may be specified with the --config option. '-' reads from the standard input.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default csv) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 4) The number of seats to fill.
    #[clap(short, long, value_parser)]
    pub seats: Option<u32>,

    /// (default 9) The maximum score a voter can give to a candidate.
    #[clap(long, value_parser)]
    pub max_score: Option<u32>,

    /// (default 3) The first column holding scores, starting at 1.
    #[clap(long, value_parser)]
    pub first_vote_column: Option<usize>,

    /// (default 2) The first row holding a ballot, starting at 1. The row just above is the header.
    #[clap(long, value_parser)]
    pub first_vote_row: Option<usize>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
