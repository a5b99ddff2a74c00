mod args;
mod rrv;

use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::rrv::config_reader::{read_config, FileSource, RrvConfig};
use crate::rrv::{run_election, RrvResult, STDIN_PATH};

// The command line options take precedence over the configuration file.
fn apply_overrides(config: &mut RrvConfig, args: &Args) {
    if let Some(input) = args.input.clone() {
        let provider = match args.input_type.as_deref() {
            Some(t) => t.to_string(),
            None if input.to_lowercase().ends_with(".xlsx") => "xlsx".to_string(),
            None => "csv".to_string(),
        };
        config.cvr_file_sources = vec![FileSource::new(&provider, &input)];
    } else if config.cvr_file_sources.is_empty() {
        // No description of the input: read the table from the standard input.
        let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
        config.cvr_file_sources = vec![FileSource::new(&provider, STDIN_PATH)];
    }

    for cfs in config.cvr_file_sources.iter_mut() {
        if let Some(c) = args.first_vote_column {
            cfs.first_vote_column_index = Some(json!(c));
        }
        if let Some(r) = args.first_vote_row {
            cfs.first_vote_row_index = Some(json!(r));
        }
        if let Some(w) = args.excel_worksheet_name.clone() {
            cfs.excel_worksheet_name = Some(w);
        }
    }

    if let Some(seats) = args.seats {
        config.rules.number_of_winners = Some(json!(seats));
    }
    if let Some(max_score) = args.max_score {
        config.rules.max_score = Some(json!(max_score));
    }
}

fn run(args: &Args) -> RrvResult<()> {
    let (mut config, root_path): (RrvConfig, Option<PathBuf>) = match args.config.clone() {
        Some(config_path) => {
            info!("Reading configuration {:?}", config_path);
            let config = read_config(config_path.clone())?;
            let root = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.to_path_buf());
            (config, root)
        }
        None => (RrvConfig::default(), None),
    };
    apply_overrides(&mut config, args);
    debug!("run: config after overrides: {:?}", config);

    run_election(
        &config,
        root_path.as_deref(),
        args.out.clone(),
        args.reference.clone(),
    )?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        eprintln!("An error occured: {}", e);
        if let Some(source) = std::error::Error::source(&e) {
            eprintln!("Caused by: {}", source);
        }
        std::process::exit(1);
    }
}
