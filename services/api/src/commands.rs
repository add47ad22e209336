use crate::infra::resolve_scoring_config;
use clap::{ArgGroup, Args};
use deal_score::batch::{read_entries_from_path, score_entries, BatchOutcome};
use deal_score::error::AppError;
use deal_score::scoring::{DealScorer, ScoreRequest, ScoreResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["report", "inputs"])))]
pub(crate) struct ScoreArgs {
    /// Property analysis report (JSON) produced by the research pipeline
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Pre-built score inputs (JSON)
    #[arg(long)]
    pub(crate) inputs: Option<PathBuf>,
    /// Scoring config (JSON); defaults to DEAL_SCORE_CONFIG or the built-in rubric
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Pretty-print the JSON result
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with one deal per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Scoring config (JSON); defaults to DEAL_SCORE_CONFIG or the built-in rubric
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        report,
        inputs,
        config,
        pretty,
    } = args;

    let scorer = DealScorer::new(resolve_scoring_config(config.as_deref())?);
    let request = match (report, inputs) {
        (Some(path), _) => ScoreRequest::Report(read_json(&path)?),
        (None, Some(path)) => ScoreRequest::Inputs(read_json(&path)?),
        (None, None) => {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "either --report or --inputs is required",
            )))
        }
    };

    let result = scorer.score_request(&request);
    println!("{}", render_result(&result, pretty)?);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let scorer = DealScorer::new(resolve_scoring_config(args.config.as_deref())?);
    let entries = read_entries_from_path(&args.csv)?;
    let outcomes = score_entries(&scorer, &entries);

    println!("Scored {} deal(s) from {}", outcomes.len(), args.csv.display());
    for outcome in &outcomes {
        println!("{}", render_batch_line(outcome));
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn render_result(result: &ScoreResult, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(rendered)
}

pub(crate) fn render_batch_line(outcome: &BatchOutcome) -> String {
    format!("- {}: {}", outcome.id, outcome.result.summary())
}
