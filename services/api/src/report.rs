use crate::infra::registry_service;
use clap::Args;
use serde_json::json;
use std::path::{Path, PathBuf};
use trainer_registry::config::AppConfig;
use trainer_registry::error::AppError;
use trainer_registry::trainers::import::{load_submissions, seed};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV file of trainer applications to analyse
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// How many of the most experienced trainers to list
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
    /// Window, in days, for counting recent applications
    #[arg(long, default_value_t = 30)]
    pub(crate) days: u32,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let output = build_report(&config, &args.seed, args.top, args.days)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_report(
    config: &AppConfig,
    path: &Path,
    top: usize,
    days: u32,
) -> Result<serde_json::Value, AppError> {
    let service = registry_service(config);
    let submissions = load_submissions(path)?;
    let outcome = seed(&service, submissions);
    let summary = service.summary(top, days)?;

    Ok(json!({
        "seed": {
            "file": path.display().to_string(),
            "created": outcome.created,
            "skipped": outcome.skipped,
        },
        "summary": summary,
    }))
}
