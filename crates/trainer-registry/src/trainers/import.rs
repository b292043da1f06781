use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{TrainerProfile, TrainerSubmission};
use super::repository::TrainerRepository;
use super::service::TrainerService;

/// Separator for list-valued cells such as `specializations`.
const LIST_SEPARATOR: char = ';';

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unable to open seed file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed seed row: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of loading a batch of submissions through the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

pub fn load_submissions(path: &Path) -> Result<Vec<TrainerSubmission>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_submissions(file)
}

pub fn parse_submissions<R: Read>(reader: R) -> Result<Vec<TrainerSubmission>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut submissions = Vec::new();

    for record in csv_reader.deserialize::<TrainerRow>() {
        let row = record?;
        submissions.push(TrainerSubmission::from(row.into_profile()));
    }

    Ok(submissions)
}

/// Create every submission through the service. Rows the service rejects are skipped.
pub fn seed<R>(service: &TrainerService<R>, submissions: Vec<TrainerSubmission>) -> SeedReport
where
    R: TrainerRepository + 'static,
{
    let mut report = SeedReport::default();
    for submission in submissions {
        let email = submission.profile.email.clone();
        match service.create_trainer(submission) {
            Ok(_) => report.created += 1,
            Err(err) => {
                warn!(%email, error = %err, "skipping seed row");
                report.skipped += 1;
            }
        }
    }
    info!(
        created = report.created,
        skipped = report.skipped,
        "seed data loaded"
    );
    report
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrainerRow {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    date_of_birth: NaiveDate,
    address: String,
    city: String,
    state: String,
    country: String,
    postal_code: String,
    highest_qualification: String,
    years_of_experience: i32,
    specializations: String,
    #[serde(default)]
    certifications: Option<String>,
    previous_company: String,
    #[serde(default)]
    additional_notes: Option<String>,
    #[serde(default)]
    salary_expectation: Option<f64>,
    #[serde(default)]
    available_for_travel: Option<bool>,
}

impl TrainerRow {
    fn into_profile(self) -> TrainerProfile {
        TrainerProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            date_of_birth: self.date_of_birth,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
            highest_qualification: self.highest_qualification,
            years_of_experience: self.years_of_experience,
            specializations: split_list(&self.specializations),
            certifications: self
                .certifications
                .as_deref()
                .map(split_list)
                .unwrap_or_default(),
            previous_company: self.previous_company,
            additional_notes: self.additional_notes,
            salary_expectation: self.salary_expectation,
            available_for_travel: self.available_for_travel.unwrap_or(false),
        }
    }
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
