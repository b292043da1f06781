use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainerId(pub u64);

impl fmt::Display for TrainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hiring pipeline position for a trainer application. Any status may move to any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    OnHold,
    InterviewScheduled,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending Review",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::OnHold => "On Hold",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Hired => "Hired",
        }
    }
}

/// Caller-editable trainer attributes. A full update replaces every one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub highest_qualification: String,
    pub years_of_experience: i32,
    pub specializations: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub previous_company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub salary_expectation: Option<f64>,
    #[serde(default)]
    pub available_for_travel: bool,
}

impl TrainerProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Inbound create/update payload. A status supplied here is accepted on the wire but
/// never trusted: creation always starts at `PENDING` and updates keep the stored status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSubmission {
    #[serde(flatten)]
    pub profile: TrainerProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
}

impl From<TrainerProfile> for TrainerSubmission {
    fn from(profile: TrainerProfile) -> Self {
        Self {
            profile,
            application_status: None,
        }
    }
}

/// Stored trainer application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: TrainerId,
    #[serde(flatten)]
    pub profile: TrainerProfile,
    pub application_status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trainer {
    pub fn full_name(&self) -> String {
        self.profile.full_name()
    }
}
