//! Aggregations computed in memory over a full trainer snapshot.
//!
//! These load every row per call. Replacing them with store-side group/count queries
//! must keep the same output shapes.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{ApplicationStatus, Trainer};

/// Width of one experience bucket, in years.
pub const EXPERIENCE_BUCKET_WIDTH: i32 = 5;

/// Count per status. Statuses with no records are absent rather than zero.
pub fn status_histogram(trainers: &[Trainer]) -> BTreeMap<ApplicationStatus, u64> {
    let mut histogram = BTreeMap::new();
    for trainer in trainers {
        *histogram.entry(trainer.application_status).or_insert(0) += 1;
    }
    histogram
}

/// Count per city, keyed by the city exactly as stored.
pub fn city_histogram(trainers: &[Trainer]) -> BTreeMap<String, u64> {
    let mut histogram = BTreeMap::new();
    for trainer in trainers {
        *histogram.entry(trainer.profile.city.clone()).or_insert(0) += 1;
    }
    histogram
}

pub fn experience_bucket(years: i32) -> i32 {
    years.div_euclid(EXPERIENCE_BUCKET_WIDTH) * EXPERIENCE_BUCKET_WIDTH
}

/// Count per experience bucket, keyed by the bucket's lower bound (0, 5, 10, ...).
pub fn experience_histogram(trainers: &[Trainer]) -> BTreeMap<i32, u64> {
    let mut histogram = BTreeMap::new();
    for trainer in trainers {
        let bucket = experience_bucket(trainer.profile.years_of_experience);
        *histogram.entry(bucket).or_insert(0) += 1;
    }
    histogram
}

/// Most experienced first. The sort is stable, so ties keep their input order.
pub fn top_experienced(mut trainers: Vec<Trainer>, limit: usize) -> Vec<Trainer> {
    trainers.sort_by(|left, right| {
        right
            .profile
            .years_of_experience
            .cmp(&left.profile.years_of_experience)
    });
    trainers.truncate(limit);
    trainers
}

/// Mean of the stated salary expectations; `0.0` when nobody stated one.
pub fn average_salary(trainers: &[Trainer]) -> f64 {
    let (sum, count) = trainers
        .iter()
        .filter_map(|trainer| trainer.profile.salary_expectation)
        .fold((0.0_f64, 0_u64), |(sum, count), salary| {
            (sum + salary, count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Combined snapshot used by the command-line report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySummary {
    pub total_trainers: usize,
    pub status_statistics: BTreeMap<ApplicationStatus, u64>,
    pub city_statistics: BTreeMap<String, u64>,
    pub experience_statistics: BTreeMap<i32, u64>,
    pub average_salary: f64,
    pub top_experienced: Vec<RankedTrainer>,
    pub recent_applications: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTrainer {
    pub name: String,
    pub email: String,
    pub years_of_experience: i32,
    pub status_label: &'static str,
}

impl From<&Trainer> for RankedTrainer {
    fn from(trainer: &Trainer) -> Self {
        Self {
            name: trainer.full_name(),
            email: trainer.profile.email.clone(),
            years_of_experience: trainer.profile.years_of_experience,
            status_label: trainer.application_status.label(),
        }
    }
}
