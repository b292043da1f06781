use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::PagingConfig;
use crate::trainers::clock::Clock;
use crate::trainers::domain::{
    ApplicationStatus, Trainer, TrainerId, TrainerProfile, TrainerSubmission,
};
use crate::trainers::repository::{Page, PageRequest, RepositoryError, TrainerRepository};
use crate::trainers::store::InMemoryTrainerStore;
use crate::trainers::validation::ValidationPolicy;
use crate::trainers::{trainer_router, TrainerService};

/// Clock frozen at a chosen instant; tests move it explicitly.
pub(super) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn profile(email: &str) -> TrainerProfile {
    TrainerProfile {
        first_name: "Maya".to_string(),
        last_name: "Okafor".to_string(),
        email: email.to_string(),
        phone_number: "+13125550148".to_string(),
        date_of_birth: date(1990, 4, 12),
        address: "410 N Michigan Ave".to_string(),
        city: "Chicago".to_string(),
        state: "Illinois".to_string(),
        country: "USA".to_string(),
        postal_code: "60611".to_string(),
        highest_qualification: "MSc Computer Science".to_string(),
        years_of_experience: 8,
        specializations: vec!["Rust".to_string(), "Distributed Systems".to_string()],
        certifications: vec!["AWS Solutions Architect".to_string()],
        previous_company: "Northwind Learning".to_string(),
        additional_notes: Some("Prefers hybrid cohorts".to_string()),
        salary_expectation: Some(95_000.0),
        available_for_travel: true,
    }
}

pub(super) fn submission(email: &str) -> TrainerSubmission {
    TrainerSubmission::from(profile(email))
}

pub(super) fn submission_with<F>(email: &str, edit: F) -> TrainerSubmission
where
    F: FnOnce(&mut TrainerProfile),
{
    let mut profile = profile(email);
    edit(&mut profile);
    TrainerSubmission::from(profile)
}

pub(super) type MemoryService = TrainerService<InMemoryTrainerStore>;

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryTrainerStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at(fixed_now()));
    let store = Arc::new(InMemoryTrainerStore::with_clock(clock.clone()));
    let service =
        TrainerService::with_clock(store.clone(), ValidationPolicy::default(), clock.clone());
    (service, store, clock)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    trainer_router(Arc::new(service), PagingConfig::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl TrainerRepository for UnavailableRepository {
    fn insert(
        &self,
        _profile: TrainerProfile,
        _status: ApplicationStatus,
    ) -> Result<Trainer, RepositoryError> {
        offline()
    }

    fn update(&self, _trainer: Trainer) -> Result<Trainer, RepositoryError> {
        offline()
    }

    fn delete_by_id(&self, _id: TrainerId) -> Result<(), RepositoryError> {
        offline()
    }

    fn find_by_id(&self, _id: TrainerId) -> Result<Option<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<Trainer>, RepositoryError> {
        offline()
    }

    fn exists_by_id(&self, _id: TrainerId) -> Result<bool, RepositoryError> {
        offline()
    }

    fn exists_by_email(&self, _email: &str) -> Result<bool, RepositoryError> {
        offline()
    }

    fn find_all(&self) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_page(&self, _request: &PageRequest) -> Result<Page<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_status(&self, _status: ApplicationStatus) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_min_experience(&self, _years: i32) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_city(&self, _city: &str) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_state(&self, _state: &str) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_country(&self, _country: &str) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_available_for_travel(
        &self,
        _available: bool,
    ) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_name_containing(&self, _fragment: &str) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_salary_range(&self, _min: f64, _max: f64) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_specializations_in(
        &self,
        _specializations: &[String],
    ) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_created_since(&self, _since: DateTime<Utc>) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn find_by_date_of_birth_between(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Trainer>, RepositoryError> {
        offline()
    }

    fn distinct_cities(&self) -> Result<Vec<String>, RepositoryError> {
        offline()
    }

    fn distinct_states(&self) -> Result<Vec<String>, RepositoryError> {
        offline()
    }
}
