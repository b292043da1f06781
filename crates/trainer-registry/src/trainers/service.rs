use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use super::analytics::{self, RankedTrainer, RegistrySummary};
use super::clock::{Clock, SystemClock};
use super::domain::{ApplicationStatus, Trainer, TrainerId, TrainerSubmission};
use super::repository::{Page, PageRequest, RepositoryError, TrainerRepository};
use super::validation::{TrainerValidator, ValidationError, ValidationPolicy};

/// Service composing the validator, repository, and analytics.
pub struct TrainerService<R> {
    repository: Arc<R>,
    validator: TrainerValidator,
    clock: Arc<dyn Clock>,
}

impl<R> TrainerService<R>
where
    R: TrainerRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: ValidationPolicy) -> Self {
        Self::with_clock(repository, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, policy: ValidationPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            validator: TrainerValidator::with_policy(policy),
            clock,
        }
    }

    /// Register a new application. The stored status is always `PENDING`.
    pub fn create_trainer(
        &self,
        submission: TrainerSubmission,
    ) -> Result<Trainer, TrainerServiceError> {
        let TrainerSubmission { profile, .. } = submission;
        self.validator.validate(&profile, self.clock.today())?;

        if self.repository.exists_by_email(&profile.email)? {
            warn!(email = %profile.email, "rejected duplicate trainer application");
            return Err(TrainerServiceError::AlreadyExists {
                email: profile.email,
            });
        }

        let trainer = self
            .repository
            .insert(profile, ApplicationStatus::Pending)?;
        info!(
            trainer_id = %trainer.id,
            name = %trainer.full_name(),
            "trainer application submitted"
        );
        Ok(trainer)
    }

    pub fn get_trainer_by_id(&self, id: TrainerId) -> Result<Trainer, TrainerServiceError> {
        self.repository
            .find_by_id(id)?
            .ok_or(TrainerServiceError::NotFound(TrainerLookup::Id(id)))
    }

    pub fn get_trainer_by_email(&self, email: &str) -> Result<Trainer, TrainerServiceError> {
        self.repository
            .find_by_email(email)?
            .ok_or_else(|| TrainerServiceError::NotFound(TrainerLookup::Email(email.to_string())))
    }

    pub fn list_trainers(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_page(request)?)
    }

    /// Replace every editable field of an existing record. Identifier, status and
    /// creation time are kept.
    pub fn update_trainer(
        &self,
        id: TrainerId,
        submission: TrainerSubmission,
    ) -> Result<Trainer, TrainerServiceError> {
        let mut trainer = self.get_trainer_by_id(id)?;
        let TrainerSubmission { profile, .. } = submission;

        let email_changed = trainer.profile.email != profile.email;
        if email_changed && self.repository.exists_by_email(&profile.email)? {
            warn!(
                trainer_id = %id,
                email = %profile.email,
                "rejected update to an email held by another trainer"
            );
            return Err(TrainerServiceError::AlreadyExists {
                email: profile.email,
            });
        }

        self.validator.validate(&profile, self.clock.today())?;

        trainer.profile = profile;
        let updated = self.repository.update(trainer)?;
        info!(trainer_id = %updated.id, "trainer updated");
        Ok(updated)
    }

    /// Move an application to any status; there are no transition guards.
    pub fn update_application_status(
        &self,
        id: TrainerId,
        status: ApplicationStatus,
    ) -> Result<Trainer, TrainerServiceError> {
        let mut trainer = self.get_trainer_by_id(id)?;
        let previous = trainer.application_status;
        trainer.application_status = status;

        let updated = self.repository.update(trainer)?;
        info!(
            trainer_id = %id,
            from = previous.label(),
            to = status.label(),
            "application status changed"
        );
        Ok(updated)
    }

    pub fn delete_trainer(&self, id: TrainerId) -> Result<(), TrainerServiceError> {
        if !self.repository.exists_by_id(id)? {
            return Err(TrainerServiceError::NotFound(TrainerLookup::Id(id)));
        }
        self.repository.delete_by_id(id)?;
        info!(trainer_id = %id, "trainer deleted");
        Ok(())
    }

    pub fn trainers_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_status(status)?)
    }

    pub fn experienced_trainers(
        &self,
        min_years: i32,
    ) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_min_experience(min_years)?)
    }

    pub fn trainers_by_city(&self, city: &str) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_city(city)?)
    }

    pub fn trainers_by_state(&self, state: &str) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_state(state)?)
    }

    pub fn trainers_by_country(&self, country: &str) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_country(country)?)
    }

    pub fn trainers_by_specializations(
        &self,
        specializations: &[String],
    ) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_specializations_in(specializations)?)
    }

    pub fn search_trainers_by_name(&self, name: &str) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_name_containing(name)?)
    }

    pub fn trainers_by_salary_range(
        &self,
        min_salary: f64,
        max_salary: f64,
    ) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_salary_range(min_salary, max_salary)?)
    }

    pub fn trainers_available_for_travel(&self) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_available_for_travel(true)?)
    }

    pub fn trainers_born_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Trainer>, TrainerServiceError> {
        Ok(self.repository.find_by_date_of_birth_between(from, to)?)
    }

    pub fn status_statistics(
        &self,
    ) -> Result<BTreeMap<ApplicationStatus, u64>, TrainerServiceError> {
        let trainers = self.repository.find_all()?;
        Ok(analytics::status_histogram(&trainers))
    }

    pub fn city_statistics(&self) -> Result<BTreeMap<String, u64>, TrainerServiceError> {
        let trainers = self.repository.find_all()?;
        Ok(analytics::city_histogram(&trainers))
    }

    pub fn experience_statistics(&self) -> Result<BTreeMap<i32, u64>, TrainerServiceError> {
        let trainers = self.repository.find_all()?;
        Ok(analytics::experience_histogram(&trainers))
    }

    pub fn top_experienced_trainers(
        &self,
        limit: usize,
    ) -> Result<Vec<Trainer>, TrainerServiceError> {
        let trainers = self.repository.find_all()?;
        Ok(analytics::top_experienced(trainers, limit))
    }

    /// Applications created within the last `days` days, measured from now.
    pub fn recent_applications(&self, days: u32) -> Result<Vec<Trainer>, TrainerServiceError> {
        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Ok(self.repository.find_created_since(cutoff)?)
    }

    pub fn average_salary_expectation(&self) -> Result<f64, TrainerServiceError> {
        let trainers = self.repository.find_all()?;
        Ok(analytics::average_salary(&trainers))
    }

    pub fn all_cities(&self) -> Result<Vec<String>, TrainerServiceError> {
        Ok(self.repository.distinct_cities()?)
    }

    pub fn all_states(&self) -> Result<Vec<String>, TrainerServiceError> {
        Ok(self.repository.distinct_states()?)
    }

    pub fn summary(
        &self,
        top: usize,
        recent_days: u32,
    ) -> Result<RegistrySummary, TrainerServiceError> {
        let trainers = self.repository.find_all()?;
        let recent_applications = self.recent_applications(recent_days)?.len();
        let top_experienced = analytics::top_experienced(trainers.clone(), top)
            .iter()
            .map(RankedTrainer::from)
            .collect();

        Ok(RegistrySummary {
            total_trainers: trainers.len(),
            status_statistics: analytics::status_histogram(&trainers),
            city_statistics: analytics::city_histogram(&trainers),
            experience_statistics: analytics::experience_histogram(&trainers),
            average_salary: analytics::average_salary(&trainers),
            top_experienced,
            recent_applications,
        })
    }
}

/// The key a failed lookup was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerLookup {
    Id(TrainerId),
    Email(String),
}

impl fmt::Display for TrainerLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerLookup::Id(id) => write!(f, "Trainer not found with id: {id}"),
            TrainerLookup::Email(email) => write!(f, "Trainer not found with email: {email}"),
        }
    }
}

/// Error raised by the trainer service.
#[derive(Debug, thiserror::Error)]
pub enum TrainerServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Trainer with email {email} already exists")]
    AlreadyExists { email: String },
    #[error("{0}")]
    NotFound(TrainerLookup),
    #[error("unexpected store failure: {0}")]
    Unexpected(String),
}

impl From<RepositoryError> for TrainerServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Conflict { email } => Self::AlreadyExists { email },
            RepositoryError::NotFound(id) => Self::NotFound(TrainerLookup::Id(id)),
            RepositoryError::Unavailable(reason) => Self::Unexpected(reason),
        }
    }
}
