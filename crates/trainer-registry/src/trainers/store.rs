use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};

use super::clock::{Clock, SystemClock};
use super::domain::{ApplicationStatus, Trainer, TrainerId, TrainerProfile};
use super::repository::{
    Page, PageRequest, RepositoryError, SortDirection, SortField, TrainerRepository,
};

/// Process-local trainer table.
///
/// Rows live in an id-ordered map next to a unique email index. Both are guarded by the
/// same mutex, so the email check and the write it protects cannot interleave with
/// another writer.
pub struct InMemoryTrainerStore {
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    last_id: u64,
    rows: BTreeMap<TrainerId, Trainer>,
    emails: HashMap<String, TrainerId>,
}

impl Default for InMemoryTrainerStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl InMemoryTrainerStore {
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.state()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.state()?.rows.is_empty())
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("trainer store mutex poisoned".to_string()))
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<Trainer>, RepositoryError>
    where
        F: Fn(&Trainer) -> bool,
    {
        let state = self.state()?;
        Ok(state
            .rows
            .values()
            .filter(|trainer| predicate(trainer))
            .cloned()
            .collect())
    }

    fn distinct<F>(&self, column: F) -> Result<Vec<String>, RepositoryError>
    where
        F: Fn(&Trainer) -> &str,
    {
        let state = self.state()?;
        let values: BTreeSet<String> = state
            .rows
            .values()
            .map(|trainer| column(trainer).to_string())
            .collect();
        Ok(values.into_iter().collect())
    }
}

impl TrainerRepository for InMemoryTrainerStore {
    fn insert(
        &self,
        profile: TrainerProfile,
        status: ApplicationStatus,
    ) -> Result<Trainer, RepositoryError> {
        let mut state = self.state()?;
        if state.emails.contains_key(&profile.email) {
            return Err(RepositoryError::Conflict {
                email: profile.email,
            });
        }

        state.last_id += 1;
        let id = TrainerId(state.last_id);
        let now = self.clock.now();
        let trainer = Trainer {
            id,
            profile,
            application_status: status,
            created_at: now,
            updated_at: now,
        };

        state.emails.insert(trainer.profile.email.clone(), id);
        state.rows.insert(id, trainer.clone());
        Ok(trainer)
    }

    fn update(&self, mut trainer: Trainer) -> Result<Trainer, RepositoryError> {
        let mut state = self.state()?;
        let (previous_email, created_at) = match state.rows.get(&trainer.id) {
            Some(stored) => (stored.profile.email.clone(), stored.created_at),
            None => return Err(RepositoryError::NotFound(trainer.id)),
        };

        if let Some(owner) = state.emails.get(&trainer.profile.email) {
            if *owner != trainer.id {
                return Err(RepositoryError::Conflict {
                    email: trainer.profile.email,
                });
            }
        }

        if previous_email != trainer.profile.email {
            state.emails.remove(&previous_email);
            state.emails.insert(trainer.profile.email.clone(), trainer.id);
        }

        trainer.created_at = created_at;
        trainer.updated_at = self.clock.now();
        state.rows.insert(trainer.id, trainer.clone());
        Ok(trainer)
    }

    fn delete_by_id(&self, id: TrainerId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let removed = state
            .rows
            .remove(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        state.emails.remove(&removed.profile.email);
        Ok(())
    }

    fn find_by_id(&self, id: TrainerId) -> Result<Option<Trainer>, RepositoryError> {
        Ok(self.state()?.rows.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Trainer>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.rows.get(id))
            .cloned())
    }

    fn exists_by_id(&self, id: TrainerId) -> Result<bool, RepositoryError> {
        Ok(self.state()?.rows.contains_key(&id))
    }

    fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.state()?.emails.contains_key(email))
    }

    fn find_all(&self) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|_| true)
    }

    fn find_page(&self, request: &PageRequest) -> Result<Page<Trainer>, RepositoryError> {
        let mut rows = self.find_all()?;
        rows.sort_by(|left, right| {
            let ordering = compare_by(request.sort, left, right);
            let ordering = match request.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            ordering.then_with(|| left.id.cmp(&right.id))
        });

        let total_elements = rows.len() as u64;
        let content = rows
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();

        Ok(Page {
            content,
            total_elements,
            number: request.page,
            size: request.size,
        })
    }

    fn find_by_status(&self, status: ApplicationStatus) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| trainer.application_status == status)
    }

    fn find_by_min_experience(&self, years: i32) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| trainer.profile.years_of_experience >= years)
    }

    fn find_by_city(&self, city: &str) -> Result<Vec<Trainer>, RepositoryError> {
        let needle = city.to_lowercase();
        self.select(|trainer| trainer.profile.city.to_lowercase() == needle)
    }

    fn find_by_state(&self, state: &str) -> Result<Vec<Trainer>, RepositoryError> {
        let needle = state.to_lowercase();
        self.select(|trainer| trainer.profile.state.to_lowercase() == needle)
    }

    fn find_by_country(&self, country: &str) -> Result<Vec<Trainer>, RepositoryError> {
        let needle = country.to_lowercase();
        self.select(|trainer| trainer.profile.country.to_lowercase() == needle)
    }

    fn find_by_available_for_travel(
        &self,
        available: bool,
    ) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| trainer.profile.available_for_travel == available)
    }

    fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| {
            trainer.profile.first_name.contains(fragment)
                || trainer.profile.last_name.contains(fragment)
        })
    }

    fn find_by_salary_range(&self, min: f64, max: f64) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| {
            trainer
                .profile
                .salary_expectation
                .is_some_and(|salary| salary >= min && salary <= max)
        })
    }

    fn find_by_specializations_in(
        &self,
        specializations: &[String],
    ) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| {
            trainer
                .profile
                .specializations
                .iter()
                .any(|held| specializations.contains(held))
        })
    }

    fn find_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| trainer.created_at >= since)
    }

    fn find_by_date_of_birth_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Trainer>, RepositoryError> {
        self.select(|trainer| {
            trainer.profile.date_of_birth >= start && trainer.profile.date_of_birth <= end
        })
    }

    fn distinct_cities(&self) -> Result<Vec<String>, RepositoryError> {
        self.distinct(|trainer| trainer.profile.city.as_str())
    }

    fn distinct_states(&self) -> Result<Vec<String>, RepositoryError> {
        self.distinct(|trainer| trainer.profile.state.as_str())
    }
}

fn compare_by(field: SortField, left: &Trainer, right: &Trainer) -> Ordering {
    let (a, b) = (&left.profile, &right.profile);
    match field {
        SortField::Id => left.id.cmp(&right.id),
        SortField::FirstName => a.first_name.cmp(&b.first_name),
        SortField::LastName => a.last_name.cmp(&b.last_name),
        SortField::Email => a.email.cmp(&b.email),
        SortField::City => a.city.cmp(&b.city),
        SortField::State => a.state.cmp(&b.state),
        SortField::Country => a.country.cmp(&b.country),
        SortField::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
        SortField::YearsOfExperience => a.years_of_experience.cmp(&b.years_of_experience),
        SortField::SalaryExpectation => match (a.salary_expectation, b.salary_expectation) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::ApplicationStatus => left.application_status.cmp(&right.application_status),
        SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        SortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
    }
}
