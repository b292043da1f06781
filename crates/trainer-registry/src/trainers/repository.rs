use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{ApplicationStatus, Trainer, TrainerId, TrainerProfile};
use super::validation::ValidationError;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Lookups signal absence through `Option` or an empty `Vec`; errors are reserved for
/// constraint violations and store failures.
pub trait TrainerRepository: Send + Sync {
    /// Insert a new row, assigning its identifier and both timestamps.
    fn insert(
        &self,
        profile: TrainerProfile,
        status: ApplicationStatus,
    ) -> Result<Trainer, RepositoryError>;
    /// Replace an existing row, keeping `created_at` and refreshing `updated_at`.
    fn update(&self, trainer: Trainer) -> Result<Trainer, RepositoryError>;
    fn delete_by_id(&self, id: TrainerId) -> Result<(), RepositoryError>;

    fn find_by_id(&self, id: TrainerId) -> Result<Option<Trainer>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Trainer>, RepositoryError>;
    fn exists_by_id(&self, id: TrainerId) -> Result<bool, RepositoryError>;
    fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    fn find_all(&self) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_page(&self, request: &PageRequest) -> Result<Page<Trainer>, RepositoryError>;

    fn find_by_status(&self, status: ApplicationStatus) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_min_experience(&self, years: i32) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_city(&self, city: &str) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_state(&self, state: &str) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_country(&self, country: &str) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_available_for_travel(
        &self,
        available: bool,
    ) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_salary_range(&self, min: f64, max: f64) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_specializations_in(
        &self,
        specializations: &[String],
    ) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Trainer>, RepositoryError>;
    fn find_by_date_of_birth_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Trainer>, RepositoryError>;

    fn distinct_cities(&self) -> Result<Vec<String>, RepositoryError>;
    fn distinct_states(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("email {email} is already registered")]
    Conflict { email: String },
    #[error("trainer {0} not found")]
    NotFound(TrainerId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Column a page of trainers can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
    City,
    State,
    Country,
    DateOfBirth,
    YearsOfExperience,
    SalaryExpectation,
    ApplicationStatus,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let field = match value.trim() {
            "id" => Self::Id,
            "firstName" => Self::FirstName,
            "lastName" => Self::LastName,
            "email" => Self::Email,
            "city" => Self::City,
            "state" => Self::State,
            "country" => Self::Country,
            "dateOfBirth" => Self::DateOfBirth,
            "yearsOfExperience" => Self::YearsOfExperience,
            "salaryExpectation" => Self::SalaryExpectation,
            "applicationStatus" => Self::ApplicationStatus,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            other => return Err(ValidationError::UnknownSortField(other.to_string())),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `desc` in any case selects descending; everything else sorts ascending.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }
}

/// Zero-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(Self {
            page,
            size,
            sort: SortField::default(),
            direction: SortDirection::default(),
        })
    }

    pub fn sorted_by(mut self, sort: SortField, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus the totals needed for navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub number: usize,
    pub size: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(self.size as u64)
        }
    }
}
