use std::sync::OnceLock;

use chrono::{Months, NaiveDate};
use regex::Regex;

use super::domain::TrainerProfile;

/// Validation errors raised before a trainer record reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Trainer data cannot be null")]
    MissingPayload,
    #[error("{field} is required")]
    Blank { field: &'static str },
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Please provide a valid email address")]
    InvalidEmail,
    #[error("Please provide a valid phone number")]
    InvalidPhoneNumber,
    #[error("Please provide a valid postal code")]
    InvalidPostalCode,
    #[error("Date of birth must be in the past")]
    DateOfBirthNotInPast,
    #[error("Trainer must be at least {minimum_age} years old")]
    Underage { minimum_age: u32 },
    #[error("Years of experience cannot be negative")]
    NegativeExperience,
    #[error("Years of experience cannot exceed {max}")]
    ExperienceTooHigh { max: i32 },
    #[error("At least one specialization is required")]
    MissingSpecialization,
    #[error("Salary expectation cannot be negative")]
    NegativeSalary,
    #[error("Salary expectation must be a finite number")]
    InvalidSalary,
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("cannot sort trainers by '{0}'")]
    UnknownSortField(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

const DEFAULT_MINIMUM_AGE: u32 = 18;
const DEFAULT_MAX_YEARS_OF_EXPERIENCE: i32 = 50;

/// Policy dials for the business rules that are not fixed by the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub minimum_age: u32,
    pub max_years_of_experience: i32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            minimum_age: DEFAULT_MINIMUM_AGE,
            max_years_of_experience: DEFAULT_MAX_YEARS_OF_EXPERIENCE,
        }
    }
}

/// Applies the same rule set to creates and full updates.
#[derive(Debug, Clone, Default)]
pub struct TrainerValidator {
    policy: ValidationPolicy,
}

impl TrainerValidator {
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Unwrap an optional payload, treating absence as a validation failure.
    pub fn require<T>(input: Option<T>) -> Result<T, ValidationError> {
        input.ok_or(ValidationError::MissingPayload)
    }

    pub fn validate(
        &self,
        profile: &TrainerProfile,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        bounded("First name", &profile.first_name, 2, 50)?;
        bounded("Last name", &profile.last_name, 2, 50)?;

        required("Email", &profile.email)?;
        if !email_pattern().is_match(profile.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }

        required("Phone number", &profile.phone_number)?;
        if !phone_pattern().is_match(&profile.phone_number) {
            return Err(ValidationError::InvalidPhoneNumber);
        }

        self.check_age(profile.date_of_birth, today)?;

        capped("Address", &profile.address, 255)?;
        capped("City", &profile.city, 100)?;
        capped("State", &profile.state, 100)?;
        capped("Country", &profile.country, 100)?;

        required("Postal code", &profile.postal_code)?;
        if !postal_code_pattern().is_match(&profile.postal_code) {
            return Err(ValidationError::InvalidPostalCode);
        }

        capped("Highest qualification", &profile.highest_qualification, 200)?;

        if profile.years_of_experience < 0 {
            return Err(ValidationError::NegativeExperience);
        }
        if profile.years_of_experience > self.policy.max_years_of_experience {
            return Err(ValidationError::ExperienceTooHigh {
                max: self.policy.max_years_of_experience,
            });
        }

        if profile
            .specializations
            .iter()
            .all(|specialization| specialization.trim().is_empty())
        {
            return Err(ValidationError::MissingSpecialization);
        }

        capped("Previous company", &profile.previous_company, 200)?;

        if let Some(notes) = &profile.additional_notes {
            if notes.chars().count() > 1000 {
                return Err(ValidationError::TooLong {
                    field: "Additional notes",
                    max: 1000,
                });
            }
        }

        if let Some(salary) = profile.salary_expectation {
            if !salary.is_finite() {
                return Err(ValidationError::InvalidSalary);
            }
            if salary < 0.0 {
                return Err(ValidationError::NegativeSalary);
            }
        }

        Ok(())
    }

    fn check_age(&self, date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
        if date_of_birth >= today {
            return Err(ValidationError::DateOfBirthNotInPast);
        }

        // Feb 29 birthdays clamp to Feb 28 in non-leap years.
        let latest_allowed = self
            .policy
            .minimum_age
            .checked_mul(12)
            .and_then(|months| today.checked_sub_months(Months::new(months)))
            .unwrap_or(NaiveDate::MIN);
        if date_of_birth > latest_allowed {
            return Err(ValidationError::Underage {
                minimum_age: self.policy.minimum_age,
            });
        }

        Ok(())
    }
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}

fn bounded(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    required(field, value)?;
    let length = value.chars().count();
    if length < min || length > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

fn capped(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    required(field, value)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*$")
            .expect("email pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern compiles"))
}

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{5,10}$").expect("postal code pattern compiles"))
}
