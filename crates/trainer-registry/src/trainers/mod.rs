//! Trainer application intake, lookup, and reporting.
//!
//! Requests flow router → service → repository. The service is the only layer that
//! enforces business rules; the repository owns storage and the unique email index.

pub mod analytics;
pub mod clock;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use domain::{ApplicationStatus, Trainer, TrainerId, TrainerProfile, TrainerSubmission};
pub use import::{ImportError, SeedReport};
pub use repository::{
    Page, PageRequest, RepositoryError, SortDirection, SortField, TrainerRepository,
};
pub use router::{trainer_router, ApiResponse, PageMetadata};
pub use service::{TrainerLookup, TrainerService, TrainerServiceError};
pub use store::InMemoryTrainerStore;
pub use validation::{TrainerValidator, ValidationError, ValidationPolicy};
