use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::domain::{ApplicationStatus, Trainer, TrainerId, TrainerSubmission};
use super::repository::{Page, PageRequest, SortDirection, SortField, TrainerRepository};
use super::service::{TrainerService, TrainerServiceError};
use super::validation::{TrainerValidator, ValidationError};
use crate::config::PagingConfig;

/// Uniform response wrapper for every trainer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: PageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: (),
            metadata: None,
        }
    }
}

/// Navigation totals attached to the paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_elements: u64,
    pub total_pages: u64,
    pub current_page: usize,
    pub size: usize,
}

impl<T> From<&Page<T>> for PageMetadata {
    fn from(page: &Page<T>) -> Self {
        Self {
            total_elements: page.total_elements,
            total_pages: page.total_pages(),
            current_page: page.number,
            size: page.size,
        }
    }
}

impl IntoResponse for TrainerServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            TrainerServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            TrainerServiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
            TrainerServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            TrainerServiceError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "trainer request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "trainer request rejected");
        }

        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

/// Shared handler state: the service plus listing defaults.
pub struct TrainerRoutes<R> {
    service: Arc<TrainerService<R>>,
    paging: PagingConfig,
}

impl<R> Clone for TrainerRoutes<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            paging: self.paging,
        }
    }
}

impl<R> TrainerRoutes<R> {
    pub fn new(service: Arc<TrainerService<R>>, paging: PagingConfig) -> Self {
        Self { service, paging }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, TrainerServiceError>;

/// Router builder exposing the trainer CRUD, search, and analytics endpoints.
pub fn trainer_router<R>(service: Arc<TrainerService<R>>, paging: PagingConfig) -> Router
where
    R: TrainerRepository + 'static,
{
    Router::new()
        .route(
            "/trainers",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/trainers/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route("/trainers/:id/status", patch(status_handler::<R>))
        .route("/trainers/email/:email", get(email_handler::<R>))
        .route("/trainers/search/by-status", get(by_status_handler::<R>))
        .route("/trainers/search/experienced", get(experienced_handler::<R>))
        .route("/trainers/search/by-city", get(by_city_handler::<R>))
        .route("/trainers/search/by-state", get(by_state_handler::<R>))
        .route("/trainers/search/by-country", get(by_country_handler::<R>))
        .route("/trainers/search/by-name", get(by_name_handler::<R>))
        .route(
            "/trainers/search/by-specializations",
            get(by_specializations_handler::<R>),
        )
        .route(
            "/trainers/search/by-salary-range",
            get(by_salary_range_handler::<R>),
        )
        .route(
            "/trainers/search/by-date-of-birth",
            get(by_date_of_birth_handler::<R>),
        )
        .route(
            "/trainers/search/available-for-travel",
            get(available_for_travel_handler::<R>),
        )
        .route(
            "/trainers/analytics/status-statistics",
            get(status_statistics_handler::<R>),
        )
        .route(
            "/trainers/analytics/city-statistics",
            get(city_statistics_handler::<R>),
        )
        .route(
            "/trainers/analytics/experience-statistics",
            get(experience_statistics_handler::<R>),
        )
        .route(
            "/trainers/analytics/top-experienced",
            get(top_experienced_handler::<R>),
        )
        .route(
            "/trainers/analytics/recent-applications",
            get(recent_applications_handler::<R>),
        )
        .route(
            "/trainers/analytics/average-salary",
            get(average_salary_handler::<R>),
        )
        .route("/trainers/cities", get(cities_handler::<R>))
        .route("/trainers/states", get(states_handler::<R>))
        .with_state(TrainerRoutes::new(service, paging))
}

fn invalid_request(detail: String) -> TrainerServiceError {
    TrainerServiceError::Validation(ValidationError::InvalidRequest(detail))
}

fn trainer_id(path: Result<Path<u64>, PathRejection>) -> Result<TrainerId, TrainerServiceError> {
    path.map(|Path(id)| TrainerId(id))
        .map_err(|rejection| invalid_request(rejection.body_text()))
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, TrainerServiceError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| invalid_request(rejection.body_text()))
}

fn submission(
    body: Result<Json<Option<TrainerSubmission>>, JsonRejection>,
) -> Result<TrainerSubmission, TrainerServiceError> {
    let Json(payload) = body.map_err(|rejection| invalid_request(rejection.body_text()))?;
    Ok(TrainerValidator::require(payload)?)
}

pub(crate) async fn create_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    body: Result<Json<Option<TrainerSubmission>>, JsonRejection>,
) -> Result<Response, TrainerServiceError>
where
    R: TrainerRepository + 'static,
{
    let trainer = routes.service.create_trainer(submission(body)?)?;
    let envelope = ApiResponse::ok("Trainer application submitted successfully", trainer);
    Ok((StatusCode::CREATED, Json(envelope)).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListParams {
    page: Option<usize>,
    size: Option<usize>,
    sort_by: Option<String>,
    sort_dir: Option<String>,
}

impl ListParams {
    fn into_request(self, paging: &PagingConfig) -> Result<PageRequest, ValidationError> {
        let size = self
            .size
            .unwrap_or(paging.default_size)
            .min(paging.max_size);
        let sort = match self.sort_by.as_deref() {
            Some(field) => field.parse::<SortField>()?,
            None => SortField::default(),
        };
        let direction = self
            .sort_dir
            .as_deref()
            .map(SortDirection::parse_lenient)
            .unwrap_or_default();

        Ok(PageRequest::new(self.page.unwrap_or(0), size)?.sorted_by(sort, direction))
    }
}

pub(crate) async fn list_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let request = query(params)?.into_request(&routes.paging)?;
    let page = routes.service.list_trainers(&request)?;
    let metadata = PageMetadata::from(&page);
    Ok(Json(
        ApiResponse::ok("Trainers retrieved successfully", page.content).with_metadata(metadata),
    ))
}

pub(crate) async fn get_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Trainer>
where
    R: TrainerRepository + 'static,
{
    let trainer = routes.service.get_trainer_by_id(trainer_id(id)?)?;
    Ok(Json(ApiResponse::ok("Trainer retrieved successfully", trainer)))
}

pub(crate) async fn email_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    email: Result<Path<String>, PathRejection>,
) -> ApiResult<Trainer>
where
    R: TrainerRepository + 'static,
{
    let Path(email) = email.map_err(|rejection| invalid_request(rejection.body_text()))?;
    let trainer = routes.service.get_trainer_by_email(&email)?;
    Ok(Json(ApiResponse::ok("Trainer retrieved successfully", trainer)))
}

pub(crate) async fn update_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<Option<TrainerSubmission>>, JsonRejection>,
) -> ApiResult<Trainer>
where
    R: TrainerRepository + 'static,
{
    let id = trainer_id(id)?;
    let trainer = routes.service.update_trainer(id, submission(body)?)?;
    Ok(Json(ApiResponse::ok("Trainer updated successfully", trainer)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusParams {
    status: ApplicationStatus,
}

pub(crate) async fn status_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    id: Result<Path<u64>, PathRejection>,
    params: Result<Query<StatusParams>, QueryRejection>,
) -> ApiResult<Trainer>
where
    R: TrainerRepository + 'static,
{
    let id = trainer_id(id)?;
    let StatusParams { status } = query(params)?;
    let trainer = routes.service.update_application_status(id, status)?;
    Ok(Json(ApiResponse::ok(
        "Application status updated successfully",
        trainer,
    )))
}

pub(crate) async fn delete_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<String>
where
    R: TrainerRepository + 'static,
{
    let id = trainer_id(id)?;
    routes.service.delete_trainer(id)?;
    Ok(Json(ApiResponse::ok(
        "Trainer deleted successfully",
        format!("Trainer with ID {id} has been deleted"),
    )))
}

pub(crate) async fn by_status_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<StatusParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let StatusParams { status } = query(params)?;
    let trainers = routes.service.trainers_by_status(status)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by status successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExperienceParams {
    #[serde(default = "default_min_years")]
    min_years: i32,
}

fn default_min_years() -> i32 {
    5
}

pub(crate) async fn experienced_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<ExperienceParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let ExperienceParams { min_years } = query(params)?;
    let trainers = routes.service.experienced_trainers(min_years)?;
    Ok(Json(ApiResponse::ok(
        "Experienced trainers retrieved successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CityParams {
    city: String,
}

pub(crate) async fn by_city_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<CityParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let CityParams { city } = query(params)?;
    let trainers = routes.service.trainers_by_city(&city)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by city successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StateParams {
    state: String,
}

pub(crate) async fn by_state_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<StateParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let StateParams { state } = query(params)?;
    let trainers = routes.service.trainers_by_state(&state)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by state successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryParams {
    country: String,
}

pub(crate) async fn by_country_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<CountryParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let CountryParams { country } = query(params)?;
    let trainers = routes.service.trainers_by_country(&country)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by country successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameParams {
    name: String,
}

pub(crate) async fn by_name_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<NameParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let NameParams { name } = query(params)?;
    let trainers = routes.service.search_trainers_by_name(&name)?;
    Ok(Json(ApiResponse::ok(
        "Trainers searched by name successfully",
        trainers,
    )))
}

/// Accepts both `?specializations=a&specializations=b` and `?specializations=a,b`.
pub(crate) async fn by_specializations_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let specializations: Vec<String> = query(params)?
        .into_iter()
        .filter(|(key, _)| key == "specializations")
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    if specializations.is_empty() {
        return Err(invalid_request(
            "at least one specializations parameter is required".to_string(),
        ));
    }

    let trainers = routes.service.trainers_by_specializations(&specializations)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by specializations successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SalaryRangeParams {
    min_salary: f64,
    max_salary: f64,
}

pub(crate) async fn by_salary_range_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<SalaryRangeParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let SalaryRangeParams {
        min_salary,
        max_salary,
    } = query(params)?;
    let trainers = routes
        .service
        .trainers_by_salary_range(min_salary, max_salary)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by salary range successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct BirthDateParams {
    from: NaiveDate,
    to: NaiveDate,
}

pub(crate) async fn by_date_of_birth_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<BirthDateParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let BirthDateParams { from, to } = query(params)?;
    let trainers = routes.service.trainers_born_between(from, to)?;
    Ok(Json(ApiResponse::ok(
        "Trainers filtered by date of birth successfully",
        trainers,
    )))
}

pub(crate) async fn available_for_travel_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let trainers = routes.service.trainers_available_for_travel()?;
    Ok(Json(ApiResponse::ok(
        "Trainers available for travel retrieved successfully",
        trainers,
    )))
}

pub(crate) async fn status_statistics_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<BTreeMap<ApplicationStatus, u64>>
where
    R: TrainerRepository + 'static,
{
    let statistics = routes.service.status_statistics()?;
    Ok(Json(ApiResponse::ok(
        "Application status statistics retrieved successfully",
        statistics,
    )))
}

pub(crate) async fn city_statistics_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<BTreeMap<String, u64>>
where
    R: TrainerRepository + 'static,
{
    let statistics = routes.service.city_statistics()?;
    Ok(Json(ApiResponse::ok(
        "City statistics retrieved successfully",
        statistics,
    )))
}

pub(crate) async fn experience_statistics_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<BTreeMap<i32, u64>>
where
    R: TrainerRepository + 'static,
{
    let statistics = routes.service.experience_statistics()?;
    Ok(Json(ApiResponse::ok(
        "Experience statistics retrieved successfully",
        statistics,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LimitParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

pub(crate) async fn top_experienced_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let LimitParams { limit } = query(params)?;
    let trainers = routes.service.top_experienced_trainers(limit)?;
    Ok(Json(ApiResponse::ok(
        "Top experienced trainers retrieved successfully",
        trainers,
    )))
}

#[derive(Debug, Deserialize)]
pub(crate) struct DaysParams {
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    30
}

pub(crate) async fn recent_applications_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
    params: Result<Query<DaysParams>, QueryRejection>,
) -> ApiResult<Vec<Trainer>>
where
    R: TrainerRepository + 'static,
{
    let DaysParams { days } = query(params)?;
    let trainers = routes.service.recent_applications(days)?;
    Ok(Json(ApiResponse::ok(
        "Recent applications retrieved successfully",
        trainers,
    )))
}

pub(crate) async fn average_salary_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<f64>
where
    R: TrainerRepository + 'static,
{
    let average = routes.service.average_salary_expectation()?;
    Ok(Json(ApiResponse::ok(
        "Average salary expectation retrieved successfully",
        average,
    )))
}

pub(crate) async fn cities_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<Vec<String>>
where
    R: TrainerRepository + 'static,
{
    let cities = routes.service.all_cities()?;
    Ok(Json(ApiResponse::ok(
        "All cities retrieved successfully",
        cities,
    )))
}

pub(crate) async fn states_handler<R>(
    State(routes): State<TrainerRoutes<R>>,
) -> ApiResult<Vec<String>>
where
    R: TrainerRepository + 'static,
{
    let states = routes.service.all_states()?;
    Ok(Json(ApiResponse::ok(
        "All states retrieved successfully",
        states,
    )))
}
