use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::config::PagingConfig;
use crate::trainers::domain::ApplicationStatus;
use crate::trainers::router::{create_handler, TrainerRoutes};
use crate::trainers::store::InMemoryTrainerStore;
use crate::trainers::validation::ValidationPolicy;
use crate::trainers::{trainer_router, TrainerService};

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("encode body")))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn seeded_router(emails: &[&str]) -> axum::Router {
    let (service, _, _) = build_service();
    for email in emails {
        service.create_trainer(submission(email)).expect("seeded");
    }
    router_with_service(service)
}

#[tokio::test]
async fn create_handler_rejects_null_body() {
    let (service, _, _) = build_service();
    let routes = TrainerRoutes::new(Arc::new(service), PagingConfig::default());

    let response = create_handler::<InMemoryTrainerStore>(State(routes), Ok(Json(None)))
        .await
        .unwrap_or_else(IntoResponse::into_response);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn create_route_returns_created_envelope() {
    let router = seeded_router(&[]);
    let mut payload = serde_json::to_value(submission("maya@example.com")).expect("payload");
    payload["applicationStatus"] = json!("HIRED");

    let response = router
        .oneshot(json_request(Method::POST, "/trainers", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Trainer application submitted successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["applicationStatus"], "PENDING");
    assert_eq!(body["data"]["firstName"], "Maya");
    assert!(body["data"]["createdAt"].is_string());
    assert!(body.get("metadata").is_none());
}

#[tokio::test]
async fn create_route_rejects_invalid_payloads() {
    let router = seeded_router(&[]);
    let mut payload = serde_json::to_value(submission("maya@example.com")).expect("payload");
    payload["email"] = json!("not-an-email");

    let response = router
        .clone()
        .oneshot(json_request(Method::POST, "/trainers", &payload))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please provide a valid email address");

    let response = router
        .oneshot(json_request(Method::POST, "/trainers", &json!(null)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_maps_to_conflict() {
    let router = seeded_router(&["dup@example.com"]);
    let payload = serde_json::to_value(submission("dup@example.com")).expect("payload");

    let response = router
        .oneshot(json_request(Method::POST, "/trainers", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(
        body["message"],
        "Trainer with email dup@example.com already exists"
    );
}

#[tokio::test]
async fn list_route_attaches_page_metadata() {
    let router = seeded_router(&[
        "a@example.com",
        "b@example.com",
        "c@example.com",
        "d@example.com",
        "e@example.com",
    ]);

    let response = router
        .oneshot(get("/trainers?page=1&size=2&sortBy=id&sortDir=asc"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["id"], 3);
    assert_eq!(
        body["metadata"],
        json!({
            "totalElements": 5,
            "totalPages": 3,
            "currentPage": 1,
            "size": 2
        })
    );
}

#[tokio::test]
async fn list_route_validates_paging_parameters() {
    let router = seeded_router(&["a@example.com"]);

    let response = router
        .clone()
        .oneshot(get("/trainers?sortBy=favouriteColour"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(get("/trainers?size=0"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(get("/trainers?size=5000"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["metadata"]["size"], 100);
}

#[tokio::test]
async fn missing_trainer_returns_not_found_envelope() {
    let router = seeded_router(&[]);

    let response = router
        .oneshot(get("/trainers/42"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Trainer not found with id: 42",
            "data": null
        })
    );
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let router = seeded_router(&[]);
    let response = router
        .oneshot(get("/trainers/abc"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn email_lookup_and_delete_round_trip() {
    let router = seeded_router(&["maya@example.com"]);

    let response = router
        .clone()
        .oneshot(get("/trainers/email/maya@example.com"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(
            Request::delete("/trainers/1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"], "Trainer with ID 1 has been deleted");

    let response = router
        .oneshot(get("/trainers/email/maya@example.com"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_path_is_percent_decoded_and_malformed_segments_are_rejected() {
    let router = seeded_router(&["maya@example.com"]);

    let response = router
        .clone()
        .oneshot(get("/trainers/email/maya%40example.com"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"]["email"], "maya@example.com");

    let response = router
        .oneshot(get("/trainers/email/maya%FF%FEexample.com"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn recent_applications_accept_windows_past_the_calendar() {
    let router = seeded_router(&["a@example.com", "b@example.com"]);

    for days in ["100000000", "4294967295"] {
        let response = router
            .clone()
            .oneshot(get(&format!(
                "/trainers/analytics/recent-applications?days={days}"
            )))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    }
}

#[tokio::test]
async fn update_route_replaces_profile() {
    let router = seeded_router(&["maya@example.com"]);
    let payload = serde_json::to_value(submission_with("maya@example.com", |profile| {
        profile.city = "Denver".to_string();
    }))
    .expect("payload");

    let response = router
        .oneshot(json_request(Method::PUT, "/trainers/1", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "Trainer updated successfully");
    assert_eq!(body["data"]["city"], "Denver");
}

#[tokio::test]
async fn status_route_moves_application() {
    let router = seeded_router(&["maya@example.com"]);

    let response = router
        .clone()
        .oneshot(
            Request::patch("/trainers/1/status?status=INTERVIEW_SCHEDULED")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"]["applicationStatus"], "INTERVIEW_SCHEDULED");

    let response = router
        .oneshot(
            Request::patch("/trainers/1/status?status=PROMOTED")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn specializations_accept_repeated_and_comma_separated_values() {
    let (service, _, _) = build_service();
    service
        .create_trainer(submission("rust@example.com"))
        .expect("seeded");
    service
        .create_trainer(submission_with("ux@example.com", |profile| {
            profile.specializations = vec!["UX".to_string()];
        }))
        .expect("seeded");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get(
            "/trainers/search/by-specializations?specializations=Rust&specializations=UX",
        ))
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let response = router
        .clone()
        .oneshot(get("/trainers/search/by-specializations?specializations=UX,Go"))
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let response = router
        .oneshot(get("/trainers/search/by-specializations"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_routes_filter_records() {
    let router = seeded_router(&["maya@example.com"]);

    for uri in [
        "/trainers/search/by-city?city=chicago",
        "/trainers/search/by-state?state=ILLINOIS",
        "/trainers/search/by-country?country=usa",
        "/trainers/search/by-name?name=Oka",
        "/trainers/search/experienced",
        "/trainers/search/by-status?status=PENDING",
        "/trainers/search/by-salary-range?minSalary=90000&maxSalary=100000",
        "/trainers/search/by-date-of-birth?from=1990-01-01&to=1990-12-31",
        "/trainers/search/available-for-travel",
    ] {
        let response = router.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = read_json_body(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1), "{uri}");
    }

    let response = router
        .oneshot(get("/trainers/search/by-salary-range?minSalary=100000&maxSalary=90000"))
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn analytics_routes_report_aggregates() {
    let (service, _, _) = build_service();
    let first = service
        .create_trainer(submission("a@example.com"))
        .expect("seeded");
    service
        .create_trainer(submission_with("b@example.com", |profile| {
            profile.salary_expectation = None;
            profile.years_of_experience = 12;
        }))
        .expect("seeded");
    service
        .update_application_status(first.id, ApplicationStatus::Approved)
        .expect("status");
    let router = router_with_service(service);

    let body = read_json_body(
        router
            .clone()
            .oneshot(get("/trainers/analytics/status-statistics"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"], json!({"PENDING": 1, "APPROVED": 1}));

    let body = read_json_body(
        router
            .clone()
            .oneshot(get("/trainers/analytics/experience-statistics"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"], json!({"5": 1, "10": 1}));

    let body = read_json_body(
        router
            .clone()
            .oneshot(get("/trainers/analytics/average-salary"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"], json!(95000.0));

    let body = read_json_body(
        router
            .clone()
            .oneshot(get("/trainers/analytics/top-experienced?limit=1"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"][0]["email"], "b@example.com");

    let body = read_json_body(
        router
            .clone()
            .oneshot(get("/trainers/analytics/recent-applications"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let body = read_json_body(
        router
            .clone()
            .oneshot(get("/trainers/analytics/city-statistics"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"], json!({"Chicago": 2}));

    let body = read_json_body(
        router
            .oneshot(get("/trainers/cities"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["data"], json!(["Chicago"]));
}

#[tokio::test]
async fn store_outage_returns_internal_error() {
    let service = TrainerService::new(Arc::new(UnavailableRepository), ValidationPolicy::default());
    let router = trainer_router(Arc::new(service), PagingConfig::default());

    let response = router
        .oneshot(get("/trainers/states"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
}
