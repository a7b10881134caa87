//! The simulated REST surface, one route table under `/api`.
//!
//! The router is a plain axum [`Router`]; production-shaped consumers drive
//! it in-process as a `tower::Service` (exactly how the tests do), and the
//! binary can also serve it over a socket for manual poking. Every matched
//! `/api` call passes through the chaos middleware first: fixed latency,
//! then the failure draw for mutating verbs.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::Method,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use talentflow_shared::constants::{API_NAMESPACE, DEFAULT_PAGE_SIZE};
use talentflow_shared::{
    Assessment, AssessmentResponse, Candidate, CandidatePatch, Job, JobPatch, NewCandidate,
    NewJob, Section, Stage, TimelineEvent,
};
use talentflow_store::{CandidateQuery, Database, StoreError};

use crate::chaos::{chaos_middleware, ChaosPolicy};
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Database>>,
    pub chaos: ChaosPolicy,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let api = Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{id}", patch(update_job))
        .route("/jobs/{id}/reorder", patch(reorder_job))
        .route("/candidates", get(list_candidates).post(create_candidate))
        .route("/candidates/{id}", patch(update_candidate))
        .route("/candidates/{id}/timeline", get(candidate_timeline))
        .route(
            "/assessments/{job_id}",
            get(get_assessment).put(upsert_assessment),
        )
        .route("/assessments/{job_id}/submit", post(submit_assessment))
        .layer(middleware::from_fn_with_state(
            state.chaos.clone(),
            chaos_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest(API_NAMESPACE, api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── Jobs ───

async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.list_jobs()?))
}

async fn create_job(
    State(state): State<AppState>,
    Json(new): Json<NewJob>,
) -> Result<Json<Job>, ApiError> {
    let store = state.store.lock().await;
    let job = store.create_job(&new)?;

    info!(id = job.id, title = %job.title, "job created");
    Ok(Json(job))
}

async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, ApiError> {
    let store = state.store.lock().await;
    let job = store.update_job(id, &patch).map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound("Job not found".to_string()),
        other => other.into(),
    })?;
    Ok(Json(job))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ReorderRequest {
    /// Accepted and ignored beyond deserialization; only the target
    /// position matters.
    #[allow(dead_code)]
    from_order: i64,
    to_order: i64,
}

async fn reorder_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.lock().await;
    store.reorder_job(id, req.to_order).map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound("Job not found".to_string()),
        other => other.into(),
    })?;

    info!(id, to_order = req.to_order, "job reordered");
    Ok(Json(serde_json::json!({ "success": true })))
}

// ─── Candidates ───

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateListQuery {
    search: Option<String>,
    stage: Option<Stage>,
    page: Option<u32>,
    page_size: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidateListResponse {
    data: Vec<Candidate>,
    /// Post-filter, pre-pagination match count.
    total: u64,
    page: u32,
}

async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<Json<CandidateListResponse>, ApiError> {
    let store = state.store.lock().await;
    let page = store.list_candidates(&CandidateQuery {
        search: query.search.filter(|s| !s.is_empty()),
        stage: query.stage,
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    })?;

    Ok(Json(CandidateListResponse {
        data: page.data,
        total: page.total,
        page: page.page,
    }))
}

async fn create_candidate(
    State(state): State<AppState>,
    Json(new): Json<NewCandidate>,
) -> Result<Json<Candidate>, ApiError> {
    let mut store = state.store.lock().await;
    let candidate = store.create_candidate(&new)?;

    info!(id = candidate.id, stage = %candidate.stage.as_str(), "candidate created");
    Ok(Json(candidate))
}

async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<CandidatePatch>,
) -> Result<Json<Candidate>, ApiError> {
    let mut store = state.store.lock().await;
    let candidate = store.update_candidate(id, &patch).map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound("Candidate not found".to_string()),
        other => other.into(),
    })?;
    Ok(Json(candidate))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineResponse {
    id: i64,
    timeline: Vec<TimelineEvent>,
}

async fn candidate_timeline(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let store = state.store.lock().await;
    let timeline = store.candidate_timeline(id).map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound("Candidate not found".to_string()),
        other => other.into(),
    })?;

    Ok(Json(TimelineResponse { id, timeline }))
}

// ─── Assessments ───

async fn get_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<Assessment>, ApiError> {
    let store = state.store.lock().await;
    // A job without a saved assessment reads as an empty one, never a 404.
    let assessment = store.get_assessment(job_id)?.unwrap_or(Assessment {
        job_id,
        sections: Vec::new(),
    });
    Ok(Json(assessment))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertAssessmentRequest {
    /// The path parameter is authoritative; a jobId in the body is accepted
    /// and ignored.
    #[serde(default)]
    #[allow(dead_code)]
    job_id: Option<i64>,
    #[serde(default)]
    sections: Vec<Section>,
}

async fn upsert_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<UpsertAssessmentRequest>,
) -> Result<Json<Assessment>, ApiError> {
    let store = state.store.lock().await;
    let assessment = store.upsert_assessment(job_id, &req.sections)?;

    info!(job_id, sections = assessment.sections.len(), "assessment saved");
    Ok(Json(assessment))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SubmitAssessmentRequest {
    candidate_id: i64,
    responses: BTreeMap<String, serde_json::Value>,
}

async fn submit_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<SubmitAssessmentRequest>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let response = AssessmentResponse {
        id: Uuid::new_v4(),
        job_id,
        candidate_id: req.candidate_id,
        responses: req.responses,
        submitted_at: Utc::now(),
    };

    let store = state.store.lock().await;
    store.insert_response(&response)?;

    info!(
        id = %response.id,
        job_id,
        candidate_id = response.candidate_id,
        "assessment response submitted"
    );
    Ok(Json(response))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting simulated API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::fixtures::Seeder;

    fn empty_state() -> AppState {
        let db = Database::open_in_memory().unwrap();
        AppState {
            store: Arc::new(Mutex::new(db)),
            chaos: ChaosPolicy::disabled(),
        }
    }

    fn seeded_state() -> AppState {
        let mut db = Database::open_in_memory().unwrap();
        Seeder::new().run(&mut db, 1000).unwrap();
        AppState {
            store: Arc::new(Mutex::new(db)),
            chaos: ChaosPolicy::disabled(),
        }
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&value).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let router = build_router(empty_state());
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn seeded_jobs_list_carries_expected_statuses() {
        let router = build_router(seeded_state());
        let (status, body) = send(&router, Method::GET, "/api/jobs", None).await;

        assert_eq!(status, StatusCode::OK);
        let jobs = body.as_array().unwrap();
        assert_eq!(jobs.len(), 10);

        let job2 = jobs.iter().find(|j| j["id"] == 2).unwrap();
        let job3 = jobs.iter().find(|j| j["id"] == 3).unwrap();
        assert_eq!(job2["status"], "active");
        assert_eq!(job3["status"], "archived");
    }

    #[tokio::test]
    async fn job_patch_merges_only_supplied_fields() {
        let router = build_router(empty_state());

        let (status, created) = send(
            &router,
            Method::POST,
            "/api/jobs",
            Some(json!({
                "title": "Backend Engineer",
                "slug": "backend-engineer",
                "tags": ["remote"],
                "order": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let id = created["id"].as_i64().unwrap();
        let (status, patched) = send(
            &router,
            Method::PATCH,
            &format!("/api/jobs/{id}"),
            Some(json!({ "status": "archived" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["status"], "archived");
        assert_eq!(patched["title"], "Backend Engineer");
        assert_eq!(patched["tags"], json!(["remote"]));
        assert_eq!(patched["order"], 1);
    }

    #[tokio::test]
    async fn job_patch_on_missing_id_is_404_and_store_untouched() {
        let state = empty_state();
        let router = build_router(state.clone());

        let (status, body) = send(
            &router,
            Method::PATCH,
            "/api/jobs/999",
            Some(json!({ "title": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found");
        assert_eq!(state.store.lock().await.count_jobs().unwrap(), 0);
    }

    #[tokio::test]
    async fn reorder_moves_job_and_acknowledges() {
        let router = build_router(empty_state());

        let (_, created) = send(
            &router,
            Method::POST,
            "/api/jobs",
            Some(json!({ "title": "Job A", "slug": "job-a", "order": 1 })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(
            &router,
            Method::PATCH,
            &format!("/api/jobs/{id}/reorder"),
            Some(json!({ "fromOrder": 1, "toOrder": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, jobs) = send(&router, Method::GET, "/api/jobs", None).await;
        assert_eq!(jobs[0]["order"], 5);
    }

    #[tokio::test]
    async fn reorder_on_missing_job_is_404() {
        let router = build_router(empty_state());
        let (status, body) = send(
            &router,
            Method::PATCH,
            "/api/jobs/42/reorder",
            Some(json!({ "fromOrder": 1, "toOrder": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found");
    }

    #[tokio::test]
    async fn candidate_list_filters_then_paginates() {
        let state = seeded_state();

        let expected_hired = {
            let store = state.store.lock().await;
            store
                .list_candidates(&CandidateQuery {
                    stage: Some(Stage::Hired),
                    ..Default::default()
                })
                .unwrap()
                .total
        };

        let router = build_router(state);
        let (status, body) = send(
            &router,
            Method::GET,
            "/api/candidates?stage=hired&page=1&pageSize=5",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert!(data.len() <= 5);
        assert!(data.iter().all(|c| c["stage"] == "hired"));
        assert_eq!(body["total"].as_u64().unwrap(), expected_hired);
        assert_eq!(body["page"], 1);
    }

    #[tokio::test]
    async fn candidate_search_matches_name_or_email() {
        let router = build_router(empty_state());

        send(
            &router,
            Method::POST,
            "/api/candidates",
            Some(json!({ "name": "Ada Lovelace", "email": "ada@mail.com" })),
        )
        .await;
        send(
            &router,
            Method::POST,
            "/api/candidates",
            Some(json!({ "name": "Grace Hopper", "email": "grace@mail.com" })),
        )
        .await;

        let (status, body) =
            send(&router, Method::GET, "/api/candidates?search=ADA", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn timeline_follows_stage_transitions() {
        let router = build_router(empty_state());

        let (_, created) = send(
            &router,
            Method::POST,
            "/api/candidates",
            Some(json!({ "name": "Ada Lovelace", "email": "ada@mail.com" })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        send(
            &router,
            Method::PATCH,
            &format!("/api/candidates/{id}"),
            Some(json!({ "stage": "screen" })),
        )
        .await;

        let (status, body) = send(
            &router,
            Method::GET,
            &format!("/api/candidates/{id}/timeline"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);
        let timeline = body["timeline"].as_array().unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0]["stage"], "applied");
        assert_eq!(timeline[1]["stage"], "screen");
    }

    #[tokio::test]
    async fn timeline_of_unknown_candidate_is_404() {
        let router = build_router(empty_state());
        let (status, body) =
            send(&router, Method::GET, "/api/candidates/999/timeline", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Candidate not found");
    }

    #[tokio::test]
    async fn missing_assessment_reads_as_empty_sections() {
        let router = build_router(seeded_state());
        let (status, body) = send(&router, Method::GET, "/api/assessments/99", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "jobId": 99, "sections": [] }));
    }

    #[tokio::test]
    async fn assessment_upsert_updates_in_place() {
        let state = empty_state();
        let router = build_router(state.clone());

        let sections = json!([{
            "title": "General Questions",
            "questions": [{ "id": "q1", "type": "short-text", "text": "Strongest skill?" }]
        }]);
        send(
            &router,
            Method::PUT,
            "/api/assessments/1",
            Some(json!({ "sections": sections })),
        )
        .await;

        let replaced = json!([{
            "title": "Technical Quiz",
            "questions": [{ "id": "q1", "type": "numeric", "text": "Years of Rust?", "min": 0.0, "max": 30.0 }]
        }]);
        let (status, body) = send(
            &router,
            Method::PUT,
            "/api/assessments/1",
            Some(json!({ "sections": replaced })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sections"][0]["title"], "Technical Quiz");
        assert_eq!(state.store.lock().await.assessment_count(1).unwrap(), 1);
    }

    #[tokio::test]
    async fn submit_appends_one_timestamped_response() {
        let state = seeded_state();
        let router = build_router(state.clone());

        let before = Utc::now();
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/assessments/1/submit",
            Some(json!({ "candidateId": 7, "responses": { "q1": "Yes", "q3": 50000 } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobId"], 1);
        assert_eq!(body["candidateId"], 7);
        assert!(body["id"].as_str().is_some());

        let submitted_at =
            chrono::DateTime::parse_from_rfc3339(body["submittedAt"].as_str().unwrap())
                .unwrap()
                .with_timezone(&Utc);
        assert!(submitted_at >= before);
        assert!(submitted_at <= Utc::now());

        let stored = state.store.lock().await.list_responses_for_job(1).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn chaos_fails_mutating_calls_but_never_reads() {
        let mut db = Database::open_in_memory().unwrap();
        Seeder::new().run(&mut db, 10).unwrap();
        let state = AppState {
            store: Arc::new(Mutex::new(db)),
            chaos: ChaosPolicy::seeded(Duration::ZERO, 1.0, 1),
        };
        let router = build_router(state.clone());

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/jobs",
            Some(json!({ "title": "Doomed", "slug": "doomed" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Random server error");
        // the handler never ran
        assert_eq!(state.store.lock().await.count_jobs().unwrap(), 10);

        let (status, _) = send(&router, Method::GET, "/api/jobs", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_at_the_boundary() {
        let router = build_router(empty_state());
        let (status, _) = send(
            &router,
            Method::POST,
            "/api/jobs",
            Some(json!({ "title": "X", "slug": "x", "salary": 100 })),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn unmatched_api_path_is_404() {
        let router = build_router(empty_state());
        let (status, _) = send(&router, Method::GET, "/api/interviews", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
