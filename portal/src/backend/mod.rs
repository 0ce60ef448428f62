//! # Backend Module
//!
//! Everything behind the HTTP boundary of the college portal.
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients (web frontend, scripts)
//!     ↓
//! IO Layer (axum REST handlers, DTO mappers)
//!     ↓
//! Domain Layer (record store, document/report/academic services)
//!     ↓
//! Storage Layer (filesystem blob store)
//! ```
//!
//! Records live in memory for the lifetime of the process; uploaded document
//! content is written to disk under the configured upload root.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::config::{CollegeConfig, PortalConfig};
use crate::backend::domain::{
    AcademicService, DocumentService, IdentifierGenerators, RecordStore, ReportService,
};
use crate::backend::io::rest::{
    academic_apis, payment_apis, portal_apis, report_apis, request_apis, student_apis, upload_apis,
};
use crate::backend::storage::{BlobStore, FsBlobStore};

/// Main application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub record_store: Arc<RecordStore>,
    pub document_service: DocumentService,
    pub report_service: ReportService,
    pub academic_service: Arc<AcademicService>,
    pub college: Arc<CollegeConfig>,
}

/// Initialize the backend with ids drawn as configured
pub fn initialize_backend(config: &PortalConfig) -> Result<AppState> {
    let ids = IdentifierGenerators::random(config.ids.student_length, config.ids.record_length);
    initialize_backend_with_ids(config, ids)
}

pub fn initialize_backend_with_ids(config: &PortalConfig, ids: IdentifierGenerators) -> Result<AppState> {
    info!("Setting up blob store at {:?}", config.storage.upload_root);
    let blob_store: Arc<dyn BlobStore> = Arc::new(
        FsBlobStore::open(&config.storage.upload_root)
            .with_context(|| format!("Failed to open upload root {:?}", config.storage.upload_root))?,
    );

    info!("Setting up domain services");
    let record_store = Arc::new(RecordStore::new(ids));
    let academic_service = Arc::new(AcademicService::new(
        config.academics.calendar.clone(),
        config.academics.timetable.clone(),
    ));
    let document_service = DocumentService::new(record_store.clone(), blob_store);
    let report_service = ReportService::new(
        record_store.clone(),
        academic_service.clone(),
        config.reports.line_ending,
    );

    info!("Setting up application state");
    Ok(AppState {
        record_store,
        document_service,
        report_service,
        academic_service,
        college: Arc::new(config.college.clone()),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &PortalConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);
    let cors = match config.server.allowed_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => cors.allow_origin(value),
            Err(e) => {
                warn!("Invalid CORS origin '{}' ({}), allowing any origin", origin, e);
                cors.allow_origin(Any)
            }
        },
        None => cors.allow_origin(Any),
    };

    let api_routes = Router::new()
        .route("/health", get(portal_apis::health))
        .route("/portal/info", get(portal_apis::portal_info))
        .route("/portal/updates", get(portal_apis::admission_updates))
        .route(
            "/students",
            get(student_apis::list_students).post(student_apis::register_student),
        )
        .route(
            "/students/:id",
            get(student_apis::get_student).put(student_apis::update_student),
        )
        .route(
            "/students/:id/uploads",
            get(upload_apis::list_uploads).post(upload_apis::upload_documents),
        )
        .route("/uploads/:upload_id/content", get(upload_apis::download_upload))
        .route(
            "/students/:id/payments",
            axum::routing::post(payment_apis::record_payment),
        )
        .route("/transactions", get(payment_apis::list_transactions))
        .route(
            "/students/:id/requests",
            axum::routing::post(request_apis::submit_request),
        )
        .route("/requests", get(request_apis::list_requests))
        .route("/academics/calendar", get(academic_apis::get_calendar))
        .route("/academics/timetable", get(academic_apis::get_timetable))
        .route("/reports/:report", get(report_apis::get_report))
        .route("/reports/:report/csv", get(report_apis::download_report_csv));

    let mut router = Router::new().nest("/api", api_routes);
    if let Some(dir) = &config.server.static_dir {
        info!("Serving static files from {:?}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        _upload_root: TempDir,
    }

    impl TestApp {
        fn new() -> Self {
            let upload_root = TempDir::new().unwrap();
            let mut config = PortalConfig::default();
            config.storage.upload_root = upload_root.path().to_path_buf();
            let state = initialize_backend_with_ids(&config, IdentifierGenerators::sequential()).unwrap();
            Self {
                router: create_router(state, &config),
                _upload_root: upload_root,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
        }

        async fn send_json(&self, method: &str, uri: &str, body: Value) -> Response {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            self.send(request).await
        }

        async fn register(&self, first_name: &str) -> String {
            let response = self
                .send_json(
                    "POST",
                    "/api/students",
                    json!({
                        "first_name": first_name,
                        "last_name": "Rao",
                        "email": format!("{}@college.edu", first_name.to_lowercase()),
                        "course": "CSE"
                    }),
                )
                .await;
            assert_eq!(response.status(), StatusCode::CREATED);
            body_json(response).await["student"]["id"].as_str().unwrap().to_string()
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn multipart_upload(uri: &str, filename: &str, content: &str) -> Request<Body> {
        let boundary = "portal-test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/pdf\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            f = filename,
            c = content
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_created_with_message() {
        let app = TestApp::new();
        let response = app
            .send_json(
                "POST",
                "/api/students",
                json!({"first_name": "Asha", "last_name": "Rao", "email": "asha@college.edu"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["student"]["id"], "S1");
        assert_eq!(body["success_message"], "Registered Asha Rao with ID S1");

        let fetched = body_json(app.get("/api/students/S1").await).await;
        assert_eq!(fetched["email"], "asha@college.edu");
    }

    #[tokio::test]
    async fn test_invalid_registration_is_bad_request() {
        let app = TestApp::new();
        let response = app
            .send_json("POST", "/api/students", json!({"first_name": "Asha", "email": "nope"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_input");
        assert!(body.get("success_message").is_none());
    }

    #[tokio::test]
    async fn test_negative_payment_is_rejected_and_not_recorded() {
        let app = TestApp::new();
        let id = app.register("Asha").await;

        let response = app
            .send_json("POST", &format!("/api/students/{}/payments", id), json!({"amount": -5.0}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "invalid_amount");

        let listing = body_json(app.get("/api/transactions").await).await;
        assert_eq!(listing["transactions"].as_array().unwrap().len(), 0);

        let response = app
            .send_json(
                "POST",
                &format!("/api/students/{}/payments", id),
                json!({"amount": 1000.0, "purpose": "Semester fee"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["transaction"]["amount"], 1000.0);
        assert_ne!(body["transaction"]["id"], json!(id));
    }

    #[tokio::test]
    async fn test_unknown_student_is_not_found() {
        let app = TestApp::new();

        let response = app.get("/api/students/S404").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .send_json("POST", "/api/students/S404/payments", json!({"amount": 10.0}))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "unknown_student");

        let response = app.send(multipart_upload("/api/students/S404/uploads", "x.pdf", "x")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.get("/api/transactions?student_id=S404").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_list_and_download() {
        let app = TestApp::new();
        let id = app.register("Asha").await;

        let response = app
            .send(multipart_upload(
                &format!("/api/students/{}/uploads", id),
                "marksheet.pdf",
                "%PDF-1.4 marks",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["uploads"][0]["handle"], "S1/marksheet.pdf");
        let upload_id = body["uploads"][0]["id"].as_str().unwrap().to_string();

        let listing = body_json(app.get(&format!("/api/students/{}/uploads", id)).await).await;
        assert_eq!(listing["uploads"].as_array().unwrap().len(), 1);
        assert_eq!(listing["stored_files"][0]["filename"], "marksheet.pdf");

        let response = app.get(&format!("/api/uploads/{}/content", upload_id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(body_text(response).await, "%PDF-1.4 marks");
    }

    #[tokio::test]
    async fn test_service_request_flow() {
        let app = TestApp::new();
        let id = app.register("Asha").await;

        let response = app
            .send_json(
                "POST",
                &format!("/api/students/{}/requests", id),
                json!({"kind": "bus_pass", "details": {"route_number": "42B"}}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["request"]["kind"], "bus_pass");
        assert_eq!(body["success_message"], "Bus pass details submitted (reference R1)");

        let response = app
            .send_json(
                "POST",
                &format!("/api/students/{}/requests", id),
                json!({"kind": "exam_application", "details": {"exam_name": "Finals"}}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let listing = body_json(app.get("/api/requests?kind=bus_pass").await).await;
        assert_eq!(listing["requests"].as_array().unwrap().len(), 1);

        let response = app.get("/api/requests?kind=library_card").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_csv_download_headers_and_content() {
        let app = TestApp::new();
        app.register("Asha").await;

        let response = app.get("/api/reports/students/csv").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"students.csv\""
        );
        assert_eq!(
            body_text(response).await,
            "student_id,first,last,email,course\nS1,Asha,Rao,asha@college.edu,CSE\n"
        );

        let report = body_json(app.get("/api/reports/calendar").await).await;
        assert_eq!(report["columns"], json!(["Date", "Event"]));
        assert_eq!(report["rows"][0], json!(["2025-08-01", "Semester begins"]));

        let response = app.get("/api/reports/grades/csv").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_portal_home_endpoints() {
        let app = TestApp::new();

        let info = body_json(app.get("/api/portal/info").await).await;
        assert_eq!(info["contact_email"], "studentservices@college.edu");

        let updates = body_json(app.get("/api/portal/updates").await).await;
        assert_eq!(updates["message"], "No new updates.");

        let timetable = body_json(app.get("/api/academics/timetable").await).await;
        assert_eq!(timetable["days"], json!(["Monday", "Tuesday"]));

        app.register("Asha").await;
        let health = body_json(app.get("/api/health").await).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["students"], 1);
    }
}
