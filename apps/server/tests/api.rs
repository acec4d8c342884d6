use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shiftbook_core::{invoices::PdfExport, Error, Result, Shift, ShiftRepositoryTrait};
use shiftbook_server::{api::app_router, config::Config, AppState};
use shiftbook_sheets::{SheetsConfig, SheetsShiftRepository, PLACEHOLDER_URL};
use tower::ServiceExt;

// ============== Stub Repository ==============

struct StubRepository {
    rows: Vec<Value>,
    calls: Mutex<Vec<String>>,
}

impl StubRepository {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: vec![
                json!({
                    "id": "s1",
                    "date": "05/03/2024",
                    "agency": "Medics Direct",
                    "location": "City Hospital",
                    "hours": 8,
                    "rate": 50,
                    "daySalary": 400,
                    "paymentStatus": "Received",
                    "amountReceived": 400,
                    "receivedDate": "2024-04-02",
                    "taxStatus": "Self-Employed"
                }),
                json!({
                    "id": "s2",
                    "date": "2024-03-12",
                    "agency": "Locum Agency 1",
                    "hours": 10,
                    "rate": 30,
                    "daySalary": 300,
                    "paymentStatus": "Unpaid",
                    "taxStatus": "Self-Employed"
                }),
            ],
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShiftRepositoryTrait for StubRepository {
    async fn load_shifts(&self) -> Result<Vec<Value>> {
        self.calls.lock().unwrap().push("load".to_string());
        Ok(self.rows.clone())
    }

    async fn add_shift(&self, shift: &Shift) -> Result<()> {
        self.calls.lock().unwrap().push(format!("add:{}", shift.id));
        Ok(())
    }

    async fn update_shift(&self, shift: &Shift) -> Result<()> {
        self.calls.lock().unwrap().push(format!("update:{}", shift.id));
        Ok(())
    }

    async fn delete_shift(&self, shift_id: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("delete:{}", shift_id));
        Err(Error::Unexpected("stub does not delete".to_string()))
    }
}

// ============== Helpers ==============

async fn app_with(repository: Arc<dyn ShiftRepositoryTrait>) -> Router {
    let state = AppState::new(repository, PdfExport::Unavailable);
    let _ = state.shift_service.fetch_all().await;
    app_router(state, &Config::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ============== Tests ==============

#[tokio::test]
async fn healthz_works() {
    let app = app_with(StubRepository::new()).await;
    let (status, body) = send(&app, get("/api/v1/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn lists_shifts_with_display_dates() {
    let app = app_with(StubRepository::new()).await;
    let (status, body) = send(&app, get("/api/v1/shifts")).await;

    assert_eq!(status, StatusCode::OK);
    let shifts = body.as_array().unwrap();
    assert_eq!(shifts.len(), 2);
    assert_eq!(shifts[0]["id"], "s1");
    assert_eq!(shifts[0]["date"], "2024-03-05");
    assert_eq!(shifts[0]["displayDate"], "05/03/2024");
    assert_eq!(shifts[0]["salaryMismatch"], false);
}

#[tokio::test]
async fn save_unknown_id_creates() {
    let repository = StubRepository::new();
    let app = app_with(repository.clone()).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/shifts",
            json!({"id": "new-1", "date": "2024-05-01", "hours": 8, "rate": 55}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "created");
    assert_eq!(repository.calls(), vec!["load", "add:new-1", "load"]);
}

#[tokio::test]
async fn save_known_id_updates() {
    let repository = StubRepository::new();
    let app = app_with(repository.clone()).await;

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/shifts",
            json!({"id": "s2", "date": "2024-03-12", "paymentStatus": "Pending"}),
        ),
    )
    .await;

    assert_eq!(body["outcome"], "updated");
    assert_eq!(repository.calls()[1], "update:s2");
}

#[tokio::test]
async fn delete_without_confirm_is_cancelled() {
    let repository = StubRepository::new();
    let app = app_with(repository.clone()).await;

    let (status, body) = send(&app, delete("/api/v1/shifts/s1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"outcome": "cancelled"}));
    assert_eq!(repository.calls(), vec!["load"]);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let app = app_with(StubRepository::new()).await;
    let (status, body) = send(&app, delete("/api/v1/shifts/missing?confirm=true")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn failed_delete_is_recorded_in_store_state() {
    let repository = StubRepository::new();
    let app = app_with(repository.clone()).await;

    let (status, _) = send(&app, delete("/api/v1/shifts/s1?confirm=true")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, state) = send(&app, get("/api/v1/store")).await;
    assert_eq!(state["loading"], false);
    assert_eq!(state["shiftCount"], 2);
    assert!(state["lastError"]
        .as_str()
        .unwrap()
        .starts_with("Failed to delete the shift."));

    let (status, _) = send(&app, delete("/api/v1/store/error")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, state) = send(&app, get("/api/v1/store")).await;
    assert!(state["lastError"].is_null());
}

#[tokio::test]
async fn dashboard_and_trend() {
    let app = app_with(StubRepository::new()).await;

    let (status, metrics) = send(&app, get("/api/v1/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["totalShifts"], 2);
    assert_eq!(metrics["totalReceived"].as_f64(), Some(400.0));
    assert_eq!(metrics["totalOutstanding"].as_f64(), Some(300.0));

    let (_, trend) = send(&app, get("/api/v1/dashboard/trend")).await;
    assert_eq!(trend["months"][0]["month"], "2024-04");
    assert_eq!(trend["chart"]["points"][0]["label"], "24-04");
    assert_eq!(trend["chart"]["path"], "M 350 40");
}

#[tokio::test]
async fn invoice_preview_and_unavailable_export() {
    let app = app_with(StubRepository::new()).await;

    let (_, shifts) = send(&app, get("/api/v1/invoices/shifts")).await;
    assert_eq!(shifts.as_array().unwrap().len(), 1);
    assert_eq!(shifts[0]["id"], "s2");

    let draft = json!({
        "invoiceNumber": "INV-2024-7",
        "clientName": "City Hospital",
        "dueDate": "2024-04-05",
        "shiftIds": ["s1", "s2"]
    });
    let (status, invoice) =
        send(&app, json_request("POST", "/api/v1/invoices/preview", draft.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["lines"].as_array().unwrap().len(), 1);
    assert_eq!(invoice["total"].as_f64(), Some(300.0));

    let (status, body) = send(&app, json_request("POST", "/api/v1/invoices/export", draft)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
}

#[tokio::test]
async fn invoice_preview_requires_selection() {
    let app = app_with(StubRepository::new()).await;
    let draft = json!({
        "invoiceNumber": "INV-2024-7",
        "clientName": "City Hospital",
        "dueDate": "2024-04-05",
        "shiftIds": []
    });
    let (status, _) = send(&app, json_request("POST", "/api/v1/invoices/preview", draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unconfigured_endpoint_reports_configuration_error() {
    let repository = SheetsShiftRepository::from_config(SheetsConfig::new(PLACEHOLDER_URL));
    let app = app_with(Arc::new(repository)).await;

    let (_, state) = send(&app, get("/api/v1/store")).await;
    assert!(state["lastError"]
        .as_str()
        .unwrap()
        .contains("API Error:"));

    let (status, body) = send(&app, json_request("POST", "/api/v1/shifts/refresh", json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().starts_with("API Error:"));
}
