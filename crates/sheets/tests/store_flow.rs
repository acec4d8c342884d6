//! End-to-end store flows: `ShiftService` over the sheets repository with a
//! scripted transport in place of the network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use shiftbook_core::{
    DeleteOutcome, PaymentStatus, SaveOutcome, ShiftInput, ShiftService, ShiftServiceTrait,
};
use shiftbook_sheets::{
    ApiRequest, HttpMethod, HttpResponse, Result, SheetsClient, SheetsConfig,
    SheetsShiftRepository, Transport,
};

const SCRIPT_URL: &str = "https://script.example/exec";

// ============== Scripted Transport ==============

#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn push(&self, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(200, body.to_string()));
    }

    fn actions(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                r.url
                    .split("action=")
                    .nth(1)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    fn last_body(&self) -> Value {
        let requests = self.requests.lock().unwrap();
        let body = requests
            .iter()
            .rev()
            .find(|r| r.method == HttpMethod::Post)
            .and_then(|r| r.body.clone())
            .unwrap();
        serde_json::from_str(&body).unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| HttpResponse::new(500, "no scripted response")))
    }
}

fn store() -> (ShiftService, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::default());
    let config = SheetsConfig::new(SCRIPT_URL).unwrap();
    let client = SheetsClient::with_transport(config, transport.clone());
    let service = ShiftService::new(Arc::new(SheetsShiftRepository::new(client)));
    (service, transport)
}

fn sheet_rows() -> Value {
    json!({
        "status": "success",
        "data": [
            {
                "id": "s1",
                "date": "05/03/2024",
                "agency": "Medics Direct",
                "location": "City Hospital",
                "hours": 8,
                "rate": "50",
                "daySalary": "400",
                "paymentStatus": "Received",
                "amountReceived": 400,
                "receivedDate": "2024-04-02",
                "taxStatus": "Self-Employed"
            },
            {
                "id": "s2",
                "date": "2024-03-12",
                "agency": "Locum Agency 1",
                "hours": "7.5",
                "rate": 60,
                "daySalary": "",
                "paymentStatus": "Unpaid",
                "amountReceived": 99,
                "receivedDate": "2024-04-20",
                "taxStatus": "PAYE"
            }
        ]
    })
}

#[tokio::test(start_paused = true)]
async fn test_fetch_normalizes_and_derives() {
    let (service, transport) = store();
    transport.push(sheet_rows());

    service.fetch_all().await.unwrap();

    let shifts = service.get_shifts();
    assert_eq!(shifts.len(), 2);
    assert_eq!(shifts[0].display_date(), "05/03/2024");
    assert_eq!(shifts[1].day_salary, dec!(450));
    assert_eq!(shifts[1].amount_received, dec!(0));
    assert!(shifts[1].received_date.is_empty());

    let trend = service.get_monthly_trend();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].month, "2024-04");
    assert_eq!(trend[0].amount, dec!(400));

    let metrics = service.get_metrics();
    assert_eq!(metrics.total_received, dec!(400));
    assert_eq!(metrics.total_outstanding, dec!(450));

    let state = service.get_state();
    assert!(!state.loading);
    assert!(state.last_error.is_none());
    assert_eq!(state.generation, 1);
}

#[tokio::test(start_paused = true)]
async fn test_save_unknown_id_adds_then_refetches() {
    let (service, transport) = store();
    transport.push(sheet_rows());
    service.fetch_all().await.unwrap();

    transport.push(json!({"status": "success"}));
    transport.push(sheet_rows());

    let mut input = ShiftInput::new_for(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    input.id = Some("not-in-sheet".to_string());
    let outcome = service.save(input).await.unwrap();

    assert_eq!(outcome, SaveOutcome::Created);
    assert_eq!(transport.actions(), vec!["getShifts", "addShift", "getShifts"]);
    let body = transport.last_body();
    assert_eq!(body["id"], "not-in-sheet");
    assert_eq!(body["date"], "2024-05-01");
}

#[tokio::test(start_paused = true)]
async fn test_save_known_id_updates() {
    let (service, transport) = store();
    transport.push(sheet_rows());
    service.fetch_all().await.unwrap();

    transport.push(json!({"status": "success"}));
    transport.push(sheet_rows());

    let mut input = ShiftInput::from(&service.get_shifts()[0]);
    input.set_payment_status(PaymentStatus::Pending);
    let outcome = service.save(input).await.unwrap();

    assert_eq!(outcome, SaveOutcome::Updated);
    assert_eq!(transport.actions()[1], "updateShift");
    let body = transport.last_body();
    assert_eq!(body["paymentStatus"], "Pending");
    assert_eq!(body["receivedDate"], "");
}

#[tokio::test(start_paused = true)]
async fn test_delete_without_confirmation_sends_nothing() {
    let (service, transport) = store();
    transport.push(sheet_rows());
    service.fetch_all().await.unwrap();

    let outcome = service.delete("s1", &false).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(transport.actions(), vec!["getShifts"]);
    assert_eq!(service.get_shifts().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_delete_confirmed_posts_and_refetches() {
    let (service, transport) = store();
    transport.push(sheet_rows());
    service.fetch_all().await.unwrap();

    transport.push(json!({"status": "success"}));
    transport.push(json!({"status": "success", "data": []}));

    let outcome = service.delete("s1", &true).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(
        transport.actions(),
        vec!["getShifts", "deleteShift", "getShifts"]
    );
    assert!(service.get_shifts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_keep_previous_collection() {
    let (service, transport) = store();
    transport.push(sheet_rows());
    service.fetch_all().await.unwrap();

    // Nothing scripted: every attempt gets a 500.
    let err = service.fetch_all().await.unwrap_err();

    assert!(matches!(err, shiftbook_core::Error::Network(_)));
    assert_eq!(transport.actions().len(), 1 + 3);
    assert_eq!(service.get_shifts().len(), 2);
    let message = service.get_state().last_error.unwrap();
    assert!(message.starts_with("Failed to load shifts."));
}

#[tokio::test(start_paused = true)]
async fn test_application_error_is_recorded() {
    let (service, transport) = store();
    transport.push(json!({"status": "error", "message": "Sheet is locked"}));

    let err = service.fetch_all().await.unwrap_err();

    assert_eq!(err.user_message(), "Sheet is locked");
    assert_eq!(
        service.get_state().last_error.as_deref(),
        Some("Failed to load shifts. Error: Sheet is locked")
    );
}
