//! End-to-end intake tests over the public API: HTTP request in, CSV row and
//! sink reports out.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use recruitment_apk::intake::{intake_router, LeadRecord, SubmissionService};
use recruitment_apk::ratelimit::SlidingWindowLimiter;
use recruitment_apk::sinks::{
    CrmError, CrmGateway, CrmReceipt, CsvBackupStore, LeadNotifier, NotifyError,
};

#[derive(Default)]
struct RecordingNotifier {
    notified: Mutex<Vec<String>>,
}

#[async_trait]
impl LeadNotifier for RecordingNotifier {
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError> {
        self.notified.lock().unwrap().push(lead.email.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingCrm {
    leads: Mutex<Vec<LeadRecord>>,
}

#[async_trait]
impl CrmGateway for RecordingCrm {
    async fn sync_lead(&self, lead: &LeadRecord) -> Result<CrmReceipt, CrmError> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(CrmReceipt {
            organization_id: Some(1),
            person_id: Some(2),
            deal_id: Some(3),
        })
    }
}

struct DownCrm;

#[async_trait]
impl CrmGateway for DownCrm {
    async fn sync_lead(&self, _lead: &LeadRecord) -> Result<CrmReceipt, CrmError> {
        Err(CrmError::Api {
            status: 503,
            body: "maintenance".to_string(),
        })
    }
}

fn submission_body(points: u8) -> Value {
    let mut body = json!({
        "name": "Sanne Bakker",
        "email": "sanne@fabriek.nl",
        "phone": "+31 6 12345678",
        "company": "Fabriek Noord",
        "sector": "High-tech",
        "company_size": "11-50 medewerkers",
        "assessment_score": 50,
    });
    for id in 1..=29 {
        body[format!("answer_{id:02}")] = json!(points);
    }
    body
}

fn post(body: &Value) -> Request<Body> {
    Request::post("/api/submit-assessment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn limiter() -> Arc<SlidingWindowLimiter> {
    Arc::new(SlidingWindowLimiter::new(5, Duration::from_secs(3600)))
}

#[tokio::test]
async fn a_submission_lands_in_the_csv_and_the_crm() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("assessments.csv");

    let crm = Arc::new(RecordingCrm::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(SubmissionService::new(
        Arc::new(CsvBackupStore::new(&csv_path)),
        Some(Arc::clone(&notifier)),
        Some(Arc::clone(&crm)),
    ));
    let router = intake_router(service, limiter());

    // All answers at 3 points: low score, every urgency indicator hit.
    let response = router.oneshot(post(&submission_body(3))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["csv_saved"], true);
    assert_eq!(json["data"]["email_sent"], true);
    assert_eq!(json["data"]["pipedrive_synced"], true);
    assert_eq!(json["data"]["pipedrive_deal_id"], 3);

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Timestamp,Naam,Email"));
    assert_eq!(header.split(',').count(), 41);
    let row = lines.next().unwrap();
    assert!(row.contains("Fabriek Noord"));
    // score 30%, category below every other threshold.
    assert!(row.contains("Verbetering Nodig"));
    assert!(row.contains("ZEER HOOG"));

    assert_eq!(notifier.notified.lock().unwrap().as_slice(), ["sanne@fabriek.nl"]);
    let synced = crm.leads.lock().unwrap();
    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].result.score_percent, 30);
}

#[tokio::test]
async fn a_crm_outage_does_not_lose_the_backup() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("assessments.csv");

    let service = Arc::new(SubmissionService::<_, RecordingNotifier, _>::new(
        Arc::new(CsvBackupStore::new(&csv_path)),
        None,
        Some(Arc::new(DownCrm)),
    ));
    let router = intake_router(service, limiter());

    let response = router.oneshot(post(&submission_body(10))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["csv_saved"], true);
    assert_eq!(json["data"]["pipedrive_synced"], false);
    assert_eq!(json["data"]["pipedrive_deal_id"], Value::Null);

    assert!(csv_path.exists());
}

#[tokio::test]
async fn healthy_leads_do_not_trigger_mail() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("assessments.csv");

    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(SubmissionService::<_, _, RecordingCrm>::new(
        Arc::new(CsvBackupStore::new(&csv_path)),
        Some(Arc::clone(&notifier)),
        None,
    ));
    let router = intake_router(service, limiter());

    let response = router.oneshot(post(&submission_body(10))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email_sent"], false);
    assert!(notifier.notified.lock().unwrap().is_empty());
}

#[tokio::test]
async fn an_incomplete_submission_is_rejected_before_any_sink_runs() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("assessments.csv");

    let service = Arc::new(SubmissionService::<_, RecordingNotifier, RecordingCrm>::new(
        Arc::new(CsvBackupStore::new(&csv_path)),
        None,
        None,
    ));
    let router = intake_router(service, limiter());

    let response = router
        .oneshot(post(&json!({ "name": "Sanne" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["errors"].as_array().unwrap().len() >= 4);
    assert!(!csv_path.exists());
}
