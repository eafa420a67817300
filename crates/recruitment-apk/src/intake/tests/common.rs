use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};

use crate::intake::{intake_router, LeadRecord, SubmissionService};
use crate::ratelimit::SlidingWindowLimiter;
use crate::sinks::{
    BackupError, BackupStore, CrmError, CrmGateway, CrmReceipt, LeadNotifier, NotifyError,
};

#[derive(Default)]
pub(super) struct MemoryBackup {
    pub leads: Mutex<Vec<LeadRecord>>,
}

#[async_trait]
impl BackupStore for MemoryBackup {
    async fn append(&self, lead: &LeadRecord) -> Result<(), BackupError> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(())
    }
}

pub(super) struct FailingBackup;

#[async_trait]
impl BackupStore for FailingBackup {
    async fn append(&self, _lead: &LeadRecord) -> Result<(), BackupError> {
        Err(BackupError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "disk unavailable",
        )))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    pub sent_to: Mutex<Vec<String>>,
}

#[async_trait]
impl LeadNotifier for MemoryNotifier {
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError> {
        self.sent_to.lock().unwrap().push(lead.company.clone());
        Ok(())
    }
}

pub(super) struct RejectingNotifier;

#[async_trait]
impl LeadNotifier for RejectingNotifier {
    async fn notify(&self, _lead: &LeadRecord) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected(502))
    }
}

#[derive(Default)]
pub(super) struct MemoryCrm {
    pub synced: Mutex<Vec<String>>,
}

#[async_trait]
impl CrmGateway for MemoryCrm {
    async fn sync_lead(&self, lead: &LeadRecord) -> Result<CrmReceipt, CrmError> {
        self.synced.lock().unwrap().push(lead.company.clone());
        Ok(CrmReceipt {
            organization_id: Some(11),
            person_id: Some(22),
            deal_id: Some(33),
        })
    }
}

pub(super) struct UnavailableCrm;

#[async_trait]
impl CrmGateway for UnavailableCrm {
    async fn sync_lead(&self, _lead: &LeadRecord) -> Result<CrmReceipt, CrmError> {
        Err(CrmError::DealNotCreated)
    }
}

/// A complete, valid submission body with every answer at `points`.
pub(super) fn submission_json(points: u8) -> Value {
    let mut body = json!({
        "name": "Jan de Vries",
        "email": "jan@voorbeeld.nl",
        "phone": "0612345678",
        "company": "Voorbeeld BV",
        "sector": "Machinebouw",
        "company_size": "51-200 medewerkers",
        "assessment_score": 50,
    });
    for id in 1..=29 {
        body[format!("answer_{id:02}")] = json!(points);
    }
    body
}

pub(super) fn full_service(
) -> Arc<SubmissionService<MemoryBackup, MemoryNotifier, MemoryCrm>> {
    Arc::new(SubmissionService::new(
        Arc::new(MemoryBackup::default()),
        Some(Arc::new(MemoryNotifier::default())),
        Some(Arc::new(MemoryCrm::default())),
    ))
}

pub(super) fn router_with_limit(max_requests: usize) -> Router {
    intake_router(
        full_service(),
        Arc::new(SlidingWindowLimiter::new(
            max_requests,
            Duration::from_secs(3600),
        )),
    )
}
