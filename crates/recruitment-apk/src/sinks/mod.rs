//! Outbound sinks for finished submissions. Each sink is independent and
//! best-effort: the service records the outcome per sink and never lets one
//! failure affect another sink or the response to the visitor.

mod backup;
mod mailer;
mod pipedrive;

pub use backup::CsvBackupStore;
pub use mailer::HttpMailNotifier;
pub use pipedrive::PipedriveClient;

use async_trait::async_trait;

use crate::intake::LeadRecord;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail relay rejected the message (status {0})")]
    Rejected(u16),
}

#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("pipedrive request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pipedrive rejected the request (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("deal was not created")]
    DealNotCreated,
}

/// Identifiers of the CRM records touched by one sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrmReceipt {
    pub organization_id: Option<u64>,
    pub person_id: Option<u64>,
    pub deal_id: Option<u64>,
}

/// Durable append-only log of every submission.
#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn append(&self, lead: &LeadRecord) -> Result<(), BackupError>;
}

/// One-way notification about a high-priority lead.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError>;
}

/// Upsert-style CRM integration: organization, person, deal, note.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    async fn sync_lead(&self, lead: &LeadRecord) -> Result<CrmReceipt, CrmError>;
}
