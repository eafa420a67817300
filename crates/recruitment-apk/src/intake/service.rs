use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{DispatchReport, LeadRecord, SubmissionRequest};
use super::validation;
use crate::assessment::{AssessmentEngine, UrgencyLevel};
use crate::sinks::{BackupStore, CrmGateway, LeadNotifier};

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission failed validation: {0:?}")]
    Validation(Vec<String>),
}

/// A processed submission: the lead as it was fanned out to the sinks plus
/// the per-sink outcome.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub lead: LeadRecord,
    pub report: DispatchReport,
}

/// Orchestrates one submission end to end: validate, recompute the result
/// server-side, then fan out to the configured sinks. The CSV backup is
/// mandatory; mail and CRM are optional deployments.
pub struct SubmissionService<B, N, C> {
    engine: AssessmentEngine,
    backup: Arc<B>,
    notifier: Option<Arc<N>>,
    crm: Option<Arc<C>>,
}

impl<B, N, C> SubmissionService<B, N, C>
where
    B: BackupStore,
    N: LeadNotifier,
    C: CrmGateway,
{
    pub fn new(backup: Arc<B>, notifier: Option<Arc<N>>, crm: Option<Arc<C>>) -> Self {
        Self {
            engine: AssessmentEngine::new(),
            backup,
            notifier,
            crm,
        }
    }

    /// Validate and process a raw submission. Client-supplied result fields
    /// are only validated for plausibility; the stored and forwarded result
    /// is recomputed here from the raw answers.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionOutcome, SubmissionError> {
        let errors = validation::validate(&request);
        if !errors.is_empty() {
            return Err(SubmissionError::Validation(errors));
        }

        let answers = request.answer_set();
        let result = self.engine.assess(
            &answers,
            request.company_size_or_default(),
            request.sector_or_default(),
        );

        let lead = LeadRecord {
            timestamp: LeadRecord::now_timestamp(),
            name: request.name.as_deref().unwrap_or_default().trim().to_string(),
            email: request.email.as_deref().unwrap_or_default().trim().to_string(),
            phone: request.phone.as_deref().unwrap_or_default().trim().to_string(),
            company: request
                .company
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
            sector: request.sector_or_default().to_string(),
            company_size: request.company_size_or_default().to_string(),
            result,
            answers,
        };

        let report = self.dispatch(&lead).await;

        info!(
            company = %lead.company,
            score = lead.result.score_percent,
            urgency = %lead.result.urgency,
            lead_score = lead.result.lead_score,
            csv_saved = report.csv_saved,
            email_sent = report.email_sent,
            pipedrive_synced = report.pipedrive_synced,
            "assessment submission processed"
        );

        Ok(SubmissionOutcome { lead, report })
    }

    /// Fan the lead out to every configured sink. Failures are logged and
    /// reflected in the report; they never abort the other sinks.
    async fn dispatch(&self, lead: &LeadRecord) -> DispatchReport {
        let mut report = DispatchReport::default();

        match self.backup.append(lead).await {
            Ok(()) => report.csv_saved = true,
            Err(err) => warn!(error = %err, "csv backup failed"),
        }

        if let Some(notifier) = &self.notifier {
            if should_notify(lead) {
                match notifier.notify(lead).await {
                    Ok(()) => report.email_sent = true,
                    Err(err) => warn!(error = %err, "lead notification failed"),
                }
            }
        }

        if let Some(crm) = &self.crm {
            match crm.sync_lead(lead).await {
                Ok(receipt) => {
                    report.pipedrive_synced = true;
                    report.pipedrive_deal_id = receipt.deal_id;
                }
                Err(err) => warn!(error = %err, "crm sync failed"),
            }
        }

        report
    }
}

/// Mail goes out for leads that need attention: high urgency, or a score low
/// enough that the process clearly has gaps.
fn should_notify(lead: &LeadRecord) -> bool {
    matches!(
        lead.result.urgency,
        UrgencyLevel::ZeerHoog | UrgencyLevel::Hoog
    ) || lead.result.score_percent < 60
}
