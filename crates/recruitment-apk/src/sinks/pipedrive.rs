use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{CrmError, CrmGateway, CrmReceipt};
use crate::assessment::UrgencyLevel;
use crate::config::PipedriveSettings;
use crate::intake::LeadRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BASE_DEAL_VALUE: f64 = 5000.0;

/// Pipedrive API client implementing the search-or-create upsert chain:
/// organization by name, person by email, then a deal in the configured
/// pipeline with a summary note attached.
pub struct PipedriveClient {
    client: reqwest::Client,
    settings: PipedriveSettings,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    item: RecordRef,
}

#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    data: Option<RecordRef>,
}

#[derive(Debug, Deserialize)]
struct RecordRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    data: Option<Vec<NamedEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedEntry {
    pub(crate) id: u64,
    pub(crate) name: String,
}

impl PipedriveClient {
    pub fn new(settings: PipedriveSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CrmError> {
        let url = format!("{}{}", self.settings.base_url, path);
        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .query(query)
            .query(&[("api_token", self.settings.api_token.as_str())])
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, CrmError> {
        let url = format!("{}{}", self.settings.base_url, path);
        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("api_token", self.settings.api_token.as_str())])
            .json(body)
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CrmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn find_or_create_organization(&self, company: &str) -> Result<Option<u64>, CrmError> {
        let search: SearchEnvelope = self
            .get("/organizations/search", &[("term", company)])
            .await?;
        if let Some(id) = first_search_hit(&search) {
            return Ok(Some(id));
        }

        let created: RecordEnvelope = self
            .post("/organizations", &json!({ "name": company }))
            .await?;
        Ok(created.data.map(|record| record.id))
    }

    async fn find_or_create_person(
        &self,
        lead: &LeadRecord,
        org_id: Option<u64>,
    ) -> Result<Option<u64>, CrmError> {
        let search: SearchEnvelope = self
            .get("/persons/search", &[("term", lead.email.as_str())])
            .await?;
        if let Some(id) = first_search_hit(&search) {
            return Ok(Some(id));
        }

        let mut person = json!({
            "name": lead.name,
            "email": lead.email,
            "phone": lead.phone,
        });
        if let Some(org_id) = org_id {
            person["org_id"] = json!(org_id);
        }

        let created: RecordEnvelope = self.post("/persons", &person).await?;
        Ok(created.data.map(|record| record.id))
    }

    async fn pipeline_id(&self) -> Result<Option<u64>, CrmError> {
        let pipelines: ListEnvelope = self.get("/pipelines", &[]).await?;
        let keyword = self.settings.pipeline_keyword.to_lowercase();
        Ok(pipelines
            .data
            .unwrap_or_default()
            .into_iter()
            .find(|pipeline| pipeline.name.to_lowercase().contains(&keyword))
            .map(|pipeline| pipeline.id))
    }

    async fn stage_id(
        &self,
        pipeline_id: u64,
        urgency: UrgencyLevel,
    ) -> Result<Option<u64>, CrmError> {
        let stages: ListEnvelope = self
            .get("/stages", &[("pipeline_id", pipeline_id.to_string().as_str())])
            .await?;
        Ok(select_stage(&stages.data.unwrap_or_default(), urgency))
    }

    async fn create_deal(
        &self,
        lead: &LeadRecord,
        person_id: Option<u64>,
        org_id: Option<u64>,
    ) -> Result<Option<u64>, CrmError> {
        let mut deal = json!({
            "title": format!("Recruitment APK - {}", lead.company),
            "value": deal_value(&lead.company_size, lead.result.urgency),
            "currency": "EUR",
            "status": "open",
        });

        match self.pipeline_id().await {
            Ok(Some(pipeline_id)) => {
                deal["pipeline_id"] = json!(pipeline_id);
                match self.stage_id(pipeline_id, lead.result.urgency).await {
                    Ok(Some(stage_id)) => deal["stage_id"] = json!(stage_id),
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "pipedrive stage lookup failed"),
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "pipedrive pipeline lookup failed"),
        }

        if let Some(person_id) = person_id {
            deal["person_id"] = json!(person_id);
        }
        if let Some(org_id) = org_id {
            deal["org_id"] = json!(org_id);
        }

        let created: RecordEnvelope = self.post("/deals", &deal).await?;
        Ok(created.data.map(|record| record.id))
    }

    async fn attach_note(&self, deal_id: u64, lead: &LeadRecord) -> Result<(), CrmError> {
        let _: Value = self
            .post(
                "/notes",
                &json!({
                    "deal_id": deal_id,
                    "content": note_content(lead),
                }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CrmGateway for PipedriveClient {
    /// Best-effort chain: a failed organization or person lookup degrades to
    /// an unlinked deal; only a missing deal marks the sync as failed. A note
    /// failure is logged and ignored.
    async fn sync_lead(&self, lead: &LeadRecord) -> Result<CrmReceipt, CrmError> {
        let organization_id = match self.find_or_create_organization(&lead.company).await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, company = %lead.company, "pipedrive organization step failed");
                None
            }
        };

        let person_id = match self.find_or_create_person(lead, organization_id).await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, email = %lead.email, "pipedrive person step failed");
                None
            }
        };

        let deal_id = self
            .create_deal(lead, person_id, organization_id)
            .await?
            .ok_or(CrmError::DealNotCreated)?;

        if let Err(err) = self.attach_note(deal_id, lead).await {
            warn!(error = %err, deal_id, "pipedrive note step failed");
        }

        Ok(CrmReceipt {
            organization_id,
            person_id,
            deal_id: Some(deal_id),
        })
    }
}

fn first_search_hit(search: &SearchEnvelope) -> Option<u64> {
    search
        .data
        .as_ref()
        .and_then(|data| data.items.first())
        .map(|item| item.item.id)
}

/// Deal value tiered by company size, raised for very urgent leads.
pub(crate) fn deal_value(company_size: &str, urgency: UrgencyLevel) -> f64 {
    let mut value = BASE_DEAL_VALUE;
    if company_size.contains("100") || company_size.contains("250") {
        value = 15000.0;
    } else if company_size.contains("50") {
        value = 10000.0;
    }

    if urgency == UrgencyLevel::ZeerHoog {
        value *= 1.5;
    }
    value
}

/// Default to the first stage; urgent leads move to a stage whose name
/// mentions hot, urgent, or prio when the pipeline has one.
pub(crate) fn select_stage(stages: &[NamedEntry], urgency: UrgencyLevel) -> Option<u64> {
    let mut selected = stages.first().map(|stage| stage.id);

    if matches!(urgency, UrgencyLevel::ZeerHoog | UrgencyLevel::Hoog) {
        let hot = stages.iter().find(|stage| {
            let name = stage.name.to_lowercase();
            name.contains("hot") || name.contains("urgent") || name.contains("prio")
        });
        if let Some(stage) = hot {
            selected = Some(stage.id);
        }
    }

    selected
}

pub(crate) fn note_content(lead: &LeadRecord) -> String {
    let result = &lead.result;
    let mut content = String::new();

    writeln!(content, "## Recruitment APK Assessment Resultaten").expect("write heading");
    writeln!(content).expect("write");
    writeln!(content, "**Datum:** {}", lead.timestamp).expect("write date");
    writeln!(content).expect("write");
    writeln!(content, "### Scores").expect("write scores heading");
    writeln!(
        content,
        "- **Assessment Score:** {}% ({})",
        result.score_percent, result.category
    )
    .expect("write score");
    writeln!(content, "- **Lead Score:** {}/100", result.lead_score).expect("write lead score");
    writeln!(content, "- **Pijn Level:** {}", result.pain_level).expect("write pain");
    writeln!(content, "- **Urgentie:** {}", result.urgency).expect("write urgency");
    writeln!(content).expect("write");
    writeln!(content, "### Bedrijfsinformatie").expect("write company heading");
    writeln!(content, "- **Sector:** {}", lead.sector).expect("write sector");
    writeln!(content, "- **Bedrijfsgrootte:** {}", lead.company_size).expect("write size");
    writeln!(content).expect("write");
    writeln!(content, "### Aanbevolen Actie").expect("write action heading");
    writeln!(content, "{}", result.urgency.recommended_action()).expect("write action");
    writeln!(content).expect("write");
    writeln!(content, "---").expect("write rule");
    write!(content, "*Automatisch gegenereerd door Recruitment APK*").expect("write footer");

    content
}
