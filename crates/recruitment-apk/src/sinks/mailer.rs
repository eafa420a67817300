use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{LeadNotifier, NotifyError};
use crate::intake::LeadRecord;

const SENDER: &str = "FlowMaster Assessment <noreply@recruitmentapk.nl>";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends the lead summary mail through an HTTP mail relay. The relay accepts
/// a plain JSON message envelope; which provider sits behind the URL is a
/// deployment concern.
pub struct HttpMailNotifier {
    client: reqwest::Client,
    relay_url: String,
    admin_email: String,
}

impl HttpMailNotifier {
    pub fn new(relay_url: String, admin_email: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
            admin_email,
        }
    }
}

#[async_trait]
impl LeadNotifier for HttpMailNotifier {
    async fn notify(&self, lead: &LeadRecord) -> Result<(), NotifyError> {
        let message = json!({
            "from": SENDER,
            "to": self.admin_email,
            "reply_to": lead.email,
            "subject": subject(lead),
            "html": render_body(lead),
        });

        let response = self
            .client
            .post(&self.relay_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

pub(crate) fn subject(lead: &LeadRecord) -> String {
    format!(
        "Nieuwe FlowMaster Assessment: {} - Score: {}%",
        lead.company, lead.result.score_percent
    )
}

pub(crate) fn render_body(lead: &LeadRecord) -> String {
    let mut html = String::new();
    let result = &lead.result;

    html.push_str("<h2>Nieuwe FlowMaster Assessment</h2>");

    html.push_str("<h3>Contact Informatie</h3><ul>");
    push_item(&mut html, "Bedrijf", &lead.company);
    push_item(&mut html, "Naam", &lead.name);
    push_item(&mut html, "Email", &lead.email);
    push_item(&mut html, "Telefoon", &lead.phone);
    html.push_str("</ul>");

    html.push_str("<h3>Bedrijfs Details</h3><ul>");
    push_item(&mut html, "Sector", &lead.sector);
    push_item(&mut html, "Bedrijfsgrootte", &lead.company_size);
    html.push_str("</ul>");

    html.push_str("<h3>Assessment Resultaten</h3><ul>");
    push_item(
        &mut html,
        "Assessment Score",
        &format!("{}% ({})", result.score_percent, result.category),
    );
    push_item(&mut html, "Urgentie Level", result.urgency.label());
    push_item(
        &mut html,
        "Lead Score",
        &format!("{}/100", result.lead_score),
    );
    push_item(&mut html, "Pijn Level", result.pain_level.label());
    html.push_str("</ul>");

    writeln!(
        html,
        "<h3>Aanbevolen Actie</h3><p>{}</p>",
        escape_html(result.urgency.recommended_action())
    )
    .expect("write action");
    writeln!(
        html,
        "<p><strong>Timestamp:</strong> {}</p>",
        escape_html(&lead.timestamp)
    )
    .expect("write timestamp");

    html
}

fn push_item(html: &mut String, label: &str, value: &str) {
    writeln!(
        html,
        "<li><strong>{}:</strong> {}</li>",
        escape_html(label),
        escape_html(value)
    )
    .expect("write list item");
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
