use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use super::domain::SubmissionRequest;
use super::service::{SubmissionError, SubmissionService};
use crate::error::AppError;
use crate::ratelimit::SlidingWindowLimiter;
use crate::sinks::{BackupStore, CrmGateway, LeadNotifier};

/// Shared handler state. Cloned per request, hence the manual impl instead of
/// a derive bound on the sink types.
pub struct IntakeState<B, N, C> {
    service: Arc<SubmissionService<B, N, C>>,
    limiter: Arc<SlidingWindowLimiter>,
}

impl<B, N, C> Clone for IntakeState<B, N, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            limiter: Arc::clone(&self.limiter),
        }
    }
}

/// Router builder exposing the public submission endpoint.
pub fn intake_router<B, N, C>(
    service: Arc<SubmissionService<B, N, C>>,
    limiter: Arc<SlidingWindowLimiter>,
) -> Router
where
    B: BackupStore + 'static,
    N: LeadNotifier + 'static,
    C: CrmGateway + 'static,
{
    let state = IntakeState { service, limiter };
    Router::new()
        .route(
            "/api/submit-assessment",
            post(submit_handler::<B, N, C>).fallback(method_not_allowed),
        )
        .with_state(state)
}

pub(crate) async fn submit_handler<B, N, C>(
    State(state): State<IntakeState<B, N, C>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Response
where
    B: BackupStore + 'static,
    N: LeadNotifier + 'static,
    C: CrmGateway + 'static,
{
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if !state.limiter.allow(ip) {
        warn!(%ip, "submission rate limit exceeded");
        let body = json!({
            "success": false,
            "error": "Te veel verzoeken. Probeer het over een uur opnieuw.",
        });
        return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    }

    let Json(request) = match payload {
        Ok(json) => json,
        // The body failed to buffer: a transport fault, not a bad payload.
        Err(JsonRejection::BytesRejection(rejection)) => {
            return AppError::Server(axum::Error::new(rejection)).into_response();
        }
        Err(rejection) => {
            warn!(error = %rejection, "submission body was not valid json");
            let body = json!({
                "success": false,
                "error": "Ongeldige JSON data",
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.service.submit(request).await {
        Ok(outcome) => {
            let body = json!({
                "success": true,
                "message": "Assessment succesvol ontvangen",
                "data": {
                    "csv_saved": outcome.report.csv_saved,
                    "email_sent": outcome.report.email_sent,
                    "pipedrive_synced": outcome.report.pipedrive_synced,
                    "pipedrive_deal_id": outcome.report.pipedrive_deal_id,
                    "timestamp": outcome.lead.timestamp,
                },
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(SubmissionError::Validation(errors)) => {
            let body = json!({
                "success": false,
                "errors": errors,
            });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

async fn method_not_allowed() -> Response {
    let body = json!({
        "success": false,
        "error": "Method not allowed",
    });
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}
