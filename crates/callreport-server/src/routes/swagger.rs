//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use callreport::{AnalysisBlock, ArtifactBlock, CallBlock, WebhookEnvelope, WebhookMessage};

use crate::models::{CallReportResponse, PaginatedCallsResponse, WebhookAck};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Webhook endpoints
        super::webhook::receive_webhook,
        // Call endpoints
        super::calls::list_calls,
        super::calls::get_call,
    ),
    info(
        title = "Call Report API",
        version = "0.1.0",
        description = "Receives voice platform end-of-call webhooks and serves call reports to the dashboard.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Webhook", description = "Webhook - Voice platform event ingestion"),
        (name = "Calls", description = "Calls - Stored call reports"),
    ),
    components(
        schemas(
            // Webhook
            WebhookEnvelope,
            WebhookMessage,
            CallBlock,
            ArtifactBlock,
            AnalysisBlock,
            WebhookAck,
            // Calls
            CallReportResponse,
            PaginatedCallsResponse,
        )
    ),
)]
pub struct ApiDoc;
