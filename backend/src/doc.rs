//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] assembles the OpenAPI specification for the REST API: the
//! save endpoints for every client sub-collection, the billing operations,
//! and the health probes, plus the session cookie security scheme. The
//! generated document is exported via `cargo run --bin openapi-dump` for
//! external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::billing::{
    AssignmentRequest, AssignmentResponse, ExpandSlotsRequest, ExpandSlotsResponse,
};
use crate::inbound::http::collections::ReconcileResponse;
use crate::inbound::http::error::ApiError;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie carrying the acting user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Back office API",
        description = "Full-list collection saves, payment scheduling, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::collections::save_goals,
        crate::inbound::http::collections::save_wins,
        crate::inbound::http::collections::save_assignments,
        crate::inbound::http::collections::save_activity_periods,
        crate::inbound::http::collections::save_nps_scores,
        crate::inbound::http::collections::save_testimonials,
        crate::inbound::http::collections::save_payment_plans,
        crate::inbound::http::collections::save_payment_slots,
        crate::inbound::http::billing::expand_slots,
        crate::inbound::http::billing::assign_payment,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        ReconcileResponse,
        ApiError,
        ExpandSlotsRequest,
        ExpandSlotsResponse,
        AssignmentRequest,
        AssignmentResponse,
    )),
    tags(
        (name = "clients", description = "Full-list saves for client sub-collections"),
        (name = "billing", description = "Payment schedules and slot assignment"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for route in [
            "/api/clients/{client_id}/goals",
            "/api/clients/{client_id}/wins",
            "/api/clients/{client_id}/assignments",
            "/api/clients/{client_id}/activity-periods",
            "/api/clients/{client_id}/nps-scores",
            "/api/clients/{client_id}/testimonials",
            "/api/clients/{client_id}/payment-plans",
            "/api/plans/{plan_id}/slots",
            "/api/plans/{plan_id}/slots/expand",
            "/api/payments/{payment_id}/assignment",
            "/health/live",
            "/health/ready",
        ] {
            assert!(paths.contains_key(route), "missing route {route}");
        }
    }

    #[test]
    fn components_include_the_envelope_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("ApiError"));
        assert!(schemas.contains_key("ReconcileResponse"));
    }
}
