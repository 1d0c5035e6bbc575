//! Full-list save endpoints for the client sub-collections.
//!
//! Every endpoint takes the complete desired list and reconciles the
//! persisted set against it. Records arriving with an id are rewritten in
//! place; records without one are inserted; everything else is deleted.

use actix_session::Session;
use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::records::{
    ActivityPeriodKind, AssignmentKind, GoalKind, NpsScoreKind, PaymentPlanKind, PaymentSlotKind,
    TestimonialKind,
};
use crate::domain::{
    ClientId, DesiredRecord, DesiredWin, ParentId, PlanId, ReconcileOutcome, RecordId,
};

use super::auth::require_actor;
use super::error::ApiError;
use super::state::AppState;

/// What a save applied, mirrored back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub deleted: usize,
    pub updated: usize,
    pub inserted: Vec<RecordId>,
}

impl From<ReconcileOutcome> for ReconcileResponse {
    fn from(outcome: ReconcileOutcome) -> Self {
        Self {
            deleted: outcome.deleted,
            updated: outcome.updated,
            inserted: outcome.inserted,
        }
    }
}

macro_rules! client_collection_handler {
    ($(#[$meta:meta])* $name:ident, $service:ident, $kind:ty) => {
        $(#[$meta])*
        pub async fn $name(
            state: web::Data<AppState>,
            path: web::Path<Uuid>,
            session: Session,
            body: web::Json<Vec<DesiredRecord<$kind>>>,
        ) -> Result<web::Json<ReconcileResponse>, ApiError> {
            let actor = require_actor(&session)?;
            let parent = ParentId::from(ClientId::from_uuid(path.into_inner()));
            let outcome = state
                .$service
                .reconcile(parent, actor, body.into_inner())
                .await?;
            Ok(web::Json(ReconcileResponse::from(outcome)))
        }
    };
}

client_collection_handler! {
    /// PUT /api/clients/{client_id}/goals
    #[utoipa::path(
        put,
        path = "/api/clients/{client_id}/goals",
        request_body(content = Vec<serde_json::Value>, description = "Full desired goal list"),
        params(("client_id" = Uuid, Path, description = "Client identifier")),
        responses(
            (status = 200, description = "Collection reconciled", body = ReconcileResponse),
            (status = 400, description = "Invalid request", body = ApiError),
            (status = 401, description = "Unauthorised", body = ApiError),
            (status = 404, description = "Not found", body = ApiError),
            (status = 503, description = "Service unavailable", body = ApiError),
            (status = 500, description = "Internal server error", body = ApiError)
        ),
        tags = ["clients"],
        operation_id = "saveGoals",
        security(("SessionCookie" = []))
    )]
    save_goals, goals, GoalKind
}

client_collection_handler! {
    /// PUT /api/clients/{client_id}/assignments
    #[utoipa::path(
        put,
        path = "/api/clients/{client_id}/assignments",
        request_body(content = Vec<serde_json::Value>, description = "Full desired assignment list"),
        params(("client_id" = Uuid, Path, description = "Client identifier")),
        responses(
            (status = 200, description = "Collection reconciled", body = ReconcileResponse),
            (status = 400, description = "Invalid request", body = ApiError),
            (status = 401, description = "Unauthorised", body = ApiError),
            (status = 404, description = "Not found", body = ApiError),
            (status = 503, description = "Service unavailable", body = ApiError),
            (status = 500, description = "Internal server error", body = ApiError)
        ),
        tags = ["clients"],
        operation_id = "saveAssignments",
        security(("SessionCookie" = []))
    )]
    save_assignments, assignments, AssignmentKind
}

client_collection_handler! {
    /// PUT /api/clients/{client_id}/activity-periods
    #[utoipa::path(
        put,
        path = "/api/clients/{client_id}/activity-periods",
        request_body(content = Vec<serde_json::Value>, description = "Full desired activity period list"),
        params(("client_id" = Uuid, Path, description = "Client identifier")),
        responses(
            (status = 200, description = "Collection reconciled", body = ReconcileResponse),
            (status = 400, description = "Invalid request", body = ApiError),
            (status = 401, description = "Unauthorised", body = ApiError),
            (status = 404, description = "Not found", body = ApiError),
            (status = 503, description = "Service unavailable", body = ApiError),
            (status = 500, description = "Internal server error", body = ApiError)
        ),
        tags = ["clients"],
        operation_id = "saveActivityPeriods",
        security(("SessionCookie" = []))
    )]
    save_activity_periods, activity_periods, ActivityPeriodKind
}

client_collection_handler! {
    /// PUT /api/clients/{client_id}/nps-scores
    #[utoipa::path(
        put,
        path = "/api/clients/{client_id}/nps-scores",
        request_body(content = Vec<serde_json::Value>, description = "Full desired NPS score list"),
        params(("client_id" = Uuid, Path, description = "Client identifier")),
        responses(
            (status = 200, description = "Collection reconciled", body = ReconcileResponse),
            (status = 400, description = "Invalid request", body = ApiError),
            (status = 401, description = "Unauthorised", body = ApiError),
            (status = 404, description = "Not found", body = ApiError),
            (status = 503, description = "Service unavailable", body = ApiError),
            (status = 500, description = "Internal server error", body = ApiError)
        ),
        tags = ["clients"],
        operation_id = "saveNpsScores",
        security(("SessionCookie" = []))
    )]
    save_nps_scores, nps_scores, NpsScoreKind
}

client_collection_handler! {
    /// PUT /api/clients/{client_id}/testimonials
    #[utoipa::path(
        put,
        path = "/api/clients/{client_id}/testimonials",
        request_body(content = Vec<serde_json::Value>, description = "Full desired testimonial list"),
        params(("client_id" = Uuid, Path, description = "Client identifier")),
        responses(
            (status = 200, description = "Collection reconciled", body = ReconcileResponse),
            (status = 400, description = "Invalid request", body = ApiError),
            (status = 401, description = "Unauthorised", body = ApiError),
            (status = 404, description = "Not found", body = ApiError),
            (status = 503, description = "Service unavailable", body = ApiError),
            (status = 500, description = "Internal server error", body = ApiError)
        ),
        tags = ["clients"],
        operation_id = "saveTestimonials",
        security(("SessionCookie" = []))
    )]
    save_testimonials, testimonials, TestimonialKind
}

client_collection_handler! {
    /// PUT /api/clients/{client_id}/payment-plans
    #[utoipa::path(
        put,
        path = "/api/clients/{client_id}/payment-plans",
        request_body(content = Vec<serde_json::Value>, description = "Full desired payment plan list"),
        params(("client_id" = Uuid, Path, description = "Client identifier")),
        responses(
            (status = 200, description = "Collection reconciled", body = ReconcileResponse),
            (status = 400, description = "Invalid request", body = ApiError),
            (status = 401, description = "Unauthorised", body = ApiError),
            (status = 404, description = "Not found", body = ApiError),
            (status = 503, description = "Service unavailable", body = ApiError),
            (status = 500, description = "Internal server error", body = ApiError)
        ),
        tags = ["clients"],
        operation_id = "savePaymentPlans",
        security(("SessionCookie" = []))
    )]
    save_payment_plans, payment_plans, PaymentPlanKind
}

/// PUT /api/clients/{client_id}/wins
///
/// Wins carry a tag-id set on top of the base fields, so they go through
/// the win service rather than the plain reconciler.
#[utoipa::path(
    put,
    path = "/api/clients/{client_id}/wins",
    request_body(content = Vec<serde_json::Value>, description = "Full desired win list, each with a tagIds set"),
    params(("client_id" = Uuid, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Collection reconciled", body = ReconcileResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found", body = ApiError),
        (status = 503, description = "Service unavailable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["clients"],
    operation_id = "saveWins",
    security(("SessionCookie" = []))
)]
pub async fn save_wins(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    session: Session,
    body: web::Json<Vec<DesiredWin>>,
) -> Result<web::Json<ReconcileResponse>, ApiError> {
    let actor = require_actor(&session)?;
    let parent = ParentId::from(ClientId::from_uuid(path.into_inner()));
    let outcome = state.wins.reconcile(parent, actor, body.into_inner()).await?;
    Ok(web::Json(ReconcileResponse::from(outcome)))
}

/// PUT /api/plans/{plan_id}/slots
///
/// Payment slots hang off a plan, not a client; the same reconciliation
/// applies.
#[utoipa::path(
    put,
    path = "/api/plans/{plan_id}/slots",
    request_body(content = Vec<serde_json::Value>, description = "Full desired payment slot list"),
    params(("plan_id" = Uuid, Path, description = "Payment plan identifier")),
    responses(
        (status = 200, description = "Collection reconciled", body = ReconcileResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found", body = ApiError),
        (status = 503, description = "Service unavailable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["billing"],
    operation_id = "savePaymentSlots",
    security(("SessionCookie" = []))
)]
pub async fn save_payment_slots(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    session: Session,
    body: web::Json<Vec<DesiredRecord<PaymentSlotKind>>>,
) -> Result<web::Json<ReconcileResponse>, ApiError> {
    let actor = require_actor(&session)?;
    let parent = ParentId::from(PlanId::from_uuid(path.into_inner()));
    let outcome = state
        .payment_slots
        .reconcile(parent, actor, body.into_inner())
        .await?;
    Ok(web::Json(ReconcileResponse::from(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reconcile_response_mirrors_the_outcome() {
        let id = RecordId::random();
        let response = ReconcileResponse::from(ReconcileOutcome {
            deleted: 2,
            updated: 1,
            inserted: vec![id],
        });
        let body = serde_json::to_value(&response).expect("serializes");
        assert_eq!(body["deleted"], 2);
        assert_eq!(body["updated"], 1);
        assert_eq!(body["inserted"][0], serde_json::json!(id.as_uuid()));
    }

    #[rstest]
    fn desired_goal_json_shape_round_trips() {
        let body = serde_json::json!([
            { "title": "quarterly review", "achieved": false },
            { "id": Uuid::new_v4(), "title": "renewal", "achieved": true }
        ]);
        let desired: Vec<DesiredRecord<GoalKind>> =
            serde_json::from_value(body).expect("deserializes");
        assert_eq!(desired.len(), 2);
        assert!(desired[0].id.is_none());
        assert!(desired[1].id.is_some());
    }
}
