//! Schedule expansion and payment assignment endpoints.

use actix_session::Session;
use actix_web::web;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AmountCents, PaymentId, PaymentSlot, PlanId, SlotId, SlotSource, schedule_total,
};

use super::auth::require_actor;
use super::error::ApiError;
use super::state::AppState;

/// Request body for expanding a plan's slot schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpandSlotsRequest {
    pub source: SlotSource,
    pub term_starts_on: NaiveDate,
}

/// The expanded schedule plus its derived total. The engine does not write
/// the total onto the plan; callers persist it through the plan save
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpandSlotsResponse {
    pub slots: Vec<PaymentSlot>,
    pub total_amount: AmountCents,
}

/// POST /api/plans/{plan_id}/slots/expand
#[utoipa::path(
    post,
    path = "/api/plans/{plan_id}/slots/expand",
    request_body = ExpandSlotsRequest,
    params(("plan_id" = Uuid, Path, description = "Payment plan identifier")),
    responses(
        (status = 200, description = "Expanded slot schedule with its derived total", body = ExpandSlotsResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Template not found", body = ApiError),
        (status = 503, description = "Service unavailable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["billing"],
    operation_id = "expandPlanSlots",
    security(("SessionCookie" = []))
)]
pub async fn expand_slots(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    session: Session,
    body: web::Json<ExpandSlotsRequest>,
) -> Result<web::Json<ExpandSlotsResponse>, ApiError> {
    require_actor(&session)?;
    let plan_id = PlanId::from_uuid(path.into_inner());
    let request = body.into_inner();

    let slots = state
        .schedule
        .expand_slots(plan_id, request.source, request.term_starts_on)
        .await?;
    let total_amount = schedule_total(&slots);
    Ok(web::Json(ExpandSlotsResponse {
        slots,
        total_amount,
    }))
}

/// Request body for (un)assigning a payment. A null `slotId` unassigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    #[serde(default)]
    pub slot_id: Option<SlotId>,
}

/// Assignment outcome: the summary always describes what committed; the
/// warning, when present, names the follow-up step that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/payments/{payment_id}/assignment
#[utoipa::path(
    post,
    path = "/api/payments/{payment_id}/assignment",
    request_body = AssignmentRequest,
    params(("payment_id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Assignment applied, possibly with a warning", body = AssignmentResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Payment or slot not found", body = ApiError),
        (status = 503, description = "Service unavailable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["billing"],
    operation_id = "assignPayment",
    security(("SessionCookie" = []))
)]
pub async fn assign_payment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    session: Session,
    body: web::Json<AssignmentRequest>,
) -> Result<web::Json<AssignmentResponse>, ApiError> {
    require_actor(&session)?;
    let payment_id = PaymentId::from_uuid(path.into_inner());

    let outcome = state
        .assignment
        .assign_payment_to_slot(payment_id, body.slot_id)
        .await?;
    Ok(web::Json(AssignmentResponse {
        summary: outcome.summary,
        warning: outcome.warning,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::domain::TemplateId;

    #[rstest]
    fn expand_request_accepts_a_template_source() {
        let template = TemplateId::random();
        let body = serde_json::json!({
            "source": { "template": template },
            "termStartsOn": "2024-01-15"
        });
        let request: ExpandSlotsRequest = serde_json::from_value(body).expect("deserializes");
        assert_eq!(request.source, SlotSource::Template(template));
        assert_eq!(
            request.term_starts_on,
            NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
        );
    }

    #[rstest]
    fn expand_request_accepts_a_custom_source() {
        let body = serde_json::json!({
            "source": { "custom": [
                { "amountDue": 30000, "monthsToDelay": 0 },
                { "amountDue": 30000, "monthsToDelay": 1 }
            ]},
            "termStartsOn": "2025-06-01"
        });
        let request: ExpandSlotsRequest = serde_json::from_value(body).expect("deserializes");
        match request.source {
            SlotSource::Custom(slots) => assert_eq!(slots.len(), 2),
            SlotSource::Template(_) => panic!("expected a custom source"),
        }
    }

    #[rstest]
    fn assignment_request_defaults_to_unassign() {
        let request: AssignmentRequest =
            serde_json::from_value(serde_json::json!({})).expect("deserializes");
        assert_eq!(request.slot_id, None);
    }

    #[rstest]
    fn assignment_response_omits_an_absent_warning() {
        let body = serde_json::to_value(AssignmentResponse {
            summary: "Payment assigned".to_owned(),
            warning: None,
        })
        .expect("serializes");
        assert!(body.get("warning").is_none());
    }
}
