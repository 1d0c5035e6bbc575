//! HTTP adapter: routes, handlers, and the error envelope.

pub mod auth;
pub mod billing;
pub mod collections;
pub mod error;
pub mod health;
pub mod state;

use actix_web::web;

pub use self::error::ApiError;
pub use self::state::AppState;

/// Mount every route on the given service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route(
                "/clients/{client_id}/goals",
                web::put().to(collections::save_goals),
            )
            .route(
                "/clients/{client_id}/wins",
                web::put().to(collections::save_wins),
            )
            .route(
                "/clients/{client_id}/assignments",
                web::put().to(collections::save_assignments),
            )
            .route(
                "/clients/{client_id}/activity-periods",
                web::put().to(collections::save_activity_periods),
            )
            .route(
                "/clients/{client_id}/nps-scores",
                web::put().to(collections::save_nps_scores),
            )
            .route(
                "/clients/{client_id}/testimonials",
                web::put().to(collections::save_testimonials),
            )
            .route(
                "/clients/{client_id}/payment-plans",
                web::put().to(collections::save_payment_plans),
            )
            .route(
                "/plans/{plan_id}/slots",
                web::put().to(collections::save_payment_slots),
            )
            .route(
                "/plans/{plan_id}/slots/expand",
                web::post().to(billing::expand_slots),
            )
            .route(
                "/payments/{payment_id}/assignment",
                web::post().to(billing::assign_payment),
            ),
    )
    .service(
        web::scope("/health")
            .route("/live", web::get().to(health::live))
            .route("/ready", web::get().to(health::ready)),
    );
}
