//! Relationship-management back office core.
//!
//! Two cooperating components: a generic collection reconciler that keeps a
//! parent entity's sub-record lists (goals, wins, payment slots, ...) in
//! sync with what the caller submits, and a payment schedule engine that
//! expands plan templates into dated slots and coordinates payment↔slot
//! assignment. Layout is hexagonal: `domain` holds the services and ports,
//! `outbound` the PostgreSQL adapters, `inbound` the HTTP surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
