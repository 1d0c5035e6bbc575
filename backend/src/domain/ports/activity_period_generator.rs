//! Collaborator port for activity-period generation.
//!
//! Generation itself lives outside this core; the coordinator only invokes
//! it and interprets its outcome. The collaborator contract requires
//! idempotence: invoking generation twice for the same slot must report
//! "zero created, already exists" rather than duplicate periods.

use async_trait::async_trait;

use crate::domain::ids::SlotId;

use super::macros::define_port_error;

define_port_error! {
    /// Hard failures raised by the generator collaborator.
    pub enum ActivityPeriodGeneratorError {
        /// Generation could not run at all.
        Failed => "activity period generation failed: {message}",
    }
}

/// Result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPeriods {
    /// Periods newly created by this run. Zero when they already existed.
    pub periods_created: usize,
    /// Display name of the client the periods belong to.
    pub client_name: String,
    /// Optional collaborator-supplied note (e.g. "periods already exist").
    pub message: Option<String>,
}

/// Driving port for the external activity-period generator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityPeriodGenerator: Send + Sync {
    /// Generate activity periods for the client owning `slot_id`.
    async fn generate(
        &self,
        slot_id: SlotId,
    ) -> Result<GeneratedPeriods, ActivityPeriodGeneratorError>;
}

/// Fixture generator reporting nothing created.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureActivityPeriodGenerator;

#[async_trait]
impl ActivityPeriodGenerator for FixtureActivityPeriodGenerator {
    async fn generate(
        &self,
        _slot_id: SlotId,
    ) -> Result<GeneratedPeriods, ActivityPeriodGeneratorError> {
        Ok(GeneratedPeriods {
            periods_created: 0,
            client_name: String::new(),
            message: Some("fixture generator created nothing".to_owned()),
        })
    }
}
