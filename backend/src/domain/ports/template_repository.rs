//! Port for reading payment plan templates and their slot definitions.

use async_trait::async_trait;

use crate::domain::billing::{PaymentPlanTemplate, TemplateSlot};
use crate::domain::ids::TemplateId;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by template repository adapters.
    pub enum TemplateRepositoryError {
        /// Repository connection could not be established.
        Connection => "template repository connection failed: {message}",
        /// Query failed during execution.
        Query => "template repository query failed: {message}",
    }
}

/// Read-only port over payment plan templates.
///
/// Templates are owned by back-office CRUD outside this core; the schedule
/// engine only ever reads them. A template cannot be deleted while a plan
/// references it, which storage enforces with a restricting foreign key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Look a template up by id.
    async fn find_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<PaymentPlanTemplate>, TemplateRepositoryError>;

    /// The template's slot definitions, ordered by ascending delay.
    ///
    /// An existing template with no slots yields an empty list, not an
    /// error.
    async fn slots_for_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateSlot>, TemplateRepositoryError>;
}

/// Fixture implementation holding a static template set.
#[derive(Debug, Default, Clone)]
pub struct FixtureTemplateRepository {
    templates: Vec<(PaymentPlanTemplate, Vec<TemplateSlot>)>,
}

impl FixtureTemplateRepository {
    /// A fixture with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fixture holding one template with the given slots.
    pub fn with_template(template: PaymentPlanTemplate, slots: Vec<TemplateSlot>) -> Self {
        Self {
            templates: vec![(template, slots)],
        }
    }
}

#[async_trait]
impl TemplateRepository for FixtureTemplateRepository {
    async fn find_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<PaymentPlanTemplate>, TemplateRepositoryError> {
        Ok(self
            .templates
            .iter()
            .find(|(template, _)| template.id == template_id)
            .map(|(template, _)| template.clone()))
    }

    async fn slots_for_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateSlot>, TemplateRepositoryError> {
        let mut slots = self
            .templates
            .iter()
            .find(|(template, _)| template.id == template_id)
            .map(|(_, slots)| slots.clone())
            .unwrap_or_default();
        slots.sort_by_key(|slot| slot.months_to_delay);
        Ok(slots)
    }
}
