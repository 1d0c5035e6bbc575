//! Identifier newtypes for the entities handled by the core.
//!
//! Every persisted entity is keyed by a UUID v4. The newtypes keep call
//! sites honest about which entity an identifier refers to; the reconciler
//! additionally works in terms of an untyped [`ParentId`] so one generic
//! algorithm can serve client-owned and plan-owned sub-collections alike.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Borrow the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Unwrap into the underlying UUID.
            pub const fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id! {
    /// Identifier of a client (the usual parent entity).
    ClientId
}

define_id! {
    /// Identifier of one persisted sub-record (goal, win, slot, ...).
    RecordId
}

define_id! {
    /// Identifier of a payment plan.
    PlanId
}

define_id! {
    /// Identifier of a payment plan template.
    TemplateId
}

define_id! {
    /// Identifier of a concrete payment slot.
    SlotId
}

define_id! {
    /// Identifier of a real money-movement record.
    PaymentId
}

define_id! {
    /// Identifier of a win tag.
    TagId
}

define_id! {
    /// Identity of the authenticated caller performing a mutation.
    ///
    /// Threaded explicitly through every mutating call so insert-time
    /// stamping (`recorded_by`) never depends on ambient global state.
    ActorId
}

define_id! {
    /// Untyped parent identifier used by the generic reconciler.
    ///
    /// Most sub-collections hang off a client; payment slots hang off a
    /// plan. Both convert into this type at the reconciler boundary.
    ParentId
}

impl From<ClientId> for ParentId {
    fn from(value: ClientId) -> Self {
        Self(value.into_uuid())
    }
}

impl From<PlanId> for ParentId {
    fn from(value: PlanId) -> Self {
        Self(value.into_uuid())
    }
}

impl From<SlotId> for RecordId {
    fn from(value: SlotId) -> Self {
        Self(value.into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_round_trip_through_uuid() {
        let raw = Uuid::new_v4();
        let id = ClientId::from_uuid(raw);
        assert_eq!(*id.as_uuid(), raw);
        assert_eq!(id.into_uuid(), raw);
    }

    #[rstest]
    fn parent_id_adopts_client_and_plan_ids() {
        let client = ClientId::random();
        let plan = PlanId::random();
        assert_eq!(
            ParentId::from(client).into_uuid(),
            client.into_uuid()
        );
        assert_eq!(ParentId::from(plan).into_uuid(), plan.into_uuid());
    }

    #[rstest]
    fn serializes_transparently() {
        let id = SlotId::random();
        let value = serde_json::to_value(id).expect("serializes");
        assert_eq!(value, serde_json::json!(id.as_uuid()));
    }
}
