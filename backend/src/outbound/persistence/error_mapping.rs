//! Shared error conversions for the Diesel adapters.
//!
//! Every port error distinguishes connection failures (pool checkout) from
//! execution failures (queries and mutations). The conversions here let the
//! adapters use `?` on both without per-call-site mapping.

use diesel::result::Error as DieselError;

use crate::domain::ports::{
    ActivityPeriodGeneratorError, ActivityPeriodRepositoryError, PaymentRepositoryError,
    PaymentSlotRepositoryError, SubRecordStoreError, TemplateRepositoryError,
    WinTagRepositoryError,
};

use super::pool::PoolError;

macro_rules! map_infrastructure_errors {
    ($error:ty) => {
        impl From<PoolError> for $error {
            fn from(error: PoolError) -> Self {
                Self::connection(error.to_string())
            }
        }

        impl From<DieselError> for $error {
            fn from(error: DieselError) -> Self {
                Self::query(error.to_string())
            }
        }
    };
}

map_infrastructure_errors!(SubRecordStoreError);
map_infrastructure_errors!(TemplateRepositoryError);
map_infrastructure_errors!(PaymentSlotRepositoryError);
map_infrastructure_errors!(PaymentRepositoryError);
map_infrastructure_errors!(ActivityPeriodRepositoryError);
map_infrastructure_errors!(WinTagRepositoryError);

// The generator port has a single hard-failure variant.
impl From<PoolError> for ActivityPeriodGeneratorError {
    fn from(error: PoolError) -> Self {
        Self::failed(error.to_string())
    }
}

impl From<DieselError> for ActivityPeriodGeneratorError {
    fn from(error: DieselError) -> Self {
        Self::failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_variants() {
        let error = SubRecordStoreError::from(PoolError::checkout("pool exhausted"));
        assert!(matches!(error, SubRecordStoreError::Connection { .. }));
        assert!(error.to_string().contains("pool exhausted"));
    }

    #[rstest]
    fn diesel_errors_map_to_query_variants() {
        let error = PaymentRepositoryError::from(DieselError::BrokenTransactionManager);
        assert!(matches!(error, PaymentRepositoryError::Query { .. }));
    }
}
