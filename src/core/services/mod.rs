pub mod schedule_service;
pub mod summary_service;

pub use schedule_service::{PaymentStatus, ScheduleService, UpcomingPayment};
pub use summary_service::{ConvertedTotals, CurrencyBreakdown, SpendSummary, SummaryService};

use crate::errors::SubscriptionError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
    #[error("{0}")]
    Invalid(String),
}
