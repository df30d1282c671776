use thiserror::Error;

/// Error type that captures subscription-store and billing-setup failures.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("fixed-day billing requires a payment day")]
    MissingPaymentDay,
    #[error("contract-based billing requires a contract start date")]
    MissingContractDate,
    #[error("exchange rate unavailable for {0}")]
    RateUnavailable(String),
}
