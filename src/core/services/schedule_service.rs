use chrono::NaiveDate;
use uuid::Uuid;

use crate::billing::{BillingCalculator, PaymentUrgency};
use crate::domain::Subscription;

use super::ServiceResult;

/// Derived payment view for one subscription at a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStatus {
    pub next_payment_date: NaiveDate,
    pub days_until: i64,
    pub urgency: PaymentUrgency,
    pub in_trial: bool,
    /// Populated only while the trial is active.
    pub trial_days_remaining: Option<i64>,
}

/// One row of the upcoming-payments listing.
#[derive(Debug, Clone)]
pub struct UpcomingPayment {
    pub id: Uuid,
    pub name: String,
    pub status: PaymentStatus,
}

pub struct ScheduleService;

impl ScheduleService {
    /// Payment status for one record. `Ok(None)` means no billing pattern is
    /// configured and payment info should not be shown at all.
    pub fn payment_status(
        subscription: &Subscription,
        today: NaiveDate,
    ) -> ServiceResult<Option<PaymentStatus>> {
        let Some(descriptor) = subscription.payment_descriptor()? else {
            return Ok(None);
        };
        let next_payment_date = BillingCalculator::next_payment_date(&descriptor, today);
        let days_until = BillingCalculator::days_until(next_payment_date, today);
        let in_trial = BillingCalculator::is_in_trial(descriptor.trial.as_ref(), today);
        let trial_days_remaining = if in_trial {
            descriptor
                .trial
                .as_ref()
                .map(|trial| BillingCalculator::trial_days_remaining(trial, today))
        } else {
            None
        };
        Ok(Some(PaymentStatus {
            next_payment_date,
            days_until,
            urgency: BillingCalculator::classify_urgency(days_until),
            in_trial,
            trial_days_remaining,
        }))
    }

    /// Maps a store into upcoming payments, soonest first. Records without a
    /// pattern are omitted; misconfigured records are skipped with a warning
    /// instead of failing the whole listing.
    pub fn upcoming(subscriptions: &[Subscription], today: NaiveDate) -> Vec<UpcomingPayment> {
        let mut rows: Vec<UpcomingPayment> = subscriptions
            .iter()
            .filter_map(|subscription| match Self::payment_status(subscription, today) {
                Ok(Some(status)) => Some(UpcomingPayment {
                    id: subscription.id,
                    name: subscription.name.clone(),
                    status,
                }),
                Ok(None) => None,
                Err(err) => {
                    tracing::warn!(
                        subscription = %subscription.name,
                        error = %err,
                        "skipping subscription with invalid billing setup"
                    );
                    None
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            a.status
                .next_payment_date
                .cmp(&b.status.next_payment_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }
}
