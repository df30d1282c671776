//! Billing-date and trial-period arithmetic.
//!
//! Everything here is pure and date-granular: callers strip time-of-day and
//! pass an explicit `today`, which keeps every result reproducible in tests.
//! Candidate dates are always constructed from year/month with the day
//! clamped to the target month's length, so Feb 30 is never built and never
//! normalized into March.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Cycle, TrialWindow};

/// Billing rule for a subscription that actually charges. The stored `none`
/// discriminator never reaches this type; projection filters it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPattern {
    /// Charges on the same day of every cycle, e.g. "the 15th".
    FixedDay { day: u32 },
    /// Charges on the anniversary of the contract start date.
    ContractBased { anchor: NaiveDate },
}

/// Immutable input to the calculator, built fresh per call from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDescriptor {
    pub pattern: BillingPattern,
    pub cycle: Cycle,
    pub trial: Option<TrialWindow>,
}

/// How soon the next payment is due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentUrgency {
    Critical,
    Soon,
    Normal,
}

pub struct BillingCalculator;

impl BillingCalculator {
    /// Next date on which the subscription will be charged.
    ///
    /// While a trial is active the trial-end date itself is reported; once
    /// the trial has elapsed the first real occurrence is searched from the
    /// trial end, not from `today`. "Next" is strictly after the anchor: a
    /// payment falling exactly on the anchor date rolls to the following
    /// cycle.
    pub fn next_payment_date(descriptor: &PaymentDescriptor, today: NaiveDate) -> NaiveDate {
        if let Some(trial) = &descriptor.trial {
            let trial_end = trial.end_date();
            if today < trial_end {
                return trial_end;
            }
            return Self::next_occurrence(descriptor, trial_end);
        }
        Self::next_occurrence(descriptor, today)
    }

    /// Whole calendar days from `today` to `target`; negative when overdue.
    pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
        (target - today).num_days()
    }

    /// Threshold mapping for display emphasis. The ranges overlap in a naive
    /// check, so the order of comparisons matters.
    pub fn classify_urgency(days_until: i64) -> PaymentUrgency {
        if days_until <= 3 {
            PaymentUrgency::Critical
        } else if days_until <= 7 {
            PaymentUrgency::Soon
        } else {
            PaymentUrgency::Normal
        }
    }

    /// True while `today` is strictly before the trial end. Absent trial is
    /// simply "not in trial", never an error.
    pub fn is_in_trial(trial: Option<&TrialWindow>, today: NaiveDate) -> bool {
        match trial {
            Some(window) => today < window.end_date(),
            None => false,
        }
    }

    /// Days until the trial end. Does not gate on trial status: past the end
    /// this goes negative, and callers only display it while `is_in_trial`.
    pub fn trial_days_remaining(trial: &TrialWindow, today: NaiveDate) -> i64 {
        Self::days_until(trial.end_date(), today)
    }

    fn next_occurrence(descriptor: &PaymentDescriptor, anchor: NaiveDate) -> NaiveDate {
        match descriptor.pattern {
            BillingPattern::FixedDay { day } => {
                Self::fixed_day_after(anchor, day, descriptor.cycle)
            }
            BillingPattern::ContractBased { anchor: start } => {
                Self::contract_based_after(anchor, start, descriptor.cycle)
            }
        }
    }

    fn fixed_day_after(anchor: NaiveDate, day: u32, cycle: Cycle) -> NaiveDate {
        let candidate = clamped_ymd(anchor.year(), anchor.month() as i32, day);
        if candidate > anchor {
            return candidate;
        }
        match cycle {
            Cycle::Monthly => clamped_ymd(anchor.year(), anchor.month() as i32 + 1, day),
            Cycle::Yearly => clamped_ymd(anchor.year() + 1, anchor.month() as i32, day),
        }
    }

    fn contract_based_after(anchor: NaiveDate, start: NaiveDate, cycle: Cycle) -> NaiveDate {
        match cycle {
            Cycle::Monthly => {
                let candidate = clamped_ymd(anchor.year(), anchor.month() as i32, start.day());
                if candidate > anchor {
                    candidate
                } else {
                    clamped_ymd(anchor.year(), anchor.month() as i32 + 1, start.day())
                }
            }
            Cycle::Yearly => {
                let candidate = clamped_ymd(anchor.year(), start.month() as i32, start.day());
                if candidate > anchor {
                    candidate
                } else {
                    clamped_ymd(anchor.year() + 1, start.month() as i32, start.day())
                }
            }
        }
    }
}

/// Builds a date from a possibly out-of-range month and day: the month rolls
/// into adjacent years, the day clamps to the month's last day.
fn clamped_ymd(mut year: i32, mut month: i32, day: u32) -> NaiveDate {
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = day.max(1).min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed(day: u32, cycle: Cycle) -> PaymentDescriptor {
        PaymentDescriptor {
            pattern: BillingPattern::FixedDay { day },
            cycle,
            trial: None,
        }
    }

    fn contract(anchor: NaiveDate, cycle: Cycle) -> PaymentDescriptor {
        PaymentDescriptor {
            pattern: BillingPattern::ContractBased { anchor },
            cycle,
            trial: None,
        }
    }

    #[test]
    fn fixed_day_still_ahead_stays_in_current_month() {
        let next =
            BillingCalculator::next_payment_date(&fixed(15, Cycle::Monthly), sample_date(2024, 3, 10));
        assert_eq!(next, sample_date(2024, 3, 15));
    }

    #[test]
    fn fixed_day_already_passed_rolls_to_next_month() {
        let next =
            BillingCalculator::next_payment_date(&fixed(15, Cycle::Monthly), sample_date(2024, 3, 20));
        assert_eq!(next, sample_date(2024, 4, 15));
    }

    #[test]
    fn fixed_day_on_the_day_itself_rolls_forward() {
        let next =
            BillingCalculator::next_payment_date(&fixed(15, Cycle::Monthly), sample_date(2024, 3, 15));
        assert_eq!(next, sample_date(2024, 4, 15));
    }

    #[test]
    fn fixed_day_december_rolls_into_january() {
        let next =
            BillingCalculator::next_payment_date(&fixed(5, Cycle::Monthly), sample_date(2024, 12, 20));
        assert_eq!(next, sample_date(2025, 1, 5));
    }

    #[test]
    fn fixed_day_yearly_keeps_month_into_next_year() {
        let next =
            BillingCalculator::next_payment_date(&fixed(15, Cycle::Yearly), sample_date(2024, 6, 20));
        assert_eq!(next, sample_date(2025, 6, 15));
    }

    #[test]
    fn fixed_day_31_clamps_in_short_months() {
        let next =
            BillingCalculator::next_payment_date(&fixed(31, Cycle::Monthly), sample_date(2024, 4, 1));
        assert_eq!(next, sample_date(2024, 4, 30));
    }

    #[test]
    fn contract_monthly_clamps_to_february_end() {
        let descriptor = contract(sample_date(2024, 1, 31), Cycle::Monthly);
        let next = BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 2, 15));
        assert_eq!(next, sample_date(2024, 2, 28));
    }

    #[test]
    fn contract_monthly_clamps_to_leap_february_end() {
        let descriptor = contract(sample_date(2023, 1, 31), Cycle::Monthly);
        let next = BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 2, 1));
        assert_eq!(next, sample_date(2024, 2, 29));
    }

    #[test]
    fn contract_monthly_on_clamped_due_date_advances_a_full_month() {
        let descriptor = contract(sample_date(2024, 1, 31), Cycle::Monthly);
        let next = BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 2, 29));
        assert_eq!(next, sample_date(2024, 3, 31));
    }

    #[test]
    fn contract_yearly_uses_anniversary_month_and_day() {
        let descriptor = contract(sample_date(2022, 5, 10), Cycle::Yearly);
        assert_eq!(
            BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 3, 1)),
            sample_date(2024, 5, 10)
        );
        assert_eq!(
            BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 5, 10)),
            sample_date(2025, 5, 10)
        );
    }

    #[test]
    fn trial_in_progress_reports_trial_end_as_next_payment() {
        let mut descriptor = fixed(15, Cycle::Monthly);
        descriptor.trial = Some(TrialWindow::new(14, sample_date(2024, 1, 1)));
        let next = BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 1, 10));
        assert_eq!(next, sample_date(2024, 1, 15));
    }

    #[test]
    fn elapsed_trial_anchors_pattern_search_at_trial_end() {
        let mut descriptor = fixed(15, Cycle::Monthly);
        descriptor.trial = Some(TrialWindow::new(14, sample_date(2024, 1, 1)));
        // Trial ended Jan 15; the first fixed day strictly after that is Feb 15
        // even though today is Jan 20.
        let next = BillingCalculator::next_payment_date(&descriptor, sample_date(2024, 1, 20));
        assert_eq!(next, sample_date(2024, 2, 15));
    }

    #[test]
    fn trial_membership_boundary_is_end_exclusive() {
        let trial = TrialWindow::new(14, sample_date(2024, 1, 1));
        assert!(BillingCalculator::is_in_trial(Some(&trial), sample_date(2024, 1, 14)));
        assert!(!BillingCalculator::is_in_trial(Some(&trial), sample_date(2024, 1, 15)));
        assert!(!BillingCalculator::is_in_trial(None, sample_date(2024, 1, 1)));
    }

    #[test]
    fn trial_days_remaining_counts_to_end_and_goes_negative() {
        let trial = TrialWindow::new(14, sample_date(2024, 1, 1));
        assert_eq!(BillingCalculator::trial_days_remaining(&trial, sample_date(2024, 1, 10)), 5);
        assert_eq!(BillingCalculator::trial_days_remaining(&trial, sample_date(2024, 1, 20)), -5);
    }

    #[test]
    fn days_until_is_zero_on_target_and_negative_after() {
        let target = sample_date(2024, 3, 15);
        assert_eq!(BillingCalculator::days_until(target, sample_date(2024, 3, 10)), 5);
        assert_eq!(BillingCalculator::days_until(target, sample_date(2024, 3, 15)), 0);
        assert_eq!(BillingCalculator::days_until(target, sample_date(2024, 3, 18)), -3);
    }

    #[test]
    fn urgency_thresholds_are_inclusive_in_order() {
        assert_eq!(BillingCalculator::classify_urgency(-1), PaymentUrgency::Critical);
        assert_eq!(BillingCalculator::classify_urgency(3), PaymentUrgency::Critical);
        assert_eq!(BillingCalculator::classify_urgency(4), PaymentUrgency::Soon);
        assert_eq!(BillingCalculator::classify_urgency(7), PaymentUrgency::Soon);
        assert_eq!(BillingCalculator::classify_urgency(8), PaymentUrgency::Normal);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }
}
