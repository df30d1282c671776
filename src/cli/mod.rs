//! Rendering helpers for the read-only CLI. Everything returns plain strings
//! so the suites can assert on output without a terminal.

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};

use crate::billing::PaymentUrgency;
use crate::core::services::{
    ConvertedTotals, ScheduleService, SpendSummary, SummaryService, UpcomingPayment,
};
use crate::currency::{minor_units_for, symbol_for};
use crate::domain::Subscription;

/// Human phrasing for a day count relative to today.
pub fn format_days_text(days: i64) -> String {
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d < 0 => format!("{} days overdue", -d),
        d => format!("in {} days", d),
    }
}

/// Colours a label by urgency: red within 3 days, yellow within 7, green
/// otherwise.
pub fn urgency_colored(text: &str, urgency: PaymentUrgency) -> ColoredString {
    match urgency {
        PaymentUrgency::Critical => text.red(),
        PaymentUrgency::Soon => text.yellow(),
        PaymentUrgency::Normal => text.green(),
    }
}

/// Renders an amount with its currency symbol, thousands grouping, and the
/// currency's minor units (so JPY renders without decimals).
pub fn format_money(amount: f64, code: &str) -> String {
    let precision = minor_units_for(code) as usize;
    let body = format!("{:.*}", precision, amount.abs());
    let grouped = match body.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_digits(int_part), frac),
        None => group_digits(&body),
    };
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol_for(code), grouped)
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

/// One line per subscription: price, cycle, category, and payment status.
/// Records with broken billing setup render as unavailable instead of
/// failing the listing.
pub fn render_list(subscriptions: &[Subscription], today: NaiveDate) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions registered.".into();
    }
    let mut out = String::new();
    for subscription in subscriptions {
        let price = format_money(subscription.price, subscription.currency.as_str());
        out.push_str(&format!(
            "{}  {} / {:?}  [{}]",
            subscription.name,
            price,
            subscription.cycle,
            subscription.category.label()
        ));
        match ScheduleService::payment_status(subscription, today) {
            Ok(Some(status)) => {
                let days = format_days_text(status.days_until);
                out.push_str(&format!(
                    "  next payment {} ({})",
                    status.next_payment_date,
                    urgency_colored(&days, status.urgency)
                ));
                if let Some(remaining) = status.trial_days_remaining {
                    out.push_str(&format!("  [trial ends {}]", format_days_text(remaining)));
                }
            }
            Ok(None) => {}
            Err(_) => out.push_str("  payment info unavailable"),
        }
        out.push('\n');
    }
    out
}

pub fn render_upcoming(rows: &[UpcomingPayment]) -> String {
    if rows.is_empty() {
        return "No upcoming payments.".into();
    }
    let mut out = String::new();
    for row in rows {
        let days = format_days_text(row.status.days_until);
        out.push_str(&format!(
            "{}  {}  {}\n",
            row.status.next_payment_date,
            row.name,
            urgency_colored(&days, row.status.urgency)
        ));
    }
    out
}

pub fn render_summary(summary: &SpendSummary) -> String {
    if summary.per_currency.is_empty() {
        return "No subscriptions registered.".into();
    }
    let mut out = String::from("Spend summary\n");
    for group in &summary.per_currency {
        let code = group.currency.as_str();
        out.push_str(&format!(
            "{}: monthly {}  yearly {}  ({} subscriptions)\n",
            code,
            format_money(group.monthly_total, code),
            format_money(group.yearly_total, code),
            group.count
        ));
    }
    out
}

pub fn render_converted(totals: &ConvertedTotals) -> String {
    let code = totals.home.as_str();
    let mut out = format!(
        "Converted to {}: monthly {}  yearly {}\n",
        code,
        format_money(totals.monthly_total, code),
        format_money(totals.yearly_total, code)
    );
    for (currency, rate, source) in &totals.rate_sources {
        out.push_str(&format!(
            "  {} @ {} ({})\n",
            currency.as_str(),
            rate,
            source.label()
        ));
    }
    out
}

/// Convenience wrapper used by the bin's `summary` command.
pub fn summary_report(subscriptions: &[Subscription]) -> String {
    render_summary(&SummaryService::summarize(subscriptions))
}
