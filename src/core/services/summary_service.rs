use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::currency::{CurrencyCode, RateBook, RateSource};
use crate::domain::Subscription;

use super::{ServiceError, ServiceResult};

/// Spend totals for one currency group. Yearly-cycle prices are spread over
/// twelve months before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyBreakdown {
    pub currency: CurrencyCode,
    pub monthly_total: f64,
    pub yearly_total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SpendSummary {
    pub per_currency: Vec<CurrencyBreakdown>,
}

/// Totals converted into the home currency, with per-group rate disclosure.
#[derive(Debug, Clone)]
pub struct ConvertedTotals {
    pub home: CurrencyCode,
    pub monthly_total: f64,
    pub yearly_total: f64,
    pub rate_sources: Vec<(CurrencyCode, f64, RateSource)>,
}

pub struct SummaryService;

impl SummaryService {
    /// Groups subscriptions by currency and totals their normalized spend.
    pub fn summarize(subscriptions: &[Subscription]) -> SpendSummary {
        let mut groups: BTreeMap<String, CurrencyBreakdown> = BTreeMap::new();
        for subscription in subscriptions {
            let entry = groups
                .entry(subscription.currency.as_str().to_string())
                .or_insert_with(|| CurrencyBreakdown {
                    currency: subscription.currency.clone(),
                    monthly_total: 0.0,
                    yearly_total: 0.0,
                    count: 0,
                });
            let monthly = subscription.monthly_price();
            entry.monthly_total += monthly;
            entry.yearly_total += monthly * 12.0;
            entry.count += 1;
        }
        SpendSummary {
            per_currency: groups.into_values().collect(),
        }
    }

    /// Converts every currency group into the rate book's home currency.
    ///
    /// Fails only when a group's currency is unknown to both the cache and
    /// the fallback table; callers decide whether to degrade to the
    /// unconverted summary.
    pub fn summarize_converted(
        subscriptions: &[Subscription],
        rates: &RateBook,
        now: DateTime<Utc>,
    ) -> ServiceResult<ConvertedTotals> {
        let summary = Self::summarize(subscriptions);
        let mut monthly_total = 0.0;
        let mut rate_sources = Vec::new();
        for group in &summary.per_currency {
            let lookup = rates
                .lookup(&group.currency, now)
                .map_err(ServiceError::from)?;
            monthly_total += group.monthly_total * lookup.rate;
            rate_sources.push((group.currency.clone(), lookup.rate, lookup.source));
        }
        Ok(ConvertedTotals {
            home: rates.home.clone(),
            monthly_total,
            yearly_total: monthly_total * 12.0,
            rate_sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cycle;
    use chrono::TimeZone;

    fn sub(name: &str, price: f64, currency: &str, cycle: Cycle) -> Subscription {
        Subscription::new(name, price, CurrencyCode::new(currency), cycle)
    }

    #[test]
    fn summarize_groups_by_currency_and_normalizes_yearly() {
        let subs = vec![
            sub("Music", 980.0, "JPY", Cycle::Monthly),
            sub("Cloud", 12000.0, "JPY", Cycle::Yearly),
            sub("Video", 9.99, "USD", Cycle::Monthly),
        ];
        let summary = SummaryService::summarize(&subs);
        assert_eq!(summary.per_currency.len(), 2);

        let jpy = &summary.per_currency[0];
        assert_eq!(jpy.currency.as_str(), "JPY");
        assert_eq!(jpy.monthly_total, 1980.0);
        assert_eq!(jpy.yearly_total, 23760.0);
        assert_eq!(jpy.count, 2);

        let usd = &summary.per_currency[1];
        assert_eq!(usd.currency.as_str(), "USD");
        assert_eq!(usd.monthly_total, 9.99);
        assert_eq!(usd.count, 1);
    }

    #[test]
    fn empty_store_summarizes_to_nothing() {
        assert!(SummaryService::summarize(&[]).per_currency.is_empty());
    }

    #[test]
    fn converted_totals_use_cached_then_fallback_rates() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let subs = vec![
            sub("Music", 1000.0, "JPY", Cycle::Monthly),
            sub("Video", 10.0, "USD", Cycle::Monthly),
            sub("News", 5.0, "EUR", Cycle::Monthly),
        ];
        let mut rates = RateBook::new(CurrencyCode::new("JPY"));
        rates.record(&CurrencyCode::new("USD"), 151.0, now);

        let totals = SummaryService::summarize_converted(&subs, &rates, now).unwrap();
        // 1000 JPY + 10 USD @ 151 (cached) + 5 EUR @ 140 (fallback)
        assert_eq!(totals.monthly_total, 1000.0 + 1510.0 + 700.0);
        assert_eq!(totals.yearly_total, totals.monthly_total * 12.0);

        let sources: Vec<RateSource> = totals
            .rate_sources
            .iter()
            .map(|(_, _, source)| *source)
            .collect();
        assert_eq!(
            sources,
            vec![RateSource::Fallback, RateSource::Parity, RateSource::Cached]
        );
    }

    #[test]
    fn conversion_fails_for_unknown_currency() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let subs = vec![sub("Odd", 3.0, "CHF", Cycle::Monthly)];
        let rates = RateBook::new(CurrencyCode::new("JPY"));
        assert!(SummaryService::summarize_converted(&subs, &rates, now).is_err());
    }
}
