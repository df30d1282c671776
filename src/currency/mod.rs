use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::SubscriptionError;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("JPY")
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "JPY" => "¥".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Static fallback rates into the home currency, used when no fresh rate has
/// been recorded. Values mirror the provisional constants the rate feed ships
/// with (JPY per unit).
static FALLBACK_RATES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let mut rates = HashMap::new();
    rates.insert("USD", 150.0);
    rates.insert("EUR", 140.0);
    rates
});

pub fn fallback_rate(code: &str) -> Option<f64> {
    FALLBACK_RATES.get(code).copied()
}

/// A rate recorded by the caller (normally from the external rate feed).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedRate {
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Explicit, injectable rate cache with a TTL. Expired entries read as
/// absent; the cache never fetches anything itself.
#[derive(Debug, Clone)]
pub struct RateCache {
    ttl: Duration,
    entries: HashMap<String, CachedRate>,
}

impl RateCache {
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, code: &str, now: DateTime<Utc>) -> Option<f64> {
        let entry = self.entries.get(code)?;
        if now - entry.fetched_at > self.ttl {
            return None;
        }
        Some(entry.rate)
    }

    pub fn set(&mut self, code: impl Into<String>, rate: f64, now: DateTime<Utc>) {
        self.entries.insert(
            code.into(),
            CachedRate {
                rate,
                fetched_at: now,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(Duration::hours(Self::DEFAULT_TTL_HOURS))
    }
}

/// Where a looked-up rate came from, for disclosure in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Parity,
    Cached,
    Fallback,
}

impl RateSource {
    pub fn label(&self) -> &'static str {
        match self {
            RateSource::Parity => "parity",
            RateSource::Cached => "cached",
            RateSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLookup {
    pub rate: f64,
    pub source: RateSource,
}

/// Rate directory against a single home currency: cache first, static
/// fallback second, error when neither knows the currency.
#[derive(Debug, Clone)]
pub struct RateBook {
    pub home: CurrencyCode,
    cache: RateCache,
}

impl RateBook {
    pub fn new(home: CurrencyCode) -> Self {
        Self {
            home,
            cache: RateCache::default(),
        }
    }

    pub fn with_cache(home: CurrencyCode, cache: RateCache) -> Self {
        Self { home, cache }
    }

    /// Feeds an externally fetched rate into the cache.
    pub fn record(&mut self, code: &CurrencyCode, rate: f64, now: DateTime<Utc>) {
        self.cache.set(code.as_str(), rate, now);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn lookup(
        &self,
        code: &CurrencyCode,
        now: DateTime<Utc>,
    ) -> Result<RateLookup, SubscriptionError> {
        if code.as_str().eq_ignore_ascii_case(self.home.as_str()) {
            return Ok(RateLookup {
                rate: 1.0,
                source: RateSource::Parity,
            });
        }
        if let Some(rate) = self.cache.get(code.as_str(), now) {
            return Ok(RateLookup {
                rate,
                source: RateSource::Cached,
            });
        }
        if let Some(rate) = fallback_rate(code.as_str()) {
            tracing::warn!(currency = code.as_str(), rate, "using fallback exchange rate");
            return Ok(RateLookup {
                rate,
                source: RateSource::Fallback,
            });
        }
        Err(SubscriptionError::RateUnavailable(code.as_str().to_string()))
    }
}
