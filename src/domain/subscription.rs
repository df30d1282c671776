use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::billing::{BillingPattern, PaymentDescriptor};
use crate::currency::CurrencyCode;
use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::errors::SubscriptionError;

/// How often a subscription charges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Cycle {
    Monthly,
    Yearly,
}

/// Stored billing-pattern discriminator. `FixedDay` and `ContractBased`
/// require their companion fields on the record; `None` means the user never
/// configured payment scheduling and no payment info should be shown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPattern {
    FixedDay,
    ContractBased,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Music,
    Software,
    Gaming,
    Entertainment,
    News,
    Productivity,
    Cloud,
    Other,
    #[default]
    Uncategorized,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Music => "Music",
            Category::Software => "Software",
            Category::Gaming => "Gaming",
            Category::Entertainment => "Entertainment",
            Category::News => "News",
            Category::Productivity => "Productivity",
            Category::Cloud => "Cloud",
            Category::Other => "Other",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

/// Free-trial window during which no charge occurs. The end boundary is
/// exclusive: the subscription is in trial strictly before
/// `start_date + period_days`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrialWindow {
    pub period_days: u32,
    pub start_date: NaiveDate,
}

impl TrialWindow {
    pub fn new(period_days: u32, start_date: NaiveDate) -> Self {
        Self {
            period_days,
            start_date,
        }
    }

    /// First day on which the trial no longer applies.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(self.period_days as i64)
    }
}

/// Persisted subscription record. Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub currency: CurrencyCode,
    pub cycle: Cycle,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_pattern: PaymentPattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial: Option<TrialWindow>,
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        currency: CurrencyCode,
        cycle: Cycle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            currency,
            cycle,
            category: Category::default(),
            payment_start_date: None,
            payment_pattern: PaymentPattern::None,
            payment_day: None,
            trial: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_fixed_day(mut self, day: u32) -> Self {
        self.payment_pattern = PaymentPattern::FixedDay;
        self.payment_day = Some(day);
        self
    }

    pub fn with_contract_start(mut self, start: NaiveDate) -> Self {
        self.payment_pattern = PaymentPattern::ContractBased;
        self.payment_start_date = Some(start);
        self
    }

    pub fn with_trial(mut self, trial: TrialWindow) -> Self {
        self.trial = Some(trial);
        self
    }

    /// Price normalized to one month (yearly prices are spread over twelve).
    pub fn monthly_price(&self) -> f64 {
        match self.cycle {
            Cycle::Monthly => self.price,
            Cycle::Yearly => self.price / 12.0,
        }
    }

    pub fn yearly_price(&self) -> f64 {
        self.monthly_price() * 12.0
    }

    /// Projects the stored billing fields into a calculator descriptor.
    ///
    /// Returns `Ok(None)` when no pattern is configured; returns a named
    /// configuration error when the stored discriminator promises a field the
    /// record does not carry, rather than silently defaulting.
    pub fn payment_descriptor(&self) -> Result<Option<PaymentDescriptor>, SubscriptionError> {
        let pattern = match self.payment_pattern {
            PaymentPattern::None => return Ok(None),
            PaymentPattern::FixedDay => {
                let day = self
                    .payment_day
                    .ok_or(SubscriptionError::MissingPaymentDay)?;
                BillingPattern::FixedDay { day }
            }
            PaymentPattern::ContractBased => {
                let anchor = self
                    .payment_start_date
                    .ok_or(SubscriptionError::MissingContractDate)?;
                BillingPattern::ContractBased { anchor }
            }
        };
        Ok(Some(PaymentDescriptor {
            pattern,
            cycle: self.cycle,
            trial: self.trial.clone(),
        }))
    }
}

impl Identifiable for Subscription {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Subscription {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Subscription {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.currency.as_str())
    }
}
