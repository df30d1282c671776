use std::{fs, path::Path};

use crate::{domain::Subscription, errors::SubscriptionError};

/// Writes the subscription store to disk atomically by staging to a
/// temporary file.
pub fn save_subscriptions_to_file(
    subscriptions: &[Subscription],
    path: &Path,
) -> Result<(), SubscriptionError> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(subscriptions)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads a subscription store from disk, returning structured errors on
/// failure.
pub fn load_subscriptions_from_file(path: &Path) -> Result<Vec<Subscription>, SubscriptionError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
