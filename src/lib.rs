#![doc(test(attr(deny(warnings))))]

//! Subtrack Core tracks recurring subscription payments: billing-date and
//! trial-period arithmetic, per-currency spend summaries, and a cached
//! exchange-rate lookup that backs conversion into a home currency.

pub mod billing;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subtrack Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
