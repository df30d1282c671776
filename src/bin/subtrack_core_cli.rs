use std::{env, path::PathBuf, process};

use chrono::{Local, Utc};
use subtrack_core::{
    cli,
    config::{Config, ConfigManager},
    core::services::{ScheduleService, ServiceError, SummaryService},
    currency::{CurrencyCode, RateBook},
    domain::{Cycle, Subscription},
    init,
    utils::persistence,
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config();
    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    match command.as_str() {
        "new" => {
            let (name, price, currency, cycle) = match (
                args.next(),
                args.next(),
                args.next(),
                args.next(),
            ) {
                (Some(name), Some(price), Some(currency), Some(cycle)) => {
                    (name, price, currency, cycle)
                }
                _ => {
                    print_usage();
                    process::exit(1);
                }
            };
            let price: f64 = price.parse()?;
            let cycle = match cycle.as_str() {
                "monthly" => Cycle::Monthly,
                "yearly" => Cycle::Yearly,
                other => {
                    return Err(
                        ServiceError::Invalid(format!("unknown cycle `{other}`")).into(),
                    )
                }
            };
            let subscription =
                Subscription::new(name, price, CurrencyCode::new(currency), cycle);
            println!("{}", serde_json::to_string_pretty(&subscription)?);
        }
        "list" => {
            let subscriptions = load_store(args.next(), &config)?;
            let today = Local::now().date_naive();
            print!("{}", cli::render_list(&subscriptions, today));
        }
        "upcoming" => {
            let subscriptions = load_store(args.next(), &config)?;
            let today = Local::now().date_naive();
            let rows = ScheduleService::upcoming(&subscriptions, today);
            print!("{}", cli::render_upcoming(&rows));
        }
        "summary" => {
            let subscriptions = load_store(args.next(), &config)?;
            print!("{}", cli::summary_report(&subscriptions));
            let home = args.next().unwrap_or_else(|| config.home_currency.clone());
            let rates = RateBook::new(CurrencyCode::new(home));
            match SummaryService::summarize_converted(&subscriptions, &rates, Utc::now()) {
                Ok(totals) => print!("{}", cli::render_converted(&totals)),
                Err(err) => println!(
                    "Conversion to {} unavailable: {err}",
                    rates.home.as_str()
                ),
            }
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

/// Stored config backs the defaults below; an unreadable config degrades to
/// the built-in defaults rather than blocking read-only commands.
fn load_config() -> Config {
    ConfigManager::new()
        .and_then(|manager| manager.load())
        .unwrap_or_default()
}

fn load_store(
    arg: Option<String>,
    config: &Config,
) -> Result<Vec<Subscription>, Box<dyn std::error::Error>> {
    let path = arg
        .map(PathBuf::from)
        .or_else(|| config.data_file.clone())
        .unwrap_or_else(subtrack_core::utils::default_store_path);
    Ok(persistence::load_subscriptions_from_file(&path)?)
}

fn print_usage() {
    eprintln!(
        "Usage: subtrack_core_cli <command>\n\
         Commands:\n  \
         new <name> <price> <currency> <monthly|yearly>\n  \
         list [file.json]\n  \
         upcoming [file.json]\n  \
         summary [file.json] [home-currency]"
    );
}
