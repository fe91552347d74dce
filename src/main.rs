use car_finance::{
    config::{FeedConfig, QuoteConfig},
    inventory::{HttpListingSource, ListingSource},
    quote::{request_quote, QuoteOutcome},
    validation::RawQuote,
};
use clap::Parser;
use simple_logger::SimpleLogger;

#[derive(Parser, Debug)]
#[command(name = "car_finance", version, about = "Vehicle finance repayment schedule")]
struct Cli {
    /// Vehicle price
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    price: String,

    /// Deposit paid up front
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    deposit: String,

    /// Delivery date as DD-MM-YYYY
    #[arg(long = "delivery-date", default_value = "")]
    delivery_date: String,

    /// Finance option: oneYear, twoYear or threeYear
    #[arg(long, default_value = "")]
    term: String,

    /// Skip the vehicle search
    #[arg(long)]
    offline: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).env().init()?;

    let config = QuoteConfig::default();
    let source = if cli.offline {
        None
    } else {
        Some(HttpListingSource::new(FeedConfig::from_env()?)?)
    };

    let raw = RawQuote {
        vehicle_price: &cli.price,
        deposit_amount: &cli.deposit,
        delivery_date: &cli.delivery_date,
        finance_option: &cli.term,
    };

    let quote = match request_quote(
        &config,
        &raw,
        source.as_ref().map(|s| s as &dyn ListingSource),
    )
    .await
    {
        QuoteOutcome::Scheduled(quote) => quote,
        QuoteOutcome::Rejected(validation) => {
            eprint!("{}", validation);
            std::process::exit(1);
        }
    };

    let schedule = &quote.schedule;
    println!("{}", schedule.term);
    println!("First payment:    £{}", schedule.first_payment().trunc());
    println!("Standard payment: £{}", schedule.monthly_payment().trunc());
    println!("Final payment:    £{}", schedule.final_payment().trunc());
    println!();
    schedule.show_schedule();

    match quote.vehicles {
        Some(Ok(vehicles)) if vehicles.is_empty() => {
            println!();
            println!("No vehicles found for £{} per month.", schedule.monthly_payment().trunc());
        }
        Some(Ok(vehicles)) => {
            println!();
            for vehicle in vehicles {
                println!("{}", vehicle);
            }
        }
        Some(Err(e)) => eprintln!("vehicle search unavailable: {}", e),
        None => {}
    }

    Ok(())
}

// verifies that quote results can be shared across threads
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<car_finance::schedule::Schedule>();
    is_normal::<car_finance::validation::ValidationResult>();
    is_normal::<car_finance::inventory::Listing>();
}
