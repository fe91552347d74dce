use crate::{
    config::QuoteConfig,
    error::InventoryError,
    inventory::{select_affordable, Listing, ListingSource},
    schedule::Schedule,
    validation::{validate, RawQuote, ValidationResult},
};
use log::{info, warn};

/// A schedule together with the vehicles it can afford.
#[derive(Debug)]
pub struct Quote {
    pub schedule: Schedule,
    /// `None` when no inventory source was consulted.
    pub vehicles: Option<Result<Vec<Listing>, InventoryError>>,
}

#[derive(Debug)]
pub enum QuoteOutcome {
    Rejected(ValidationResult),
    Scheduled(Quote),
}

/// Validates the request and, only if it passes, builds its schedule.
pub fn schedule_quote(config: &QuoteConfig, raw: &RawQuote) -> Result<Schedule, ValidationResult> {
    let validation = validate(config, raw);
    match validation.input() {
        Some(input) => Ok(Schedule::new(config, input)),
        None => Err(validation),
    }
}

/// Runs one quote end to end. The inventory source, when given, is asked
/// exactly once with the flat monthly payment as the ceiling.
pub async fn request_quote(
    config: &QuoteConfig,
    raw: &RawQuote<'_>,
    source: Option<&dyn ListingSource>,
) -> QuoteOutcome {
    let schedule = match schedule_quote(config, raw) {
        Ok(schedule) => schedule,
        Err(validation) => return QuoteOutcome::Rejected(validation),
    };

    let vehicles = match source {
        Some(source) => {
            let ceiling = schedule.monthly_payment();
            let fetched = source.fetch_listings(ceiling).await.map(|listings| {
                let selected = select_affordable(&listings, ceiling, config.cars_to_show);
                info!(
                    "{} of {} listings are affordable at {}",
                    selected.len(),
                    listings.len(),
                    ceiling
                );
                selected
            });
            if let Err(e) = &fetched {
                warn!("inventory lookup failed: {}", e);
            }
            Some(fetched)
        }
        None => None,
    };

    QuoteOutcome::Scheduled(Quote { schedule, vehicles })
}

#[cfg(test)]
mod tests {
    use super::{request_quote, schedule_quote, QuoteOutcome};
    use crate::{
        config::QuoteConfig,
        error::InventoryError,
        inventory::{Listing, ListingSource},
        validation::{Field, RawQuote},
    };
    use async_trait::async_trait;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };
    use test_log::test;

    struct StaticSource {
        listings: Vec<Listing>,
        calls: AtomicUsize,
        ceilings: Mutex<Vec<f64>>,
    }

    impl StaticSource {
        fn new(listings: Vec<Listing>) -> Self {
            Self {
                listings,
                calls: AtomicUsize::new(0),
                ceilings: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ListingSource for StaticSource {
        async fn fetch_listings(&self, max_monthly_payment: f64) -> Result<Vec<Listing>, InventoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.ceilings.lock().unwrap().push(max_monthly_payment);
            Ok(self.listings.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl ListingSource for DownSource {
        async fn fetch_listings(&self, _: f64) -> Result<Vec<Listing>, InventoryError> {
            Err(InventoryError::Config("feed offline".to_string()))
        }
    }

    fn car(title: &str, monthly_payment: f64) -> Listing {
        Listing {
            monthly_payment,
            has_photos: true,
            title: title.to_string(),
            branch: "Edinburgh".to_string(),
            url: format!("https://www.arnoldclark.com/{}", title),
            photo_url: Some(format!("https://img.example.com/{}.jpg", title)),
        }
    }

    const VALID: RawQuote<'static> = RawQuote {
        vehicle_price: "10000",
        deposit_amount: "2000",
        delivery_date: "01-01-2024",
        finance_option: "twoYear",
    };

    #[test]
    fn test_schedule_quote_rejects_before_calculating() {
        let rejected = schedule_quote(
            &QuoteConfig::default(),
            &RawQuote {
                deposit_amount: "1000",
                ..VALID
            },
        )
        .unwrap_err();
        assert!(!rejected.status);
        assert_eq!(rejected.errors.len(), 1);
        assert_eq!(rejected.field_errors(Field::DepositAmount).len(), 1);
    }

    #[test(tokio::test)]
    async fn test_quote_queries_inventory_once() {
        let source = StaticSource::new(vec![car("cheap", 199.), car("dear", 400.), car("fair", 333.)]);

        let outcome = request_quote(&QuoteConfig::default(), &VALID, Some(&source)).await;
        let quote = match outcome {
            QuoteOutcome::Scheduled(quote) => quote,
            QuoteOutcome::Rejected(v) => panic!("unexpected rejection: {}", v),
        };

        assert_eq!(quote.schedule.get_pmt_count(), 24);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*source.ceilings.lock().unwrap(), [8000. / 24.]);

        let vehicles = quote.vehicles.unwrap().unwrap();
        let titles: Vec<_> = vehicles.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["cheap", "fair"]);
    }

    #[test(tokio::test)]
    async fn test_rejected_quote_skips_inventory() {
        let source = StaticSource::new(vec![car("cheap", 1.)]);
        let raw = RawQuote {
            delivery_date: "",
            ..VALID
        };

        let outcome = request_quote(&QuoteConfig::default(), &raw, Some(&source)).await;
        assert!(matches!(outcome, QuoteOutcome::Rejected(ref v) if !v.status));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test(tokio::test)]
    async fn test_inventory_failure_keeps_schedule() {
        let outcome = request_quote(&QuoteConfig::default(), &VALID, Some(&DownSource)).await;
        match outcome {
            QuoteOutcome::Scheduled(quote) => {
                assert_eq!(quote.schedule.get_pmt_count(), 24);
                assert!(matches!(quote.vehicles, Some(Err(InventoryError::Config(_)))));
            }
            QuoteOutcome::Rejected(v) => panic!("unexpected rejection: {}", v),
        }
    }

    #[test(tokio::test)]
    async fn test_empty_inventory_and_offline() {
        let empty = StaticSource::new(Vec::new());
        let config = QuoteConfig::default();

        match request_quote(&config, &VALID, Some(&empty)).await {
            QuoteOutcome::Scheduled(quote) => assert!(quote.vehicles.unwrap().unwrap().is_empty()),
            QuoteOutcome::Rejected(v) => panic!("unexpected rejection: {}", v),
        }
        match request_quote(&config, &VALID, None).await {
            QuoteOutcome::Scheduled(quote) => assert!(quote.vehicles.is_none()),
            QuoteOutcome::Rejected(v) => panic!("unexpected rejection: {}", v),
        }
    }
}
