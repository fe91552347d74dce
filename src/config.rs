use crate::error::InventoryError;

const DEFAULT_FEED_BASE_URL: &str = "https://www.arnoldclark.com";
const DEFAULT_FEED_MIN_PRICE: u32 = 100;

/// Business constants shared by the validator and the calculator.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteConfig {
    /// smallest acceptable deposit, as a percentage of the vehicle price
    pub minimum_deposit_percent: f64,
    /// added to the first payment of every schedule
    pub arrangement_fee: f64,
    /// added to the last payment of every schedule
    pub completion_fee: f64,
    /// how many affordable vehicles a quote shows
    pub cars_to_show: usize,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            minimum_deposit_percent: 15.,
            arrangement_fee: 88.,
            completion_fee: 20.,
            cars_to_show: 6,
        }
    }
}

/// Where and how the inventory feed is queried.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedConfig {
    pub base_url: String,
    pub min_price: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_BASE_URL.to_string(),
            min_price: DEFAULT_FEED_MIN_PRICE,
        }
    }
}

impl FeedConfig {
    /// Loads the feed settings from env vars:
    /// - `INVENTORY_BASE_URL`  (default: `https://www.arnoldclark.com`)
    /// - `INVENTORY_MIN_PRICE` (default: `100`)
    pub fn from_env() -> Result<Self, InventoryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InventoryError> {
        let base_url = lookup("INVENTORY_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_FEED_BASE_URL.to_string());
        let min_price = match lookup("INVENTORY_MIN_PRICE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                InventoryError::Config(format!("INVENTORY_MIN_PRICE is not a whole number: {raw}"))
            })?,
            None => DEFAULT_FEED_MIN_PRICE,
        };
        Ok(Self {
            base_url,
            min_price,
        })
    }

    /// The search endpoint, without the query string.
    pub fn search_url(&self) -> String {
        format!("{}/used-cars/search.json", self.base_url)
    }

    /// Turns a site-relative listing path into an absolute link.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}
