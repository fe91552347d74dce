use crate::{config::FeedConfig, error::InventoryError};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vehicle advertised on the inventory feed.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub monthly_payment: f64,
    pub has_photos: bool,
    pub title: String,
    pub branch: String,
    pub url: String,
    pub photo_url: Option<String>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, £{} per month, {} ({})",
            self.title, self.monthly_payment, self.branch, self.url
        )
    }
}

/// Anything that can list vehicles up to a monthly payment ceiling.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self, max_monthly_payment: f64) -> Result<Vec<Listing>, InventoryError>;
}

/// Listings that qualify for a quote, in feed order: priced at or under
/// `ceiling`, with at least one photo, and no more than `cap` of them.
pub fn select_affordable(listings: &[Listing], ceiling: f64, cap: usize) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| listing.has_photos && listing.monthly_payment <= ceiling)
        .take(cap)
        .cloned()
        .collect()
}

/// The used-car search feed, queried over HTTP.
#[derive(Clone, Debug)]
pub struct HttpListingSource {
    http: reqwest::Client,
    config: FeedConfig,
}

impl HttpListingSource {
    pub fn new(config: FeedConfig) -> Result<Self, InventoryError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listings(&self, max_monthly_payment: f64) -> Result<Vec<Listing>, InventoryError> {
        let endpoint = self.config.search_url();
        let query = [
            ("payment_type", "monthly".to_string()),
            ("min_price", self.config.min_price.to_string()),
            ("max_price", max_monthly_payment.to_string()),
            ("sort_order", "monthly_payment_down".to_string()),
        ];
        debug!("GET {} max_price={}", endpoint, max_monthly_payment);

        let body = self
            .http
            .get(&endpoint)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let listings = parse_search_results(&self.config, &body)?;
        info!("inventory feed returned {} listings", listings.len());
        Ok(listings)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    search_results: Vec<SearchResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    title: Named,
    sales_info: SalesInfo,
    branch: Named,
    url: String,
    #[serde(default)]
    photos: Vec<String>,
}

#[derive(Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct SalesInfo {
    pricing: Pricing,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pricing {
    monthly_payment: Option<f64>,
}

/// Decodes a search response body. Results without a monthly price are dropped.
pub fn parse_search_results(config: &FeedConfig, body: &str) -> Result<Vec<Listing>, InventoryError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .search_results
        .into_iter()
        .filter_map(|result| {
            let monthly_payment = result.sales_info.pricing.monthly_payment?;
            Some(Listing {
                monthly_payment,
                has_photos: !result.photos.is_empty(),
                title: result.title.name,
                branch: result.branch.name,
                url: config.absolute_url(&result.url),
                photo_url: result.photos.into_iter().next(),
            })
        })
        .collect())
}
