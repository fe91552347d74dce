use thiserror::Error;

/// Failures of the inventory feed. These never affect the schedule itself.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inventory response is malformed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("inventory configuration error: {0}")]
    Config(String),
}
