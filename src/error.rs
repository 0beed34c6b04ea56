use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("no additional task can be added")]
    TaskSlotOccupied,

    #[error("invalid time range: {after} is after {before}")]
    InvalidTimeRange {
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("no tax rate for category: {0}")]
    MissingTaxRate(String),

    #[error("internal error: {0}")]
    Internal(String),
}
