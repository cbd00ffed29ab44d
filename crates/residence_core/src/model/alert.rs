//! Pending notification shown in the page header badge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub message: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
