use serde::{Deserialize, Serialize};

use super::category::Category;

/// A single recorded expense.
///
/// Instances are immutable once read back from the store; the store assigns
/// `id` on insert (a fresh expense carries `id = 0` until then). `timestamp_ms`
/// is milliseconds since epoch and is the sole ordering and bucketing key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    /// Stored category string, resolved through [`Category::from_stored`].
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub timestamp_ms: i64,
}

impl Expense {
    pub fn new(title: impl Into<String>, amount: f64, category: Category, timestamp_ms: i64) -> Self {
        Self {
            id: 0,
            title: title.into(),
            amount,
            category: category.key().to_string(),
            notes: None,
            image_uri: None,
            timestamp_ms,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_image_uri(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri = Some(image_uri.into());
        self
    }

    pub fn resolved_category(&self) -> Category {
        Category::from_stored(&self.category)
    }

    /// Amount as used by aggregation: non-finite or non-positive values
    /// count as zero so a bad record cannot poison a rollup.
    pub fn safe_amount(&self) -> f64 {
        if self.amount.is_finite() && self.amount > 0.0 {
            self.amount
        } else {
            0.0
        }
    }
}
