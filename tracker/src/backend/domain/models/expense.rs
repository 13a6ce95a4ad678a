//! Domain model for an expense record.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single expense entry
///
/// Serialized field-by-field (`id`, `title`, `amount`, `date`) with `date` as an
/// RFC 3339 UTC timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique id, fixed at creation
    pub id: String,
    pub title: String,
    pub amount: f64,
    /// Fixed at creation
    pub date: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Generate a fresh unique expense id (UUID v4)
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Input for creating a new expense.
///
/// `id` and `date` default to a fresh UUID and the current time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub id: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(title: impl Into<String>, amount: f64) -> Self {
        Self {
            title: title.into(),
            amount,
            id: None,
            date: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Serialize a full expense list into the persisted blob format
pub fn encode_expense_list(expenses: &[ExpenseRecord]) -> serde_json::Result<String> {
    serde_json::to_string(expenses)
}

/// Parse a persisted blob back into an expense list
pub fn decode_expense_list(blob: &str) -> serde_json::Result<Vec<ExpenseRecord>> {
    serde_json::from_str(blob)
}
