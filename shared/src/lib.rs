use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a formatted expense for display purposes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedExpense {
    /// Position of the expense in the current list (what `delete` takes)
    pub position: usize,
    pub id: String,
    pub title: String,
    pub formatted_amount: String,
    pub formatted_date: String,
    pub amount_type: AmountType,
    pub raw_amount: f64,
}

/// Type of expense amount for styling and display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum AmountType {
    Positive,
    Negative,
    Zero,
}

/// Date formatting options for the expense table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// "2025-06-13"
    #[default]
    Iso,
    /// "06/13/2025"
    Short,
    /// "June 13, 2025"
    Long,
}

/// Form validation result for the add/edit expense form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseFormValidation {
    pub is_valid: bool,
    pub errors: Vec<ExpenseValidationError>,
    /// Trimmed title, present only when the title passed validation
    pub cleaned_title: Option<String>,
    /// Parsed amount, present only when the amount passed validation
    pub cleaned_amount: Option<f64>,
}

/// Specific validation errors for the expense form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExpenseValidationError {
    EmptyTitle,
    TitleTooLong(usize),
    EmptyAmount,
    InvalidAmountFormat(String),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseValidationError::EmptyTitle => write!(f, "Title cannot be empty"),
            ExpenseValidationError::TitleTooLong(len) => {
                write!(f, "Title is too long ({} characters)", len)
            }
            ExpenseValidationError::EmptyAmount => write!(f, "Amount cannot be empty"),
            ExpenseValidationError::InvalidAmountFormat(reason) => {
                write!(f, "Amount is not a valid number: {}", reason)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

impl ExpenseFormValidation {
    /// Join all error messages into a single line for display
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
