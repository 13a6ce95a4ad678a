//! Expense form domain logic for the expense tracker.
//!
//! This module contains the business logic behind the add/edit expense form:
//! title validation and amount parsing. The presentation layer runs raw user
//! input through [`ExpenseFormService::validate`] and only calls the store when
//! the form is valid.

use shared::{ExpenseFormValidation, ExpenseValidationError};

use crate::backend::config::TrackerConfig;

/// Expense form service that handles form validation and amount parsing
#[derive(Debug, Clone)]
pub struct ExpenseFormService {
    currency_symbol: String,
    max_title_length: usize,
}

impl ExpenseFormService {
    pub fn new() -> Self {
        Self::from_config(&TrackerConfig::default())
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            max_title_length: config.max_title_length,
        }
    }

    /// Validate the add/edit expense form input
    pub fn validate(&self, title_input: &str, amount_input: &str) -> ExpenseFormValidation {
        let mut errors = Vec::new();

        let title = title_input.trim();
        let title_length = title.chars().count();
        let cleaned_title = if title.is_empty() {
            errors.push(ExpenseValidationError::EmptyTitle);
            None
        } else if title_length > self.max_title_length {
            errors.push(ExpenseValidationError::TitleTooLong(title_length));
            None
        } else {
            Some(title.to_string())
        };

        let cleaned_amount = if amount_input.trim().is_empty() {
            errors.push(ExpenseValidationError::EmptyAmount);
            None
        } else {
            match self.clean_and_parse_amount(amount_input) {
                Ok(amount) => Some(amount),
                Err(parse_error) => {
                    errors.push(ExpenseValidationError::InvalidAmountFormat(parse_error));
                    None
                }
            }
        };

        ExpenseFormValidation {
            is_valid: errors.is_empty(),
            errors,
            cleaned_title,
            cleaned_amount,
        }
    }

    /// Clean and parse amount input string
    ///
    /// Accepts an optional sign, then an optional leading currency symbol, then
    /// a number whose integer part may use commas as thousands separators:
    /// "-$1,250.00". A symbol, comma or space anywhere else is rejected.
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64, String> {
        let trimmed = amount_input.trim();
        let (sign, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let without_symbol = if self.currency_symbol.is_empty() {
            unsigned
        } else {
            unsigned.strip_prefix(self.currency_symbol.as_str()).unwrap_or(unsigned)
        };
        let number = without_symbol.trim_start();

        if number.is_empty() {
            return Err("Empty amount after cleaning".to_string());
        }
        if number.chars().any(char::is_whitespace) {
            return Err(format!("'{}' contains a space inside the number", number));
        }
        if !self.currency_symbol.is_empty() && number.contains(self.currency_symbol.as_str()) {
            return Err(format!(
                "'{}' can only appear before the number",
                self.currency_symbol
            ));
        }

        let digits = strip_thousands_separators(number)?;
        let amount = format!("{}{}", sign, digits)
            .parse::<f64>()
            .map_err(|e| format!("Invalid number format: {}", e))?;

        // "inf" and "NaN" parse as f64 but are not amounts
        if !amount.is_finite() {
            return Err(format!("'{}' is not a finite number", number));
        }

        Ok(amount)
    }
}

/// Remove commas from "1,234,567.89", insisting they group digits by three
fn strip_thousands_separators(number: &str) -> Result<String, String> {
    if !number.contains(',') {
        return Ok(number.to_string());
    }

    let (integer_part, fraction_part) = match number.find('.') {
        Some(dot) => number.split_at(dot),
        None => (number, ""),
    };
    let misplaced = || format!("'{}' has misplaced thousands separators", number);

    if fraction_part.contains(',') {
        return Err(misplaced());
    }

    let mut groups = integer_part.split(',');
    let leading = groups.next().unwrap_or_default();
    let all_digits = |group: &str| group.chars().all(|c| c.is_ascii_digit());
    if leading.is_empty() || leading.len() > 3 || !all_digits(leading) {
        return Err(misplaced());
    }
    let mut cleaned = leading.to_string();
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return Err(misplaced());
        }
        cleaned.push_str(group);
    }

    cleaned.push_str(fraction_part);
    Ok(cleaned)
}

impl Default for ExpenseFormService {
    fn default() -> Self {
        Self::new()
    }
}
