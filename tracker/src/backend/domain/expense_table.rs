//! Expense table domain logic for the expense tracker.
//!
//! Turns raw expense records into formatted rows for the list view. Amounts are
//! shown with the configured currency symbol and two decimals, dates in the
//! configured format. Dates are displayed in UTC, the zone they are stored in.

use chrono::{DateTime, Utc};
use shared::{AmountType, DateFormat, FormattedExpense};

use crate::backend::config::TrackerConfig;
use crate::backend::domain::models::expense::ExpenseRecord;

/// Expense table service that handles all table formatting
#[derive(Debug, Clone)]
pub struct ExpenseTableService {
    currency_symbol: String,
    date_format: DateFormat,
}

impl ExpenseTableService {
    pub fn new() -> Self {
        Self::from_config(&TrackerConfig::default())
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            date_format: config.date_format,
        }
    }

    /// Format a list of expenses for table display
    pub fn format_expenses_for_table(&self, expenses: &[ExpenseRecord]) -> Vec<FormattedExpense> {
        expenses
            .iter()
            .enumerate()
            .map(|(position, expense)| self.format_single_expense(position, expense))
            .collect()
    }

    pub fn format_single_expense(&self, position: usize, expense: &ExpenseRecord) -> FormattedExpense {
        FormattedExpense {
            position,
            id: expense.id.clone(),
            title: expense.title.clone(),
            formatted_amount: self.format_amount(expense.amount),
            formatted_date: self.format_date(&expense.date),
            amount_type: Self::classify_amount(expense.amount),
            raw_amount: expense.amount,
        }
    }

    /// Format an amount as e.g. "$12.99" or "-$5.00"
    pub fn format_amount(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{}{}{:.2}", sign, self.currency_symbol, amount.abs())
    }

    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        match self.date_format {
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
            DateFormat::Short => date.format("%m/%d/%Y").to_string(),
            DateFormat::Long => date.format("%B %-d, %Y").to_string(),
        }
    }

    pub fn classify_amount(amount: f64) -> AmountType {
        if amount > 0.0 {
            AmountType::Positive
        } else if amount < 0.0 {
            AmountType::Negative
        } else {
            AmountType::Zero
        }
    }
}

impl Default for ExpenseTableService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service_with(date_format: DateFormat) -> ExpenseTableService {
        let config = TrackerConfig {
            date_format,
            ..TrackerConfig::default()
        };
        ExpenseTableService::from_config(&config)
    }

    #[test]
    fn test_format_amount() {
        let service = ExpenseTableService::new();
        assert_eq!(service.format_amount(12.99), "$12.99");
        assert_eq!(service.format_amount(3.5), "$3.50");
        assert_eq!(service.format_amount(-5.0), "-$5.00");
        assert_eq!(service.format_amount(0.0), "$0.00");
    }

    #[test]
    fn test_format_date_variants() {
        let date = Utc.with_ymd_and_hms(2025, 6, 3, 14, 0, 0).unwrap();

        assert_eq!(service_with(DateFormat::Iso).format_date(&date), "2025-06-03");
        assert_eq!(service_with(DateFormat::Short).format_date(&date), "06/03/2025");
        assert_eq!(service_with(DateFormat::Long).format_date(&date), "June 3, 2025");
    }

    #[test]
    fn test_format_expenses_for_table() {
        let service = ExpenseTableService::new();
        let date = Utc.with_ymd_and_hms(2025, 6, 13, 9, 0, 0).unwrap();
        let expenses = vec![
            ExpenseRecord { id: "a".into(), title: "Coffee".into(), amount: 3.5, date },
            ExpenseRecord { id: "b".into(), title: "Refund".into(), amount: -2.0, date },
        ];

        let rows = service.format_expenses_for_table(&expenses);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, 0);
        assert_eq!(rows[0].formatted_amount, "$3.50");
        assert_eq!(rows[0].amount_type, AmountType::Positive);
        assert_eq!(rows[1].position, 1);
        assert_eq!(rows[1].id, "b");
        assert_eq!(rows[1].amount_type, AmountType::Negative);
        assert_eq!(rows[1].formatted_date, "2025-06-13");
    }

    #[test]
    fn test_classify_zero() {
        assert_eq!(ExpenseTableService::classify_amount(0.0), AmountType::Zero);
    }
}
