//! # Domain Module
//!
//! Contains all business logic for the expense tracker.
//!
//! ## Module Organization
//!
//! - **expense_store**: The ordered expense list and its persistence
//! - **expense_form**: Add/edit form validation and amount parsing
//! - **expense_table**: Formatting expenses for the list view
//! - **models**: The expense record and its persisted form
//!
//! ## Business Rules
//!
//! - Expenses must have non-empty titles and finite amounts
//! - Amounts may be positive or negative
//! - New expenses are appended; edits never move an expense
//! - Every change rewrites the whole persisted list

pub mod expense_form;
pub mod expense_store;
pub mod expense_table;
pub mod models;

pub use expense_form::*;
pub use expense_store::*;
pub use expense_table::*;
