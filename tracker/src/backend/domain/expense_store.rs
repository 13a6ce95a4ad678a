//! Expense store domain logic for the expense tracker.
//!
//! `ExpenseStore` is the sole owner of the ordered expense list. Every mutation
//! follows the same steps: validate the input, build the next list, persist the
//! whole list under [`EXPENSES_KEY`], and only then make it the current list.
//! A failed write therefore leaves both memory and storage as they were.

use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::backend::domain::models::expense::{
    decode_expense_list, encode_expense_list, ExpenseRecord, NewExpense,
};
use crate::backend::storage::KeyValueStorage;

/// Key the full expense list is stored under
pub const EXPENSES_KEY: &str = "Expenses";

/// Key an unreadable expense list is copied to before it can be overwritten
pub const CORRUPT_BACKUP_KEY: &str = "Expenses.corrupt";

/// Outcome of reading the persisted list when the store was constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was stored yet
    Empty,
    /// A valid list with this many records was restored
    Loaded(usize),
    /// Stored data could not be read; the store started empty
    Recovered,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Expense title cannot be empty")]
    EmptyTitle,

    #[error("Expense amount must be a finite number, got {0}")]
    InvalidAmount(f64),

    #[error("An expense with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Position {index} is out of range for a list of {len} expenses")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to serialize expenses: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist expenses: {0:#}")]
    Storage(anyhow::Error),

    #[error("Saved expenses could not be read or backed up; refusing to overwrite them")]
    UnreadableData,
}

pub struct ExpenseStore<S: KeyValueStorage> {
    storage: S,
    expenses: Vec<ExpenseRecord>,
    load_status: LoadStatus,
    /// Set when unreadable data is still under EXPENSES_KEY with no backup
    overwrite_blocked: bool,
}

impl<S: KeyValueStorage> ExpenseStore<S> {
    /// Construct the store and restore the persisted list, if any.
    ///
    /// Unreadable data never fails construction: the store starts empty and
    /// [`load_status`](Self::load_status) reports [`LoadStatus::Recovered`].
    /// The unreadable value is first copied to [`CORRUPT_BACKUP_KEY`]; if that
    /// copy fails, every mutation returns [`StoreError::UnreadableData`].
    pub fn load(storage: S) -> Self {
        let (expenses, load_status) = Self::read_persisted(&storage);
        let overwrite_blocked =
            load_status == LoadStatus::Recovered && !Self::keep_unreadable(&storage);
        info!("Expense store ready with {} expenses ({:?})", expenses.len(), load_status);
        Self {
            storage,
            expenses,
            load_status,
            overwrite_blocked,
        }
    }

    fn read_persisted(storage: &S) -> (Vec<ExpenseRecord>, LoadStatus) {
        let blob = match storage.get(EXPENSES_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("No persisted expenses found");
                return (Vec::new(), LoadStatus::Empty);
            }
            Err(e) => {
                warn!("Failed to read persisted expenses, starting empty: {:#}", e);
                return (Vec::new(), LoadStatus::Recovered);
            }
        };

        match decode_expense_list(&blob) {
            Ok(records) => {
                let expenses = Self::drop_duplicate_ids(records);
                let count = expenses.len();
                (expenses, LoadStatus::Loaded(count))
            }
            Err(e) => {
                warn!("Persisted expenses are malformed, starting empty: {}", e);
                (Vec::new(), LoadStatus::Recovered)
            }
        }
    }

    /// Copy the unreadable value aside. Returns true when nothing is left at
    /// risk of being overwritten.
    fn keep_unreadable(storage: &S) -> bool {
        match storage.backup(EXPENSES_KEY, CORRUPT_BACKUP_KEY) {
            Ok(true) => {
                warn!("Kept unreadable expenses under '{}'", CORRUPT_BACKUP_KEY);
                true
            }
            Ok(false) => true,
            Err(e) => {
                error!("Failed to back up unreadable expenses, changes will not be saved: {:#}", e);
                false
            }
        }
    }

    fn drop_duplicate_ids(records: Vec<ExpenseRecord>) -> Vec<ExpenseRecord> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .filter(|record| {
                let first = seen.insert(record.id.clone());
                if !first {
                    warn!("Dropping persisted expense with duplicate id '{}'", record.id);
                }
                first
            })
            .collect()
    }

    /// Current ordered list of expenses
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// True when unreadable data could not be backed up and mutations are refused
    pub fn is_write_protected(&self) -> bool {
        self.overwrite_blocked
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|record| record.id == id)
    }

    /// Position of the first expense with the given id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.expenses.iter().position(|record| record.id == id)
    }

    pub fn total_amount(&self) -> f64 {
        self.expenses.iter().map(|record| record.amount).sum()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Append a new expense with a fresh id, dated now
    pub fn add(&mut self, title: &str, amount: f64) -> Result<&ExpenseRecord, StoreError> {
        self.add_expense(NewExpense::new(title, amount))
    }

    /// Append a new expense, honouring a caller-supplied id and date
    pub fn add_expense(&mut self, new_expense: NewExpense) -> Result<&ExpenseRecord, StoreError> {
        let title = validate_title(&new_expense.title)?;
        validate_amount(new_expense.amount)?;

        let id = match new_expense.id {
            Some(id) if self.position_of(&id).is_some() => return Err(StoreError::DuplicateId(id)),
            Some(id) => id,
            None => ExpenseRecord::generate_id(),
        };

        let record = ExpenseRecord {
            id,
            title,
            amount: new_expense.amount,
            date: new_expense.date.unwrap_or_else(Utc::now),
        };

        let mut next = self.expenses.clone();
        next.push(record);
        self.commit(next)?;

        let added = &self.expenses[self.expenses.len() - 1];
        info!("Added expense '{}' ({}) with id {}", added.title, added.amount, added.id);
        Ok(added)
    }

    /// Replace the title and amount of the expense with `target_id`.
    ///
    /// The title and amount are validated before the id is looked up, so
    /// invalid input is an error even when no expense has that id. With valid
    /// input and an unknown id this returns false without touching storage.
    pub fn update(&mut self, target_id: &str, title: &str, amount: f64) -> Result<bool, StoreError> {
        let title = validate_title(title)?;
        validate_amount(amount)?;

        let Some(position) = self.position_of(target_id) else {
            debug!("Update ignored: no expense with id {}", target_id);
            return Ok(false);
        };

        let mut next = self.expenses.clone();
        let record = &mut next[position];
        record.title = title;
        record.amount = amount;
        self.commit(next)?;

        info!("Updated expense {} at position {}", target_id, position);
        Ok(true)
    }

    /// Remove the expenses at the given positions of the current list.
    ///
    /// Duplicate positions count once. If any position is out of range nothing
    /// is removed. Returns the number of expenses removed.
    pub fn remove(&mut self, indices: &[usize]) -> Result<usize, StoreError> {
        let len = self.expenses.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(StoreError::IndexOutOfRange { index, len });
        }

        let doomed: BTreeSet<usize> = indices.iter().copied().collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        let next = self
            .expenses
            .iter()
            .enumerate()
            .filter(|(position, _)| !doomed.contains(position))
            .map(|(_, record)| record.clone())
            .collect();
        self.commit(next)?;

        info!("Removed {} expenses at positions {:?}", doomed.len(), doomed);
        Ok(doomed.len())
    }

    /// Remove the expense with the given id. Returns false if there was none.
    pub fn remove_by_id(&mut self, id: &str) -> Result<bool, StoreError> {
        match self.position_of(id) {
            Some(position) => Ok(self.remove(&[position])? == 1),
            None => {
                debug!("Remove ignored: no expense with id {}", id);
                Ok(false)
            }
        }
    }

    fn commit(&mut self, next: Vec<ExpenseRecord>) -> Result<(), StoreError> {
        if self.overwrite_blocked {
            return Err(StoreError::UnreadableData);
        }
        let blob = encode_expense_list(&next)?;
        self.storage
            .set(EXPENSES_KEY, &blob)
            .map_err(StoreError::Storage)?;
        debug!("Persisted {} expenses ({} bytes)", next.len(), blob.len());
        self.expenses = next;
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, StoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64) -> Result<(), StoreError> {
    if !amount.is_finite() {
        return Err(StoreError::InvalidAmount(amount));
    }
    Ok(())
}
