//! # Backend Module
//!
//! Contains all non-UI logic for the expense tracker application.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (terminal commands)
//!     ↓
//! Domain Layer (expense store, form validation, table formatting)
//!     ↓
//! Storage Layer (key-value persistence)
//! ```
//!
//! [`AppState`] owns one `ExpenseStore` for the whole session; it is built once
//! by [`initialize_backend`] and handed to whatever drives the application.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::backend::config::{resolve_data_directory, TrackerConfig};
use crate::backend::domain::{ExpenseFormService, ExpenseStore, ExpenseTableService};
use crate::backend::storage::{FileKeyValueStore, KeyValueStorage};

/// Main application state that holds the store and services
pub struct AppState<S: KeyValueStorage> {
    pub config: TrackerConfig,
    pub expense_store: ExpenseStore<S>,
    pub form_service: ExpenseFormService,
    pub table_service: ExpenseTableService,
}

impl<S: KeyValueStorage> AppState<S> {
    /// Load the expense store from `storage` and wire up the services
    pub fn new(storage: S, config: TrackerConfig) -> Self {
        let expense_store = ExpenseStore::load(storage);
        let form_service = ExpenseFormService::from_config(&config);
        let table_service = ExpenseTableService::from_config(&config);
        Self {
            config,
            expense_store,
            form_service,
            table_service,
        }
    }
}

/// Initialize the backend on top of the file store in the data directory
pub fn initialize_backend(data_directory: Option<PathBuf>) -> Result<AppState<FileKeyValueStore>> {
    info!("Resolving data directory");
    let data_directory = resolve_data_directory(data_directory)?;

    info!("Loading configuration");
    let config = TrackerConfig::load_or_create(&data_directory)?;

    info!("Setting up storage");
    let storage = FileKeyValueStore::new(&data_directory)?;

    info!("Setting up application state");
    Ok(AppState::new(storage, config))
}
