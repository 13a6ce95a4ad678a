pub mod backend;

pub use backend::{initialize_backend, AppState};
