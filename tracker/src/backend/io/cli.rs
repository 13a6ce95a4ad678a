//! Terminal commands for the expense tracker.
//!
//! Each command validates raw input with the form service before it reaches
//! the store, then prints its result to the given writer.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::backend::domain::ExpenseFormService;
use crate::backend::storage::KeyValueStorage;
use crate::backend::AppState;

#[derive(Debug, Parser)]
#[command(name = "expense-tracker", version, about = "Keep track of your expenses")]
pub struct Cli {
    /// Directory holding the expense data and config.yaml
    #[arg(long, env = "EXPENSE_TRACKER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Show all expenses (default)
    List,
    /// Add a new expense
    Add {
        title: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Change the title and amount of an expense
    Edit {
        id: String,
        title: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Delete expenses by list position, or one expense by id
    Delete {
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        positions: Vec<usize>,
        #[arg(long)]
        id: Option<String>,
    },
}

/// Run a single command against the application state
pub fn execute<S: KeyValueStorage, W: Write>(
    state: &mut AppState<S>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::List => render_list(state, out),
        Command::Add { title, amount } => {
            let (title, amount) = validated_input(&state.form_service, &title, &amount)?;
            let record = state.expense_store.add(&title, amount)?;
            writeln!(
                out,
                "Added '{}' ({}) with id {}",
                record.title,
                state.table_service.format_amount(record.amount),
                record.id
            )?;
            Ok(())
        }
        Command::Edit { id, title, amount } => {
            let (title, amount) = validated_input(&state.form_service, &title, &amount)?;
            if !state.expense_store.update(&id, &title, amount)? {
                bail!("No expense with id {}", id);
            }
            writeln!(out, "Updated expense {}", id)?;
            Ok(())
        }
        Command::Delete { positions, id } => {
            if let Some(id) = id {
                if !state.expense_store.remove_by_id(&id)? {
                    bail!("No expense with id {}", id);
                }
                writeln!(out, "Deleted expense {}", id)?;
            } else {
                let removed = state.expense_store.remove(&positions)?;
                writeln!(out, "Deleted {} expense(s)", removed)?;
            }
            Ok(())
        }
    }
}

fn validated_input(form: &ExpenseFormService, title: &str, amount: &str) -> Result<(String, f64)> {
    let validation = form.validate(title, amount);
    if !validation.is_valid {
        bail!("Invalid expense: {}", validation.error_summary());
    }

    let title = validation
        .cleaned_title
        .context("Validated form is missing its title")?;
    let amount = validation
        .cleaned_amount
        .context("Validated form is missing its amount")?;
    Ok((title, amount))
}

fn render_list<S: KeyValueStorage, W: Write>(state: &AppState<S>, out: &mut W) -> Result<()> {
    let store = &state.expense_store;
    if store.is_empty() {
        writeln!(out, "No expenses yet.")?;
        return Ok(());
    }

    writeln!(out, "{:>3}  {:<30}  {:>12}  {:<18}  {}", "#", "Title", "Amount", "Date", "Id")?;
    for row in state.table_service.format_expenses_for_table(store.expenses()) {
        writeln!(
            out,
            "{:>3}  {:<30}  {:>12}  {:<18}  {}",
            row.position, row.title, row.formatted_amount, row.formatted_date, row.id
        )?;
    }
    writeln!(
        out,
        "Total: {} across {} expense(s)",
        state.table_service.format_amount(store.total_amount()),
        store.len()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::TrackerConfig;
    use crate::backend::storage::InMemoryKeyValueStore;

    fn setup_test_state() -> AppState<InMemoryKeyValueStore> {
        AppState::new(InMemoryKeyValueStore::new(), TrackerConfig::default())
    }

    fn run(state: &mut AppState<InMemoryKeyValueStore>, command: Command) -> Result<String> {
        let mut out = Vec::new();
        execute(state, command, &mut out)?;
        Ok(String::from_utf8(out).expect("output is utf-8"))
    }

    fn add(title: &str, amount: &str) -> Command {
        Command::Add {
            title: title.to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["expense-tracker", "add", "Coffee", "3.50"]).unwrap();
        assert_eq!(cli.command, Some(add("Coffee", "3.50")));

        let cli = Cli::try_parse_from(["expense-tracker", "add", "Refund", "-4"]).unwrap();
        assert_eq!(cli.command, Some(add("Refund", "-4")));

        let cli = Cli::try_parse_from(["expense-tracker", "delete", "0", "2"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Delete {
                positions: vec![0, 2],
                id: None
            })
        );

        let cli = Cli::try_parse_from(["expense-tracker", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_delete_requires_target() {
        assert!(Cli::try_parse_from(["expense-tracker", "delete"]).is_err());
        assert!(Cli::try_parse_from(["expense-tracker", "delete", "1", "--id", "x"]).is_err());
    }

    #[test]
    fn test_list_empty() {
        let mut state = setup_test_state();
        assert_eq!(run(&mut state, Command::List).unwrap(), "No expenses yet.\n");
    }

    #[test]
    fn test_add_edit_delete_flow() {
        let mut state = setup_test_state();

        let output = run(&mut state, add("Coffee", "$3.50")).unwrap();
        assert!(output.starts_with("Added 'Coffee' ($3.50) with id "));
        run(&mut state, add("Book", "12.99")).unwrap();

        let coffee_id = state.expense_store.expenses()[0].id.clone();
        let output = run(
            &mut state,
            Command::Edit {
                id: coffee_id.clone(),
                title: "Tea".to_string(),
                amount: "4".to_string(),
            },
        )
        .unwrap();
        assert_eq!(output, format!("Updated expense {}\n", coffee_id));

        let listing = run(&mut state, Command::List).unwrap();
        assert!(listing.contains("Tea"));
        assert!(listing.contains("$12.99"));
        assert!(listing.contains("Total: $16.99 across 2 expense(s)"));

        let output = run(
            &mut state,
            Command::Delete {
                positions: vec![0],
                id: None,
            },
        )
        .unwrap();
        assert_eq!(output, "Deleted 1 expense(s)\n");
        assert_eq!(state.expense_store.expenses()[0].title, "Book");
    }

    #[test]
    fn test_invalid_input_never_reaches_store() {
        let mut state = setup_test_state();

        let err = run(&mut state, add("", "abc")).unwrap_err();
        assert!(err.to_string().contains("Title cannot be empty"));
        assert!(state.expense_store.is_empty());
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let mut state = setup_test_state();
        run(&mut state, add("Coffee", "3.50")).unwrap();

        let edit = Command::Edit {
            id: "missing".to_string(),
            title: "Tea".to_string(),
            amount: "4".to_string(),
        };
        assert!(run(&mut state, edit).is_err());

        let delete = Command::Delete {
            positions: Vec::new(),
            id: Some("missing".to_string()),
        };
        assert!(run(&mut state, delete).unwrap_err().to_string().contains("missing"));
        assert_eq!(state.expense_store.len(), 1);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut state = setup_test_state();
        run(&mut state, add("Coffee", "3.50")).unwrap();

        let delete = Command::Delete {
            positions: vec![5],
            id: None,
        };
        assert!(run(&mut state, delete).is_err());
        assert_eq!(state.expense_store.len(), 1);
    }
}
