//! To-do list commands for CLI.

use clap::Subcommand;
use focusflow_core::storage::keys;
use focusflow_core::{Database, Filter, TodoList};
use serde_json::json;

use super::host::print_json;

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a todo at the top of the list
    Add {
        /// Todo title
        title: String,
    },
    /// List todos
    List {
        /// all, active or done
        #[arg(long, default_value = "all")]
        filter: Filter,
    },
    /// Mark done / not done
    Toggle {
        /// Todo ID or unique prefix
        id: String,
    },
    /// Rename a todo
    Edit {
        /// Todo ID or unique prefix
        id: String,
        /// New title
        title: String,
    },
    /// Delete a todo
    Remove {
        /// Todo ID or unique prefix
        id: String,
    },
    /// Delete all finished todos
    ClearDone,
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut todos: TodoList = db.load_or_default(keys::TODOS)?;

    match action {
        TodoAction::Add { title } => {
            let todo = todos.add(&title)?;
            print_json(todo)?;
        }
        TodoAction::List { filter } => {
            let items: Vec<_> = todos.filtered(filter).collect();
            print_json(&json!({ "items": items, "counts": todos.counts() }))?;
            return Ok(());
        }
        TodoAction::Toggle { id } => {
            let id = todos.resolve(&id)?;
            let done = todos.toggle(id)?;
            print_json(&json!({ "id": id, "done": done }))?;
        }
        TodoAction::Edit { id, title } => {
            let id = todos.resolve(&id)?;
            todos.update(id, &title)?;
            println!("ok");
        }
        TodoAction::Remove { id } => {
            let id = todos.resolve(&id)?;
            let removed = todos.remove(id)?;
            print_json(&removed)?;
        }
        TodoAction::ClearDone => {
            let n = todos.clear_done();
            println!("removed {n}");
        }
    }

    db.save_record(keys::TODOS, &todos)?;
    Ok(())
}
