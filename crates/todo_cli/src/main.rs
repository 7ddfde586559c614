//! CLI driver for the Todo core.
//!
//! # Responsibility
//! - Verify `todo_core` linkage without the Flutter shell.
//! - Drive every repository command against a store file for manual checks.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use todo_core::{open_store, CoreConfig, SqliteKvStore, Task, TodoService};

/// Inspect and edit a Todo store file.
#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Todo store driver")]
struct Cli {
    /// Store file. Defaults to $TODO_DB_PATH or a file in the temp directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print core health and version.
    Ping,
    /// List tasks in insertion order.
    Tasks,
    AddTask {
        title: String,
        #[arg(long)]
        category: Option<String>,
    },
    RenameTask {
        id: String,
        title: String,
    },
    /// Point a task at a category, or clear it when `--category` is omitted.
    SetCategory {
        id: String,
        #[arg(long)]
        category: Option<String>,
    },
    DeleteTask {
        id: String,
    },
    /// List categories; the default one is marked with `*`.
    Categories,
    AddCategory {
        name: String,
        /// Hex or hsl() color. Defaults to the first palette entry.
        #[arg(long, default_value = todo_core::REFERENCE_BLUE)]
        color: String,
    },
    RenameCategory {
        id: String,
        name: String,
    },
    DeleteCategory {
        id: String,
    },
    /// Tasks grouped by category.
    Board,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = CoreConfig::from_env();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        todo_core::init_logging(config.log_level, log_dir)?;
    }

    if matches!(cli.command, Command::Ping) {
        println!("todo_core ping={}", todo_core::ping());
        println!("todo_core version={}", todo_core::core_version());
        return Ok(());
    }

    let db_path = cli.db.unwrap_or(config.db_path);
    let conn = open_store(&db_path)?;
    let store = SqliteKvStore::new(&conn);
    let mut service = TodoService::open(&store);

    match cli.command {
        Command::Ping => {}
        Command::Tasks => print_tasks(&service.tasks()),
        Command::AddTask { title, category } => {
            print_tasks(&service.create_task(&title, category.as_deref())?);
        }
        Command::RenameTask { id, title } => print_tasks(&service.rename_task(&id, &title)?),
        Command::SetCategory { id, category } => {
            print_tasks(&service.set_task_category(&id, category.as_deref())?);
        }
        Command::DeleteTask { id } => print_tasks(&service.delete_task(&id)),
        Command::Categories => print_categories(&service),
        Command::AddCategory { name, color } => {
            service.create_category(&name, &color)?;
            print_categories(&service);
        }
        Command::RenameCategory { id, name } => {
            service.rename_category(&id, &name)?;
            print_categories(&service);
        }
        Command::DeleteCategory { id } => {
            service.delete_category(&id)?;
            print_categories(&service);
        }
        Command::Board => {
            for section in service.board().sections {
                match section.category {
                    Some(category) => println!("== {} ({})", category.name, category.color),
                    None => println!("== Uncategorized"),
                }
                print_tasks(&section.tasks);
            }
        }
    }

    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    for task in tasks {
        match task.category_id.as_deref() {
            Some(category_id) => println!("{}\t{}\t[{}]", task.id, task.title, category_id),
            None => println!("{}\t{}", task.id, task.title),
        }
    }
}

fn print_categories(service: &TodoService<&SqliteKvStore<'_>>) {
    for category in service.categories() {
        let marker = if category.is_default() { "*" } else { " " };
        println!(
            "{marker} {}\t{}\t{}",
            category.id, category.name, category.color
        );
    }
}
