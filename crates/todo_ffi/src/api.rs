//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one function per user action on tasks and categories.
//! - Flatten core results into envelopes with stable error codes.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Every call opens the configured store and only the repository it
//!   touches, runs one command and closes it. Task calls never write the
//!   category collection.
//! - Non-`sync` exports run off the Dart UI isolate and surface as `Future`s.
//!
//! # Error codes
//! `validation`, `not_found`, `protected`, `store_unavailable`.

use log::{error, warn};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_store,
    ping as ping_inner, Category, CategoryRepository, CoreConfig, RepoError, SqliteKvStore, Task,
    TaskRepository, COLOR_OPTIONS,
};

static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Health check for host integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the call with the same arguments is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Palette for the "new category" color picker.
#[flutter_rust_bridge::frb(sync)]
pub fn category_color_options() -> Vec<String> {
    COLOR_OPTIONS.iter().map(|color| (*color).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    /// `None` when uncategorized.
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    pub color: String,
    /// The UI must not offer edit/delete for this entry.
    pub is_default: bool,
}

/// Result envelope for task calls.
///
/// `items` is the current task list, also when the command was rejected.
/// It is empty only when the store could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub ok: bool,
    pub error_code: Option<String>,
    pub message: String,
    pub items: Vec<TaskItem>,
}

/// Result envelope for category calls.
///
/// `items` is the current category list, also when the command was
/// rejected. It is empty only when the store could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoriesResponse {
    pub ok: bool,
    pub error_code: Option<String>,
    pub message: String,
    pub items: Vec<CategoryItem>,
}

pub fn todos_load() -> TasksResponse {
    tasks_call(&store_path(), "todos_load", |repo| Ok(repo.snapshot()))
}

pub fn todo_create(title: String, category_id: Option<String>) -> TasksResponse {
    tasks_call(&store_path(), "todo_create", |repo| {
        repo.create(&title, category_id.as_deref())
    })
}

pub fn todo_update(id: String, title: String) -> TasksResponse {
    tasks_call(&store_path(), "todo_update", |repo| repo.update(&id, &title))
}

pub fn todo_set_category(id: String, category_id: Option<String>) -> TasksResponse {
    tasks_call(&store_path(), "todo_set_category", |repo| {
        repo.update_category(&id, category_id.as_deref())
    })
}

pub fn todo_delete(id: String) -> TasksResponse {
    tasks_call(&store_path(), "todo_delete", |repo| Ok(repo.delete(&id)))
}

pub fn categories_load() -> CategoriesResponse {
    categories_call(&store_path(), "categories_load", |repo| Ok(repo.snapshot()))
}

pub fn category_create(name: String, color: String) -> CategoriesResponse {
    categories_call(&store_path(), "category_create", |repo| {
        repo.create(&name, &color)
    })
}

pub fn category_update(id: String, name: String) -> CategoriesResponse {
    categories_call(&store_path(), "category_update", |repo| repo.update(&id, &name))
}

pub fn category_delete(id: String) -> CategoriesResponse {
    categories_call(&store_path(), "category_delete", |repo| repo.delete(&id))
}

struct CallFailure {
    code: &'static str,
    message: String,
}

impl From<RepoError> for CallFailure {
    fn from(value: RepoError) -> Self {
        let code = match value {
            RepoError::Validation(_) => "validation",
            RepoError::NotFound(_) => "not_found",
            RepoError::Protected(_) => "protected",
        };
        Self {
            code,
            message: value.to_string(),
        }
    }
}

fn store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn with_store<T>(
    path: &Path,
    op: &str,
    f: impl FnOnce(&SqliteKvStore<'_>) -> T,
) -> Result<T, CallFailure> {
    let conn = open_store(path).map_err(|err| {
        error!("event=ffi_call module=ffi status=error op={op} error_code=store_unavailable error={err}");
        CallFailure {
            code: "store_unavailable",
            message: format!("{op} failed: {err}"),
        }
    })?;
    let store = SqliteKvStore::new(&conn);
    Ok(f(&store))
}

fn tasks_call(
    path: &Path,
    op: &str,
    f: impl FnOnce(&mut TaskRepository<&SqliteKvStore<'_>>) -> Result<Vec<Task>, RepoError>,
) -> TasksResponse {
    let outcome = with_store(path, op, |store| {
        let mut repo = TaskRepository::open(store);
        f(&mut repo).map_err(|err| {
            let failure = CallFailure::from(err);
            warn!("event=ffi_call module=ffi status=rejected op={op} error_code={}", failure.code);
            (failure, repo.snapshot())
        })
    });
    match outcome {
        Ok(Ok(tasks)) => TasksResponse {
            ok: true,
            error_code: None,
            message: format!("{} tasks.", tasks.len()),
            items: tasks.into_iter().map(to_task_item).collect(),
        },
        Ok(Err((failure, current))) => tasks_failure(failure, current),
        Err(failure) => tasks_failure(failure, Vec::new()),
    }
}

fn tasks_failure(failure: CallFailure, current: Vec<Task>) -> TasksResponse {
    TasksResponse {
        ok: false,
        error_code: Some(failure.code.to_string()),
        message: failure.message,
        items: current.into_iter().map(to_task_item).collect(),
    }
}

fn categories_call(
    path: &Path,
    op: &str,
    f: impl FnOnce(&mut CategoryRepository<&SqliteKvStore<'_>>) -> Result<Vec<Category>, RepoError>,
) -> CategoriesResponse {
    let outcome = with_store(path, op, |store| {
        let mut repo = CategoryRepository::open(store);
        f(&mut repo).map_err(|err| {
            let failure = CallFailure::from(err);
            warn!("event=ffi_call module=ffi status=rejected op={op} error_code={}", failure.code);
            (failure, repo.snapshot())
        })
    });
    match outcome {
        Ok(Ok(categories)) => CategoriesResponse {
            ok: true,
            error_code: None,
            message: format!("{} categories.", categories.len()),
            items: categories.into_iter().map(to_category_item).collect(),
        },
        Ok(Err((failure, current))) => categories_failure(failure, current),
        Err(failure) => categories_failure(failure, Vec::new()),
    }
}

fn categories_failure(failure: CallFailure, current: Vec<Category>) -> CategoriesResponse {
    CategoriesResponse {
        ok: false,
        error_code: Some(failure.code.to_string()),
        message: failure.message,
        items: current.into_iter().map(to_category_item).collect(),
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id,
        title: task.title,
        category_id: task.category_id,
    }
}

fn to_category_item(category: Category) -> CategoryItem {
    CategoryItem {
        is_default: category.is_default(),
        id: category.id,
        name: category.name,
        color: category.color,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        categories_call, category_color_options, core_version, init_logging, ping, tasks_call,
    };
    use std::path::PathBuf;
    use todo_core::{
        open_store, KeyValueStore, SqliteKvStore, CATEGORIES_KEY, DEFAULT_CATEGORY_ID,
        REFERENCE_BLUE,
    };

    fn scratch_store() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.sqlite3");
        (dir, path)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_dir() {
        assert!(!init_logging("info".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn color_options_start_with_reference_blue() {
        let options = category_color_options();
        assert_eq!(options.len(), 10);
        assert_eq!(options[0], REFERENCE_BLUE);
    }

    #[test]
    fn categories_load_marks_default_entry() {
        let (_dir, path) = scratch_store();
        let response = categories_call(&path, "categories_load", |repo| Ok(repo.snapshot()));

        assert!(response.ok, "{}", response.message);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id, DEFAULT_CATEGORY_ID);
        assert!(response.items[0].is_default);
    }

    #[test]
    fn task_calls_persist_between_opens() {
        let (_dir, path) = scratch_store();
        let created = tasks_call(&path, "todo_create", |repo| repo.create("water plants", None));
        assert!(created.ok, "{}", created.message);

        let loaded = tasks_call(&path, "todos_load", |repo| Ok(repo.snapshot()));
        assert_eq!(loaded.items, created.items);
        assert_eq!(loaded.items[0].title, "water plants");
    }

    #[test]
    fn task_calls_leave_categories_untouched() {
        let (_dir, path) = scratch_store();
        let loaded = tasks_call(&path, "todos_load", |repo| Ok(repo.snapshot()));
        assert!(loaded.ok, "{}", loaded.message);

        let conn = open_store(&path).unwrap();
        let store = SqliteKvStore::new(&conn);
        assert_eq!(store.get(CATEGORIES_KEY).unwrap(), None);
    }

    #[test]
    fn failures_map_to_error_codes() {
        let (_dir, path) = scratch_store();

        let blank = tasks_call(&path, "todo_create", |repo| repo.create(" ", None));
        assert!(!blank.ok);
        assert_eq!(blank.error_code.as_deref(), Some("validation"));

        let missing = tasks_call(&path, "todo_update", |repo| repo.update("missing", "x"));
        assert_eq!(missing.error_code.as_deref(), Some("not_found"));

        let protected = categories_call(&path, "category_delete", |repo| {
            repo.delete(DEFAULT_CATEGORY_ID)
        });
        assert_eq!(protected.error_code.as_deref(), Some("protected"));
    }

    #[test]
    fn rejected_calls_still_return_current_items() {
        let (_dir, path) = scratch_store();
        tasks_call(&path, "todo_create", |repo| repo.create("water plants", None));
        categories_call(&path, "category_create", |repo| repo.create("Home", "#ffa500"));

        let blank = tasks_call(&path, "todo_create", |repo| repo.create("", None));
        assert!(!blank.ok);
        assert_eq!(blank.items.len(), 1);
        assert_eq!(blank.items[0].title, "water plants");

        let protected = categories_call(&path, "category_update", |repo| {
            repo.update(DEFAULT_CATEGORY_ID, "Renamed")
        });
        assert_eq!(protected.error_code.as_deref(), Some("protected"));
        let names: Vec<&str> = protected.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Tasks", "Home"]);
    }

    #[test]
    fn unopenable_store_maps_to_store_unavailable() {
        let (dir, _) = scratch_store();
        let path = dir.path().join("missing-parent").join("todo.sqlite3");

        let response = tasks_call(&path, "todos_load", |repo| Ok(repo.snapshot()));
        assert!(!response.ok);
        assert_eq!(response.error_code.as_deref(), Some("store_unavailable"));
        assert!(response.items.is_empty());
    }
}
