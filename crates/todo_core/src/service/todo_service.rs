//! Todo use-case service.
//!
//! # Responsibility
//! - Open both repositories over one store.
//! - Forward commands unchanged and expose cross-collection read models.
//!
//! # Invariants
//! - Never writes the store directly; all writes go through repositories.
//! - Read models never repair dangling category references.

use crate::model::category::Category;
use crate::model::task::Task;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use crate::store::KeyValueStore;

/// Tasks grouped under one category, or under none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSection {
    /// `None` for the uncategorized bucket.
    pub category: Option<Category>,
    pub tasks: Vec<Task>,
}

/// Every category in collection order, then the uncategorized bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub sections: Vec<BoardSection>,
}

impl Board {
    pub fn uncategorized(&self) -> &[Task] {
        self.sections
            .last()
            .filter(|section| section.category.is_none())
            .map(|section| section.tasks.as_slice())
            .unwrap_or(&[])
    }
}

pub struct TodoService<S: KeyValueStore + Clone> {
    tasks: TaskRepository<S>,
    categories: CategoryRepository<S>,
}

impl<S: KeyValueStore + Clone> TodoService<S> {
    /// Loads both collections from `store`.
    pub fn open(store: S) -> Self {
        Self {
            tasks: TaskRepository::open(store.clone()),
            categories: CategoryRepository::open(store),
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.snapshot()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.snapshot()
    }

    pub fn reload(&mut self) -> (Vec<Task>, Vec<Category>) {
        (self.tasks.load(), self.categories.load())
    }

    pub fn create_task(&mut self, title: &str, category_id: Option<&str>) -> RepoResult<Vec<Task>> {
        self.tasks.create(title, category_id)
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> RepoResult<Vec<Task>> {
        self.tasks.update(id, title)
    }

    pub fn set_task_category(
        &mut self,
        id: &str,
        category_id: Option<&str>,
    ) -> RepoResult<Vec<Task>> {
        self.tasks.update_category(id, category_id)
    }

    pub fn delete_task(&mut self, id: &str) -> Vec<Task> {
        self.tasks.delete(id)
    }

    pub fn create_category(&mut self, name: &str, color: &str) -> RepoResult<Vec<Category>> {
        self.categories.create(name, color)
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> RepoResult<Vec<Category>> {
        self.categories.update(id, name)
    }

    /// Deletes a category; tasks pointing at it keep the dangling id.
    pub fn delete_category(&mut self, id: &str) -> RepoResult<Vec<Category>> {
        self.categories.delete(id)
    }

    /// Resolves a task's category. `None` when uncategorized or dangling.
    pub fn category_of(&self, task_id: &str) -> Option<Category> {
        let category_id = self.tasks.get(task_id)?.category_id.as_deref()?;
        self.categories.get(category_id).cloned()
    }

    /// Groups tasks by category; dangling references land in uncategorized.
    pub fn board(&self) -> Board {
        let tasks = self.tasks.snapshot();
        let categories = self.categories.snapshot();

        let mut sections: Vec<BoardSection> = categories
            .into_iter()
            .map(|category| BoardSection {
                category: Some(category),
                tasks: Vec::new(),
            })
            .collect();
        let mut uncategorized = Vec::new();

        for task in tasks {
            let slot = task.category_id.as_deref().and_then(|category_id| {
                sections.iter_mut().find(|section| {
                    section
                        .category
                        .as_ref()
                        .is_some_and(|category| category.id == category_id)
                })
            });
            match slot {
                Some(section) => section.tasks.push(task),
                None => uncategorized.push(task),
            }
        }

        sections.push(BoardSection {
            category: None,
            tasks: uncategorized,
        });
        Board { sections }
    }
}
