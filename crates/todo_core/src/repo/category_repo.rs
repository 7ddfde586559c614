//! Category repository over the `"categories"` key.
//!
//! # Responsibility
//! - Guarantee the default category exists after the first load.
//! - Run the color migration on every load and re-persist healed data.
//!
//! # Invariants
//! - The default category can be neither renamed nor deleted here.
//! - A load that finds nothing to heal performs no write.
//! - Deleting a category never touches tasks that reference it.
//! - After a failed store read, nothing is written until a re-read succeeds.

use super::{read_collection, write_collection, RepoError, RepoResult, StoredCollection};
use crate::model::category::{
    heal_categories, is_default_id, random_hsl_color, validate_name, Category, StoredCategory,
};
use crate::store::KeyValueStore;
use log::{debug, info, warn};

/// Store key holding the serialized category list.
pub const CATEGORIES_KEY: &str = "categories";

/// Owns the category collection and its persisted copy.
pub struct CategoryRepository<S: KeyValueStore> {
    store: S,
    categories: Vec<Category>,
    pick_color: fn() -> String,
    /// Set when the last load could not read the store.
    degraded: bool,
}

impl<S: KeyValueStore> CategoryRepository<S> {
    /// Creates a repository and loads (and heals) the stored categories.
    pub fn open(store: S) -> Self {
        Self::open_with_color_source(store, random_hsl_color)
    }

    /// Like `open`, with a custom color source for migrated records.
    pub fn open_with_color_source(store: S, pick_color: fn() -> String) -> Self {
        let mut repo = Self {
            store,
            categories: Vec::new(),
            pick_color,
            degraded: false,
        };
        repo.load();
        repo
    }

    /// Re-reads stored categories and applies the load-time migration.
    ///
    /// - Absent or empty data seeds and persists the default category.
    /// - Healed data is written back before being returned.
    /// - Undecodable records are skipped; the rest are kept and healed.
    /// - A value that is not a list at all, or a failed read, is served as
    ///   the default category without writing. After a failed read the
    ///   repository stays read-only until a later read succeeds.
    pub fn load(&mut self) -> Vec<Category> {
        let stored = read_collection::<StoredCategory>(&self.store, CATEGORIES_KEY);
        self.degraded = matches!(stored, StoredCollection::ReadFailed);
        let stored = match stored {
            StoredCollection::Records(records) => records,
            StoredCollection::Absent => Vec::new(),
            StoredCollection::Undecodable | StoredCollection::ReadFailed => {
                self.categories = vec![Category::default_category()];
                return self.snapshot();
            }
        };

        let healed = heal_categories(stored, self.pick_color);
        if healed.changed && write_collection(&self.store, CATEGORIES_KEY, &healed.categories) {
            info!(
                "event=categories_migrate module=repo status=ok count={}",
                healed.categories.len()
            );
        }
        self.categories = healed.categories;
        debug!(
            "event=categories_load module=repo status=ok count={}",
            self.categories.len()
        );
        self.snapshot()
    }

    pub fn snapshot(&self) -> Vec<Category> {
        self.categories.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Appends a category with a fresh id.
    ///
    /// # Errors
    /// - `Validation` when `name` or `color` is blank.
    pub fn create(&mut self, name: &str, color: &str) -> RepoResult<Vec<Category>> {
        self.reload_if_degraded();
        let category = Category::create(name, color, |candidate| self.get(candidate).is_some())?;
        let category_id = category.id.clone();

        let mut next = self.categories.clone();
        next.push(category);
        self.commit("category_create", &category_id, next);
        Ok(self.snapshot())
    }

    /// Renames a category in place. Colors are fixed after creation.
    ///
    /// # Errors
    /// - `Protected` for the default category.
    /// - `NotFound` when no category has `id`.
    /// - `Validation` when `name` is blank.
    pub fn update(&mut self, id: &str, name: &str) -> RepoResult<Vec<Category>> {
        if is_default_id(id) {
            return Err(RepoError::Protected(id.to_string()));
        }
        self.reload_if_degraded();
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        validate_name(name)?;

        let mut next = self.categories.clone();
        next[index].name = name.to_string();
        self.commit("category_update", id, next);
        Ok(self.snapshot())
    }

    /// Removes a category. Unknown ids are a no-op that still persists.
    ///
    /// # Errors
    /// - `Protected` for the default category.
    pub fn delete(&mut self, id: &str) -> RepoResult<Vec<Category>> {
        if is_default_id(id) {
            return Err(RepoError::Protected(id.to_string()));
        }
        self.reload_if_degraded();

        let next = self
            .categories
            .iter()
            .filter(|category| category.id != id)
            .cloned()
            .collect();
        self.commit("category_delete", id, next);
        Ok(self.snapshot())
    }

    fn reload_if_degraded(&mut self) {
        if self.degraded {
            self.load();
        }
    }

    fn commit(&mut self, event: &str, category_id: &str, next: Vec<Category>) {
        if self.degraded {
            warn!(
                "event={event} module=repo status=skipped category_id={category_id} reason=store_unreadable"
            );
            return;
        }
        if write_collection(&self.store, CATEGORIES_KEY, &next) {
            self.categories = next;
            info!(
                "event={} module=repo status=ok category_id={} count={}",
                event,
                category_id,
                self.categories.len()
            );
        } else {
            warn!(
                "event={event} module=repo status=skipped category_id={category_id} reason=not_persisted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryRepository, CATEGORIES_KEY};
    use crate::model::category::{DEFAULT_CATEGORY_ID, REFERENCE_BLUE};
    use crate::store::MemoryKvStore;

    #[test]
    fn unreadable_store_serves_default_without_writing() {
        let store = MemoryKvStore::with_entry(CATEGORIES_KEY, "[{\"broken\":");
        let repo = CategoryRepository::open(&store);

        let categories = repo.snapshot();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, DEFAULT_CATEGORY_ID);
        assert_eq!(categories[0].color, REFERENCE_BLUE);
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.raw(CATEGORIES_KEY).as_deref(), Some("[{\"broken\":"));
    }

    #[test]
    fn color_source_is_used_for_migrated_records() {
        let store = MemoryKvStore::with_entry(CATEGORIES_KEY, r#"[{"id":"a","name":"A"}]"#);
        let repo = CategoryRepository::open_with_color_source(&store, || "#123456".to_string());

        assert_eq!(repo.get("a").unwrap().color, "#123456");
    }
}
