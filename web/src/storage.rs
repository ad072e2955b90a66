use bingo_core::{STORAGE_KEY, StateStore};
use gloo::storage::{LocalStorage, Storage};

/// Board state kept in the browser's local storage under a single key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct LocalStore {
    key: &'static str,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self { key: STORAGE_KEY }
    }
}

impl StateStore for LocalStore {
    fn load(&self) -> Option<String> {
        match LocalStorage::raw().get_item(self.key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("failed to read {}: {:?}", self.key, err);
                None
            }
        }
    }

    fn save(&mut self, value: &str) {
        if let Err(err) = LocalStorage::raw().set_item(self.key, value) {
            log::error!("failed to save {}: {:?}", self.key, err);
        }
    }

    fn clear(&mut self) {
        LocalStorage::delete(self.key);
    }
}
