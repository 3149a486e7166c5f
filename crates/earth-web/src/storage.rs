use earth_engine::{KeyValueStore, StoreError};

use crate::error::js_message;

/// [`KeyValueStore`] backed by `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// Fails when storage is disabled (private mode, blocked cookies).
    pub fn open(window: &web_sys::Window) -> Result<Self, StoreError> {
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StoreError::Unavailable("localStorage is not available".into())),
            Err(err) => Err(StoreError::Unavailable(js_message(&err))),
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|err| StoreError::Read(js_message(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Write(js_message(&err)))
    }
}
