use super::record::{self, MessageId, MessageRecord};
use super::store::{KeyValueStore, StoreError};

/// Storage key holding the JSON array of messages.
pub const STORAGE_KEY: &str = "messages";

/// Message list cached in memory and mirrored to a key-value store.
///
/// The store is parsed once in [`MessageRepository::load`]. Every mutation
/// writes the whole sequence back and only touches the cache once that write
/// succeeded, so cache and store never disagree.
pub struct MessageRepository<S: KeyValueStore> {
    store: S,
    records: Vec<MessageRecord>,
    next_id: u64,
}

impl<S: KeyValueStore> MessageRepository<S> {
    /// Read the stored list. Unparseable data is logged and treated as an
    /// empty list; it is overwritten by the next mutation.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let records = match store.get(STORAGE_KEY)? {
            None => Vec::new(),
            Some(json) => match record::decode(&json) {
                Ok(decoded) => {
                    if decoded.normalized {
                        log::info!("messages: assigned ids to stored records");
                    }
                    decoded.records
                }
                Err(err) => {
                    log::warn!("messages: stored data is corrupted, starting empty ({err})");
                    Vec::new()
                }
            },
        };

        let next_id = record::next_id(&records).ok_or_else(exhausted)?;
        log::info!("messages: loaded {} record(s)", records.len());
        Ok(Self { store, records, next_id })
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn get(&self, id: MessageId) -> Option<&MessageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append a record after all existing ones and persist.
    pub fn append(&mut self, time: String, content: String) -> Result<&MessageRecord, StoreError> {
        let following = self.next_id.checked_add(1).ok_or_else(exhausted)?;
        let record = MessageRecord {
            id: MessageId(self.next_id),
            time,
            content,
        };
        let mut updated = self.records.clone();
        updated.push(record);
        self.persist(&updated)?;

        self.records = updated;
        self.next_id = following;
        self.records
            .last()
            .ok_or_else(|| StoreError::Write("appended message missing from cache".into()))
    }

    /// Remove the record with `id` and persist. Returns `None` if no record
    /// has that id, in which case nothing is written.
    pub fn delete(&mut self, id: MessageId) -> Result<Option<MessageRecord>, StoreError> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let mut updated = self.records.clone();
        let removed = updated.remove(index);
        self.persist(&updated)?;

        self.records = updated;
        Ok(Some(removed))
    }

    fn persist(&mut self, records: &[MessageRecord]) -> Result<(), StoreError> {
        let json = record::encode(records).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.store.set(STORAGE_KEY, &json)
    }
}

fn exhausted() -> StoreError {
    StoreError::Write("message ids exhausted".into())
}
