use super::record::{MessageId, MessageRecord};
use super::repository::MessageRepository;
use super::store::{KeyValueStore, StoreError};

/// Toggle caption while the list is shown.
pub const COLLAPSE_LABEL: &str = "折叠所有留言";
/// Toggle caption while the list is hidden.
pub const EXPAND_LABEL: &str = "展开所有留言";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no message with id {}", .0 .0)]
    UnknownMessage(MessageId),
}

/// What a submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Draft was empty after trimming; nothing changed.
    Ignored,
    Added(MessageRecord),
}

/// UI state of the message board on top of the persisted list.
///
/// The form starts hidden and the list starts expanded. Collapse state is
/// session-only and survives adds and deletes.
pub struct MessageBoard<S: KeyValueStore> {
    repo: MessageRepository<S>,
    form_open: bool,
    collapsed: bool,
}

impl<S: KeyValueStore> MessageBoard<S> {
    pub fn new(repo: MessageRepository<S>) -> Self {
        Self {
            repo,
            form_open: false,
            collapsed: false,
        }
    }

    /// Load the persisted list from `store` and wrap it.
    pub fn open(store: S) -> Result<Self, BoardError> {
        Ok(Self::new(MessageRepository::load(store)?))
    }

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    /// Append the trimmed draft stamped with `time`. The form closes only
    /// when a record was actually added.
    pub fn submit(&mut self, draft: &str, time: impl Into<String>) -> Result<SubmitOutcome, BoardError> {
        let content = draft.trim();
        if content.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        let record = self.repo.append(time.into(), content.to_string())?.clone();
        self.form_open = false;
        log::debug!("message {} added", record.id.0);
        Ok(SubmitOutcome::Added(record))
    }

    pub fn delete(&mut self, id: MessageId) -> Result<MessageRecord, BoardError> {
        let removed = self
            .repo
            .delete(id)?
            .ok_or(BoardError::UnknownMessage(id))?;
        log::debug!("message {} deleted", id.0);
        Ok(removed)
    }

    /// Flip list visibility. Returns true when now collapsed.
    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            messages: self.repo.records(),
            form_open: self.form_open,
            collapsed: self.collapsed,
        }
    }

    pub fn repository(&self) -> &MessageRepository<S> {
        &self.repo
    }
}

/// Snapshot the DOM layer renders from.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub messages: &'a [MessageRecord],
    pub form_open: bool,
    pub collapsed: bool,
}

impl BoardView<'_> {
    /// The toggle button only appears once there is something to collapse.
    pub fn toggle_visible(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn list_visible(&self) -> bool {
        !self.collapsed
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.collapsed {
            EXPAND_LABEL
        } else {
            COLLAPSE_LABEL
        }
    }
}
