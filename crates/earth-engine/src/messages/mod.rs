pub mod board;
pub mod record;
pub mod repository;
pub mod store;

pub use board::{BoardError, BoardView, MessageBoard, SubmitOutcome};
pub use record::{MessageId, MessageRecord};
pub use repository::MessageRepository;
pub use store::{KeyValueStore, MemoryStore, StoreError};
