mod file;
mod memory;

use log::{ info, error };
use thiserror::Error;

use crate::cli::Args;
use crate::models::chat::ConversationEntry;

pub use self::file::FileStorage;
pub use self::memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client-local key/value storage, the terminal counterpart of browser local storage.
pub trait Storage: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Durable cache of past question/answer pairs kept under a single storage key.
pub struct ConversationStore {
    storage: Box<dyn Storage>,
    key: String,
    log: Vec<ConversationEntry>,
}

impl ConversationStore {
    pub fn new(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            log: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.log
    }

    /// Reads the persisted log, replacing the in-memory one. Absent or corrupt
    /// data yields an empty log; the failure is logged and goes no further.
    pub fn load(&mut self) -> Vec<ConversationEntry> {
        self.log = match self.storage.get_item(&self.key) {
            Ok(Some(saved)) => match serde_json::from_str::<Vec<ConversationEntry>>(&saved) {
                Ok(entries) if entries.iter().any(|e| e.parsed_timestamp().is_none()) => {
                    error!("Failed to load chat history: entry with invalid timestamp");
                    Vec::new()
                }
                Ok(entries) => {
                    info!("Loaded {} messages from history", entries.len());
                    entries
                }
                Err(e) => {
                    error!("Failed to load chat history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to read chat history: {}", e);
                Vec::new()
            }
        };
        self.log.clone()
    }

    /// Records a new pair and rewrites the whole persisted log.
    pub fn append(&mut self, question: &str, answer: &str) -> Result<ConversationEntry, StorageError> {
        let entry = ConversationEntry::new(question, answer);
        self.log.push(entry.clone());
        let serialized = serde_json::to_string(&self.log)?;
        self.storage.set_item(&self.key, &serialized)?;
        Ok(entry)
    }

    /// Empties the log once `confirm` agrees. Returns whether anything was cleared.
    pub fn clear<F>(&mut self, confirm: F) -> Result<bool, StorageError>
        where F: FnOnce() -> bool
    {
        if !confirm() {
            return Ok(false);
        }
        self.log.clear();
        self.storage.remove_item(&self.key)?;
        info!("Chat history cleared");
        Ok(true)
    }
}

pub fn initialize_conversation_store(args: &Args) -> ConversationStore {
    let storage: Box<dyn Storage> = if args.no_history {
        info!("Chat history disabled. Conversation is kept in memory only.");
        Box::new(MemoryStorage::new())
    } else {
        info!("Chat history will be stored in: {} under key {}", args.storage_path, args.history_key);
        Box::new(FileStorage::new(&args.storage_path))
    };
    ConversationStore::new(storage, args.history_key.clone())
}
