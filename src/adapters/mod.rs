// Adapters layer: concrete implementations of the domain ports (model process, storage)

pub mod ollama;
pub mod storage;

pub use ollama::{OfflineInvoker, OllamaCommand};
pub use storage::LocalStorage;
