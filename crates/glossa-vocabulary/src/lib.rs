pub mod document;
pub mod store;

pub use document::VocabularyItem;
pub use store::{VocabularyError, VocabularyStore};
