pub mod clock;
pub mod debounce;
pub mod dictionary;
pub mod error;
pub mod preprocess;
pub mod shard;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::DebounceGate;
pub use dictionary::{DefinitionEntry, DictionaryMetadata, LookupOutcome, PartOfSpeech, Sense};
pub use error::{CorpusParseError, InvalidQuery, ShardUnavailable};
pub use preprocess::{DefaultPreprocessor, Preprocessor, normalize};
pub use shard::ShardKey;
