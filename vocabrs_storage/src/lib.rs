#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod checkpoint;
pub mod csv_export;
pub mod frequency_cache;
pub mod vocabulary;

pub use checkpoint::FileCheckpointStore;
pub use csv_export::CsvExportWriter;
pub use frequency_cache::JsonFrequencyCache;
pub use vocabulary::SqliteVocabularyStore;
