//! Serializer contract and its error model.

use thiserror::Error;

use spendbook_receipts::Receipt;

/// Failure while reading or writing the receipt collection.
///
/// Missing files, permission problems and malformed content all surface
/// here. Callers outside the core decide how to report; nothing retries.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed content: {0}")]
    Malformed(String),
}

/// Reads and writes the full receipt collection.
///
/// `read` must reconstruct an equivalent object graph, including per-receipt
/// product-id counters consistent with the loaded products, so that
/// write-then-read is observationally idempotent on the store's query
/// surface.
pub trait Serializer {
    /// Durably write the full ordered collection, replacing prior content.
    fn write(&self, receipts: &[Receipt]) -> Result<(), PersistenceError>;

    /// Read the full ordered collection.
    fn read(&self) -> Result<Vec<Receipt>, PersistenceError>;
}
